//! Publishing-contract limits and policies
//!
//! Every number the checkers compare against lives in [`CheckConfig`]. The
//! default configuration is the published contract; harnesses may load a
//! partial JSON file to override individual limits.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One gibibyte, the largest archive accepted for review
pub const MAX_ARCHIVE_BYTES: u64 = 1024 * 1024 * 1024;

const MIB: u64 = 1024 * 1024;

/// Rotation (radians) the exporter adds on every export round trip
pub const EXPORTER_ROTATION_BIAS: f64 = -0.000008;

/// Limits and policies applied by the checkers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Largest accepted archive size in bytes
    pub max_archive_bytes: u64,
    /// Fewest FBX entries an archive may contain
    pub min_fbx_files: usize,
    /// Most FBX entries an archive may contain (Ground plus OKS)
    pub max_fbx_files: usize,
    /// Most OKS FBX entries an archive may contain
    pub max_oks_files: usize,
    /// Uncompressed FBX entry size above which a warning is raised
    pub warn_fbx_entry_bytes: u64,
    /// Uncompressed texture entry size above which a warning is raised
    pub warn_texture_entry_bytes: u64,
    /// Total uncompressed payload size above which a warning is raised
    pub warn_payload_bytes: u64,
    /// Triangle budget for OKS geometry (Main, MainGlass)
    pub poly_limit_oks: usize,
    /// Triangle budget for Ground-class geometry (Ground, GroundEl, Flora)
    pub poly_limit_ground: usize,
    /// Distance below which vertices are merged by the repair step.
    /// `None` disables the repair.
    pub merge_distance: Option<f64>,
    /// Required UV distance from the tile edge, in texture pixels
    pub uv_padding_px: u32,
    /// Edge length of regular textures
    pub texture_size_default: u32,
    /// Edge length of GroundEl textures
    pub texture_size_ground_el: u32,
    /// Minimum drop (meters) of Ground geometry below its top face
    pub min_ground_drop: f64,
    /// Allowed deviation of each scale factor from 1.0
    pub transform_tolerance: f64,
    /// Rotation bias introduced per export
    pub rotation_bias: f64,
    /// Allowed deviation (radians) from an exact multiple of the bias
    pub rotation_bias_tolerance: f64,
    /// Most export round trips tolerated as bias noise
    pub max_rotation_bias_count: u32,
    /// Most material slots on a glass object
    pub glass_max_slots: usize,
    /// Most material slots on a Ground object
    pub ground_max_slots: usize,
    /// Whether duplicate names flip the naming status to FAILED
    pub duplicates_fail_naming: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            max_archive_bytes: MAX_ARCHIVE_BYTES,
            min_fbx_files: 1,
            max_fbx_files: 21,
            max_oks_files: 20,
            warn_fbx_entry_bytes: 100 * MIB,
            warn_texture_entry_bytes: 10 * MIB,
            warn_payload_bytes: 500 * MIB,
            poly_limit_oks: 150_000,
            poly_limit_ground: 180_000,
            merge_distance: Some(0.025),
            uv_padding_px: 8,
            texture_size_default: 2048,
            texture_size_ground_el: 512,
            min_ground_drop: 1.0,
            transform_tolerance: 1e-6,
            rotation_bias: EXPORTER_ROTATION_BIAS,
            rotation_bias_tolerance: 1e-6,
            max_rotation_bias_count: 5,
            glass_max_slots: 7,
            ground_max_slots: 20,
            duplicates_fail_naming: true,
        }
    }
}

impl CheckConfig {
    /// Create the default (published) configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file
    ///
    /// Keys missing from the file keep their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse a configuration from JSON text and validate it
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: CheckConfig = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("malformed configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Override the repair merge distance (`None` disables vertex merging)
    pub fn with_merge_distance(mut self, distance: Option<f64>) -> Self {
        self.merge_distance = distance;
        self
    }

    /// Override the triangle budgets
    pub fn with_poly_limits(mut self, oks: usize, ground: usize) -> Self {
        self.poly_limit_oks = oks;
        self.poly_limit_ground = ground;
        self
    }

    /// Override the texture edge lengths
    pub fn with_texture_sizes(mut self, default: u32, ground_el: u32) -> Self {
        self.texture_size_default = default;
        self.texture_size_ground_el = ground_el;
        self
    }

    /// Choose whether duplicate names fail the naming category
    pub fn with_duplicates_fail_naming(mut self, fail: bool) -> Self {
        self.duplicates_fail_naming = fail;
        self
    }

    /// Expected texture edge length for a texture or object name
    pub fn texture_size_for(&self, name: &str) -> u32 {
        if name.contains("GroundEl") {
            self.texture_size_ground_el
        } else {
            self.texture_size_default
        }
    }

    /// UV padding normalized to the unit tile for a given object name
    pub fn uv_padding_for(&self, name: &str) -> f64 {
        f64::from(self.uv_padding_px) / f64::from(self.texture_size_for(name))
    }

    /// Reject values that would make the checks meaningless
    pub fn validate(&self) -> Result<()> {
        if self.min_fbx_files > self.max_fbx_files {
            return Err(Error::invalid_config(
                "min_fbx_files",
                self.min_fbx_files,
                "must not exceed max_fbx_files",
            ));
        }
        if self.uv_padding_px == 0 {
            return Err(Error::invalid_config(
                "uv_padding_px",
                self.uv_padding_px,
                "must be positive",
            ));
        }
        if self.texture_size_default == 0 || self.texture_size_ground_el == 0 {
            return Err(Error::invalid_config(
                "texture_size",
                format!("{}/{}", self.texture_size_default, self.texture_size_ground_el),
                "must be positive",
            ));
        }
        if let Some(distance) = self.merge_distance
            && !(distance.is_finite() && distance > 0.0)
        {
            return Err(Error::invalid_config(
                "merge_distance",
                distance,
                "must be a positive finite distance",
            ));
        }
        if self.rotation_bias == 0.0 || !self.rotation_bias.is_finite() {
            return Err(Error::invalid_config(
                "rotation_bias",
                self.rotation_bias,
                "must be a non-zero finite angle",
            ));
        }
        if !(self.transform_tolerance > 0.0 && self.rotation_bias_tolerance > 0.0) {
            return Err(Error::invalid_config(
                "tolerance",
                format!(
                    "{}/{}",
                    self.transform_tolerance, self.rotation_bias_tolerance
                ),
                "must be positive",
            ));
        }
        Ok(())
    }
}
