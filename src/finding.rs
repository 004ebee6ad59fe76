//! Per-check findings
//!
//! Each checker produces one [`Finding`]: a status plus the ordered messages
//! that explain it. Findings are grouped into [`CategoryMap`]s keyed by
//! [`CheckId`], which keep the fixed run order when serialized.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// The contract holds
    Passed,
    /// At least one violation was found
    Failed,
    /// Nothing the check applies to exists in the scene
    Absent,
    /// The check did not run
    NotChecked,
}

impl Status {
    /// PASSED when `ok`, FAILED otherwise
    pub fn from_ok(ok: bool) -> Self {
        if ok { Status::Passed } else { Status::Failed }
    }

    /// Whether this status counts against the asset
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed)
    }

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Passed => "PASSED",
            Status::Failed => "FAILED",
            Status::Absent => "ABSENT",
            Status::NotChecked => "NOT_CHECKED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class of contract violation a check guards against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// Missing, corrupt, oversized or misnamed archive
    Archive,
    /// Disallowed object kind, hierarchy or animation
    SceneContent,
    /// Non-triangulated faces, unreset transforms, UV bounds and padding
    Geometry,
    /// Wrong texture format, size or unwanted alpha
    Texture,
    /// Too many material slots or textures on glass
    MaterialBudget,
    /// Pattern mismatch, invalid characters, duplicate names
    Naming,
}

impl IssueKind {
    /// Human-readable label used in summaries
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::Archive => "ArchiveError",
            IssueKind::SceneContent => "SceneContentError",
            IssueKind::Geometry => "GeometryError",
            IssueKind::Texture => "TextureError",
            IssueKind::MaterialBudget => "MaterialBudgetError",
            IssueKind::Naming => "NamingError",
        }
    }
}

/// Identifier of every check in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    /// Archive byte size
    ArchiveSize,
    /// FBX entry composition and names
    FbxFiles,
    /// Advisory payload limits: texture presence and entry sizes
    ArchivePayload,
    /// Allowed object kinds, hierarchy, animation
    SceneContents,
    /// Vertical drop of Ground geometry
    GroundDrop,
    /// Floating vertices and degenerate edges
    GeometryCleanliness,
    /// Every face is a triangle
    Triangulation,
    /// Rotation and scale are reset
    Transforms,
    /// UV layer presence, UDIM bounds and padding
    UvMaps,
    /// Triangle budgets per category
    PolygonBudget,
    /// Textures are PNG
    TextureFormat,
    /// Textures carry no meaningful alpha
    AlphaChannel,
    /// Textures have the expected square size
    TextureSize,
    /// Glass objects: slot budget and no textures
    GlassMaterial,
    /// Ground objects: slot budget
    GroundMaterial,
}

impl CheckId {
    /// Checks reported in the `geometry_data` category, in run order
    pub const GEOMETRY: [CheckId; 10] = [
        CheckId::ArchiveSize,
        CheckId::FbxFiles,
        CheckId::ArchivePayload,
        CheckId::SceneContents,
        CheckId::GroundDrop,
        CheckId::GeometryCleanliness,
        CheckId::Triangulation,
        CheckId::Transforms,
        CheckId::UvMaps,
        CheckId::PolygonBudget,
    ];

    /// Checks reported in the `texture_material` category, in run order
    pub const TEXTURE_MATERIAL: [CheckId; 5] = [
        CheckId::TextureFormat,
        CheckId::AlphaChannel,
        CheckId::TextureSize,
        CheckId::GlassMaterial,
        CheckId::GroundMaterial,
    ];

    /// Wire name of the check
    pub fn name(&self) -> &'static str {
        match self {
            CheckId::ArchiveSize => "archive_size",
            CheckId::FbxFiles => "fbx_files",
            CheckId::ArchivePayload => "archive_payload",
            CheckId::SceneContents => "scene_contents",
            CheckId::GroundDrop => "ground_drop",
            CheckId::GeometryCleanliness => "geometry_cleanliness",
            CheckId::Triangulation => "triangulation",
            CheckId::Transforms => "transforms",
            CheckId::UvMaps => "uv_maps",
            CheckId::PolygonBudget => "polygon_budget",
            CheckId::TextureFormat => "texture_format",
            CheckId::AlphaChannel => "alpha_channel",
            CheckId::TextureSize => "texture_size",
            CheckId::GlassMaterial => "glass_material",
            CheckId::GroundMaterial => "ground_material",
        }
    }

    /// Class of violation this check reports
    pub fn issue_kind(&self) -> IssueKind {
        match self {
            CheckId::ArchiveSize | CheckId::FbxFiles | CheckId::ArchivePayload => {
                IssueKind::Archive
            }
            CheckId::SceneContents => IssueKind::SceneContent,
            CheckId::GroundDrop
            | CheckId::GeometryCleanliness
            | CheckId::Triangulation
            | CheckId::Transforms
            | CheckId::UvMaps
            | CheckId::PolygonBudget => IssueKind::Geometry,
            CheckId::TextureFormat | CheckId::AlphaChannel | CheckId::TextureSize => {
                IssueKind::Texture
            }
            CheckId::GlassMaterial | CheckId::GroundMaterial => IssueKind::MaterialBudget,
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Overall status of the check
    pub status: Status,
    /// Ordered explanation lines
    pub messages: Vec<String>,
}

impl Finding {
    /// A check that has not run
    pub fn not_checked() -> Self {
        Self {
            status: Status::NotChecked,
            messages: Vec::new(),
        }
    }

    /// A passing check with a single message
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Passed,
            messages: vec![message.into()],
        }
    }

    /// A failing check with a single message
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            messages: vec![message.into()],
        }
    }

    /// A check with nothing to apply to
    pub fn absent(message: impl Into<String>) -> Self {
        Self {
            status: Status::Absent,
            messages: vec![message.into()],
        }
    }

    /// Collapse a list of issues into a finding: PASSED with `ok_message` when
    /// empty, FAILED listing every issue otherwise
    pub fn from_issues(issues: Vec<String>, ok_message: &str) -> Self {
        if issues.is_empty() {
            Self::passed(ok_message)
        } else {
            Self {
                status: Status::Failed,
                messages: issues,
            }
        }
    }
}

/// Findings of one report category, in run order
pub type CategoryMap = IndexMap<CheckId, Finding>;

/// Create a category map with every listed check NOT_CHECKED
pub fn unchecked_category(checks: &[CheckId]) -> CategoryMap {
    checks
        .iter()
        .map(|id| (*id, Finding::not_checked()))
        .collect()
}
