//! Validation checks over an imported scene
//!
//! This module contains every checker of the publishing contract:
//! - Geometry: object kinds, ground drop, cleanliness, triangulation,
//!   transforms, UV maps and polygon budgets
//! - Texture/material: format, alpha, size and material slot budgets
//! - Naming: name patterns, invalid characters and duplicates
//!
//! Checkers never abort a run. Each one is invoked through [`run_check`],
//! which turns an error or a panic inside the checker into a FAILED finding
//! for that check alone.

mod geometry;
mod material;
mod naming;

pub use geometry::{
    check_geometry_cleanliness, check_ground_drop, check_polygon_budget, check_scene_contents,
    check_transforms, check_triangulation, check_uv_maps, repair_scene, rotation_is_reset,
};
pub use material::{
    check_alpha_channel, check_glass_material, check_ground_material, check_texture_format,
    check_texture_size,
};
pub use naming::{
    GeometryCategory, MaterialCategory, NamingCategory, find_duplicates, invalid_characters,
    strip_duplicate_suffix, validate_naming,
};

use crate::config::CheckConfig;
use crate::error::{Error, Result};
use crate::finding::{CategoryMap, CheckId, Finding};
use crate::scene::Scene;
use crate::texture::TextureAnalyzer;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, warn};

/// Run one checker in isolation and record its finding under `id`
pub fn run_check<F>(findings: &mut CategoryMap, id: CheckId, check: F)
where
    F: FnOnce() -> Result<Finding>,
{
    let finding = isolate(id.name(), check).unwrap_or_else(|e| {
        warn!("Check '{}' failed internally: {}", id, e);
        Finding::failed(format!("Internal error: {}", e))
    });
    debug!("Check {}: {}", id, finding.status);
    findings.insert(id, finding);
}

/// Call `f`, converting a panic into [`Error::CheckFailed`]
pub fn isolate<T, F>(check: &str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(Error::CheckFailed {
            check: check.to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run the checks that inspect the scene as imported
///
/// Covers scene contents, ground drop and geometry cleanliness. These run
/// before [`repair_scene`] so they see the geometry exactly as delivered.
pub fn check_scene_hygiene(scene: &Scene, config: &CheckConfig, findings: &mut CategoryMap) {
    run_check(findings, CheckId::SceneContents, || {
        Ok(check_scene_contents(scene))
    });
    run_check(findings, CheckId::GroundDrop, || {
        Ok(check_ground_drop(scene, config))
    });
    run_check(findings, CheckId::GeometryCleanliness, || {
        Ok(check_geometry_cleanliness(scene))
    });
}

/// Run the structural geometry checks
///
/// Covers triangulation, transforms, UV maps and polygon budgets.
pub fn check_scene_structure(scene: &Scene, config: &CheckConfig, findings: &mut CategoryMap) {
    run_check(findings, CheckId::Triangulation, || {
        Ok(check_triangulation(scene))
    });
    run_check(findings, CheckId::Transforms, || {
        Ok(check_transforms(scene, config))
    });
    run_check(findings, CheckId::UvMaps, || Ok(check_uv_maps(scene, config)));
    run_check(findings, CheckId::PolygonBudget, || {
        Ok(check_polygon_budget(scene, config))
    });
}

/// Run every texture and material check, sharing one texture analyzer
pub fn check_textures_and_materials(
    scene: &Scene,
    config: &CheckConfig,
    analyzer: &mut TextureAnalyzer,
    findings: &mut CategoryMap,
) {
    run_check(findings, CheckId::TextureFormat, || {
        Ok(check_texture_format(scene))
    });
    run_check(findings, CheckId::AlphaChannel, || {
        Ok(check_alpha_channel(scene, analyzer))
    });
    run_check(findings, CheckId::TextureSize, || {
        Ok(check_texture_size(scene, config, analyzer))
    });
    run_check(findings, CheckId::GlassMaterial, || {
        Ok(check_glass_material(scene, config))
    });
    run_check(findings, CheckId::GroundMaterial, || {
        Ok(check_ground_material(scene, config))
    });
}
