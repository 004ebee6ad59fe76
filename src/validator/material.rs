//! Texture and material checks

use crate::config::CheckConfig;
use crate::finding::Finding;
use crate::scene::{Scene, Texture};
use crate::texture::{TextureAnalyzer, TextureStructure};

/// Glass object name markers
const GLASS_MARKERS: [&str; 3] = ["MainGlass", "GroundGlass", "GroundElGlass"];

fn referenced(scene: &Scene) -> Vec<&Texture> {
    scene
        .referenced_textures()
        .into_iter()
        .filter_map(|id| scene.texture(id))
        .collect()
}

fn structure_of(texture: &Texture, analyzer: &mut TextureAnalyzer) -> TextureStructure {
    match &texture.resolved_path {
        Some(path) => analyzer.analyze(path).clone(),
        None => TextureStructure::unknown(std::path::Path::new(&texture.filepath)),
    }
}

/// Every referenced texture must come from a `.png` file
pub fn check_texture_format(scene: &Scene) -> Finding {
    let textures = referenced(scene);
    if textures.is_empty() {
        return Finding::absent("No textures found");
    }
    let issues = textures
        .iter()
        .filter(|t| t.extension() != ".png")
        .map(|t| format!("Texture {} is not PNG", t.name))
        .collect();
    Finding::from_issues(issues, "All textures are in PNG format")
}

/// No referenced texture may carry a meaningful alpha channel
pub fn check_alpha_channel(scene: &Scene, analyzer: &mut TextureAnalyzer) -> Finding {
    let textures = referenced(scene);
    if textures.is_empty() {
        return Finding::absent("No textures found");
    }
    let mut issues = Vec::new();
    for texture in textures {
        let structure = structure_of(texture, analyzer);
        if structure.has_alpha_channel {
            issues.push(format!(
                "{} has alpha channel (mode: {}, bits: {})",
                texture.name, structure.color_mode, structure.bits_per_channel
            ));
        }
    }
    Finding::from_issues(issues, "No textures with alpha channel found")
}

/// Referenced textures must be square at the size their name calls for
///
/// Textures whose file is missing or unreadable report a size of (0, 0).
pub fn check_texture_size(
    scene: &Scene,
    config: &CheckConfig,
    analyzer: &mut TextureAnalyzer,
) -> Finding {
    let textures = referenced(scene);
    if textures.is_empty() {
        return Finding::absent("No textures found");
    }
    let mut issues = Vec::new();
    for texture in textures {
        let expected = config.texture_size_for(&texture.name);
        let (width, height) = structure_of(texture, analyzer).size;
        if (width, height) != (expected, expected) {
            issues.push(format!(
                "{} size is ({}, {}), expected ({}, {})",
                texture.name, width, height, expected, expected
            ));
        }
    }
    Finding::from_issues(issues, "All textures have correct size")
}

/// Glass objects stay within the glass slot budget and use no textures
pub fn check_glass_material(scene: &Scene, config: &CheckConfig) -> Finding {
    let mut found = false;
    let mut issues = Vec::new();
    for (object, _) in scene.mesh_objects() {
        if !GLASS_MARKERS.iter().any(|m| object.name.contains(m)) {
            continue;
        }
        found = true;
        let slots = object.material_slots.len();
        if slots > config.glass_max_slots {
            issues.push(format!(
                "{} has {} materials (max {} allowed)",
                object.name, slots, config.glass_max_slots
            ));
        }
        for (material, texture_id) in scene.object_textures(object) {
            let texture = scene
                .texture(texture_id)
                .map(|t| t.name.as_str())
                .unwrap_or("<missing>");
            issues.push(format!(
                "{} material {} has texture {} (textures not allowed for glass)",
                object.name, material.name, texture
            ));
        }
    }
    if !found {
        return Finding::absent("No glass objects found");
    }
    Finding::from_issues(issues, "Glass materials are valid")
}

/// Ground objects (not GroundEl) stay within the ground slot budget
pub fn check_ground_material(scene: &Scene, config: &CheckConfig) -> Finding {
    let mut found = false;
    let mut issues = Vec::new();
    for (object, _) in scene.mesh_objects() {
        if !object.name.contains("Ground") || object.name.contains("GroundEl") {
            continue;
        }
        found = true;
        let slots = object.material_slots.len();
        if slots > config.ground_max_slots {
            issues.push(format!(
                "{} has {} materials (max {} allowed)",
                object.name, slots, config.ground_max_slots
            ));
        }
    }
    if !found {
        return Finding::absent("No ground objects found");
    }
    Finding::from_issues(issues, "Ground materials are valid")
}
