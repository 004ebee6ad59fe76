//! Per-run scene construction

use super::core::{Material, ObjectId, Scene, SceneObject, Texture};
use crate::error::{Error, Result};

/// Builds a fresh [`Scene`] for one validation run
///
/// The builder owns everything added to it; `build` verifies that every
/// index held by objects, materials and meshes points at something that
/// exists, then hands over the finished scene.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    /// Start an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, returning its id
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        self.scene.objects.push(object);
        ObjectId(self.scene.objects.len() - 1)
    }

    /// Add a material, returning its index
    pub fn add_material(&mut self, material: Material) -> super::MaterialId {
        self.scene.materials.push(material);
        super::MaterialId(self.scene.materials.len() - 1)
    }

    /// Add a texture, returning its index
    pub fn add_texture(&mut self, texture: Texture) -> super::TextureId {
        self.scene.textures.push(texture);
        super::TextureId(self.scene.textures.len() - 1)
    }

    /// Chainable form of [`add_object`](Self::add_object)
    pub fn object(mut self, object: SceneObject) -> Self {
        self.add_object(object);
        self
    }

    /// Chainable form of [`add_material`](Self::add_material)
    pub fn material(mut self, material: Material) -> Self {
        self.add_material(material);
        self
    }

    /// Chainable form of [`add_texture`](Self::add_texture)
    pub fn texture(mut self, texture: Texture) -> Self {
        self.add_texture(texture);
        self
    }

    /// Link `child` under `parent`, updating both sides
    pub fn link(&mut self, parent: ObjectId, child: ObjectId) -> Result<()> {
        let count = self.scene.objects.len();
        if parent.0 >= count || child.0 >= count {
            return Err(Error::InvalidScene(format!(
                "cannot link object {} under {}: scene has {} objects",
                child.0, parent.0, count
            )));
        }
        self.scene.objects[child.0].parent = Some(parent);
        if !self.scene.objects[parent.0].children.contains(&child) {
            self.scene.objects[parent.0].children.push(child);
        }
        Ok(())
    }

    /// Verify references and return the scene
    pub fn build(self) -> Result<Scene> {
        validate_references(&self.scene)?;
        Ok(self.scene)
    }
}

fn validate_references(scene: &Scene) -> Result<()> {
    let objects = scene.objects.len();
    let materials = scene.materials.len();
    let textures = scene.textures.len();

    for material in &scene.materials {
        if let Some(bad) = material.image_nodes.iter().find(|t| t.0 >= textures) {
            return Err(Error::invalid_scene(
                &material.name,
                &format!(
                    "image node references texture {} but the scene has {} textures",
                    bad.0, textures
                ),
            ));
        }
    }

    for object in &scene.objects {
        if let Some(parent) = object.parent
            && parent.0 >= objects
        {
            return Err(Error::invalid_scene(
                &object.name,
                &format!("parent {} out of range ({} objects)", parent.0, objects),
            ));
        }
        if let Some(child) = object.children.iter().find(|c| c.0 >= objects) {
            return Err(Error::invalid_scene(
                &object.name,
                &format!("child {} out of range ({} objects)", child.0, objects),
            ));
        }
        if let Some((slot, id)) = object
            .material_slots
            .iter()
            .enumerate()
            .find_map(|(i, s)| s.filter(|id| id.0 >= materials).map(|id| (i, id)))
        {
            return Err(Error::invalid_scene(
                &object.name,
                &format!(
                    "material slot {} references material {} but the scene has {} materials",
                    slot, id.0, materials
                ),
            ));
        }

        let Some(mesh) = &object.mesh else {
            continue;
        };
        let vertex_count = mesh.vertices.len();
        for (face_idx, face) in mesh.faces.iter().enumerate() {
            if let Some(v) = face.vertices.iter().find(|v| **v >= vertex_count) {
                return Err(Error::invalid_scene(
                    &object.name,
                    &format!(
                        "face {} vertex {} out of bounds (mesh has {} vertices)",
                        face_idx, v, vertex_count
                    ),
                ));
            }
        }
        if let Some(edge) = mesh
            .loose_edges
            .iter()
            .find(|e| e.0 >= vertex_count || e.1 >= vertex_count)
        {
            return Err(Error::invalid_scene(
                &object.name,
                &format!(
                    "loose edge {}-{} out of bounds (mesh has {} vertices)",
                    edge.0, edge.1, vertex_count
                ),
            ));
        }
        if let Some(layer) = &mesh.uv_layer
            && layer.coords.len() != mesh.loop_count()
        {
            return Err(Error::invalid_scene(
                &object.name,
                &format!(
                    "UV layer '{}' has {} coordinates for {} loops",
                    layer.name,
                    layer.coords.len(),
                    mesh.loop_count()
                ),
            ));
        }
    }

    Ok(())
}
