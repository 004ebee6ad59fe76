//! In-memory scene representation
//!
//! A [`Scene`] is what the external importer hands back after parsing the FBX
//! payload of an archive: objects with transforms and mesh data, materials
//! with their image nodes, and the textures those nodes point to. Every run
//! builds its own scene through a [`SceneBuilder`]; nothing is shared between
//! runs.

mod builder;
mod core;
mod import;

pub use builder::SceneBuilder;
pub use core::{
    Edge, Face, Material, MaterialId, Mesh, ObjectId, ObjectKind, Scene, SceneObject, Texture,
    TextureId, Transform, UvLayer, Vertex,
};
pub use import::{SceneDumpImporter, SceneImporter};
