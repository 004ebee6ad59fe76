//! Scene import seam
//!
//! The FBX importer itself lives outside this crate. It is reached through
//! the [`SceneImporter`] trait; [`SceneDumpImporter`] reads the JSON dump the
//! containerized importer writes next to the extracted payload.

use super::builder::SceneBuilder;
use super::core::{
    Edge, Face, Material, MaterialId, Mesh, ObjectKind, Scene, SceneObject, Texture, TextureId,
    Transform, UvLayer, Vertex,
};
use crate::archive::ExtractedArchive;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Produces a [`Scene`] from an extracted archive payload
pub trait SceneImporter {
    /// Import the FBX payload of `payload` into a fresh scene
    ///
    /// Errors returned here are fatal to the validation run.
    fn import(&self, payload: &ExtractedArchive) -> Result<Scene>;
}

/// Importer reading a JSON scene dump produced by the external importer
#[derive(Debug, Clone)]
pub struct SceneDumpImporter {
    dump_path: PathBuf,
}

impl SceneDumpImporter {
    /// Create an importer for the dump at `dump_path`
    pub fn new(dump_path: impl Into<PathBuf>) -> Self {
        Self {
            dump_path: dump_path.into(),
        }
    }

    /// Path of the dump this importer reads
    pub fn dump_path(&self) -> &Path {
        &self.dump_path
    }

    /// Build a scene from dump text, resolving textures against `payload`
    pub fn parse(content: &str, payload: &ExtractedArchive) -> Result<Scene> {
        let dump: SceneDump = serde_json::from_str(content)?;
        dump.into_scene(payload)
    }
}

impl SceneImporter for SceneDumpImporter {
    fn import(&self, payload: &ExtractedArchive) -> Result<Scene> {
        let content = std::fs::read_to_string(&self.dump_path)
            .map_err(|e| Error::import_failed(&self.dump_path, &e.to_string()))?;
        let scene = Self::parse(&content, payload)?;
        debug!(
            objects = scene.objects.len(),
            materials = scene.materials.len(),
            textures = scene.textures.len(),
            "Imported scene dump {}",
            self.dump_path.display()
        );
        Ok(scene)
    }
}

#[derive(Debug, Deserialize)]
struct SceneDump {
    #[serde(default)]
    objects: Vec<ObjectDump>,
    #[serde(default)]
    materials: Vec<MaterialDump>,
    #[serde(default)]
    images: Vec<ImageDump>,
}

#[derive(Debug, Deserialize)]
struct ObjectDump {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    location: Option<[f64; 3]>,
    #[serde(default)]
    rotation_euler: Option<[f64; 3]>,
    #[serde(default)]
    scale: Option<[f64; 3]>,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    has_animation_data: bool,
    #[serde(default)]
    material_slots: Vec<Option<String>>,
    #[serde(default)]
    mesh: Option<MeshDump>,
}

#[derive(Debug, Deserialize)]
struct MeshDump {
    #[serde(default)]
    vertices: Vec<[f64; 3]>,
    #[serde(default)]
    faces: Vec<Vec<usize>>,
    #[serde(default)]
    loose_edges: Vec<[usize; 2]>,
    #[serde(default)]
    uv_layer: Option<UvLayerDump>,
}

#[derive(Debug, Deserialize)]
struct UvLayerDump {
    #[serde(default = "default_uv_name")]
    name: String,
    coords: Vec<[f64; 2]>,
}

fn default_uv_name() -> String {
    "UVMap".to_string()
}

#[derive(Debug, Deserialize)]
struct MaterialDump {
    name: String,
    #[serde(default)]
    image_nodes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ImageDump {
    name: String,
    filepath: String,
}

impl SceneDump {
    fn into_scene(self, payload: &ExtractedArchive) -> Result<Scene> {
        let mut builder = SceneBuilder::new();

        let mut texture_ids: HashMap<String, TextureId> = HashMap::new();
        for image in self.images {
            let mut texture = Texture::new(image.name.clone(), image.filepath);
            texture.resolved_path = resolve_texture(&texture.filepath, payload);
            if texture.resolved_path.is_none() {
                warn!(
                    "Texture '{}' ({}) not found in extracted payload",
                    texture.name, texture.filepath
                );
            }
            texture_ids.insert(image.name, builder.add_texture(texture));
        }

        let mut material_ids: HashMap<String, MaterialId> = HashMap::new();
        for material in self.materials {
            let image_nodes = material
                .image_nodes
                .iter()
                .map(|name| {
                    texture_ids.get(name).copied().ok_or_else(|| {
                        Error::invalid_scene(
                            &material.name,
                            &format!("image node references unknown image '{}'", name),
                        )
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let id = builder.add_material(Material {
                name: material.name.clone(),
                image_nodes,
            });
            material_ids.insert(material.name, id);
        }

        let mut object_ids = HashMap::new();
        let mut shared_names = HashSet::new();
        let mut parent_links = Vec::new();
        for object in self.objects {
            let material_slots = object
                .material_slots
                .iter()
                .map(|slot| match slot {
                    None => Ok(None),
                    Some(name) => material_ids.get(name).copied().map(Some).ok_or_else(|| {
                        Error::invalid_scene(
                            &object.name,
                            &format!("material slot references unknown material '{}'", name),
                        )
                    }),
                })
                .collect::<Result<Vec<_>>>()?;

            let defaults = Transform::identity();
            let scene_object = SceneObject {
                name: object.name.clone(),
                kind: ObjectKind::from_name(&object.kind),
                transform: Transform {
                    location: object.location.unwrap_or(defaults.location),
                    rotation_euler: object.rotation_euler.unwrap_or(defaults.rotation_euler),
                    scale: object.scale.unwrap_or(defaults.scale),
                },
                mesh: object.mesh.map(MeshDump::into_mesh),
                parent: None,
                children: Vec::new(),
                has_animation_data: object.has_animation_data,
                material_slots,
            };
            let id = builder.add_object(scene_object);
            if let Some(parent) = object.parent {
                parent_links.push((object.name.clone(), parent, id));
            }
            if let Some(previous) = object_ids.insert(object.name.clone(), id) {
                warn!(
                    "Object name '{}' is used by objects {} and {}",
                    object.name, previous.0, id.0
                );
                shared_names.insert(object.name);
            }
        }

        for (child_name, parent_name, child) in parent_links {
            if shared_names.contains(&parent_name) {
                return Err(Error::invalid_scene(
                    &child_name,
                    &format!(
                        "parent '{}' is ambiguous, several objects share that name",
                        parent_name
                    ),
                ));
            }
            let parent = object_ids.get(&parent_name).copied().ok_or_else(|| {
                Error::invalid_scene(
                    &child_name,
                    &format!("parent '{}' is not in the scene", parent_name),
                )
            })?;
            builder.link(parent, child)?;
        }

        builder.build()
    }
}

impl MeshDump {
    fn into_mesh(self) -> Mesh {
        Mesh {
            vertices: self
                .vertices
                .into_iter()
                .map(|[x, y, z]| Vertex::new(x, y, z))
                .collect(),
            faces: self.faces.into_iter().map(Face::new).collect(),
            loose_edges: self
                .loose_edges
                .into_iter()
                .map(|[a, b]| Edge::new(a, b))
                .collect(),
            uv_layer: self.uv_layer.map(|uv| UvLayer {
                name: uv.name,
                coords: uv.coords,
            }),
        }
    }
}

/// Find the extracted file for a texture path as referenced by the FBX
///
/// Textures are extracted flat, so the lookup goes by file name first; an
/// absolute path that exists on disk is accepted as-is.
fn resolve_texture(filepath: &str, payload: &ExtractedArchive) -> Option<PathBuf> {
    let normalized = filepath.trim_start_matches("//").replace('\\', "/");
    let file_name = Path::new(&normalized).file_name()?;
    let candidate = payload.textures_dir.join(file_name);
    if candidate.is_file() {
        return Some(candidate);
    }
    let direct = Path::new(&normalized);
    if direct.is_absolute() && direct.is_file() {
        return Some(direct.to_path_buf());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn payload(dir: &TempDir) -> ExtractedArchive {
        let textures_dir = dir.path().join("textures");
        std::fs::create_dir_all(&textures_dir).unwrap();
        ExtractedArchive {
            root: dir.path().to_path_buf(),
            fbx_files: Vec::new(),
            textures_dir,
            texture_files: Vec::new(),
        }
    }

    const DUMP: &str = r#"{
        "objects": [
            {"name": "Root", "type": "EMPTY"},
            {
                "name": "SM_Lenina_12_Main",
                "type": "MESH",
                "parent": "Root",
                "rotation_euler": [-0.000016, 0.0, 0.0],
                "material_slots": ["M_Lenina_12_Main_1", null],
                "mesh": {
                    "vertices": [[0,0,0],[1,0,0],[0,1,0]],
                    "faces": [[0,1,2]],
                    "uv_layer": {"coords": [[0.1,0.1],[0.9,0.1],[0.1,0.9]]}
                }
            }
        ],
        "materials": [{"name": "M_Lenina_12_Main_1", "image_nodes": ["T_Lenina_12_Main_1"]}],
        "images": [{"name": "T_Lenina_12_Main_1", "filepath": "//textures\\T_Lenina_12_Main_1.png"}]
    }"#;

    #[test]
    fn test_parse_dump() {
        let dir = TempDir::new().unwrap();
        let payload = payload(&dir);
        std::fs::write(payload.textures_dir.join("T_Lenina_12_Main_1.png"), b"png").unwrap();

        let scene = SceneDumpImporter::parse(DUMP, &payload).unwrap();
        assert_eq!(scene.objects.len(), 2);
        let main = &scene.objects[1];
        assert_eq!(main.kind, ObjectKind::Mesh);
        assert_eq!(main.parent.map(|p| p.0), Some(0));
        assert_eq!(scene.objects[0].children.len(), 1);
        assert_eq!(main.material_slots, vec![Some(MaterialId(0)), None]);
        assert_eq!(main.transform.scale, [1.0, 1.0, 1.0]);
        assert_eq!(main.mesh.as_ref().unwrap().uv_layer.as_ref().unwrap().name, "UVMap");
        assert_eq!(
            scene.textures[0].resolved_path,
            Some(payload.textures_dir.join("T_Lenina_12_Main_1.png"))
        );
    }

    #[test]
    fn test_unresolved_texture_kept() {
        let dir = TempDir::new().unwrap();
        let scene = SceneDumpImporter::parse(DUMP, &payload(&dir)).unwrap();
        assert_eq!(scene.textures.len(), 1);
        assert!(scene.textures[0].resolved_path.is_none());
    }

    #[test]
    fn test_unknown_material_rejected() {
        let dir = TempDir::new().unwrap();
        let dump = r#"{"objects": [{"name": "SM_a_Ground", "type": "MESH", "material_slots": ["M_missing"]}]}"#;
        let err = SceneDumpImporter::parse(dump, &payload(&dir)).unwrap_err();
        assert!(err.to_string().contains("M_missing"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_ambiguous_parent_rejected() {
        let dir = TempDir::new().unwrap();
        let dump = r#"{"objects": [
            {"name": "Root", "type": "EMPTY"},
            {"name": "Root", "type": "EMPTY"},
            {"name": "SM_a_1_Main", "type": "MESH", "parent": "Root"}
        ]}"#;
        let err = SceneDumpImporter::parse(dump, &payload(&dir)).unwrap_err();
        assert!(err.to_string().contains("[E2002]"));
        assert!(err.to_string().contains("parent 'Root' is ambiguous"));
    }

    #[test]
    fn test_shared_name_without_parent_link_is_kept() {
        let dir = TempDir::new().unwrap();
        let dump = r#"{"objects": [
            {"name": "SM_a_1_Main", "type": "MESH"},
            {"name": "SM_a_1_Main", "type": "MESH"}
        ]}"#;
        let scene = SceneDumpImporter::parse(dump, &payload(&dir)).unwrap();
        assert_eq!(scene.objects.len(), 2);
        assert!(scene.objects.iter().all(|o| o.parent.is_none()));
    }

    #[test]
    fn test_missing_dump_is_import_error() {
        let dir = TempDir::new().unwrap();
        let importer = SceneDumpImporter::new(dir.path().join("absent.json"));
        let err = importer.import(&payload(&dir)).unwrap_err();
        assert!(err.to_string().contains("[E2001]"));
    }

    #[test]
    fn test_malformed_dump_is_json_error() {
        let dir = TempDir::new().unwrap();
        let err = SceneDumpImporter::parse("{\"objects\": 3}", &payload(&dir)).unwrap_err();
        assert!(err.to_string().contains("[E2003]"));
    }
}
