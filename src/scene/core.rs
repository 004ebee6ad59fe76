//! Core scene types

use std::path::PathBuf;

/// Index of an object within a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

/// Index of a material within a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

/// Index of a texture within a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// Kind of a scene object as reported by the importer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Polygon mesh
    Mesh,
    /// Empty (transform only), tolerated as an import artifact
    Empty,
    /// Skeleton
    Armature,
    /// Camera
    Camera,
    /// Light source
    Light,
    /// Sound emitter
    Sound,
    /// Curve
    Curve,
    /// Anything else the importer produced
    Other(String),
}

impl ObjectKind {
    /// Upper-case importer name of the kind
    pub fn name(&self) -> &str {
        match self {
            ObjectKind::Mesh => "MESH",
            ObjectKind::Empty => "EMPTY",
            ObjectKind::Armature => "ARMATURE",
            ObjectKind::Camera => "CAMERA",
            ObjectKind::Light => "LIGHT",
            ObjectKind::Sound => "SOUND",
            ObjectKind::Curve => "CURVE",
            ObjectKind::Other(name) => name,
        }
    }

    /// Parse an importer kind name (case-insensitive)
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "MESH" => ObjectKind::Mesh,
            "EMPTY" => ObjectKind::Empty,
            "ARMATURE" => ObjectKind::Armature,
            "CAMERA" => ObjectKind::Camera,
            "LIGHT" | "LAMP" => ObjectKind::Light,
            "SOUND" | "SPEAKER" => ObjectKind::Sound,
            "CURVE" => ObjectKind::Curve,
            other => ObjectKind::Other(other.to_string()),
        }
    }
}

/// A vertex position in object space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate (up)
    pub z: f64,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A polygon as an ordered list of vertex indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    /// Vertex indices, in winding order
    pub vertices: Vec<usize>,
}

impl Face {
    /// Create a face from vertex indices
    pub fn new(vertices: Vec<usize>) -> Self {
        Self { vertices }
    }

    /// Create a triangle
    pub fn triangle(v1: usize, v2: usize, v3: usize) -> Self {
        Self {
            vertices: vec![v1, v2, v3],
        }
    }

    /// Whether the face has exactly three corners
    pub fn is_triangle(&self) -> bool {
        self.vertices.len() == 3
    }
}

/// An undirected edge between two vertices, stored with the smaller index first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    /// Create a normalized edge
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b { Edge(a, b) } else { Edge(b, a) }
    }
}

/// Per-loop UV coordinates
///
/// Loops are enumerated face by face: the corners of face 0 first, then the
/// corners of face 1 and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct UvLayer {
    /// Layer name
    pub name: String,
    /// One (u, v) pair per face corner
    pub coords: Vec<[f64; 2]>,
}

/// Mesh data of a MESH object
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub vertices: Vec<Vertex>,
    /// Polygons
    pub faces: Vec<Face>,
    /// Edges that belong to no face
    pub loose_edges: Vec<Edge>,
    /// Active UV layer, if the mesh has any
    pub uv_layer: Option<UvLayer>,
}

impl Mesh {
    /// Create a new empty mesh
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            loose_edges: Vec::new(),
            uv_layer: None,
        }
    }

    /// Total number of face corners
    pub fn loop_count(&self) -> usize {
        self.faces.iter().map(|f| f.vertices.len()).sum()
    }

    /// Number of faces with exactly three corners
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_triangle()).count()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Object transform in Euler XYZ form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation
    pub location: [f64; 3],
    /// Euler rotation in radians (X, Y, Z)
    pub rotation_euler: [f64; 3],
    /// Scale factors (X, Y, Z)
    pub scale: [f64; 3],
}

impl Transform {
    /// The identity transform
    pub fn identity() -> Self {
        Self {
            location: [0.0; 3],
            rotation_euler: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// An object in the imported scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Object name
    pub name: String,
    /// Object kind
    pub kind: ObjectKind,
    /// Object transform
    pub transform: Transform,
    /// Mesh data (present for MESH objects)
    pub mesh: Option<Mesh>,
    /// Parent object
    pub parent: Option<ObjectId>,
    /// Child objects
    pub children: Vec<ObjectId>,
    /// Whether the object carries animation data
    pub has_animation_data: bool,
    /// Material slots; empty slots are `None` and still count toward the total
    pub material_slots: Vec<Option<MaterialId>>,
}

impl SceneObject {
    /// Create an unparented object with the identity transform
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transform: Transform::identity(),
            mesh: None,
            parent: None,
            children: Vec::new(),
            has_animation_data: false,
            material_slots: Vec::new(),
        }
    }

    /// Create a MESH object
    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        let mut object = Self::new(name, ObjectKind::Mesh);
        object.mesh = Some(mesh);
        object
    }

    /// Whether this is a MESH object
    pub fn is_mesh(&self) -> bool {
        self.kind == ObjectKind::Mesh
    }
}

/// A material with its image texture nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name
    pub name: String,
    /// Textures referenced by image nodes, in node order
    pub image_nodes: Vec<TextureId>,
}

impl Material {
    /// Create a material without texture nodes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_nodes: Vec::new(),
        }
    }
}

/// An image texture known to the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// Image name
    pub name: String,
    /// Source path as referenced by the FBX payload
    pub filepath: String,
    /// File on disk holding the pixel data, if it could be resolved
    pub resolved_path: Option<PathBuf>,
}

impl Texture {
    /// Create a texture that has not been resolved to a file
    pub fn new(name: impl Into<String>, filepath: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filepath: filepath.into(),
            resolved_path: None,
        }
    }

    /// Lower-cased file extension of the source path, including the dot
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.filepath)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_ascii_lowercase()))
            .unwrap_or_default()
    }
}

static EMPTY_MESH: Mesh = Mesh::new();

/// The in-memory scene one validation run operates on
///
/// Scenes are built from scratch for every run by a
/// [`SceneBuilder`](super::SceneBuilder) and dropped when the run ends.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// All objects, in import order
    pub objects: Vec<SceneObject>,
    /// All materials, in import order
    pub materials: Vec<Material>,
    /// All textures, in import order
    pub textures: Vec<Texture>,
}

impl Scene {
    /// Look up an object
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    /// Look up a material
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// Look up a texture
    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0)
    }

    /// All MESH objects with their mesh data
    ///
    /// A MESH object the importer delivered without data is paired with an
    /// empty mesh, so it still goes through every object check.
    pub fn mesh_objects(&self) -> impl Iterator<Item = (&SceneObject, &Mesh)> {
        self.objects
            .iter()
            .filter(|o| o.is_mesh())
            .map(|o| (o, o.mesh.as_ref().unwrap_or(&EMPTY_MESH)))
    }

    /// Materials assigned to an object, skipping empty slots
    pub fn object_materials<'a>(
        &'a self,
        object: &'a SceneObject,
    ) -> impl Iterator<Item = &'a Material> + 'a {
        object
            .material_slots
            .iter()
            .flatten()
            .filter_map(|id| self.material(*id))
    }

    /// Textures reachable through an object's materials, in node order
    pub fn object_textures<'a>(
        &'a self,
        object: &'a SceneObject,
    ) -> impl Iterator<Item = (&'a Material, TextureId)> + 'a {
        self.object_materials(object)
            .flat_map(|m| m.image_nodes.iter().map(move |t| (m, *t)))
    }

    /// Unique textures referenced by mesh objects, in first-reference order
    ///
    /// Images the importer loaded but no mesh material uses are left out.
    pub fn referenced_textures(&self) -> Vec<TextureId> {
        let mut seen = std::collections::HashSet::new();
        let mut ids = Vec::new();
        for object in self.objects.iter().filter(|o| o.is_mesh()) {
            for (_, id) in self.object_textures(object) {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}
