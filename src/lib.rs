//! # arch-asset-check
//!
//! Publishing-contract validation for packaged 3D architectural assets.
//!
//! An asset is a ZIP archive holding FBX scenes (one Ground scene plus the
//! numbered building scenes) and their textures. This crate inspects the
//! archive, hands the payload to an external importer through the
//! [`SceneImporter`] trait, and checks the resulting scene for:
//!
//! - Archive size and FBX composition
//! - Object kinds, hierarchy, animation and ground placement
//! - Floating vertices, degenerate edges, triangulation, transforms, UVs and
//!   polygon budgets
//! - Texture format, alpha channel and size, material slot budgets
//! - Object, material and texture naming
//!
//! Every check yields a [`Finding`]; findings are gathered into a [`Report`]
//! that serializes to JSON in a fixed order.
//!
//! ## Example
//!
//! ```no_run
//! use arch_asset_check::{CheckConfig, Pipeline, SceneDumpImporter};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let importer = SceneDumpImporter::new("scene.json");
//! let mut pipeline = Pipeline::new(CheckConfig::default(), importer);
//!
//! let outcome = pipeline.validate(Path::new("0001_Lenina_01.zip"), &mut std::io::stdout())?;
//! if let Some(report) = outcome.report() {
//!     println!("failures: {}", report.has_failures());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
pub mod cache;
pub mod config;
pub mod error;
pub mod finding;
pub mod mesh_ops;
pub mod pipeline;
pub mod report;
pub mod scene;
pub mod texture;
pub mod validator;

pub use archive::{AssetArchive, ExtractedArchive};
pub use cache::{Fingerprint, ResultCache};
pub use config::CheckConfig;
pub use error::{Error, Result};
pub use finding::{CategoryMap, CheckId, Finding, IssueKind, Status};
pub use pipeline::Pipeline;
pub use report::{NamingReport, Outcome, Report};
pub use scene::{
    Edge, Face, Material, MaterialId, Mesh, ObjectId, ObjectKind, Scene, SceneBuilder,
    SceneDumpImporter, SceneImporter, SceneObject, Texture, TextureId, Transform, UvLayer, Vertex,
};
pub use texture::{ColorMode, TextureAnalyzer, TextureStructure};
