//! Asset archive handling
//!
//! Asset archives are plain ZIP files carrying one Ground FBX, up to twenty
//! OKS FBX files and their textures. This module opens them, checks the
//! container-level contract without importing any geometry, and extracts
//! the payload for the external importer.

mod extract;
mod inspect;
mod reader;

pub use extract::{ExtractedArchive, extract};
pub use inspect::{
    is_ground_fbx, is_oks_fbx, validate_contents, validate_payload, validate_size,
};
pub use reader::AssetArchive;

/// Extension of FBX payload entries
pub const FBX_EXTENSION: &str = ".fbx";

/// Extension of nested archives that are extracted recursively
pub const NESTED_ARCHIVE_EXTENSION: &str = ".zip";

/// Extensions recognized as texture payload
pub const TEXTURE_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".bmp", ".tga", ".tiff"];

/// Name of the directory textures are extracted into
pub const TEXTURES_DIR: &str = "textures";

/// Whether an entry name is an FBX payload (case-insensitive)
pub fn is_fbx_entry(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(FBX_EXTENSION)
}

/// Whether an entry name is a texture payload (case-insensitive)
pub fn is_texture_entry(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    TEXTURE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Whether an entry name is a nested archive (case-insensitive)
pub fn is_nested_archive(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(NESTED_ARCHIVE_EXTENSION)
}

/// Last path component of an entry name
pub fn entry_basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}
