//! Payload extraction for the external importer

use super::{
    AssetArchive, TEXTURES_DIR, entry_basename, is_fbx_entry, is_nested_archive, is_texture_entry,
};
use crate::error::Result;
use std::fs::{self, File};
use std::io::{self, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::ZipArchive;

/// Deepest level of archives-within-archives that is unpacked
const MAX_NESTING_DEPTH: usize = 4;

/// Files written to disk for one validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArchive {
    /// Directory everything was extracted into
    pub root: PathBuf,
    /// Extracted FBX files, relative layout preserved
    pub fbx_files: Vec<PathBuf>,
    /// Flat directory holding every extracted texture
    pub textures_dir: PathBuf,
    /// Extracted texture files
    pub texture_files: Vec<PathBuf>,
}

/// Extract the FBX and texture payload of `archive` into `dest`
///
/// FBX entries keep their relative path; textures are flattened into
/// `dest/textures/`. Nested `.zip` entries are unpacked the same way into a
/// directory named after the nested archive. Entries whose names would
/// escape `dest` are skipped.
pub fn extract(archive: &AssetArchive, dest: &Path) -> Result<ExtractedArchive> {
    let textures_dir = dest.join(TEXTURES_DIR);
    fs::create_dir_all(&textures_dir)?;

    let mut extracted = ExtractedArchive {
        root: dest.to_path_buf(),
        fbx_files: Vec::new(),
        textures_dir,
        texture_files: Vec::new(),
    };

    let mut zip = ZipArchive::new(File::open(&archive.path)?)?;
    extract_from(&mut zip, dest, &mut extracted, 0)?;

    debug!(
        fbx = extracted.fbx_files.len(),
        textures = extracted.texture_files.len(),
        "Extracted {} into {}",
        archive.path.display(),
        dest.display()
    );
    Ok(extracted)
}

fn extract_from<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    base: &Path,
    out: &mut ExtractedArchive,
    depth: usize,
) -> Result<()> {
    for i in 0..zip.len() {
        let mut file = zip.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        let Some(relative) = file.enclosed_name() else {
            warn!("Skipping archive entry with unsafe path: {}", name);
            continue;
        };

        if is_fbx_entry(&name) {
            let target = base.join(&relative);
            write_entry(&mut file, &target)?;
            out.fbx_files.push(target);
        } else if is_texture_entry(&name) {
            let target = out.textures_dir.join(entry_basename(&name));
            if out.texture_files.contains(&target) {
                debug!("Texture {} overwrites an earlier entry", target.display());
            } else {
                out.texture_files.push(target.clone());
            }
            write_entry(&mut file, &target)?;
        } else if is_nested_archive(&name) {
            if depth >= MAX_NESTING_DEPTH {
                warn!("Skipping nested archive {} (too deeply nested)", name);
                continue;
            }
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            drop(file);
            let mut nested = ZipArchive::new(Cursor::new(bytes))?;
            let nested_base = base.join(relative.with_extension(""));
            extract_from(&mut nested, &nested_base, out, depth + 1)?;
        }
    }
    Ok(())
}

fn write_entry<R: Read>(entry: &mut R, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut output = File::create(target)?;
    io::copy(entry, &mut output)?;
    Ok(())
}
