//! Archive opening and entry listing

use super::{is_fbx_entry, is_texture_entry};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Metadata of an asset archive: where it lives, how big it is and which
/// entries it holds
///
/// Only entry names are kept; payload bytes are read again on extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetArchive {
    /// Path of the archive on disk
    pub path: PathBuf,
    /// Size of the archive file in bytes
    pub size: u64,
    /// All file entry names, in archive order (directories excluded)
    pub entries: Vec<String>,
    /// Entries ending in `.fbx`
    pub fbx_entries: Vec<String>,
    /// Entries with a texture extension
    pub texture_entries: Vec<String>,
    /// Uncompressed size of every file entry, by name
    pub entry_sizes: HashMap<String, u64>,
}

impl AssetArchive {
    /// Open an archive on disk and list its entries
    ///
    /// # Errors
    /// - `E1004` if the path does not exist
    /// - `E1002` if the file is not a readable ZIP archive
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ArchiveNotFound(path.display().to_string()));
        }
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Self::from_reader(file, path, size)
    }

    /// List the entries of an archive read from any seekable source
    pub fn from_reader<R: Read + Seek>(reader: R, path: &Path, size: u64) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let listing = entry_listing(&mut archive);
        let entries: Vec<String> = listing.iter().map(|(name, _)| name.clone()).collect();
        let fbx_entries = entries
            .iter()
            .filter(|e| is_fbx_entry(e))
            .cloned()
            .collect();
        let texture_entries = entries
            .iter()
            .filter(|e| is_texture_entry(e))
            .cloned()
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            size,
            entries,
            fbx_entries,
            texture_entries,
            entry_sizes: listing.into_iter().collect(),
        })
    }

    /// Number of file entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive holds no file entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size in whole megabytes, rounded to nearest
    pub fn size_mb(&self) -> u64 {
        const MB: u64 = 1024 * 1024;
        (self.size + MB / 2) / MB
    }

    /// Uncompressed size of an entry, 0 for unknown names
    pub fn entry_size(&self, name: &str) -> u64 {
        self.entry_sizes.get(name).copied().unwrap_or(0)
    }

    /// Sum of the uncompressed sizes of all file entries
    pub fn uncompressed_size(&self) -> u64 {
        self.entry_sizes.values().sum()
    }
}

/// List all file entries with their uncompressed sizes, skipping directories
fn entry_listing<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Vec<(String, u64)> {
    (0..archive.len())
        .filter_map(|i| {
            archive
                .by_index(i)
                .ok()
                .filter(|f| !f.is_dir())
                .map(|f| (f.name().to_string(), f.size()))
        })
        .collect()
}
