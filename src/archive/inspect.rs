//! Container-level checks
//!
//! These checks need only archive metadata; no payload is decompressed.

use super::{AssetArchive, entry_basename};
use crate::config::CheckConfig;
use crate::finding::{Finding, Status};
use regex::Regex;
use std::sync::LazyLock;

/// Ground FBX file name, matched case-insensitively against the basename
static GROUND_FBX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*_Ground\.fbx$").expect("Ground FBX pattern")
});

/// OKS FBX file name: `[xxxx]_[address]_[01-20].fbx`
static OKS_FBX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}_[A-Za-z0-9_]+_(0[1-9]|1[0-9]|20)\.fbx$")
        .expect("OKS FBX pattern")
});

/// Whether an entry is the Ground FBX
pub fn is_ground_fbx(entry: &str) -> bool {
    GROUND_FBX.is_match(entry_basename(entry))
}

/// Whether an entry is a correctly named OKS FBX
pub fn is_oks_fbx(entry: &str) -> bool {
    OKS_FBX.is_match(entry_basename(entry))
}

/// Render a byte limit in the largest binary unit that divides it evenly
fn fmt_limit(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    match bytes {
        0 => "0 bytes".to_string(),
        b if b % GB == 0 => format!("{} GB", b / GB),
        b if b % MB == 0 => format!("{} MB", b / MB),
        b if b % KB == 0 => format!("{} KB", b / KB),
        b => format!("{} bytes", b),
    }
}

/// Check the archive byte size against the configured limit
pub fn validate_size(archive: &AssetArchive, config: &CheckConfig) -> Finding {
    let size_mb = archive.size_mb();
    if archive.size > config.max_archive_bytes {
        Finding::failed(format!(
            "Archive size {} MB exceeds {} limit",
            size_mb,
            fmt_limit(config.max_archive_bytes)
        ))
    } else {
        Finding::passed(format!("Archive size {} MB", size_mb))
    }
}

/// Check the FBX composition of the archive
///
/// Stops at the first violated rule: entry count, then exactly one Ground
/// FBX, then the OKS count, then each OKS name.
pub fn validate_contents(archive: &AssetArchive, config: &CheckConfig) -> Finding {
    let fbx = &archive.fbx_entries;
    if fbx.len() < config.min_fbx_files || fbx.len() > config.max_fbx_files {
        return Finding::failed(format!(
            "Found {} FBX files, expected {} to {}",
            fbx.len(),
            config.min_fbx_files,
            config.max_fbx_files
        ));
    }

    let (ground, oks): (Vec<&String>, Vec<&String>) = fbx.iter().partition(|e| is_ground_fbx(e));
    if ground.is_empty() {
        return Finding::failed("No Ground FBX file found");
    }
    if ground.len() > 1 {
        return Finding::failed(format!("Multiple Ground FBX files found: {:?}", ground));
    }

    if oks.len() > config.max_oks_files {
        return Finding::failed(format!(
            "Too many OKS FBX files: {}, expected up to {}",
            oks.len(),
            config.max_oks_files
        ));
    }

    if let Some(bad) = oks.iter().find(|e| !is_oks_fbx(e)) {
        return Finding::failed(format!(
            "Invalid OKS FBX name: {}, expected [xxxx]_[address]_[01-20].fbx",
            bad
        ));
    }

    Finding::passed("Archive contents are valid")
}

/// Advisory payload checks
///
/// Warns when the archive carries no textures, when a single FBX or
/// texture entry is oversized and when the total uncompressed payload is
/// large. Warnings never fail the check.
pub fn validate_payload(archive: &AssetArchive, config: &CheckConfig) -> Finding {
    let mut warnings = Vec::new();
    if archive.texture_entries.is_empty() {
        warnings.push("Warning: No texture entries found in archive".to_string());
    }
    for (entries, label, limit) in [
        (&archive.fbx_entries, "FBX", config.warn_fbx_entry_bytes),
        (&archive.texture_entries, "Texture", config.warn_texture_entry_bytes),
    ] {
        for entry in entries {
            if archive.entry_size(entry) > limit {
                warnings.push(format!(
                    "Warning: {} entry {} exceeds {}",
                    label,
                    entry,
                    fmt_limit(limit)
                ));
            }
        }
    }
    if archive.uncompressed_size() > config.warn_payload_bytes {
        warnings.push(format!(
            "Warning: Total uncompressed size exceeds {}",
            fmt_limit(config.warn_payload_bytes)
        ));
    }

    if warnings.is_empty() {
        const MB: u64 = 1024 * 1024;
        return Finding::passed(format!(
            "Texture entries: {}, uncompressed size {} MB",
            archive.texture_entries.len(),
            (archive.uncompressed_size() + MB / 2) / MB
        ));
    }
    Finding {
        status: Status::Passed,
        messages: warnings,
    }
}
