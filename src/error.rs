//! Error types for asset validation
//!
//! Only a handful of conditions abort a validation run: the archive cannot be
//! opened, it carries no FBX payload, or the external importer cannot produce
//! a scene. Everything else is reported as a finding. All errors carry a code
//! so that harnesses can categorize failures without parsing messages.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O and archive errors
//! - **E2xxx**: Scene import errors
//! - **E3xxx**: Checker errors (never fatal, degraded to FAILED findings)
//! - **E4xxx**: Configuration errors
//!
//! ## Common Error Codes
//!
//! - `E1001`: I/O error reading file
//! - `E1002`: ZIP archive format error
//! - `E1003`: Archive contains no FBX entries
//! - `E1004`: Archive not found
//! - `E2001`: External importer failure
//! - `E2002`: Scene contains dangling references
//! - `E2003`: JSON decode error
//! - `E3001`: Texture decode error
//! - `E3002`: Internal checker failure
//! - `E4001`: Invalid configuration

use std::io;
use std::path::Path;
use thiserror::Error;

/// Result type for validation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating an asset archive
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading a file
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - Insufficient permissions
    /// - Disk read error
    /// - Extraction directory not writable
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive error
    ///
    /// **Error Code**: E1002
    ///
    /// **Common Causes**:
    /// - Corrupted or truncated ZIP file
    /// - Unsupported compression method
    /// - File is not a ZIP archive at all
    #[error("[E1002] ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The archive has no FBX payload to import
    ///
    /// **Error Code**: E1003
    #[error("[E1003] No FBX files found in archive")]
    NoFbxEntries,

    /// The archive path does not exist
    ///
    /// **Error Code**: E1004
    #[error("[E1004] Archive does not exist: {0}")]
    ArchiveNotFound(String),

    /// The external importer could not produce a scene
    ///
    /// **Error Code**: E2001
    ///
    /// **Common Causes**:
    /// - Missing or unreadable scene dump
    /// - Importer crashed on a malformed FBX payload
    #[error("[E2001] Scene import failed: {0}")]
    Import(String),

    /// A scene was assembled with references that point nowhere
    ///
    /// **Error Code**: E2002
    ///
    /// **Common Causes**:
    /// - Material slot naming a material that was not exported
    /// - Face index beyond the vertex list
    /// - UV layer whose loop count does not match the faces
    #[error("[E2002] Invalid scene: {0}")]
    InvalidScene(String),

    /// JSON decode error
    ///
    /// **Error Code**: E2003
    #[error("[E2003] JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Texture could not be decoded
    ///
    /// **Error Code**: E3001
    #[error("[E3001] Texture decode error: {0}")]
    Image(#[from] image::ImageError),

    /// A checker failed internally
    ///
    /// **Error Code**: E3002
    ///
    /// Raised by the check runner when a checker panics; it is recorded as a
    /// FAILED finding for that check and never aborts the run.
    #[error("[E3002] Internal checker failure in '{check}': {message}")]
    CheckFailed {
        /// Name of the check that failed
        check: String,
        /// Panic or error message
        message: String,
    },

    /// Invalid configuration value
    ///
    /// **Error Code**: E4001
    #[error("[E4001] Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error aborts a validation run with a top-level `{error}`
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Image(_) | Error::CheckFailed { .. })
    }

    /// Create an Import error naming the payload the importer choked on
    pub fn import_failed(source: &Path, message: &str) -> Self {
        Error::Import(format!("{}: {}", source.display(), message))
    }

    /// Create an InvalidScene error for a dangling reference
    ///
    /// # Arguments
    /// * `owner` - The object or material holding the reference
    /// * `message` - What the reference points to
    pub fn invalid_scene(owner: &str, message: &str) -> Self {
        Error::InvalidScene(format!("'{}': {}", owner, message))
    }

    /// Create a Config error for an out-of-range field
    pub fn invalid_config(field: &str, value: impl std::fmt::Display, reason: &str) -> Self {
        Error::Config(format!("{} = {} ({})", field, value, reason))
    }
}
