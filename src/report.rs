//! Validation report
//!
//! A run ends in an [`Outcome`]: either a full [`Report`] with one finding
//! per check plus the naming section, or a top-level error when the run
//! could not get as far as checking anything.

use crate::error::{Error, Result};
use crate::finding::{CategoryMap, CheckId, Finding, Status, unchecked_category};
use serde::{Deserialize, Serialize};

/// Naming section of a report
///
/// Every list holds entries of one or more lines each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingReport {
    /// Aggregate naming status
    pub status: Status,
    /// One entry per mesh object
    pub geometry: Vec<Vec<String>>,
    /// One entry per material
    pub materials: Vec<Vec<String>>,
    /// One entry per referenced texture
    pub textures: Vec<Vec<String>>,
    /// Names with characters outside `[A-Za-z0-9_]`
    pub invalid_chars: Vec<Vec<String>>,
    /// Names repeating an earlier base name in their namespace
    pub duplicates: Vec<Vec<String>>,
}

impl Default for NamingReport {
    fn default() -> Self {
        Self {
            status: Status::NotChecked,
            geometry: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            invalid_chars: Vec::new(),
            duplicates: Vec::new(),
        }
    }
}

impl NamingReport {
    /// Naming section for a naming pass that failed internally
    pub fn internal_error(error: &Error) -> Self {
        Self {
            status: Status::Failed,
            geometry: vec![vec![format!("Internal error: {}", error)]],
            ..Self::default()
        }
    }
}

/// Findings of one validation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Archive and geometry checks
    pub geometry_data: CategoryMap,
    /// Texture and material checks
    pub texture_material: CategoryMap,
    /// Naming checks
    pub naming: NamingReport,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    /// A report with every check NOT_CHECKED, in run order
    pub fn new() -> Self {
        Self {
            geometry_data: unchecked_category(&CheckId::GEOMETRY),
            texture_material: unchecked_category(&CheckId::TEXTURE_MATERIAL),
            naming: NamingReport::default(),
        }
    }

    /// Look up the finding of a check
    pub fn finding(&self, id: CheckId) -> Option<&Finding> {
        self.geometry_data
            .get(&id)
            .or_else(|| self.texture_material.get(&id))
    }

    /// All check findings in run order
    pub fn findings(&self) -> impl Iterator<Item = (&CheckId, &Finding)> {
        self.geometry_data.iter().chain(self.texture_material.iter())
    }

    /// Whether any check or the naming section failed
    pub fn has_failures(&self) -> bool {
        self.findings().any(|(_, f)| f.status.is_failure()) || self.naming.status.is_failure()
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Result of one validation run as emitted to the harness
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// The run produced findings
    Report(Report),
    /// The run was aborted before checks could complete
    Error {
        /// Why the run aborted
        error: String,
    },
}

impl Outcome {
    /// Outcome for a fatal error
    pub fn from_error(error: &Error) -> Self {
        Outcome::Error {
            error: error.to_string(),
        }
    }

    /// The report, if the run produced one
    pub fn report(&self) -> Option<&Report> {
        match self {
            Outcome::Report(report) => Some(report),
            Outcome::Error { .. } => None,
        }
    }

    /// Whether the run aborted
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error { .. })
    }

    /// Process exit code: 0 clean, 1 some check failed, 2 aborted
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Report(report) if report.has_failures() => 1,
            Outcome::Report(_) => 0,
            Outcome::Error { .. } => 2,
        }
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
