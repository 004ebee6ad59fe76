//! Validation run order
//!
//! [`Pipeline`] ties the pieces together for one archive at a time:
//!
//! 1. Fingerprint the archive and answer from the [`ResultCache`] on a hit
//! 2. Open the archive and run the Archive Inspector checks
//! 3. Abort when no FBX payload exists
//! 4. Extract the payload into a temporary directory and import a fresh scene
//! 5. Run the hygiene checks, repair the meshes, run the structure checks
//! 6. Run the texture/material checks and the naming pass
//! 7. Cache the report and emit it
//!
//! Failures in steps 1-4 end the run with an [`Outcome::Error`]. Anything that
//! goes wrong after that is confined to the check it happened in.

use crate::archive::{
    AssetArchive, extract, validate_contents, validate_payload, validate_size,
};
use crate::cache::{Fingerprint, ResultCache};
use crate::config::CheckConfig;
use crate::error::{Error, Result};
use crate::finding::CheckId;
use crate::report::{NamingReport, Outcome, Report};
use crate::scene::SceneImporter;
use crate::texture::TextureAnalyzer;
use crate::validator::{
    check_scene_hygiene, check_scene_structure, check_textures_and_materials, isolate,
    repair_scene, run_check, validate_naming,
};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use tracing::{info, warn};

/// Validates archives against the publishing contract
#[derive(Debug)]
pub struct Pipeline<I> {
    config: CheckConfig,
    importer: I,
    cache: ResultCache,
}

impl<I: SceneImporter> Pipeline<I> {
    /// Create a pipeline with an empty cache
    pub fn new(config: CheckConfig, importer: I) -> Self {
        Self {
            config,
            importer,
            cache: ResultCache::new(),
        }
    }

    /// Limits this pipeline checks against
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Reports of earlier runs
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Mutable access to the cache, e.g. to invalidate an entry
    pub fn cache_mut(&mut self) -> &mut ResultCache {
        &mut self.cache
    }

    /// Validate one archive and write the JSON outcome to `sink`
    ///
    /// Only writing to the sink can fail; validation problems are part of
    /// the returned [`Outcome`].
    pub fn validate<W: Write>(&mut self, archive_path: &Path, sink: &mut W) -> Result<Outcome> {
        let outcome = self.run(archive_path);
        sink.write_all(outcome.to_json()?.as_bytes())?;
        sink.write_all(b"\n")?;
        sink.flush()?;
        Ok(outcome)
    }

    /// Validate one archive
    pub fn run(&mut self, archive_path: &Path) -> Outcome {
        info!("Validating {}", archive_path.display());
        match self.run_inner(archive_path) {
            Ok(report) => {
                info!(
                    failed = report.has_failures(),
                    "Finished validating {}",
                    archive_path.display()
                );
                Outcome::Report(report)
            }
            Err(e) => {
                warn!("Validation of {} aborted: {}", archive_path.display(), e);
                Outcome::from_error(&e)
            }
        }
    }

    fn run_inner(&mut self, archive_path: &Path) -> Result<Report> {
        let fingerprint = Fingerprint::of(archive_path)?;
        if let Some(report) = self.cache.get(&fingerprint) {
            info!("Cache hit for {}", archive_path.display());
            return Ok(report.clone());
        }

        let report = self.check_archive(archive_path)?;
        self.cache.store(fingerprint, report.clone());
        Ok(report)
    }

    fn check_archive(&self, archive_path: &Path) -> Result<Report> {
        let config = &self.config;
        let mut report = Report::new();

        let archive = AssetArchive::open(archive_path)?;
        run_check(&mut report.geometry_data, CheckId::ArchiveSize, || {
            Ok(validate_size(&archive, config))
        });
        run_check(&mut report.geometry_data, CheckId::FbxFiles, || {
            Ok(validate_contents(&archive, config))
        });
        run_check(&mut report.geometry_data, CheckId::ArchivePayload, || {
            Ok(validate_payload(&archive, config))
        });
        if archive.fbx_entries.is_empty() {
            return Err(Error::NoFbxEntries);
        }

        let workdir = TempDir::new()?;
        let payload = extract(&archive, workdir.path())?;
        let mut scene = self.importer.import(&payload)?;

        check_scene_hygiene(&scene, config, &mut report.geometry_data);
        if let Err(e) = isolate("repair", || Ok(repair_scene(&mut scene, config))) {
            warn!("Mesh repair failed: {}", e);
        }
        check_scene_structure(&scene, config, &mut report.geometry_data);

        let mut analyzer = TextureAnalyzer::new();
        check_textures_and_materials(&scene, config, &mut analyzer, &mut report.texture_material);

        report.naming = isolate("naming", || Ok(validate_naming(&scene, config)))
            .unwrap_or_else(|e| {
                warn!("Naming validation failed internally: {}", e);
                NamingReport::internal_error(&e)
            });

        Ok(report)
    }
}
