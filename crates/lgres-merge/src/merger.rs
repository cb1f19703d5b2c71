//! Merge orchestration: read inputs in order, fold them, write the output.

use std::fs;

use tracing::{debug, info};

use crate::config::MergeConfig;
use crate::error::{MergeError, Result};
use crate::extract::extract_resources;
use crate::table::{IngestSummary, ResourceTable};

/// Totals for one merge run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    /// Input archives processed
    pub archives: usize,
    /// Resources in the output
    pub resources: usize,
    /// Resources first seen in some input
    pub added: usize,
    /// Resources overridden by a later input
    pub patched: usize,
    /// Individual chunks replaced by a later input
    pub patched_chunks: usize,
    /// Reserved resources ignored
    pub skipped: usize,
    /// Size of the merged archive
    pub bytes_written: usize,
}

impl MergeReport {
    fn record(&mut self, summary: IngestSummary) {
        self.archives += 1;
        self.added += summary.added;
        self.patched += summary.patched;
        self.patched_chunks += summary.patched_chunks;
        self.skipped += summary.skipped;
    }
}

/// Merges the configured inputs into one archive.
#[derive(Debug)]
pub struct Merger {
    config: MergeConfig,
}

impl Merger {
    /// Create a merger from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `MergeError::Config` if validation fails.
    pub fn new(config: MergeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub const fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Fold every input into a resource table without writing anything.
    ///
    /// Each input buffer is dropped once its resources are extracted.
    ///
    /// # Errors
    ///
    /// Returns an error if an input can't be read or isn't a valid archive.
    pub fn merge(&self) -> Result<(ResourceTable, MergeReport)> {
        let mut table = ResourceTable::new();
        let mut report = MergeReport::default();

        for path in self.config.inputs() {
            info!("Reading {}", path.display());
            let data = fs::read(path).map_err(|source| MergeError::Read {
                path: path.clone(),
                source,
            })?;

            let resources = extract_resources(&data).map_err(|source| MergeError::Archive {
                path: path.clone(),
                source,
            })?;
            drop(data);
            debug!("{}: {} resource(s)", path.display(), resources.len());

            let name = path.display().to_string();
            report.record(table.ingest(&name, resources));
        }

        report.resources = table.len();
        Ok((table, report))
    }

    /// Merge the inputs and write the output archive.
    ///
    /// The output file is only created after every input was merged and the
    /// new archive was fully built.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, merging, building or writing fails.
    pub fn run(&self) -> Result<MergeReport> {
        let (table, mut report) = self.merge()?;

        let output = self.config.output();
        info!(
            "Writing {} resource(s) to {}",
            table.len(),
            output.display()
        );
        let data = table.serialize(&self.config.comment)?;
        fs::write(output, &data).map_err(|source| MergeError::Write {
            path: output.to_path_buf(),
            source,
        })?;

        report.bytes_written = data.len();
        info!(
            "Merged {} archive(s): {} added, {} patched, {} skipped, {} bytes",
            report.archives, report.added, report.patched, report.skipped, report.bytes_written
        );
        Ok(report)
    }
}
