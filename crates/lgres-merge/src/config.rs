//! Command-line configuration for the merger.
//!
//! Configuration can be provided via:
//! - Positional paths: one or more inputs followed by the output
//! - CLI options (`--comment`, `--log-format`)
//! - Environment variables (`LGRES_MERGE_COMMENT`, `LGRES_MERGE_LOG_FORMAT`)
//!
//! The log level comes from `RUST_LOG` and defaults to `info`.
//!
//! # Example
//!
//! ```no_run
//! use lgres_merge::MergeConfig;
//!
//! let config = MergeConfig::from_args();
//! config.validate().expect("Invalid configuration");
//!
//! println!("Merging {} archive(s) into {}", config.inputs().len(), config.output().display());
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use lgres_formats::FileHeader;

use crate::error::ConfigError;

/// Comment written into the output header when none is given
pub const DEFAULT_COMMENT: &str = "Built with lgres-merge";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Merger configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lgres-merge",
    about = "Merge LG Res File v2 archives into one unpacked archive",
    version,
    arg_required_else_help = true,
    help_template = "{name} v{version}\n{about}\n\n{usage-heading} {usage}\n\n{all-args}{after-help}",
    override_usage = "lgres-merge [OPTIONS] <INPUT>... <OUTPUT>",
    after_help = "Later inputs take precedence over earlier ones."
)]
pub struct MergeConfig {
    /// Input archives in precedence order, followed by the output path
    #[arg(value_name = "PATHS", num_args = 2.., required = true)]
    pub paths: Vec<PathBuf>,

    /// Comment stored in the output header
    #[arg(long, env = "LGRES_MERGE_COMMENT", default_value = DEFAULT_COMMENT)]
    pub comment: String,

    /// Log output format
    #[arg(
        long,
        env = "LGRES_MERGE_LOG_FORMAT",
        value_enum,
        default_value = "text"
    )]
    pub log_format: LogFormat,
}

impl MergeConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Configuration for `inputs` merged into `output` with default options.
    pub fn new<I, P>(inputs: I, output: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut paths: Vec<PathBuf> = inputs.into_iter().map(Into::into).collect();
        paths.push(output.into());
        Self {
            paths,
            comment: DEFAULT_COMMENT.to_string(),
            log_format: LogFormat::default(),
        }
    }

    /// Input archives in precedence order
    pub fn inputs(&self) -> &[PathBuf] {
        self.paths.split_last().map_or(&[], |(_, inputs)| inputs)
    }

    /// Output archive path
    pub fn output(&self) -> &Path {
        self.paths.last().map_or_else(|| Path::new(""), PathBuf::as_path)
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Fewer than two paths were given
    /// - An input archive doesn't exist
    /// - The output path names one of the inputs
    /// - The comment can't be stored in the header
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.len() < 2 {
            return Err(ConfigError::MissingPaths(self.paths.len()));
        }

        let output = self.output();
        for input in self.inputs() {
            if !input.is_file() {
                return Err(ConfigError::InputNotFound(input.clone()));
            }
            if same_file(input, output) {
                return Err(ConfigError::OutputIsInput(output.to_path_buf()));
            }
        }

        FileHeader::new(&self.comment).map_err(ConfigError::InvalidComment)?;

        Ok(())
    }
}

fn same_file(input: &Path, output: &Path) -> bool {
    if input == output {
        return true;
    }
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
