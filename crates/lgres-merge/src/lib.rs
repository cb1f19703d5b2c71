//! Merger for LG Res File v2 resource archives.
//!
//! Reads archives in order, decodes every resource and folds them into one
//! table where later archives take precedence, then writes a single
//! unpacked archive.
//!
//! # Architecture
//!
//! - `config`: CLI arguments, environment fallbacks and validation
//! - `extract`: decoding all resources of one archive
//! - `table`: the merge policy and serialization of the result
//! - `merger`: reading inputs and writing the output
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use lgres_merge::{MergeConfig, Merger};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = MergeConfig::new(["base.res", "patch.res"], "merged.res");
//!     let report = Merger::new(config)?.run()?;
//!     println!("{} resources written", report.resources);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod merger;
pub mod table;

pub use config::{DEFAULT_COMMENT, LogFormat, MergeConfig};
pub use error::{ConfigError, MergeError, Result};
pub use extract::{ExtractedResource, extract_resources};
pub use logging::init_logging;
pub use merger::{MergeReport, Merger};
pub use table::{IngestSummary, RESERVED_ID_LIMIT, ResolvedResource, ResourceTable};
