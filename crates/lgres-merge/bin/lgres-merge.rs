//! Command-line entry point for lgres-merge.
//!
//! Arguments are parsed before logging starts so `--log-format` can pick the
//! subscriber. `Merger::new` validates the paths and comment, and `run`
//! writes the output only once every input has been merged.

use anyhow::Result;
use lgres_merge::{MergeConfig, Merger, init_logging};

fn main() -> Result<()> {
    let config = MergeConfig::from_args();

    init_logging(config.log_format);

    tracing::info!(
        "Merging {} archive(s) into {}",
        config.inputs().len(),
        config.output().display()
    );

    let merger = Merger::new(config)?;
    merger.run()?;

    Ok(())
}
