//! pending-splice: wait for the pending items of a sequence and print it.
//!
//! ```bash
//! # Second pending item resolves first; output keeps positions
//! pending-splice --compact 1 @42:30 a @99:10
//! # [1,42,"a",99]
//!
//! # The earliest rejection wins
//! pending-splice '!X:10' '!Y:5'
//! ```
//!
//! Set `SPLICE_DEBUG_TIMING=1` for `[timing]` lines on stderr.

use anyhow::{bail, Result};
use clap::Parser;

use pending_splice::args::Args;
use pending_splice::runner;
use pending_splice::SpliceConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .init();

    let config = SpliceConfig::from_env();
    let spliced = match runner::run(&config, args.items).await {
        Ok(values) => values,
        Err(rejection) => bail!("{}", rejection),
    };

    let rendered = if args.compact {
        serde_json::to_string(&spliced)?
    } else {
        serde_json::to_string_pretty(&spliced)?
    };
    println!("{}", rendered);
    Ok(())
}
