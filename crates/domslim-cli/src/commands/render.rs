//! Render command
//!
//! Usage: domslim render <SNAPSHOT> [--output <FILE>]

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Page snapshot (JSON)
    pub snapshot: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute render command
pub fn execute(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let page = super::load_snapshot(&args.snapshot)?;
    let markup = domslim_core::render::to_markup(&page.document, page.root)?;
    super::emit(&markup, args.output, "Rendered")?;
    Ok(())
}
