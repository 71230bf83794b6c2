pub mod render;
pub mod simplify;

use std::path::{Path, PathBuf};

use domslim_core::{LoadedPage, PageSnapshot};

/// Read and load a snapshot file
pub fn load_snapshot(path: &Path) -> Result<LoadedPage, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    Ok(PageSnapshot::from_json(&raw)?.into_document()?)
}

/// Write to `output` if given, else print to stdout
pub fn emit(markup: &str, output: Option<PathBuf>, verb: &str) -> std::io::Result<()> {
    if let Some(output_path) = output {
        std::fs::write(&output_path, format!("{markup}\n"))?;
        println!("✓ {} to {}", verb, output_path.display());
    } else {
        println!("{}", markup);
    }
    Ok(())
}
