//! `halosync init <FILE>`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use halosync_sync::{scaffold_metadata, FileWorkspace};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Existing Markdown document to add a metadata block to.
    pub file: PathBuf,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let mut workspace = FileWorkspace::for_document(&self.file);
        let written = scaffold_metadata(&mut workspace)
            .with_context(|| format!("failed to write metadata into '{}'", self.file.display()))?;
        if written {
            println!("✓ Metadata written to {}", self.file.display());
            println!("  Set `publish` to true when the post is ready.");
        } else {
            eprintln!("{} does not exist; nothing to initialize", self.file.display());
        }
        Ok(())
    }
}
