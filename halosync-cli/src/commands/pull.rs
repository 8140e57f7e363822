//! `halosync pull <FILE>`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use halosync_renderer::Renderer;
use halosync_sync::{FileWorkspace, SyncOrchestrator};

use super::connect;

#[derive(Args, Debug)]
pub struct PullArgs {
    /// Published document to overwrite with its remote post.
    pub file: PathBuf,
}

impl PullArgs {
    pub fn run(self, site: Option<&str>) -> Result<()> {
        let (site, client) = connect(site)?;
        let renderer = Renderer::default();
        let orchestrator = SyncOrchestrator::new(site.url.clone(), &client, &client, &renderer);
        let mut workspace = FileWorkspace::for_document(&self.file);

        let pulled = orchestrator
            .pull_active(&mut workspace)
            .with_context(|| format!("failed to pull '{}'", self.file.display()))?;
        match pulled {
            Some(title) => println!("✓ Pulled '{title}' into {}", self.file.display()),
            None => eprintln!("{} does not exist; nothing to pull", self.file.display()),
        }
        Ok(())
    }
}
