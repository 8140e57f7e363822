//! `halosync fetch <NAME> [--dir <DIR>]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use halosync_core::PostName;
use halosync_renderer::Renderer;
use halosync_sync::{FileWorkspace, SyncOrchestrator};

use super::connect;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Remote post name, as shown by `halosync list`.
    pub name: String,

    /// Directory the new document is created in.
    #[arg(long, short, default_value = ".")]
    pub dir: PathBuf,
}

impl FetchArgs {
    pub fn run(self, site: Option<&str>) -> Result<()> {
        let (site, client) = connect(site)?;
        let renderer = Renderer::default();
        let orchestrator = SyncOrchestrator::new(site.url.clone(), &client, &client, &renderer);
        let mut workspace = FileWorkspace::new(&self.dir);

        let handle = orchestrator
            .fetch_remote(&mut workspace, &PostName::from(self.name.as_str()))
            .with_context(|| format!("failed to fetch post '{}'", self.name))?;
        println!("✓ Fetched '{}' into {handle}", self.name);
        Ok(())
    }
}
