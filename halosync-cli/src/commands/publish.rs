//! `halosync publish <FILE>` and `halosync update <FILE>`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use halosync_renderer::Renderer;
use halosync_sync::{FileWorkspace, SyncOrchestrator};

use super::connect;

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Markdown document to publish.
    pub file: PathBuf,
}

impl PublishArgs {
    /// `existing_only` restricts the run to documents already linked to a
    /// remote post (`halosync update`).
    pub fn run(self, site: Option<&str>, existing_only: bool) -> Result<()> {
        let (site, client) = connect(site)?;
        let renderer = Renderer::default();
        let orchestrator = SyncOrchestrator::new(site.url.clone(), &client, &client, &renderer);
        let mut workspace = FileWorkspace::for_document(&self.file);

        let outcome = if existing_only {
            orchestrator.update_active(&mut workspace)
        } else {
            orchestrator.publish_active(&mut workspace)
        };
        let verb = if existing_only { "update" } else { "publish" };
        let report = outcome
            .with_context(|| format!("failed to {verb} '{}'", self.file.display()))?;

        let Some(report) = report else {
            eprintln!("{} does not exist; nothing to {verb}", self.file.display());
            return Ok(());
        };

        let action = match (report.created, existing_only) {
            (true, _) => "Created",
            (false, true) => "Updated",
            (false, false) => "Published",
        };
        let state = if report.published {
            "published".green()
        } else {
            "draft".yellow()
        };
        println!(
            "✓ {action} '{}' on {} [{state}]",
            report.title, site.name
        );
        println!("  post: {}", report.name);
        Ok(())
    }
}
