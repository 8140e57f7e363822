//! `halosync list`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use halosync_core::PostSummary;
use halosync_renderer::Renderer;
use halosync_sync::SyncOrchestrator;

use super::connect;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct PostRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "status")]
    status: String,
}

#[derive(Serialize)]
struct ListJson<'a> {
    site: &'a str,
    posts: &'a [PostSummary],
}

impl ListArgs {
    pub fn run(self, site: Option<&str>) -> Result<()> {
        let (site, client) = connect(site)?;
        let renderer = Renderer::default();
        let posts = SyncOrchestrator::new(site.url.clone(), &client, &client, &renderer)
            .list_remote()
            .with_context(|| format!("failed to list posts on '{}'", site.name))?;

        if self.json {
            let payload = ListJson {
                site: &site.url,
                posts: &posts,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize post list")?
            );
            return Ok(());
        }

        println!("{} | {} posts", site.url.bold(), posts.len());
        if posts.is_empty() {
            return Ok(());
        }
        let rows: Vec<PostRow> = posts
            .into_iter()
            .map(|post| PostRow {
                name: post.name.0,
                title: post.title,
                status: if post.publish {
                    "published".green().to_string()
                } else {
                    "draft".yellow().to_string()
                },
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        println!("Run 'halosync fetch <name>' to create a local copy.");
        Ok(())
    }
}
