//! Subcommand implementations.

pub mod fetch;
pub mod init;
pub mod list;
pub mod publish;
pub mod pull;
pub mod site;

use anyhow::{Context, Result};

use halosync_client::HaloClient;
use halosync_core::{config, Site};

/// The selected site and a client bound to it.
pub(crate) fn connect(site: Option<&str>) -> Result<(Site, HaloClient)> {
    let config = config::load().context("failed to load site configuration")?;
    let site = config
        .select(site)
        .context("could not select a site")?
        .clone();
    tracing::debug!(site = %site.name, url = %site.url, "site selected");
    let client = HaloClient::new(&site);
    Ok((site, client))
}
