//! `halosync site add|list|remove|default`

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use tabled::{settings::Style, Table, Tabled};

use halosync_core::{config, Site, SiteAuth, SiteName};

/// Manage configured sites.
#[derive(Subcommand, Debug)]
pub enum SiteCommand {
    /// Add a site. The first site added becomes the default.
    Add(AddArgs),

    /// List configured sites.
    List,

    /// Remove a site.
    Remove {
        /// Site name.
        name: String,
    },

    /// Make a site the default.
    Default {
        /// Site name.
        name: String,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Local name for the site (e.g. "blog").
    pub name: String,

    /// Base URL of the Halo site (e.g. https://blog.example).
    pub url: String,

    /// Personal access token.
    #[arg(long, conflicts_with_all = ["username", "password"])]
    pub token: Option<String>,

    /// Username for basic auth.
    #[arg(long, requires = "password")]
    pub username: Option<String>,

    /// Password for basic auth.
    #[arg(long, requires = "username")]
    pub password: Option<String>,
}

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "")]
    default: &'static str,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "url")]
    url: String,
    #[tabled(rename = "auth")]
    auth: &'static str,
}

pub fn run(cmd: SiteCommand) -> Result<()> {
    match cmd {
        SiteCommand::Add(args) => add(args),
        SiteCommand::List => list(),
        SiteCommand::Remove { name } => remove(&name),
        SiteCommand::Default { name } => set_default(&name),
    }
}

fn add(args: AddArgs) -> Result<()> {
    let auth = match (args.token, args.username, args.password) {
        (Some(token), _, _) => SiteAuth::Token { token },
        (None, Some(username), Some(password)) => SiteAuth::Basic { username, password },
        _ => bail!("pass --token, or --username and --password"),
    };
    let name = args.name.clone();
    let config = config::add_site(Site {
        name: SiteName::from(args.name),
        url: args.url,
        auth,
    })
    .with_context(|| format!("failed to add site '{name}'"))?;

    let is_default = config.default.as_ref().is_some_and(|d| d.0 == name);
    println!("✓ Added site '{name}'");
    if is_default {
        println!("  '{name}' is the default site");
    }
    Ok(())
}

fn list() -> Result<()> {
    let config = config::load().context("failed to load site configuration")?;
    if config.sites.is_empty() {
        println!("No sites configured.");
        println!("Run: halosync site add <name> <url> --token <token>");
        return Ok(());
    }

    let rows: Vec<SiteRow> = config
        .sites
        .iter()
        .map(|site| SiteRow {
            default: if config.default.as_ref() == Some(&site.name) {
                "*"
            } else {
                ""
            },
            name: site.name.0.clone(),
            url: site.url.clone(),
            auth: match site.auth {
                SiteAuth::Token { .. } => "token",
                SiteAuth::Basic { .. } => "basic",
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn remove(name: &str) -> Result<()> {
    config::remove_site(name).with_context(|| format!("failed to remove site '{name}'"))?;
    println!("✓ Removed site '{name}'");
    Ok(())
}

fn set_default(name: &str) -> Result<()> {
    config::set_default(name).with_context(|| format!("failed to set default site '{name}'"))?;
    println!("✓ '{name}' is now the default site");
    Ok(())
}
