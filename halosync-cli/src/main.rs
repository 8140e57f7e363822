//! halosync: publish Markdown documents to a Halo site and pull them back.
//!
//! # Usage
//!
//! ```text
//! halosync publish <FILE>
//! halosync update <FILE>
//! halosync pull <FILE>
//! halosync fetch <NAME> [--dir <DIR>]
//! halosync list [--json]
//! halosync init <FILE>
//! halosync site add <NAME> <URL> (--token <TOKEN> | --username <USER> --password <PASS>)
//! halosync site list | remove <NAME> | default <NAME>
//! ```
//!
//! Every command accepts `--site <NAME>` to pick a configured site and
//! `--verbose` for debug logging.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    fetch::FetchArgs, init::InitArgs, list::ListArgs, publish::PublishArgs, pull::PullArgs,
    site::SiteCommand,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "halosync",
    version,
    about = "Keep local Markdown documents in sync with posts on a Halo site",
    long_about = None,
)]
struct Cli {
    /// Configured site to use instead of the default.
    #[arg(long, global = true, value_name = "NAME")]
    site: Option<String>,

    /// Log every sync stage and remote call.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update the remote post for a document.
    Publish(PublishArgs),

    /// Update the remote post of an already published document.
    Update(PublishArgs),

    /// Overwrite a document with its remote post.
    Pull(PullArgs),

    /// Create a local document from a remote post.
    Fetch(FetchArgs),

    /// List posts on the site.
    List(ListArgs),

    /// Write a fresh metadata block into a document.
    Init(InitArgs),

    /// Manage configured sites.
    Site {
        #[command(subcommand)]
        command: SiteCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let site = cli.site.as_deref();
    match cli.command {
        Commands::Publish(args) => args.run(site, false),
        Commands::Update(args) => args.run(site, true),
        Commands::Pull(args) => args.run(site),
        Commands::Fetch(args) => args.run(site),
        Commands::List(args) => args.run(site),
        Commands::Init(args) => args.run(),
        Commands::Site { command } => commands::site::run(command),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
