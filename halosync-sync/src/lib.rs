//! # halosync-sync
//!
//! Keeps a local Markdown document and a remote Halo post in step.
//!
//! - [`slug`]: slug strategies and metadata date parsing
//! - [`resolver`]: category/tag display names to identifiers, creating missing ones
//! - [`reconciler`]: local document + remote post → target post
//! - [`orchestrator`]: the publish, update, pull and fetch protocols
//! - [`document`], [`workspace`]: frontmatter codec and the file-backed
//!   editing environment

pub mod document;
pub mod error;
pub mod orchestrator;
pub mod reconciler;
pub mod resolver;
pub mod slug;
pub mod workspace;

pub use error::{SyncError, SyncStage, WorkspaceError};
pub use orchestrator::{scaffold_metadata, PublishReport, SyncOrchestrator};
pub use reconciler::{Reconciler, Reconciliation};
pub use resolver::{resolve_display_names, ReferenceResolver};
pub use slug::{generate_slug, parse_date};
pub use workspace::{EditingEnvironment, FileWorkspace};
