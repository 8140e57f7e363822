//! halosync core library: domain types, wire types, collaborator traits,
//! site configuration, errors.
//!
//! - [`types`]: newtypes and local/remote domain structs
//! - [`metadata`]: the local metadata record, [`MetadataPatch`] and [`merge`]
//! - [`post`]: Halo post wire types
//! - [`api`]: remote and renderer collaborator traits
//! - [`config`]: `~/.halosync/sites.yaml` load / save / edit
//! - [`error`]: [`ConfigError`], [`ApiError`]

pub mod api;
pub mod config;
pub mod error;
pub mod metadata;
pub mod post;
pub mod types;

pub use api::{MarkdownRenderer, ReferenceApi, RemotePostApi};
pub use config::{Config, Site, SiteAuth};
pub use error::{ApiError, ConfigError};
pub use metadata::{merge, Metadata, MetadataPatch, PublishValue, SlugStrategy, SyncLink};
pub use post::{Content, Post, PostSpec, RemotePost};
pub use types::{
    CategoryDraft, DocumentHandle, LocalDocument, PostName, PostSummary, ReferenceEntity,
    ReferenceKind, SiteName, TagDraft,
};
