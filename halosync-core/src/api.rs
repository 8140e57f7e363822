//! Collaborator seams: the remote post store, the remote reference store
//! and the Markdown renderer.
//!
//! Implementations must be shareable across threads; reference creation
//! fans out over scoped threads.

use crate::error::ApiError;
use crate::post::{Content, Post, RemotePost};
use crate::types::{CategoryDraft, PostName, PostSummary, ReferenceEntity, ReferenceKind, TagDraft};

/// Remote post operations.
pub trait RemotePostApi: Send + Sync {
    /// Fetch a post and its head content. `Ok(None)` when it does not exist.
    fn get(&self, name: &PostName) -> Result<Option<RemotePost>, ApiError>;

    fn list(&self) -> Result<Vec<PostSummary>, ApiError>;

    /// Create a post with its content in one call; returns the stored post.
    fn create(&self, request: &RemotePost) -> Result<Post, ApiError>;

    /// Replace the spec of `post.metadata.name`.
    fn update_spec(&self, post: &Post) -> Result<Post, ApiError>;

    fn update_content(&self, name: &PostName, content: &Content) -> Result<(), ApiError>;

    fn publish(&self, name: &PostName) -> Result<(), ApiError>;

    fn unpublish(&self, name: &PostName) -> Result<(), ApiError>;
}

/// Remote category and tag operations.
pub trait ReferenceApi: Send + Sync {
    fn list_categories(&self) -> Result<Vec<ReferenceEntity>, ApiError>;

    fn create_category(&self, draft: &CategoryDraft) -> Result<ReferenceEntity, ApiError>;

    fn list_tags(&self) -> Result<Vec<ReferenceEntity>, ApiError>;

    fn create_tag(&self, draft: &TagDraft) -> Result<ReferenceEntity, ApiError>;

    fn list(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntity>, ApiError> {
        match kind {
            ReferenceKind::Category => self.list_categories(),
            ReferenceKind::Tag => self.list_tags(),
        }
    }
}

/// Markdown to HTML.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, raw: &str) -> String;
}
