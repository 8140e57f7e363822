//! Sync orchestration: the publish, update, pull and fetch protocols.
//!
//! ```text
//! publish/update:  Fetching → Reconciling → Writing → Publishing → Refreshing → Done
//! pull/fetch:      Fetching → Done
//! ```
//!
//! Remote writes start at `Writing`; a failure before it leaves both sides
//! untouched. Local metadata is written only after `Refreshing` succeeds.
//! A failure during `Writing` or `Publishing` can leave the remote post
//! partially updated; nothing is rolled back.

use chrono::{SecondsFormat, Utc};

use halosync_core::{
    merge, DocumentHandle, LocalDocument, MarkdownRenderer, Metadata, MetadataPatch, PostName,
    PostSummary, PublishValue, ReferenceApi, ReferenceKind, RemotePost, RemotePostApi,
    SlugStrategy, SyncLink,
};

use crate::error::{SyncError, SyncStage};
use crate::reconciler::Reconciler;
use crate::resolver::{resolve_display_names, ReferenceResolver};
use crate::workspace::EditingEnvironment;

/// Outcome of a publish or update run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub name: PostName,
    pub title: String,
    pub published: bool,
    /// A new remote post was created.
    pub created: bool,
}

/// Drives one configured site.
pub struct SyncOrchestrator<'a> {
    site_url: String,
    posts: &'a dyn RemotePostApi,
    references: &'a dyn ReferenceApi,
    renderer: &'a dyn MarkdownRenderer,
}

impl<'a> SyncOrchestrator<'a> {
    /// `site_url` is the configured site's normalized URL; it is what gets
    /// recorded in `halo.site`.
    pub fn new(
        site_url: impl Into<String>,
        posts: &'a dyn RemotePostApi,
        references: &'a dyn ReferenceApi,
        renderer: &'a dyn MarkdownRenderer,
    ) -> Self {
        Self {
            site_url: site_url.into(),
            posts,
            references,
            renderer,
        }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Publish the active document: create or update its remote post.
    ///
    /// `Ok(None)` when there is no active document. A `halo.name` that no
    /// longer resolves is treated as unpublished and a new post is created.
    pub fn publish_active(
        &self,
        env: &mut dyn EditingEnvironment,
    ) -> Result<Option<PublishReport>, SyncError> {
        self.run_publish(env, false)
    }

    /// Like [`publish_active`](Self::publish_active), but only for documents
    /// already linked to an existing remote post.
    pub fn update_active(
        &self,
        env: &mut dyn EditingEnvironment,
    ) -> Result<Option<PublishReport>, SyncError> {
        self.run_publish(env, true)
    }

    /// Overwrite the active document with its remote post.
    ///
    /// Returns the title written, or `None` when there is no active document.
    pub fn pull_active(
        &self,
        env: &mut dyn EditingEnvironment,
    ) -> Result<Option<String>, SyncError> {
        let Some(doc) = env.read_active_document()? else {
            tracing::debug!("no active document; nothing to pull");
            return Ok(None);
        };
        stage(SyncStage::Fetching);
        self.reconciler().check_site(&doc)?;
        let name = doc
            .metadata
            .linked_name()
            .cloned()
            .ok_or_else(|| SyncError::NotPublished {
                document: doc.name.clone(),
            })?;
        let remote = self.fetch_existing(&name)?;
        let patch = self.remote_patch(&remote, SyncStage::Fetching)?;

        env.replace_document(&remote.content.raw)?;
        env.write_metadata_block(&|old| mirror(old, &remote, &patch))?;
        tracing::info!(name = %name, "pulled");
        Ok(Some(remote.post.spec.title))
    }

    /// Create a local document from remote post `name` and make it active.
    pub fn fetch_remote(
        &self,
        env: &mut dyn EditingEnvironment,
        name: &PostName,
    ) -> Result<DocumentHandle, SyncError> {
        stage(SyncStage::Fetching);
        let remote = self.fetch_existing(name)?;
        let patch = self.remote_patch(&remote, SyncStage::Fetching)?;

        let title = &remote.post.spec.title;
        let file_name = if title.trim().is_empty() {
            name.as_str()
        } else {
            title.as_str()
        };
        let handle = env.create_document(file_name, &remote.content.raw)?;
        env.open_document(&handle)?;
        env.write_metadata_block(&|old| mirror(old, &remote, &patch))?;
        tracing::info!(name = %name, document = %handle, "fetched");
        Ok(handle)
    }

    /// Posts on the configured site.
    pub fn list_remote(&self) -> Result<Vec<PostSummary>, SyncError> {
        self.posts.list().map_err(SyncError::transport(SyncStage::Fetching))
    }

    // -----------------------------------------------------------------------
    // Publish protocol
    // -----------------------------------------------------------------------

    fn run_publish(
        &self,
        env: &mut dyn EditingEnvironment,
        require_link: bool,
    ) -> Result<Option<PublishReport>, SyncError> {
        let Some(doc) = env.read_active_document()? else {
            tracing::debug!("no active document; nothing to publish");
            return Ok(None);
        };
        let reconciler = self.reconciler();

        stage(SyncStage::Fetching);
        reconciler.check_site(&doc)?;
        let existing = self.fetch_linked(&doc, require_link)?;

        stage(SyncStage::Reconciling);
        let plan = reconciler.reconcile(&doc, existing)?;

        stage(SyncStage::Writing);
        let name = if plan.is_new {
            tracing::info!(name = %plan.name(), "creating post");
            let created = self
                .posts
                .create(&plan.target)
                .map_err(SyncError::transport(SyncStage::Writing))?;
            let assigned = created.name();
            if assigned.is_empty() {
                plan.name()
            } else {
                assigned
            }
        } else {
            let name = plan.name();
            tracing::info!(name = %name, "updating post");
            self.posts
                .update_spec(&plan.target.post)
                .map_err(SyncError::transport(SyncStage::Writing))?;
            self.posts
                .update_content(&name, &plan.target.content)
                .map_err(SyncError::transport(SyncStage::Writing))?;
            name
        };

        stage(SyncStage::Publishing);
        let publishing = if plan.publish() {
            tracing::info!(name = %name, "publishing");
            self.posts.publish(&name)
        } else {
            tracing::info!(name = %name, "unpublishing");
            self.posts.unpublish(&name)
        };
        publishing.map_err(SyncError::transport(SyncStage::Publishing))?;

        stage(SyncStage::Refreshing);
        let refreshed = self
            .posts
            .get(&name)
            .map_err(SyncError::transport(SyncStage::Refreshing))?
            .ok_or_else(|| SyncError::NotFound { name: name.clone() })?;
        let patch = self.remote_patch(&refreshed, SyncStage::Refreshing)?;

        env.write_metadata_block(&|old| merge(old, patch.clone()))?;
        tracing::debug!(name = %name, "local metadata written");
        Ok(Some(PublishReport {
            name,
            title: refreshed.post.spec.title,
            published: refreshed.post.spec.publish,
            created: plan.is_new,
        }))
    }

    /// The post `doc` is linked to, if it still exists.
    fn fetch_linked(
        &self,
        doc: &LocalDocument,
        require_link: bool,
    ) -> Result<Option<RemotePost>, SyncError> {
        let Some(name) = doc.metadata.linked_name() else {
            if require_link {
                return Err(SyncError::NotPublished {
                    document: doc.name.clone(),
                });
            }
            return Ok(None);
        };
        let found = self
            .posts
            .get(name)
            .map_err(SyncError::transport(SyncStage::Fetching))?;
        match found {
            Some(post) => Ok(Some(post)),
            None if require_link => Err(SyncError::NotFound { name: name.clone() }),
            None => {
                tracing::warn!(name = %name, "linked post no longer exists; creating a new one");
                Ok(None)
            }
        }
    }

    fn fetch_existing(&self, name: &PostName) -> Result<RemotePost, SyncError> {
        self.posts
            .get(name)
            .map_err(SyncError::transport(SyncStage::Fetching))?
            .ok_or_else(|| SyncError::NotFound { name: name.clone() })
    }

    /// Metadata written back from a remote post: title, reference display
    /// names and the link.
    fn remote_patch(&self, remote: &RemotePost, at: SyncStage) -> Result<MetadataPatch, SyncError> {
        let resolver = ReferenceResolver::new(self.references);
        let categories = resolver.list(ReferenceKind::Category, at)?;
        let tags = resolver.list(ReferenceKind::Tag, at)?;
        let spec = &remote.post.spec;
        Ok(MetadataPatch {
            title: Some(spec.title.clone()),
            categories: Some(resolve_display_names(&spec.categories, &categories)),
            tags: Some(resolve_display_names(&spec.tags, &tags)),
            halo: Some(SyncLink {
                site: self.site_url.clone(),
                name: remote.name(),
                publish: Some(spec.publish),
            }),
            ..MetadataPatch::default()
        })
    }

    fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(&self.site_url, self.references, self.renderer)
    }
}

fn stage(stage: SyncStage) {
    tracing::debug!(stage = %stage, "sync stage");
}

/// Metadata holding the remote state only; of `old`, just the keys halosync
/// does not model are kept.
///
/// A draft comes back as `publish: "false"` so that publishing the pulled
/// document keeps it a draft.
fn mirror(old: &Metadata, remote: &RemotePost, patch: &MetadataPatch) -> Metadata {
    let spec = &remote.post.spec;
    let base = Metadata {
        date: spec
            .publish_time
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        cover: Some(spec.cover.clone()).filter(|c| !c.is_empty()),
        publish: (!spec.publish).then(|| PublishValue::Text("false".to_string())),
        extra: old.extra.clone(),
        ..Metadata::default()
    };
    merge(&base, patch.clone())
}

// ---------------------------------------------------------------------------
// Metadata scaffold
// ---------------------------------------------------------------------------

/// Write a fresh metadata block into the active document.
///
/// The scaffold is a draft (`publish: "false"`). It never adds a remote link;
/// an existing `halo` key and keys outside the scaffold are kept. Returns
/// `false` when there is no active document.
pub fn scaffold_metadata(env: &mut dyn EditingEnvironment) -> Result<bool, SyncError> {
    let Some(doc) = env.read_active_document()? else {
        return Ok(false);
    };
    let patch = MetadataPatch {
        title: Some(doc.name.clone()),
        date: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        categories: Some(Vec::new()),
        tags: Some(Vec::new()),
        cover: Some(String::new()),
        slug_strategy: Some(SlugStrategy::ShortId.as_key().to_string()),
        publish: Some(PublishValue::Text("false".to_string())),
        halo: None,
    };
    env.write_metadata_block(&|old| merge(old, patch.clone()))?;
    tracing::info!(document = %doc.handle, "metadata scaffolded");
    Ok(true)
}
