//! Reconciliation: local document + optional remote post → target post.
//!
//! # Field mapping
//!
//! | Local          | Remote              | Rule                                             |
//! |----------------|---------------------|--------------------------------------------------|
//! | `title`        | `spec.title`        | local, else existing, else the document name     |
//! | `categories`   | `spec.categories`   | resolved to identifiers; absent keeps existing   |
//! | `tags`         | `spec.tags`         | resolved to identifiers; absent keeps existing   |
//! | `date`         | `spec.publishTime`  | parsed; absent means now                         |
//! | `publish`      | `spec.publish`      | only the string `"false"` unpublishes            |
//! | `cover`        | `spec.cover`        | local, else empty                                |
//! | body           | `content.raw`       | rendered into `content.content`                  |
//!
//! A document without a linked post gets a fresh identifier and a slug from
//! its `slug-strategy`. A linked post keeps its identifier and slug.
//!
//! No remote post is written here; only missing references are created.

use chrono::Utc;

use halosync_core::config::normalize_url;
use halosync_core::post::RAW_TYPE_MARKDOWN;
use halosync_core::{
    Content, LocalDocument, MarkdownRenderer, Post, PostName, ReferenceApi, ReferenceKind,
    RemotePost, SyncLink,
};

use crate::error::{SyncError, SyncStage};
use crate::resolver::ReferenceResolver;
use crate::slug::{generate_slug, parse_date};

/// Result of one reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Post and content to send.
    pub target: RemotePost,
    /// Link to record once the write has been confirmed.
    pub link: SyncLink,
    /// No remote post existed; the target must be created.
    pub is_new: bool,
}

impl Reconciliation {
    pub fn name(&self) -> PostName {
        self.target.name()
    }

    pub fn publish(&self) -> bool {
        self.target.post.spec.publish
    }
}

/// Computes target posts for one configured site.
pub struct Reconciler<'a> {
    site_url: &'a str,
    references: &'a dyn ReferenceApi,
    renderer: &'a dyn MarkdownRenderer,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        site_url: &'a str,
        references: &'a dyn ReferenceApi,
        renderer: &'a dyn MarkdownRenderer,
    ) -> Self {
        Self {
            site_url,
            references,
            renderer,
        }
    }

    /// Fail with [`SyncError::SiteMismatch`] when the document is linked to
    /// another site. Both sides are compared in normalized form.
    pub fn check_site(&self, document: &LocalDocument) -> Result<(), SyncError> {
        let Some(recorded) = document.metadata.linked_site() else {
            return Ok(());
        };
        let recorded_norm = normalize_url(recorded).unwrap_or_else(|_| recorded.trim().to_string());
        let configured_norm =
            normalize_url(self.site_url).unwrap_or_else(|_| self.site_url.trim().to_string());
        if recorded_norm == configured_norm {
            return Ok(());
        }
        Err(SyncError::SiteMismatch {
            recorded: recorded.to_string(),
            configured: self.site_url.to_string(),
        })
    }

    /// Build the target post for `document`, based on `existing` when the
    /// document's link still resolves.
    pub fn reconcile(
        &self,
        document: &LocalDocument,
        existing: Option<RemotePost>,
    ) -> Result<Reconciliation, SyncError> {
        self.check_site(document)?;
        let meta = &document.metadata;

        let publish_time = match meta.date.as_deref() {
            Some(raw) => parse_date(raw).ok_or_else(|| SyncError::InvalidDate {
                value: raw.to_string(),
            })?,
            None => Utc::now(),
        };

        let is_new = existing.is_none();
        let mut target = existing.unwrap_or_else(|| RemotePost {
            post: Post::new(PostName::from(uuid::Uuid::new_v4().to_string())),
            content: Content::default(),
        });
        let spec = &mut target.post.spec;

        spec.title = pick_title(meta.title.as_deref(), &spec.title, &document.name);

        let resolver = ReferenceResolver::new(self.references);
        if let Some(names) = &meta.categories {
            let all = resolver.list(ReferenceKind::Category, SyncStage::Reconciling)?;
            spec.categories =
                resolver.resolve_names(ReferenceKind::Category, names, &all, meta.date.as_deref())?;
        }
        if let Some(names) = &meta.tags {
            let all = resolver.list(ReferenceKind::Tag, SyncStage::Reconciling)?;
            spec.tags = resolver.resolve_names(ReferenceKind::Tag, names, &all, meta.date.as_deref())?;
        }

        spec.publish_time = Some(publish_time);
        spec.publish = meta.wants_publish();
        spec.cover = meta.cover.clone().unwrap_or_default();

        if is_new {
            spec.slug = generate_slug(&spec.title, meta.slug_strategy(), meta.date.as_deref());
        }

        target.content.raw = document.raw_body.clone();
        target.content.content = self.renderer.render(&document.raw_body);
        if target.content.raw_type.is_empty() {
            target.content.raw_type = RAW_TYPE_MARKDOWN.to_string();
        }

        let link = SyncLink {
            site: self.site_url.to_string(),
            name: target.name(),
            publish: Some(target.post.spec.publish),
        };
        tracing::debug!(name = %link.name, is_new, publish = target.post.spec.publish, "reconciled");
        Ok(Reconciliation {
            target,
            link,
            is_new,
        })
    }
}

fn pick_title(local: Option<&str>, existing: &str, document_name: &str) -> String {
    match local.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => title.to_string(),
        None if !existing.is_empty() => existing.to_string(),
        None => document_name.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use halosync_core::{
        ApiError, CategoryDraft, DocumentHandle, Metadata, ReferenceEntity, SlugStrategy, TagDraft,
    };
    use rstest::rstest;

    const SITE: &str = "https://blog.example";

    struct Echo;

    impl MarkdownRenderer for Echo {
        fn render(&self, raw: &str) -> String {
            format!("<p>{raw}</p>")
        }
    }

    #[derive(Default)]
    struct References {
        calls: Mutex<Vec<String>>,
    }

    impl ReferenceApi for References {
        fn list_categories(&self) -> Result<Vec<ReferenceEntity>, ApiError> {
            self.calls.lock().unwrap().push("list_categories".into());
            Ok(vec![ReferenceEntity {
                identifier: "c1".into(),
                display_name: "Rust".into(),
                slug: "rust".into(),
            }])
        }

        fn create_category(&self, draft: &CategoryDraft) -> Result<ReferenceEntity, ApiError> {
            self.calls.lock().unwrap().push(format!("create_category {}", draft.display_name));
            Ok(ReferenceEntity {
                identifier: format!("category-{}", draft.slug),
                display_name: draft.display_name.clone(),
                slug: draft.slug.clone(),
            })
        }

        fn list_tags(&self) -> Result<Vec<ReferenceEntity>, ApiError> {
            self.calls.lock().unwrap().push("list_tags".into());
            Ok(Vec::new())
        }

        fn create_tag(&self, draft: &TagDraft) -> Result<ReferenceEntity, ApiError> {
            self.calls.lock().unwrap().push(format!("create_tag {}", draft.display_name));
            Ok(ReferenceEntity {
                identifier: format!("tag-{}", draft.slug),
                display_name: draft.display_name.clone(),
                slug: draft.slug.clone(),
            })
        }
    }

    fn document(yaml: &str) -> LocalDocument {
        let metadata: Metadata = if yaml.is_empty() {
            Metadata::default()
        } else {
            serde_yaml::from_str(yaml).expect("metadata")
        };
        LocalDocument {
            handle: DocumentHandle("notes/My Note.md".into()),
            name: "My Note".into(),
            raw_body: "# Body".into(),
            metadata,
        }
    }

    fn existing(name: &str) -> RemotePost {
        let mut post = Post::new(PostName::from(name));
        post.spec.title = "Remote Title".into();
        post.spec.slug = "remote-slug".into();
        post.spec.categories = vec!["c-old".into()];
        post.spec.cover = "old.png".into();
        RemotePost {
            post,
            content: Content::default(),
        }
    }

    #[test]
    fn linked_post_keeps_identifier_and_slug() {
        let refs = References::default();
        let reconciler = Reconciler::new(SITE, &refs, &Echo);
        let doc = document("title: New Title\nhalo:\n  site: https://blog.example\n  name: abc123\n");

        let plan = reconciler.reconcile(&doc, Some(existing("abc123"))).expect("reconcile");

        assert!(!plan.is_new);
        assert_eq!(plan.name(), PostName::from("abc123"));
        assert_eq!(plan.target.post.spec.slug, "remote-slug");
        assert_eq!(plan.target.post.spec.title, "New Title");
        assert_eq!(plan.link.name, PostName::from("abc123"));
    }

    #[test]
    fn absent_fields_keep_remote_values_except_cover() {
        let refs = References::default();
        let plan = Reconciler::new(SITE, &refs, &Echo)
            .reconcile(&document(""), Some(existing("abc")))
            .expect("reconcile");
        let spec = &plan.target.post.spec;
        assert_eq!(spec.title, "Remote Title");
        assert_eq!(spec.categories, ["c-old"]);
        assert_eq!(spec.cover, "");
        assert!(refs.calls.lock().unwrap().is_empty(), "no reference lookups");
    }

    #[test]
    fn new_post_gets_fresh_identifier_and_title_slug() {
        let refs = References::default();
        let plan = Reconciler::new(SITE, &refs, &Echo)
            .reconcile(&document("title: Hello World\n"), None)
            .expect("reconcile");
        assert!(plan.is_new);
        assert!(uuid::Uuid::parse_str(plan.name().as_str()).is_ok());
        assert_eq!(plan.target.post.spec.slug, "hello-world");
        assert_eq!(plan.target.content.raw, "# Body");
        assert_eq!(plan.target.content.content, "<p># Body</p>");
        assert_eq!(plan.link.site, SITE);
    }

    #[test]
    fn new_post_honours_slug_strategy_and_falls_back_to_document_name() {
        let refs = References::default();
        let plan = Reconciler::new(SITE, &refs, &Echo)
            .reconcile(&document("slug-strategy: shortUUID\n"), None)
            .expect("reconcile");
        assert_eq!(plan.target.post.spec.title, "My Note");
        assert_eq!(plan.target.post.spec.slug.len(), 8);
        assert_eq!(
            document("slug-strategy: shortUUID\n").metadata.slug_strategy(),
            Some(SlugStrategy::ShortId)
        );
    }

    #[rstest]
    #[case("publish: \"false\"\n", false)]
    #[case("publish: false\n", true)]
    #[case("publish: true\n", true)]
    #[case("", true)]
    fn publish_rule(#[case] yaml: &str, #[case] expected: bool) {
        let refs = References::default();
        let plan = Reconciler::new(SITE, &refs, &Echo)
            .reconcile(&document(yaml), None)
            .expect("reconcile");
        assert_eq!(plan.publish(), expected);
        assert_eq!(plan.link.publish, Some(expected));
    }

    #[test]
    fn categories_and_tags_are_resolved() {
        let refs = References::default();
        let plan = Reconciler::new(SITE, &refs, &Echo)
            .reconcile(&document("categories: [Rust, Go]\ntags: [cli]\n"), None)
            .expect("reconcile");
        assert_eq!(plan.target.post.spec.categories, ["c1", "category-go"]);
        assert_eq!(plan.target.post.spec.tags, ["tag-cli"]);
        let calls = refs.calls.lock().unwrap();
        assert_eq!(calls.iter().filter(|c| c.starts_with("create")).count(), 2);
    }

    #[test]
    fn date_becomes_publish_time() {
        let refs = References::default();
        let plan = Reconciler::new(SITE, &refs, &Echo)
            .reconcile(&document("date: 2024-01-02\n"), None)
            .expect("reconcile");
        let time = plan.target.post.spec.publish_time.expect("publish time");
        assert_eq!(time.timestamp(), 1704153600);
    }

    #[test]
    fn unparseable_date_fails_before_any_lookup() {
        let refs = References::default();
        let err = Reconciler::new(SITE, &refs, &Echo)
            .reconcile(&document("date: someday\ncategories: [X]\n"), None)
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidDate { ref value } if value == "someday"));
        assert!(refs.calls.lock().unwrap().is_empty());
    }

    #[rstest]
    #[case("https://blog.example/", true)]
    #[case(" https://blog.example ", true)]
    #[case("https://other.example", false)]
    fn site_guard_compares_normalized_urls(#[case] recorded: &str, #[case] same: bool) {
        let refs = References::default();
        let doc = document(&format!("halo:\n  site: '{recorded}'\n  name: abc\n"));
        let result = Reconciler::new(SITE, &refs, &Echo).check_site(&doc);
        assert_eq!(result.is_ok(), same);
    }

    #[test]
    fn site_mismatch_aborts_reconcile() {
        let refs = References::default();
        let doc = document("categories: [New]\nhalo:\n  site: https://x\n  name: abc\n");
        let err = Reconciler::new("https://y", &refs, &Echo)
            .reconcile(&doc, None)
            .unwrap_err();
        assert!(matches!(err, SyncError::SiteMismatch { .. }));
        assert!(refs.calls.lock().unwrap().is_empty());
    }
}
