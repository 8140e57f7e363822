//! Reference resolution: category and tag display names to identifiers.
//!
//! Matching is exact on `display_name` and first-match-wins; the remote side
//! does not keep display names unique. Missing names are created remotely,
//! one request per name, dispatched concurrently on scoped threads and
//! joined in issue order.

use std::thread;

use halosync_core::{
    ApiError, CategoryDraft, ReferenceApi, ReferenceEntity, ReferenceKind, SlugStrategy, TagDraft,
};

use crate::error::{SyncError, SyncStage};
use crate::slug::generate_slug;

/// Colour given to tags created on the fly.
pub const NEW_TAG_COLOR: &str = "#ffffff";

/// Resolves names of one reference kind against a [`ReferenceApi`].
pub struct ReferenceResolver<'a> {
    api: &'a dyn ReferenceApi,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(api: &'a dyn ReferenceApi) -> Self {
        Self { api }
    }

    /// List the remote entities of `kind`.
    pub fn list(&self, kind: ReferenceKind, stage: SyncStage) -> Result<Vec<ReferenceEntity>, SyncError> {
        self.api.list(kind).map_err(SyncError::transport(stage))
    }

    /// Identifiers for `local_names`, creating the missing entities.
    ///
    /// The result holds the identifiers of matched names in input order,
    /// followed by those of created names in the order they were requested.
    /// A name listed twice that does not exist yet is created twice.
    ///
    /// Any failed creation fails the whole call; nothing partial is returned.
    pub fn resolve_names(
        &self,
        kind: ReferenceKind,
        local_names: &[String],
        all_remote: &[ReferenceEntity],
        reference_date: Option<&str>,
    ) -> Result<Vec<String>, SyncError> {
        let mut identifiers = Vec::with_capacity(local_names.len());
        let mut missing = Vec::new();
        for name in local_names {
            match find_by_display_name(all_remote, name) {
                Some(entity) => identifiers.push(entity.identifier.clone()),
                None => missing.push(name.as_str()),
            }
        }
        if missing.is_empty() {
            return Ok(identifiers);
        }

        tracing::info!(kind = %kind, count = missing.len(), "creating missing references");
        let existing = all_remote.len();
        let created: Vec<Result<ReferenceEntity, ApiError>> = thread::scope(|scope| {
            let handles: Vec<_> = missing
                .iter()
                .enumerate()
                .map(|(index, name)| {
                    let api = self.api;
                    let slug = generate_slug(name, Some(SlugStrategy::TitleBased), reference_date);
                    scope.spawn(move || create(api, kind, name, slug, existing + index))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

        for (name, result) in missing.iter().zip(created) {
            let entity = result.map_err(|source| SyncError::ResolutionFailure {
                kind,
                name: (*name).to_string(),
                source,
            })?;
            tracing::debug!(kind = %kind, name = %name, identifier = %entity.identifier, "reference created");
            identifiers.push(entity.identifier);
        }
        Ok(identifiers)
    }
}

fn create(
    api: &dyn ReferenceApi,
    kind: ReferenceKind,
    name: &str,
    slug: String,
    priority: usize,
) -> Result<ReferenceEntity, ApiError> {
    match kind {
        ReferenceKind::Category => api.create_category(&CategoryDraft {
            display_name: name.to_string(),
            slug,
            priority,
        }),
        ReferenceKind::Tag => api.create_tag(&TagDraft {
            display_name: name.to_string(),
            slug,
            color: NEW_TAG_COLOR.to_string(),
        }),
    }
}

fn find_by_display_name<'e>(all: &'e [ReferenceEntity], name: &str) -> Option<&'e ReferenceEntity> {
    all.iter().find(|entity| entity.display_name == name)
}

/// Display names for `identifiers`; unknown identifiers are dropped.
pub fn resolve_display_names(identifiers: &[String], all_remote: &[ReferenceEntity]) -> Vec<String> {
    identifiers
        .iter()
        .filter_map(|id| all_remote.iter().find(|entity| &entity.identifier == id))
        .map(|entity| entity.display_name.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
