//! Domain types shared by every halosync crate.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Remote wire types live in [`crate::post`], the local metadata record in
//! [`crate::metadata`].

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Stable identifier of a remote post (`metadata.name` on the wire).
///
/// Assigned once when the post is created and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostName(pub String);

impl PostName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PostName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PostName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed name for a configured remote site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteName(pub String);

impl fmt::Display for SiteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SiteName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SiteName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Opaque handle the editing environment hands out for one document.
///
/// The file-backed environment uses the document's path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentHandle(pub PathBuf);

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

impl From<PathBuf> for DocumentHandle {
    fn from(p: PathBuf) -> Self {
        Self(p)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The two kinds of reference entity a post can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Category,
    Tag,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Category => write!(f, "category"),
            ReferenceKind::Tag => write!(f, "tag"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A category or tag as seen from this client.
///
/// `display_name` is the key local documents use to refer to it. Uniqueness
/// is not guaranteed by the remote side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntity {
    pub identifier: String,
    pub display_name: String,
    pub slug: String,
}

/// Creation request for a missing category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub display_name: String,
    pub slug: String,
    pub priority: usize,
}

/// Creation request for a missing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDraft {
    pub display_name: String,
    pub slug: String,
    pub color: String,
}

/// One row of the remote post listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub name: PostName,
    pub title: String,
    pub publish: bool,
}

/// The active document as read from the editing environment.
///
/// Read-only input to reconciliation; `name` is the document's own name
/// (file stem for files) used as the title of last resort.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDocument {
    pub handle: DocumentHandle,
    pub name: String,
    pub raw_body: String,
    pub metadata: Metadata,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
