//! Error types for halosync-sync.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use halosync_core::{ApiError, PostName, ReferenceKind};

/// Orchestrator states that talk to the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Fetching,
    Reconciling,
    Writing,
    Publishing,
    Refreshing,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncStage::Fetching => "fetching",
            SyncStage::Reconciling => "reconciling",
            SyncStage::Writing => "writing",
            SyncStage::Publishing => "publishing",
            SyncStage::Refreshing => "refreshing",
        };
        f.write_str(s)
    }
}

/// Failures of a publish, update, pull or fetch run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote post does not exist.
    #[error("post '{name}' not found on the remote site")]
    NotFound { name: PostName },

    /// The document is linked to another site than the one selected.
    #[error("document belongs to {recorded}, but the selected site is {configured}")]
    SiteMismatch { recorded: String, configured: String },

    /// Creating a missing category or tag failed.
    #[error("could not create {kind} '{name}': {source}")]
    ResolutionFailure {
        kind: ReferenceKind,
        name: String,
        #[source]
        source: ApiError,
    },

    /// A remote call failed.
    #[error("remote call failed while {stage}: {source}")]
    Transport {
        stage: SyncStage,
        #[source]
        source: ApiError,
    },

    /// The document has never been published.
    #[error("'{document}' has not been published yet")]
    NotPublished { document: String },

    /// The `date` key could not be read as a date.
    #[error("invalid date '{value}' in document metadata")]
    InvalidDate { value: String },

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

impl SyncError {
    pub(crate) fn transport(stage: SyncStage) -> impl FnOnce(ApiError) -> SyncError {
        move |source| SyncError::Transport { stage, source }
    }
}

/// Failures of the file-backed editing environment.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata block is not valid YAML or has the wrong shape.
    #[error("invalid metadata block in {path}: {source}")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no active document")]
    NoActiveDocument,

    /// New documents never replace existing files.
    #[error("{path} already exists")]
    AlreadyExists { path: PathBuf },
}

/// Convenience constructor for [`WorkspaceError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> WorkspaceError {
    WorkspaceError::Io {
        path: path.into(),
        source,
    }
}
