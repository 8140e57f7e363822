//! Error types for halosync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from site configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, disk full, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the offending file.
    #[error("failed to parse site config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// No site has been configured yet.
    #[error("no sites configured; run `halosync site add` first")]
    NoSites,

    /// Several sites exist and none is the default.
    #[error("several sites configured and no default; pass --site or run `halosync site default`")]
    NoDefaultSite,

    #[error("unknown site '{name}'")]
    UnknownSite { name: String },

    #[error("site '{name}' already exists")]
    DuplicateSite { name: String },

    #[error("invalid site url '{url}': expected http:// or https://")]
    InvalidUrl { url: String },
}

/// Convenience constructor for [`ConfigError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}

/// Failures reported by the remote collaborators.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The addressed entity does not exist (HTTP 404).
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Any other non-success status.
    #[error("{method} {url} returned HTTP {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}
