//! Site configuration store.
//!
//! # Storage layout
//!
//! ```text
//! ~/.halosync/           (mode 0700)
//!   sites.yaml           (mode 0600, holds credentials)
//! ```
//!
//! # API pattern
//!
//! Every function has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};
use crate::types::SiteName;

pub const CONFIG_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How requests to a site are authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SiteAuth {
    /// Personal access token, sent as a bearer token.
    Token { token: String },
    /// Username and password, sent as HTTP basic auth.
    Basic { username: String, password: String },
}

/// One configured remote site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: SiteName,
    /// Normalized base URL, see [`normalize_url`].
    pub url: String,
    pub auth: SiteAuth,
}

/// Root of `sites.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SiteName>,
    #[serde(default)]
    pub sites: Vec<Site>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            default: None,
            sites: Vec::new(),
        }
    }
}

impl Config {
    pub fn find(&self, name: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.name.0 == name)
    }

    /// Pick the site for one operation: the named one, else the default,
    /// else the only configured site.
    pub fn select(&self, name: Option<&str>) -> Result<&Site, ConfigError> {
        if let Some(name) = name {
            return self.find(name).ok_or_else(|| ConfigError::UnknownSite {
                name: name.to_string(),
            });
        }
        if let Some(default) = &self.default {
            return self.find(&default.0).ok_or_else(|| ConfigError::UnknownSite {
                name: default.0.clone(),
            });
        }
        match self.sites.as_slice() {
            [] => Err(ConfigError::NoSites),
            [only] => Ok(only),
            _ => Err(ConfigError::NoDefaultSite),
        }
    }
}

/// Trim whitespace and trailing slashes; require an http(s) scheme.
///
/// The result is what gets recorded in a document's `halo.site` and what the
/// site-mismatch guard compares against.
pub fn normalize_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.halosync/`
///
/// Creates the directory (mode `0700`) if it does not yet exist.
pub fn config_dir_at(home: &Path) -> Result<PathBuf, ConfigError> {
    let dir = home.join(".halosync");
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        set_dir_permissions(&dir)?;
    }
    Ok(dir)
}

/// `<home>/.halosync/sites.yaml`, pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".halosync").join("sites.yaml")
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load `<home>/.halosync/sites.yaml`.
///
/// A missing file is an empty config; malformed YAML is
/// `ConfigError::Parse` with the file path.
pub fn load_at(home: &Path) -> Result<Config, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Config, ConfigError> {
    load_at(&home()?)
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save the config.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, config: &Config) -> Result<(), ConfigError> {
    config_dir_at(home)?;
    let path = config_path_at(home);
    let tmp_path = path.with_file_name("sites.yaml.tmp");

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml).map_err(|e| io_err(&tmp_path, e))?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    save_at(&home()?, config)
}

// ---------------------------------------------------------------------------
// 4. Mutations
// ---------------------------------------------------------------------------

/// Add a site. The URL is normalized; the first site added becomes the
/// default.
pub fn add_site_at(home: &Path, mut site: Site) -> Result<Config, ConfigError> {
    let mut config = load_at(home)?;
    if config.find(&site.name.0).is_some() {
        return Err(ConfigError::DuplicateSite {
            name: site.name.0.clone(),
        });
    }
    site.url = normalize_url(&site.url)?;
    if config.sites.is_empty() {
        config.default = Some(site.name.clone());
    }
    config.sites.push(site);
    save_at(home, &config)?;
    Ok(config)
}

/// `add_site_at` convenience wrapper.
pub fn add_site(site: Site) -> Result<Config, ConfigError> {
    add_site_at(&home()?, site)
}

/// Remove a site; clears the default if it pointed at it.
pub fn remove_site_at(home: &Path, name: &str) -> Result<Config, ConfigError> {
    let mut config = load_at(home)?;
    let before = config.sites.len();
    config.sites.retain(|s| s.name.0 != name);
    if config.sites.len() == before {
        return Err(ConfigError::UnknownSite {
            name: name.to_string(),
        });
    }
    if config.default.as_ref().is_some_and(|d| d.0 == name) {
        config.default = None;
    }
    save_at(home, &config)?;
    Ok(config)
}

/// `remove_site_at` convenience wrapper.
pub fn remove_site(name: &str) -> Result<Config, ConfigError> {
    remove_site_at(&home()?, name)
}

/// Make `name` the default site.
pub fn set_default_at(home: &Path, name: &str) -> Result<Config, ConfigError> {
    let mut config = load_at(home)?;
    if config.find(name).is_none() {
        return Err(ConfigError::UnknownSite {
            name: name.to_string(),
        });
    }
    config.default = Some(SiteName::from(name));
    save_at(home, &config)?;
    Ok(config)
}

/// `set_default_at` convenience wrapper.
pub fn set_default(name: &str) -> Result<Config, ConfigError> {
    set_default_at(&home()?, name)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
