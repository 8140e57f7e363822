//! The local document's metadata block as an immutable record.
//!
//! Only the keys halosync understands get typed fields; everything else is
//! carried through [`Metadata::extra`] untouched. Updates are expressed as a
//! [`MetadataPatch`] and applied with the pure [`merge`] function, so the
//! editing environment decides where and when the result is persisted.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::types::PostName;

// ---------------------------------------------------------------------------
// SyncLink
// ---------------------------------------------------------------------------

/// Back-reference from a local document to the remote post it publishes to.
///
/// Persisted under the `halo` key. `publish` is absent on links written by
/// older clients; a link missing `site` or `name` still parses and reads as
/// unset through [`Metadata::linked_site`] and [`Metadata::linked_name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncLink {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub site: String,
    #[serde(default, skip_serializing_if = "PostName::is_empty")]
    pub name: PostName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<bool>,
}

// ---------------------------------------------------------------------------
// publish flag
// ---------------------------------------------------------------------------

/// Raw value of the `publish` key.
///
/// Frontmatter may carry a boolean or a string here and the two are not
/// interchangeable: see [`PublishValue::is_published`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublishValue {
    Flag(bool),
    Text(String),
    Other(Value),
}

impl PublishValue {
    /// Only the literal string `"false"` means "do not publish".
    ///
    /// Boolean `false`, any other string, any other value and an absent key
    /// all publish. Keep this table exactly as is; existing documents depend
    /// on it.
    pub fn is_published(value: Option<&PublishValue>) -> bool {
        !matches!(value, Some(PublishValue::Text(s)) if s == "false")
    }
}

// ---------------------------------------------------------------------------
// slug strategy
// ---------------------------------------------------------------------------

/// How a slug is derived for a new post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlugStrategy {
    /// Transliterated, lowercase title.
    #[default]
    TitleBased,
    /// Random 8-character token.
    ShortId,
    /// Random UUID.
    FullId,
    /// Epoch milliseconds of the document date (or now).
    Timestamp,
}

impl SlugStrategy {
    /// Parse the `slug-strategy` value. Unknown values yield `None`, which
    /// callers treat as [`SlugStrategy::TitleBased`].
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "title" | "title-based" => Some(Self::TitleBased),
            "shortUUID" | "short-id" => Some(Self::ShortId),
            "UUID" | "full-id" => Some(Self::FullId),
            "timestamp" => Some(Self::Timestamp),
            _ => None,
        }
    }

    /// The key written into new documents.
    pub fn as_key(self) -> &'static str {
        match self {
            Self::TitleBased => "title",
            Self::ShortId => "shortUUID",
            Self::FullId => "UUID",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for SlugStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

// ---------------------------------------------------------------------------
// Metadata record
// ---------------------------------------------------------------------------

/// Recognized metadata keys plus a verbatim bag of everything else.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    #[serde(
        default,
        deserialize_with = "name_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub categories: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "name_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover: Option<String>,
    #[serde(
        rename = "slug-strategy",
        alias = "slug",
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub slug_strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub halo: Option<SyncLink>,
    /// Keys halosync does not interpret, re-emitted unchanged.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Resolved publish intent, see [`PublishValue::is_published`].
    pub fn wants_publish(&self) -> bool {
        PublishValue::is_published(self.publish.as_ref())
    }

    /// Parsed slug strategy; `None` when absent or unrecognized.
    pub fn slug_strategy(&self) -> Option<SlugStrategy> {
        self.slug_strategy.as_deref().and_then(SlugStrategy::parse)
    }

    /// Identifier of the linked remote post, if the link carries one.
    pub fn linked_name(&self) -> Option<&PostName> {
        self.halo
            .as_ref()
            .map(|link| &link.name)
            .filter(|name| !name.is_empty())
    }

    /// Site recorded in the link, if any.
    pub fn linked_site(&self) -> Option<&str> {
        self.halo
            .as_ref()
            .map(|link| link.site.as_str())
            .filter(|site| !site.is_empty())
    }
}

/// Field-wise replacement for [`Metadata`]; `None` leaves a field alone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetadataPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub cover: Option<String>,
    pub slug_strategy: Option<String>,
    pub publish: Option<PublishValue>,
    pub halo: Option<SyncLink>,
}

/// Apply `patch` on top of `old` and return the new record.
pub fn merge(old: &Metadata, patch: MetadataPatch) -> Metadata {
    Metadata {
        title: patch.title.or_else(|| old.title.clone()),
        date: patch.date.or_else(|| old.date.clone()),
        categories: patch.categories.or_else(|| old.categories.clone()),
        tags: patch.tags.or_else(|| old.tags.clone()),
        cover: patch.cover.or_else(|| old.cover.clone()),
        slug_strategy: patch.slug_strategy.or_else(|| old.slug_strategy.clone()),
        publish: patch.publish.or_else(|| old.publish.clone()),
        halo: patch.halo.or_else(|| old.halo.clone()),
        extra: old.extra.clone(),
    }
}

// ---------------------------------------------------------------------------
// Lenient deserializers
// ---------------------------------------------------------------------------

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accept any YAML scalar (`title: 2024` is a number to YAML).
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(value.clone())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected a scalar, found {value:?}"))),
    }
}

/// Accept a sequence of names or a single bare name.
fn name_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Sequence(items)) => Ok(Some(
            items
                .into_iter()
                .filter_map(scalar_to_string)
                .filter(|name| !name.trim().is_empty())
                .collect(),
        )),
        Some(value) => match scalar_to_string(value.clone()) {
            Some(name) if name.trim().is_empty() => Ok(Some(Vec::new())),
            Some(name) => Ok(Some(vec![name])),
            None => Err(de::Error::custom(format!(
                "expected a list of names, found {value:?}"
            ))),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
