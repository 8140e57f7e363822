//! Wire types for Halo posts.
//!
//! Field names follow the remote JSON (camelCase). Every object keeps the
//! fields halosync does not model in a flattened `extra` map: a post fetched
//! and sent back with `PUT` must not lose server-owned fields such as
//! `metadata.version`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::types::PostName;

pub const CONTENT_API_VERSION: &str = "content.halo.run/v1alpha1";
pub const POST_KIND: &str = "Post";
pub const RAW_TYPE_MARKDOWN: &str = "markdown";
pub const VISIBLE_PUBLIC: &str = "PUBLIC";

/// `null` and a missing key both become `T::default()`.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Excerpt {
    #[serde(default = "yes")]
    pub auto_generate: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub raw: String,
}

impl Default for Excerpt {
    fn default() -> Self {
        Self {
            auto_generate: true,
            raw: String::new(),
        }
    }
}

/// Non-content fields of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSpec {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_default")]
    pub template: String,
    #[serde(default, deserialize_with = "null_default")]
    pub cover: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub publish: bool,
    #[serde(default)]
    pub publish_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default = "yes")]
    pub allow_comment: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub visible: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub excerpt: Excerpt,
    /// Category identifiers.
    #[serde(default, deserialize_with = "null_default")]
    pub categories: Vec<String>,
    /// Tag identifiers.
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub html_metas: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PostSpec {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            template: String::new(),
            cover: String::new(),
            deleted: false,
            publish: false,
            publish_time: None,
            pinned: false,
            allow_comment: true,
            visible: VISIBLE_PUBLIC.to_string(),
            priority: 0,
            excerpt: Excerpt::default(),
            categories: Vec::new(),
            tags: Vec::new(),
            html_metas: Vec::new(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, deserialize_with = "null_default")]
    pub api_version: String,
    #[serde(default, deserialize_with = "null_default")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, deserialize_with = "null_default")]
    pub spec: PostSpec,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    /// Blank post in the shape the create endpoint expects.
    pub fn new(name: PostName) -> Self {
        Self {
            api_version: CONTENT_API_VERSION.to_string(),
            kind: POST_KIND.to_string(),
            metadata: ObjectMeta {
                name: name.0,
                annotations: Some(BTreeMap::new()),
                ..ObjectMeta::default()
            },
            spec: PostSpec::default(),
            extra: Map::new(),
        }
    }

    pub fn name(&self) -> PostName {
        PostName::from(self.metadata.name.clone())
    }
}

/// Raw and rendered body of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, deserialize_with = "null_default")]
    pub raw: String,
    #[serde(default, deserialize_with = "null_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_default")]
    pub raw_type: String,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            raw: String::new(),
            content: String::new(),
            raw_type: RAW_TYPE_MARKDOWN.to_string(),
        }
    }
}

/// A post together with its content.
///
/// Serializes as the `{ post, content }` body of the create endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePost {
    pub post: Post,
    pub content: Content,
}

impl RemotePost {
    pub fn name(&self) -> PostName {
        self.post.name()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
