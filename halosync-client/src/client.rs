//! [`HaloClient`]: the remote collaborators over Halo's REST API.
//!
//! # Endpoints
//!
//! | Operation        | Request                                                        |
//! |------------------|----------------------------------------------------------------|
//! | get post         | `GET  /apis/content.halo.run/v1alpha1/posts/{name}`            |
//! | get content      | `GET  /apis/api.console.halo.run/v1alpha1/posts/{name}/head-content` |
//! | list posts       | `GET  /apis/api.console.halo.run/v1alpha1/posts`               |
//! | create post      | `POST /apis/api.console.halo.run/v1alpha1/posts`               |
//! | update spec      | `PUT  /apis/content.halo.run/v1alpha1/posts/{name}`            |
//! | update content   | `PUT  /apis/api.console.halo.run/v1alpha1/posts/{name}/content`|
//! | (un)publish      | `PUT  /apis/api.console.halo.run/v1alpha1/posts/{name}/publish` |
//! | categories, tags | `GET`/`POST /apis/content.halo.run/v1alpha1/{categories,tags}` |

use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use halosync_core::post::{ObjectMeta, CONTENT_API_VERSION};
use halosync_core::{
    ApiError, CategoryDraft, Content, Post, PostName, PostSummary, ReferenceApi,
    ReferenceEntity, RemotePost, RemotePostApi, Site, SiteAuth, TagDraft,
};

use crate::error::HttpError;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, UreqTransport};

const CONTENT_API: &str = "/apis/content.halo.run/v1alpha1";
const CONSOLE_API: &str = "/apis/api.console.halo.run/v1alpha1";
const TAG_COLOR: &str = "#ffffff";
const ERROR_BODY_LIMIT: usize = 512;

// ---------------------------------------------------------------------------
// Wire envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListResult<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ListedPost {
    post: Post,
}

#[derive(Debug, Deserialize)]
struct Reference {
    metadata: ObjectMeta,
    spec: ReferenceSpec,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceSpec {
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    slug: String,
}

impl From<Reference> for ReferenceEntity {
    fn from(r: Reference) -> Self {
        ReferenceEntity {
            identifier: r.metadata.name,
            display_name: r.spec.display_name,
            slug: r.spec.slug,
        }
    }
}

// ---------------------------------------------------------------------------
// HaloClient
// ---------------------------------------------------------------------------

/// Client bound to one configured site.
pub struct HaloClient<T = UreqTransport> {
    base_url: String,
    authorization: String,
    transport: T,
}

impl HaloClient<UreqTransport> {
    pub fn new(site: &Site) -> Self {
        Self::with_transport(site, UreqTransport::default())
    }
}

impl<T: HttpTransport> HaloClient<T> {
    pub fn with_transport(site: &Site, transport: T) -> Self {
        Self {
            base_url: site.url.trim_end_matches('/').to_string(),
            authorization: authorization_header(&site.auth),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = method.as_str(), url = %url, "halo request");

        let request = HttpRequest {
            method,
            url: url.clone(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), self.authorization.clone()),
            ],
            body: body.unwrap_or_default(),
        };

        let response = self.transport.send(request).map_err(transport_err)?;
        if response.is_success() {
            return Ok(response);
        }
        if response.status == 404 {
            return Err(ApiError::NotFound { what: path.to_string() });
        }
        Err(ApiError::Status {
            method: method.as_str().to_string(),
            url,
            status: response.status,
            body: truncate(&String::from_utf8_lossy(&response.body)),
        })
    }

    fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self.send(HttpMethod::Get, path, None)?;
        self.decode(path, &response)
    }

    fn send_json<B, R>(&self, method: HttpMethod, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(method, path, Some(encode(path, body)?))?;
        self.decode(path, &response)
    }

    fn decode<R: DeserializeOwned>(&self, path: &str, response: &HttpResponse) -> Result<R, ApiError> {
        serde_json::from_slice(&response.body).map_err(|source| ApiError::Decode {
            url: format!("{}{}", self.base_url, path),
            source,
        })
    }
}

impl<T: HttpTransport> RemotePostApi for HaloClient<T> {
    fn get(&self, name: &PostName) -> Result<Option<RemotePost>, ApiError> {
        let post: Post = match self.get_json(&format!("{CONTENT_API}/posts/{name}")) {
            Ok(post) => post,
            Err(err) if err.is_not_found() => return Ok(None),
            Err(err) => return Err(err),
        };
        let content: Content =
            match self.get_json(&format!("{CONSOLE_API}/posts/{name}/head-content")) {
                Ok(content) => content,
                Err(err) if err.is_not_found() => return Ok(None),
                Err(err) => return Err(err),
            };
        Ok(Some(RemotePost { post, content }))
    }

    fn list(&self) -> Result<Vec<PostSummary>, ApiError> {
        let listed: ListResult<ListedPost> = self.get_json(&format!("{CONSOLE_API}/posts"))?;
        Ok(listed
            .items
            .into_iter()
            .map(|item| PostSummary {
                name: item.post.name(),
                title: item.post.spec.title,
                publish: item.post.spec.publish,
            })
            .collect())
    }

    fn create(&self, request: &RemotePost) -> Result<Post, ApiError> {
        self.send_json(HttpMethod::Post, &format!("{CONSOLE_API}/posts"), request)
    }

    fn update_spec(&self, post: &Post) -> Result<Post, ApiError> {
        let path = format!("{CONTENT_API}/posts/{}", post.metadata.name);
        self.send_json(HttpMethod::Put, &path, post)
    }

    fn update_content(&self, name: &PostName, content: &Content) -> Result<(), ApiError> {
        let path = format!("{CONSOLE_API}/posts/{name}/content");
        self.send(HttpMethod::Put, &path, Some(encode(&path, content)?))
            .map(|_| ())
    }

    fn publish(&self, name: &PostName) -> Result<(), ApiError> {
        self.send(HttpMethod::Put, &format!("{CONSOLE_API}/posts/{name}/publish"), None)
            .map(|_| ())
    }

    fn unpublish(&self, name: &PostName) -> Result<(), ApiError> {
        self.send(HttpMethod::Put, &format!("{CONSOLE_API}/posts/{name}/unpublish"), None)
            .map(|_| ())
    }
}

impl<T: HttpTransport> ReferenceApi for HaloClient<T> {
    fn list_categories(&self) -> Result<Vec<ReferenceEntity>, ApiError> {
        let listed: ListResult<Reference> = self.get_json(&format!("{CONTENT_API}/categories"))?;
        Ok(listed.items.into_iter().map(ReferenceEntity::from).collect())
    }

    fn create_category(&self, draft: &CategoryDraft) -> Result<ReferenceEntity, ApiError> {
        let body = json!({
            "spec": {
                "displayName": draft.display_name,
                "slug": draft.slug,
                "description": "",
                "cover": "",
                "template": "",
                "priority": draft.priority,
                "children": [],
            },
            "apiVersion": CONTENT_API_VERSION,
            "kind": "Category",
            "metadata": { "name": "", "generateName": "category-" },
        });
        let created: Reference =
            self.send_json(HttpMethod::Post, &format!("{CONTENT_API}/categories"), &body)?;
        Ok(created.into())
    }

    fn list_tags(&self) -> Result<Vec<ReferenceEntity>, ApiError> {
        let listed: ListResult<Reference> = self.get_json(&format!("{CONTENT_API}/tags"))?;
        Ok(listed.items.into_iter().map(ReferenceEntity::from).collect())
    }

    fn create_tag(&self, draft: &TagDraft) -> Result<ReferenceEntity, ApiError> {
        let color = if draft.color.is_empty() {
            TAG_COLOR
        } else {
            draft.color.as_str()
        };
        let body = json!({
            "spec": {
                "displayName": draft.display_name,
                "slug": draft.slug,
                "color": color,
                "cover": "",
            },
            "apiVersion": CONTENT_API_VERSION,
            "kind": "Tag",
            "metadata": { "name": "", "generateName": "tag-" },
        });
        let created: Reference =
            self.send_json(HttpMethod::Post, &format!("{CONTENT_API}/tags"), &body)?;
        Ok(created.into())
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn authorization_header(auth: &SiteAuth) -> String {
    match auth {
        SiteAuth::Token { token } => format!("Bearer {token}"),
        SiteAuth::Basic { username, password } => {
            let encoded = base64::engine::general_purpose::STANDARD
                .encode(format!("{username}:{password}"));
            format!("Basic {encoded}")
        }
    }
}

fn encode<B: Serialize + ?Sized>(path: &str, body: &B) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(body)
        .map_err(|err| ApiError::Transport(format!("could not encode body for {path}: {err}")))
}

fn transport_err(err: HttpError) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    let mut cut: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    cut.push('…');
    cut
}
