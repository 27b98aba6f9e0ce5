//! HTTP client for the Drive v3 REST API.

use crate::error::Error;
use crate::query;
use crate::types::{DriveFile, FileListPage};
use crate::walk::{self, Lister};

const API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Field mask for listings that feed the recursive walker and search.
pub const LIST_FIELDS: &str = "files(id, name, mimeType, modifiedTime, size)";

/// Field mask for the resource listing, which pages through results.
pub const RESOURCE_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";

/// Parameters for one `files.list` call.
#[derive(Debug, Default)]
pub struct ListParams {
    /// Query predicate (`q`), if any.
    pub query: Option<String>,
    /// Page size for this call.
    pub page_size: u32,
    /// Continuation token from a previous page.
    pub page_token: Option<String>,
    /// Field mask for the response.
    pub fields: &'static str,
}

/// Authenticated Drive API client. Cheap to clone; all calls borrow the
/// inner connection pool.
#[derive(Debug, Clone)]
pub struct DriveClient {
    http: reqwest::Client,
    token: String,
}

impl DriveClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            token: access_token.into(),
        })
    }

    /// One page of `files.list`.
    pub async fn list(&self, params: &ListParams) -> Result<FileListPage, Error> {
        let mut request = self
            .http
            .get(format!("{API_BASE}/files"))
            .bearer_auth(&self.token)
            .query(&[("pageSize", params.page_size.to_string().as_str())])
            .query(&[("fields", params.fields)]);
        if let Some(q) = &params.query {
            request = request.query(&[("q", q.as_str())]);
        }
        if let Some(token) = &params.page_token {
            request = request.query(&[("pageToken", token.as_str())]);
        }
        let response = Self::expect_ok(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Metadata for a single file (id, name, mime type).
    pub async fn get_metadata(&self, file_id: &str) -> Result<DriveFile, Error> {
        let response = self
            .http
            .get(format!("{API_BASE}/files/{file_id}"))
            .bearer_auth(&self.token)
            .query(&[("fields", "id, name, mimeType")])
            .send()
            .await?;
        Ok(Self::expect_ok(response).await?.json().await?)
    }

    /// Raw bytes of a non-native file.
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>, Error> {
        let response = self
            .http
            .get(format!("{API_BASE}/files/{file_id}"))
            .bearer_auth(&self.token)
            .query(&[("alt", "media")])
            .send()
            .await?;
        let bytes = Self::expect_ok(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Export a native Google document to `mime_type`. The response is
    /// always read as text, including image export targets.
    pub async fn export(&self, file_id: &str, mime_type: &str) -> Result<String, Error> {
        let response = self
            .http
            .get(format!("{API_BASE}/files/{file_id}/export"))
            .bearer_auth(&self.token)
            .query(&[("mimeType", mime_type)])
            .send()
            .await?;
        Ok(Self::expect_ok(response).await?.text().await?)
    }

    async fn expect_ok(response: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        // Drive wraps errors as {"error": {"message": ...}}.
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("error")?
                    .get("message")?
                    .as_str()
                    .map(str::to_owned)
            })
            .unwrap_or(body);
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl Lister for DriveClient {
    async fn list_children(
        &self,
        folder_id: Option<&str>,
        folders_only: bool,
    ) -> Result<Vec<DriveFile>, Error> {
        let query = folder_id.map(|id| {
            if folders_only {
                query::child_folders_of(id)
            } else {
                query::children_of(id)
            }
        });
        let page = self
            .list(&ListParams {
                query,
                page_size: walk::PAGE_SIZE,
                page_token: None,
                fields: LIST_FIELDS,
            })
            .await?;
        Ok(page.files)
    }
}
