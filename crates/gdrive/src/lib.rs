//! MCP server exposing a Google Drive corpus as browsable resources and
//! invokable tools.
//!
//! The server holds no local state beyond its startup configuration:
//! every request round-trips to the Drive API. An optional root folder
//! restricts listings and search to that folder's subtree.

use gdrive_api::client::{ListParams, RESOURCE_FIELDS};
use gdrive_api::{DriveClient, query, read_content};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{
        AnnotateAble, Implementation, ListResourcesResult, PaginatedRequestParam, RawResource,
        ReadResourceRequestParam, ReadResourceResult, ResourceContents, ServerCapabilities,
        ServerInfo,
    },
    service::RequestContext,
    tool_handler,
};

pub mod auth;
pub mod config;
pub mod tools;

/// URI scheme for Drive-backed resources.
pub const URI_PREFIX: &str = "gdrive:///";

/// Page size for the resource listing.
const RESOURCE_PAGE_SIZE: u32 = 10;

/// MCP server over a read-only Drive corpus.
#[derive(Clone)]
pub struct GdriveServer {
    pub(crate) client: DriveClient,
    pub(crate) root_folder: Option<String>,
    pub(crate) tool_router: ToolRouter<Self>,
}

fn file_id_from_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix(URI_PREFIX).filter(|id| !id.is_empty())
}

#[tool_handler]
impl ServerHandler for GdriveServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "gdrive".into(),
                title: Some("Google Drive MCP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Read-only Google Drive server providing search, file reading, and \
                 recursive listing tools."
                    .into(),
            ),
        }
    }

    async fn list_resources(
        &self,
        request: Option<PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let params = ListParams {
            query: self.root_folder.as_deref().map(query::children_of),
            page_size: RESOURCE_PAGE_SIZE,
            page_token: request.and_then(|r| r.cursor),
            fields: RESOURCE_FIELDS,
        };
        let page = self
            .client
            .list(&params)
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        let resources = page
            .files
            .into_iter()
            .map(|file| {
                let mut resource =
                    RawResource::new(format!("{URI_PREFIX}{}", file.id), file.name);
                resource.mime_type = Some(file.mime_type);
                resource.no_annotation()
            })
            .collect();

        Ok(ListResourcesResult {
            meta: None,
            resources,
            next_cursor: page.next_page_token,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let file_id = file_id_from_uri(&request.uri).ok_or_else(|| {
            McpError::invalid_params(
                format!("unsupported resource URI: {}", request.uri),
                None,
            )
        })?;
        let result = read_content(&self.client, file_id)
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: request.uri,
                mime_type: Some(result.mime_type),
                text: result.content,
                meta: None,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::file_id_from_uri;

    #[test]
    fn strips_uri_prefix() {
        assert_eq!(file_id_from_uri("gdrive:///abc123"), Some("abc123"));
    }

    #[test]
    fn rejects_foreign_scheme() {
        assert_eq!(file_id_from_uri("file:///etc/passwd"), None);
    }

    #[test]
    fn rejects_empty_id() {
        assert_eq!(file_id_from_uri("gdrive:///"), None);
    }
}
