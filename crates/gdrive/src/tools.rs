//! Tool implementations for the gdrive MCP server.

use crate::GdriveServer;
use gdrive_api::client::{LIST_FIELDS, ListParams};
use gdrive_api::types::DriveFile;
use gdrive_api::{DriveClient, FileEntry, query, walk};
use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::{Deserialize, Serialize};

/// Page size for search results.
const SEARCH_PAGE_SIZE: u32 = 10;

/// Parameters for searching files by content.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Search query.
    pub query: String,
}

/// Parameters for reading a single file.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    /// The ID of the file to read.
    pub file_id: String,
}

/// Parameters for the recursive file listings.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListFilesParams {
    /// Folder to list from; overrides the configured root folder.
    pub folder_id: Option<String>,
    /// Number of files to return - only affects top-level pagination.
    /// The recursive walk does not paginate, so this is unused.
    pub page_size: Option<u32>,
    /// Token for pagination - only affects top-level pagination. Unused
    /// by the recursive walk.
    pub page_token: Option<String>,
}

/// Entry of the JSON documents payload.
#[derive(Debug, Serialize)]
struct DocumentLink {
    name: String,
    url: String,
}

#[tool_router]
impl GdriveServer {
    /// Create a new server over an authenticated Drive client.
    pub fn new(client: DriveClient, root_folder: Option<String>) -> Self {
        Self {
            client,
            root_folder,
            tool_router: Self::tool_router(),
        }
    }

    /// Full-text search, scoped to the configured folder subtree when set.
    #[tool(description = "Search for files in Google Drive by content")]
    async fn gdrive_search(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<String, String> {
        let query = query::compose_search_query(
            &self.client,
            &params.query,
            self.root_folder.as_deref(),
        )
        .await
        .map_err(|e| format!("Error searching files: {e}"))?;

        let page = self
            .client
            .list(&ListParams {
                query: Some(query),
                page_size: SEARCH_PAGE_SIZE,
                page_token: None,
                fields: LIST_FIELDS,
            })
            .await
            .map_err(|e| format!("Error searching files: {e}"))?;

        Ok(format_search_results(
            &page.files,
            self.root_folder.is_some(),
        ))
    }

    /// Read a file's decoded content.
    #[tool(description = "Read a file from Google Drive using its Google Drive file ID")]
    async fn gdrive_read_file(
        &self,
        Parameters(params): Parameters<ReadFileParams>,
    ) -> Result<String, String> {
        let result = gdrive_api::read_content(&self.client, &params.file_id)
            .await
            .map_err(|e| format!("Error reading file: {e}"))?;
        Ok(result.content)
    }

    /// Recursive listing formatted as indented text.
    #[tool(description = "List all files in the specified Google Drive directory recursively")]
    async fn gdrive_list_files(
        &self,
        Parameters(params): Parameters<ListFilesParams>,
    ) -> Result<String, String> {
        let (entries, root) = self.walk_from(params.folder_id).await?;
        Ok(format_file_listing(&entries, root.as_deref()))
    }

    /// Recursive listing as a JSON documents array.
    #[tool(
        description = "List all files in the specified Google Drive directory recursively and return them as a JSON array of documents"
    )]
    async fn gdrive_list_files_json(
        &self,
        Parameters(params): Parameters<ListFilesParams>,
    ) -> Result<String, String> {
        let (entries, _) = self.walk_from(params.folder_id).await?;
        format_documents_json(&entries).map_err(|e| format!("Error listing files: {e}"))
    }

    /// Shared recursive-listing core; a request-supplied folder id
    /// overrides the configured root folder.
    async fn walk_from(
        &self,
        folder_id: Option<String>,
    ) -> Result<(Vec<FileEntry>, Option<String>), String> {
        let root = folder_id.or_else(|| self.root_folder.clone());
        let entries = walk::walk_files(&self.client, root.as_deref(), walk::DEFAULT_MAX_DEPTH)
            .await
            .map_err(|e| format!("Error listing files: {e}"))?;
        Ok((entries, root))
    }
}

fn format_search_results(files: &[DriveFile], scoped: bool) -> String {
    let listing = files
        .iter()
        .map(|f| format!("{} ({}) - ID: {}", f.name, f.mime_type, f.id))
        .collect::<Vec<_>>()
        .join("\n");
    let scope_note = if scoped {
        " in the specified folder and its subdirectories"
    } else {
        ""
    };
    format!("Found {} files{}:\n{}", files.len(), scope_note, listing)
}

fn format_file_listing(entries: &[FileEntry], root: Option<&str>) -> String {
    let folder_info = match root {
        Some(id) => format!("in folder ID: {id}"),
        None => "in root or all folders".to_string(),
    };
    let mut response = format!(
        "Found {} files recursively {}\n\n",
        entries.len(),
        folder_info
    );
    for (index, entry) in entries.iter().enumerate() {
        // Indentation mirrors traversal depth so the tree structure is
        // visible in flat text.
        let indent = "  ".repeat(entry.depth as usize);
        response.push_str(&format!("{}. {}{}\n", index + 1, indent, entry.name));
        response.push_str(&format!("   {}ID: {}\n", indent, entry.id));
        response.push_str(&format!("   {}Type: {}\n", indent, entry.mime_type));
        response.push_str(&format!("   {}Modified: {}\n", indent, entry.modified_time));
        response.push_str(&format!("   {}Size: {}\n\n", indent, entry.size));
    }
    response
}

fn format_documents_json(entries: &[FileEntry]) -> Result<String, serde_json::Error> {
    let documents: Vec<DocumentLink> = entries
        .iter()
        .map(|e| DocumentLink {
            name: e.name.clone(),
            url: format!("{}/view", e.id),
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({ "documents": documents }))
}
