//! Wire types for the Drive v3 API and the domain entries derived from them.

use serde::{Deserialize, Serialize};

/// Mime type Drive assigns to folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Prefix shared by all native Google document types. Files in this
/// family have no byte representation and must be exported.
pub const NATIVE_DOC_PREFIX: &str = "application/vnd.google-apps";

/// A file as returned by `files.list` / `files.get`.
///
/// Only the fields the server requests in its field masks are present;
/// everything else is left to serde defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub modified_time: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

impl DriveFile {
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }
}

/// One page of a `files.list` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListPage {
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// A file discovered during recursive traversal, tagged with its distance
/// from the traversal root. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub modified_time: String,
    pub size: String,
    pub depth: u32,
}

impl FileEntry {
    pub fn from_file(file: &DriveFile, depth: u32) -> Self {
        Self {
            id: file.id.clone(),
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            modified_time: file.modified_time.clone().unwrap_or_default(),
            size: file.size.clone().unwrap_or_else(|| "N/A".into()),
            depth,
        }
    }
}

/// Reduced folder form used only for subtree discovery during search
/// scoping.
#[derive(Debug, Clone)]
pub struct FolderEntry {
    pub id: String,
    pub name: String,
}

/// Decoded file content: exported or UTF-8 text, or a base64 envelope of
/// a binary payload.
#[derive(Debug)]
pub struct FileContent {
    pub mime_type: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_entry_defaults_missing_size() {
        let file: DriveFile = serde_json::from_str(
            r#"{"id": "f1", "name": "notes.txt", "mimeType": "text/plain"}"#,
        )
        .unwrap();
        let entry = FileEntry::from_file(&file, 2);
        assert_eq!(entry.size, "N/A");
        assert_eq!(entry.modified_time, "");
        assert_eq!(entry.depth, 2);
    }

    #[test]
    fn folder_detection() {
        let file: DriveFile = serde_json::from_str(
            r#"{"id": "d1", "name": "docs", "mimeType": "application/vnd.google-apps.folder"}"#,
        )
        .unwrap();
        assert!(file.is_folder());
    }

    #[test]
    fn list_page_tolerates_missing_fields() {
        let page: FileListPage = serde_json::from_str(r#"{}"#).unwrap();
        assert!(page.files.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
