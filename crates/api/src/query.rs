//! Drive query-string construction.
//!
//! The Drive API query language only supports direct-parent filters
//! (`'<id>' in parents`), not subtree filters. Folder-scoped search is
//! therefore built as a disjunction over the root folder and every
//! recursively discovered descendant folder.

use crate::error::Error;
use crate::walk::{self, Lister};

/// Escape user text for embedding in a single-quoted query clause.
///
/// Backslashes are escaped before single quotes; the reverse order would
/// double-escape the backslashes introduced for the quotes.
pub fn escape_query_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Query for the immediate children of a folder. Folder ids are opaque
/// provider tokens and are embedded verbatim.
pub fn children_of(folder_id: &str) -> String {
    format!("'{folder_id}' in parents")
}

/// Query for the immediate child folders of a folder, excluding files.
pub fn child_folders_of(folder_id: &str) -> String {
    format!(
        "'{folder_id}' in parents and mimeType = '{}'",
        crate::types::FOLDER_MIME_TYPE
    )
}

/// Full-text search clause, optionally restricted to a set of parent
/// folders.
pub fn search_query(text: &str, parent_ids: &[String]) -> String {
    let mut query = format!("fullText contains '{}'", escape_query_text(text));
    if !parent_ids.is_empty() {
        let parents = parent_ids
            .iter()
            .map(|id| format!("'{id}' in parents"))
            .collect::<Vec<_>>()
            .join(" or ");
        query.push_str(&format!(" and ({parents})"));
    }
    query
}

/// Compose the full search query for `text`.
///
/// With no root folder the query is the bare full-text clause. With a
/// root folder, the folders-only walk enumerates the entire subtree and
/// the query is conjoined with a parent disjunction over the root plus
/// every descendant folder id.
pub async fn compose_search_query<L: Lister + Sync>(
    lister: &L,
    text: &str,
    root_folder: Option<&str>,
) -> Result<String, Error> {
    let Some(root) = root_folder else {
        return Ok(search_query(text, &[]));
    };

    let folders = walk::walk_folders(lister, root, walk::DEFAULT_MAX_DEPTH).await?;
    let mut parent_ids = Vec::with_capacity(folders.len() + 1);
    parent_ids.push(root.to_string());
    parent_ids.extend(folders.into_iter().map(|folder| folder.id));
    Ok(search_query(text, &parent_ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DriveFile, FOLDER_MIME_TYPE};

    struct TwoFolders;

    impl Lister for TwoFolders {
        async fn list_children(
            &self,
            folder_id: Option<&str>,
            folders_only: bool,
        ) -> Result<Vec<DriveFile>, Error> {
            assert!(folders_only);
            let children = match folder_id {
                Some("F") => vec![
                    DriveFile {
                        id: "A".into(),
                        name: "a".into(),
                        mime_type: FOLDER_MIME_TYPE.into(),
                        modified_time: None,
                        size: None,
                    },
                    DriveFile {
                        id: "B".into(),
                        name: "b".into(),
                        mime_type: FOLDER_MIME_TYPE.into(),
                        modified_time: None,
                        size: None,
                    },
                ],
                _ => vec![],
            };
            Ok(children)
        }
    }

    #[tokio::test]
    async fn composed_query_covers_root_and_subtree() {
        let query = compose_search_query(&TwoFolders, "report", Some("F"))
            .await
            .unwrap();
        assert_eq!(
            query,
            "fullText contains 'report' and ('F' in parents or 'A' in parents or 'B' in parents)"
        );
    }

    #[tokio::test]
    async fn composed_query_without_root_is_bare() {
        let query = compose_search_query(&TwoFolders, "report", None)
            .await
            .unwrap();
        assert_eq!(query, "fullText contains 'report'");
    }

    #[test]
    fn escapes_backslash_before_quote() {
        assert_eq!(escape_query_text(r"O'Brien\"), r"O\'Brien\\");
    }

    #[test]
    fn bare_search_query() {
        assert_eq!(
            search_query("hello", &[]),
            "fullText contains 'hello'"
        );
    }

    #[test]
    fn search_query_with_escaped_text() {
        assert_eq!(
            search_query(r"O'Brien\", &[]),
            r"fullText contains 'O\'Brien\\'"
        );
    }

    #[test]
    fn scoped_search_query_joins_parents_with_or() {
        let parents = vec!["F".to_string(), "A".to_string(), "B".to_string()];
        assert_eq!(
            search_query("report", &parents),
            "fullText contains 'report' and ('F' in parents or 'A' in parents or 'B' in parents)"
        );
    }

    #[test]
    fn children_query_shape() {
        assert_eq!(children_of("abc123"), "'abc123' in parents");
    }

    #[test]
    fn child_folders_query_filters_mime_type() {
        assert_eq!(
            child_folders_of("abc123"),
            "'abc123' in parents and mimeType = 'application/vnd.google-apps.folder'"
        );
    }
}
