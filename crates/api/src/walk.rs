//! Depth-bounded recursive folder traversal.
//!
//! Traversal is strictly sequential: each folder's listing completes
//! before the next sibling is visited, and entries are concatenated in
//! pre-order. The depth ceiling bounds cost; a per-traversal visited set
//! guards against folder graphs that are not actually trees.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use crate::error::Error;
use crate::types::{DriveFile, FileEntry, FolderEntry};

/// Maximum recursion depth unless the caller asks otherwise.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Page size for one directory level. The provider's practical maximum;
/// page tokens are not followed within a level, so larger folders are
/// truncated.
pub const PAGE_SIZE: u32 = 1000;

/// Seam between the walker and the Drive API.
///
/// `folder_id = None` lists without any parent predicate. With
/// `folders_only`, the listing is filtered to folder-typed entries.
pub trait Lister {
    fn list_children(
        &self,
        folder_id: Option<&str>,
        folders_only: bool,
    ) -> impl Future<Output = Result<Vec<DriveFile>, Error>> + Send;
}

/// Walk all files under `root`, returning a flattened pre-order listing
/// with each entry tagged by its distance from the root.
///
/// Entries deeper than `max_depth` are never produced. A folder whose id
/// was already seen in this traversal is listed but not descended into.
pub async fn walk_files<L: Lister + Sync>(
    lister: &L,
    root: Option<&str>,
    max_depth: u32,
) -> Result<Vec<FileEntry>, Error> {
    let mut entries = Vec::new();
    let mut visited = HashSet::new();
    if let Some(id) = root {
        visited.insert(id.to_string());
    }
    walk_level(lister, root, 0, max_depth, &mut visited, &mut entries).await?;
    Ok(entries)
}

/// Folders-only variant of [`walk_files`], used to enumerate the subtree
/// for search scoping. Non-folder siblings are never requested.
pub async fn walk_folders<L: Lister + Sync>(
    lister: &L,
    root: &str,
    max_depth: u32,
) -> Result<Vec<FolderEntry>, Error> {
    let mut folders = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(root.to_string());
    folder_level(lister, root, 0, max_depth, &mut visited, &mut folders).await?;
    Ok(folders)
}

fn walk_level<'a, L: Lister + Sync>(
    lister: &'a L,
    folder_id: Option<&'a str>,
    depth: u32,
    max_depth: u32,
    visited: &'a mut HashSet<String>,
    out: &'a mut Vec<FileEntry>,
) -> Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'a>> {
    Box::pin(async move {
        if depth > max_depth {
            return Ok(());
        }
        let files = lister.list_children(folder_id, false).await?;
        for file in files {
            out.push(FileEntry::from_file(&file, depth));
            if file.is_folder() && visited.insert(file.id.clone()) {
                walk_level(lister, Some(&file.id), depth + 1, max_depth, visited, out).await?;
            }
        }
        Ok(())
    })
}

fn folder_level<'a, L: Lister + Sync>(
    lister: &'a L,
    folder_id: &'a str,
    depth: u32,
    max_depth: u32,
    visited: &'a mut HashSet<String>,
    out: &'a mut Vec<FolderEntry>,
) -> Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'a>> {
    Box::pin(async move {
        if depth > max_depth {
            return Ok(());
        }
        let folders = lister.list_children(Some(folder_id), true).await?;
        for folder in folders {
            out.push(FolderEntry {
                id: folder.id.clone(),
                name: folder.name.clone(),
            });
            if visited.insert(folder.id.clone()) {
                folder_level(lister, &folder.id, depth + 1, max_depth, visited, out).await?;
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FOLDER_MIME_TYPE;
    use std::collections::HashMap;

    struct FakeDrive {
        children: HashMap<Option<String>, Vec<DriveFile>>,
    }

    impl FakeDrive {
        fn new() -> Self {
            Self {
                children: HashMap::new(),
            }
        }

        fn folder(parent: Option<&str>) -> Option<String> {
            parent.map(str::to_string)
        }

        fn add_file(&mut self, parent: Option<&str>, id: &str, name: &str) {
            self.add(parent, id, name, "text/plain");
        }

        fn add_folder(&mut self, parent: Option<&str>, id: &str, name: &str) {
            self.add(parent, id, name, FOLDER_MIME_TYPE);
        }

        fn add(&mut self, parent: Option<&str>, id: &str, name: &str, mime: &str) {
            self.children
                .entry(Self::folder(parent))
                .or_default()
                .push(DriveFile {
                    id: id.into(),
                    name: name.into(),
                    mime_type: mime.into(),
                    modified_time: Some("2024-01-01T00:00:00Z".into()),
                    size: None,
                });
        }
    }

    impl Lister for FakeDrive {
        async fn list_children(
            &self,
            folder_id: Option<&str>,
            folders_only: bool,
        ) -> Result<Vec<DriveFile>, Error> {
            let entries = self
                .children
                .get(&Self::folder(folder_id))
                .cloned()
                .unwrap_or_default();
            if folders_only {
                Ok(entries.into_iter().filter(DriveFile::is_folder).collect())
            } else {
                Ok(entries)
            }
        }
    }

    #[tokio::test]
    async fn pre_order_with_depth_annotations() {
        let mut drive = FakeDrive::new();
        drive.add_file(Some("root"), "a", "a.txt");
        drive.add_folder(Some("root"), "d1", "d1");
        drive.add_file(Some("root"), "b", "b.txt");
        drive.add_file(Some("d1"), "c", "c.txt");
        drive.add_folder(Some("d1"), "d2", "d2");
        drive.add_file(Some("d2"), "e", "e.txt");

        let entries = walk_files(&drive, Some("root"), DEFAULT_MAX_DEPTH)
            .await
            .unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        let depths: Vec<u32> = entries.iter().map(|e| e.depth).collect();
        assert_eq!(ids, ["a", "d1", "c", "d2", "e", "b"]);
        assert_eq!(depths, [0, 0, 1, 1, 2, 0]);
    }

    #[tokio::test]
    async fn every_node_exactly_once() {
        let mut drive = FakeDrive::new();
        drive.add_folder(Some("root"), "d1", "d1");
        drive.add_folder(Some("root"), "d2", "d2");
        drive.add_file(Some("d1"), "f1", "f1");
        drive.add_file(Some("d1"), "f2", "f2");
        drive.add_file(Some("d2"), "f3", "f3");
        drive.add_file(Some("d2"), "f4", "f4");

        let entries = walk_files(&drive, Some("root"), DEFAULT_MAX_DEPTH)
            .await
            .unwrap();
        assert_eq!(entries.len(), 6);
        let mut ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[tokio::test]
    async fn depth_ceiling_is_respected() {
        let mut drive = FakeDrive::new();
        drive.add_folder(Some("root"), "f1", "f1");
        drive.add_folder(Some("f1"), "f2", "f2");
        drive.add_folder(Some("f2"), "f3", "f3");

        let entries = walk_files(&drive, Some("root"), 1).await.unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["f1", "f2"]);
        assert!(entries.iter().all(|e| e.depth <= 1));
    }

    #[tokio::test]
    async fn absent_root_lists_unscoped() {
        let mut drive = FakeDrive::new();
        drive.add_file(None, "x", "x.txt");
        drive.add_folder(None, "d", "d");
        drive.add_file(Some("d"), "y", "y.txt");

        let entries = walk_files(&drive, None, DEFAULT_MAX_DEPTH).await.unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["x", "d", "y"]);
    }

    #[tokio::test]
    async fn repeated_folder_id_is_not_descended_twice() {
        let mut drive = FakeDrive::new();
        drive.add_folder(Some("root"), "d1", "d1");
        // Provider anomaly: d1 lists itself as its own child.
        drive.add_folder(Some("d1"), "d1", "d1");

        let entries = walk_files(&drive, Some("root"), DEFAULT_MAX_DEPTH)
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn folders_only_walk_skips_files() {
        let mut drive = FakeDrive::new();
        drive.add_folder(Some("root"), "a", "a");
        drive.add_file(Some("root"), "f", "f.txt");
        drive.add_folder(Some("a"), "c", "c");
        drive.add_folder(Some("root"), "b", "b");

        let folders = walk_folders(&drive, "root", DEFAULT_MAX_DEPTH)
            .await
            .unwrap();
        let ids: Vec<&str> = folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "b"]);
    }

    #[tokio::test]
    async fn folders_walk_honors_ceiling() {
        let mut drive = FakeDrive::new();
        drive.add_folder(Some("root"), "f1", "f1");
        drive.add_folder(Some("f1"), "f2", "f2");
        drive.add_folder(Some("f2"), "f3", "f3");

        let folders = walk_folders(&drive, "root", 1).await.unwrap();
        let ids: Vec<&str> = folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["f1", "f2"]);
    }
}
