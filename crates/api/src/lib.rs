//! Google Drive v3 REST client for the gdrive MCP server.
//!
//! Covers the small slice of the Drive API the server needs: paginated
//! file listing with query predicates, metadata lookup, media download,
//! and export of native Google documents. On top of that sit the
//! recursive folder walker ([`walk`]) and the search query composer
//! ([`query`]).

pub mod client;
pub mod content;
pub mod error;
pub mod query;
pub mod types;
pub mod walk;

pub use client::{DriveClient, ListParams};
pub use content::read_content;
pub use error::Error;
pub use types::{DriveFile, FileContent, FileEntry, FolderEntry};
pub use walk::{Lister, walk_files, walk_folders};
