//! Startup configuration, resolved once in `main` and passed into the
//! server by value. Nothing mutates it after startup.

use std::path::PathBuf;

/// Folder id restricting all operations to one subtree.
pub const FOLDER_ID_ENV: &str = "GDRIVE_FOLDER_ID";
/// Override for the stored credential blob path.
pub const CREDENTIALS_ENV: &str = "MCP_GDRIVE_CREDENTIALS";
/// Override for the OAuth client key file path.
pub const KEYS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Optional folder restriction scoping listings and search.
    pub root_folder: Option<String>,
    /// Stored OAuth token blob.
    pub credentials_path: PathBuf,
    /// OAuth client key file used for authorization and refresh.
    pub keys_path: PathBuf,
}

impl ServerConfig {
    /// Resolve configuration from the environment. A CLI-supplied folder
    /// id wins over the environment variable.
    pub fn from_env(folder_override: Option<String>) -> Self {
        let root_folder = folder_override.or_else(|| {
            std::env::var(FOLDER_ID_ENV)
                .ok()
                .filter(|id| !id.is_empty())
        });
        let credentials_path = std::env::var_os(CREDENTIALS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                PathBuf::from("credentials").join(".gdrive-server-credentials.json")
            });
        let keys_path = std::env::var_os(KEYS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("credentials").join("gcp-oauth.keys.json"));
        Self {
            root_folder,
            credentials_path,
            keys_path,
        }
    }
}
