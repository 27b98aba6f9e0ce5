//! Binary entry point for the gdrive-mcp MCP server.

use clap::{Parser, Subcommand};
use gdrive_api::DriveClient;
use gdrive_mcp::config::ServerConfig;
use gdrive_mcp::{GdriveServer, auth};
use rmcp::ServiceExt;

/// Google Drive MCP Server — read-only search, read, and listing tools.
#[derive(Parser)]
#[command(name = "gdrive-mcp", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive authorization flow and store credentials.
    Auth,
    /// Restrict operations to a folder's subtree, then serve.
    Folder {
        /// Folder id to restrict to.
        folder_id: String,
    },
}

#[tokio::main]
async fn main() {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let cli = Cli::parse();
    let result = match cli.command {
        Some(Command::Auth) => {
            let config = ServerConfig::from_env(None);
            auth::authorize_and_save(&config.keys_path, &config.credentials_path)
                .await
                .map_err(Into::into)
        }
        Some(Command::Folder { folder_id }) => run(ServerConfig::from_env(Some(folder_id))).await,
        None => run(ServerConfig::from_env(None)).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let credentials = auth::Credentials::load(&config.credentials_path)?;
    let credentials =
        auth::ensure_fresh(credentials, &config.keys_path, &config.credentials_path).await?;

    match &config.root_folder {
        Some(id) => tracing::info!("restricting operations to folder ID: {id}"),
        None => tracing::info!(
            "no folder ID restriction set; use the folder subcommand or {} to restrict operations",
            gdrive_mcp::config::FOLDER_ID_ENV
        ),
    }

    let client = DriveClient::new(credentials.access_token)?;
    let server = GdriveServer::new(client, config.root_folder);
    let transport = rmcp::transport::stdio();
    server.serve(transport).await?.waiting().await?;
    Ok(())
}
