//! OAuth credential acquisition and persistence.
//!
//! Tokens live in a JSON blob on disk, written once by the interactive
//! `auth` flow and read at every server start. Authorization uses the
//! OAuth 2.0 device flow against Google's device and token endpoints;
//! a stored refresh token renews an expired access token at startup.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Read-only Drive access.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

const DEVICE_CODE_URL: &str = "https://oauth2.googleapis.com/device/code";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEVICE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Treat tokens expiring within this window as already expired.
const EXPIRY_MARGIN_MS: i64 = 60_000;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("credentials not found at {0}; run the `auth` subcommand first")]
    MissingCredentials(String),

    #[error("OAuth key file not found at {0}")]
    MissingKeys(String),

    #[error("malformed key file: expected an \"installed\" or \"web\" client")]
    MalformedKeys,

    #[error("authorization failed: {0}")]
    Authorization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Stored token blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Expiry as epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        if !path.exists() {
            return Err(AuthError::MissingCredentials(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Whether the access token is expired or inside the expiry margin.
    /// A blob without an expiry is taken at face value.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        match self.expiry_date {
            Some(expiry) => expiry - EXPIRY_MARGIN_MS <= now_ms,
            None => false,
        }
    }
}

/// OAuth client key file in Google's download format: the client block
/// sits under an `installed` or `web` key.
#[derive(Debug, Deserialize)]
struct KeyFile {
    #[serde(default)]
    installed: Option<OauthKeys>,
    #[serde(default)]
    web: Option<OauthKeys>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OauthKeys {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl OauthKeys {
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        if !path.exists() {
            return Err(AuthError::MissingKeys(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let file: KeyFile = serde_json::from_str(&data)?;
        file.installed.or(file.web).ok_or(AuthError::MalformedKeys)
    }
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    verification_url: String,
    #[serde(default = "default_poll_interval")]
    interval: u64,
}

fn default_poll_interval() -> u64 {
    5
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Run the interactive device-flow authorization and save the resulting
/// credential blob. Instructions go to stderr; stdout stays free for
/// the MCP transport.
pub async fn authorize_and_save(
    keys_path: &Path,
    credentials_path: &Path,
) -> Result<(), AuthError> {
    let keys = OauthKeys::load(keys_path)?;
    let http = reqwest::Client::new();

    let device: DeviceCodeResponse = http
        .post(DEVICE_CODE_URL)
        .form(&[
            ("client_id", keys.client_id.as_str()),
            ("scope", DRIVE_SCOPE),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    eprintln!(
        "To authorize, open {} and enter the code {}",
        device.verification_url, device.user_code
    );

    let credentials = poll_for_tokens(&http, &keys, &device).await?;
    credentials.save(credentials_path)?;
    eprintln!(
        "Credentials saved to {}. You can now run the server.",
        credentials_path.display()
    );
    Ok(())
}

async fn poll_for_tokens(
    http: &reqwest::Client,
    keys: &OauthKeys,
    device: &DeviceCodeResponse,
) -> Result<Credentials, AuthError> {
    loop {
        tokio::time::sleep(Duration::from_secs(device.interval)).await;

        let mut form = vec![
            ("client_id", keys.client_id.as_str()),
            ("device_code", device.device_code.as_str()),
            ("grant_type", DEVICE_GRANT_TYPE),
        ];
        if let Some(secret) = &keys.client_secret {
            form.push(("client_secret", secret.as_str()));
        }
        let token: TokenResponse = http
            .post(TOKEN_URL)
            .form(&form)
            .send()
            .await?
            .json()
            .await?;

        match token.error.as_deref() {
            None => return credentials_from(token),
            Some("authorization_pending") | Some("slow_down") => continue,
            Some(error) => {
                let detail = token
                    .error_description
                    .unwrap_or_else(|| error.to_string());
                return Err(AuthError::Authorization(detail));
            }
        }
    }
}

fn credentials_from(token: TokenResponse) -> Result<Credentials, AuthError> {
    let access_token = token.access_token.ok_or_else(|| {
        AuthError::Authorization("token response had no access_token".into())
    })?;
    Ok(Credentials {
        access_token,
        refresh_token: token.refresh_token,
        token_type: token.token_type,
        expiry_date: token
            .expires_in
            .map(|secs| Utc::now().timestamp_millis() + secs * 1000),
    })
}

/// Refresh an expired access token when a refresh token and key file
/// are available, persisting the rotated blob. Without either, the
/// stored token is used as-is.
pub async fn ensure_fresh(
    mut credentials: Credentials,
    keys_path: &Path,
    credentials_path: &Path,
) -> Result<Credentials, AuthError> {
    if !credentials.is_expired(Utc::now().timestamp_millis()) {
        return Ok(credentials);
    }
    let Some(refresh_token) = credentials.refresh_token.clone() else {
        tracing::warn!("access token expired and no refresh token is stored");
        return Ok(credentials);
    };
    let keys = match OauthKeys::load(keys_path) {
        Ok(keys) => keys,
        Err(err) => {
            tracing::warn!("access token expired but key file is unavailable: {err}");
            return Ok(credentials);
        }
    };

    let http = reqwest::Client::new();
    let mut form = vec![
        ("client_id", keys.client_id.as_str()),
        ("refresh_token", refresh_token.as_str()),
        ("grant_type", "refresh_token"),
    ];
    if let Some(secret) = &keys.client_secret {
        form.push(("client_secret", secret.as_str()));
    }
    let token: TokenResponse = http
        .post(TOKEN_URL)
        .form(&form)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let Some(access_token) = token.access_token else {
        return Err(AuthError::Authorization(
            "refresh response had no access_token".into(),
        ));
    };
    credentials.access_token = access_token;
    credentials.expiry_date = token
        .expires_in
        .map(|secs| Utc::now().timestamp_millis() + secs * 1000);
    if token.refresh_token.is_some() {
        credentials.refresh_token = token.refresh_token;
    }
    credentials.save(credentials_path)?;
    tracing::info!("refreshed access token");
    Ok(credentials)
}
