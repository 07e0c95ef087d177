//! Outgoing requests to the garden server.
//!
//! The server address is injected by the caller (normally read from the
//! settings store). Every request target is `<address><path>` with exactly one
//! trailing slash removed from the address, and a missing address fails before
//! anything is sent.

use crate::error::{GardenError, Result};
use crate::models::GardenSystem;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Identifier addressing every system on the mesh at once.
pub const BROADCAST_ID: &str = "FFFFFFFFFFFF";

/// Mesh messages carry at most 212 bytes; the coordinator needs two of them.
pub const MAX_COMMAND_LEN: usize = 210;

/// Encrypted commands also carry a 12 byte nonce and a 16 byte tag.
pub const MAX_ENCRYPTED_COMMAND_LEN: usize = 184;

/// Hex-encoded ChaCha20-Poly1305 key length.
const KEY_HEX_LEN: usize = 64;

/// Build the full target URL for `path`.
pub fn api_url(address: Option<&str>, path: &str) -> Result<String> {
    let address = address
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or(GardenError::NoServerAddress)?;

    let base = address.strip_suffix('/').unwrap_or(address);
    Ok(format!("{}{}", base, path))
}

/// Check that `address` is something requests can be sent to.
pub fn validate_address(address: &str) -> Result<()> {
    let url = Url::parse(address.trim())
        .map_err(|e| GardenError::InvalidAddress(format!("{}: {}", address, e)))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(()),
        "http" | "https" => Err(GardenError::InvalidAddress(format!(
            "{}: missing host",
            address
        ))),
        scheme => Err(GardenError::InvalidAddress(format!(
            "{}: unsupported scheme '{}', expected http or https",
            address, scheme
        ))),
    }
}

/// System identifiers are the 12 hex digit MAC address of the unit.
pub fn validate_system_id(id: &str) -> Result<()> {
    if id.len() == 12 && id.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(GardenError::InvalidInput(format!(
            "'{}' is not a garden system identifier (expected 12 hex digits)",
            id
        )))
    }
}

/// Command keys are 32 bytes, hex encoded.
pub fn validate_key(key: &str) -> Result<()> {
    if key.len() == KEY_HEX_LEN && key.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(GardenError::InvalidInput(format!(
            "Encryption key must be {} hex digits",
            KEY_HEX_LEN
        )))
    }
}

/// Check a command against the mesh size limits before it is sent.
pub fn validate_command(command: &str, key: Option<&str>) -> Result<()> {
    if command.is_empty() {
        return Err(GardenError::InvalidInput("Command is empty".to_string()));
    }

    if command.len() > MAX_COMMAND_LEN {
        return Err(GardenError::InvalidInput(format!(
            "Command is {} bytes, the limit is {}",
            command.len(),
            MAX_COMMAND_LEN
        )));
    }

    if let Some(key) = key {
        validate_key(key)?;

        if command.len() > MAX_ENCRYPTED_COMMAND_LEN {
            return Err(GardenError::InvalidInput(format!(
                "Encrypted command is {} bytes, the limit is {}",
                command.len(),
                MAX_ENCRYPTED_COMMAND_LEN
            )));
        }
    }

    Ok(())
}

/// HTTP client for the garden server API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    address: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(address: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { address, client })
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Resolve `path` and start a request; the caller adds headers and body.
    ///
    /// Fails immediately, without touching the network, when no address is
    /// configured.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = api_url(self.address(), path)?;
        tracing::debug!(method = %method, url = %url, "Dispatching request");
        Ok(self.client.request(method, url))
    }

    /// Dispatch a request, turning non-success statuses into errors.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(GardenError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        Ok(response)
    }

    /// `GET /ping`: is the server reachable?
    pub async fn ping(&self) -> Result<()> {
        let request = self.request(Method::GET, "/ping")?;
        self.send(request).await?;
        Ok(())
    }

    /// `GET /systems`: every system the server knows about.
    pub async fn list_systems(&self) -> Result<Vec<GardenSystem>> {
        let request = self.request(Method::GET, "/systems")?;
        let response = self.send(request).await?;
        let systems: Option<Vec<GardenSystem>> = response.json().await?;
        Ok(systems.unwrap_or_default())
    }

    /// `GET /system/{id}`: one system including its reading history.
    pub async fn get_system(&self, id: &str) -> Result<GardenSystem> {
        validate_system_id(id)?;
        let request = self.request(Method::GET, &format!("/system/{}", id))?;
        let response = self.send(request).await.map_err(|e| not_found_as(e, id))?;
        Ok(response.json().await?)
    }

    /// `POST /system/delete/{id}`
    pub async fn delete_system(&self, id: &str) -> Result<()> {
        validate_system_id(id)?;
        let request = self.request(Method::POST, &format!("/system/delete/{}", id))?;
        self.send(request).await.map_err(|e| not_found_as(e, id))?;
        Ok(())
    }

    /// `POST /system/command/{id}`: publish a command to one system, or to
    /// all of them with [`BROADCAST_ID`].
    ///
    /// With `key` set the server encrypts the command before publishing it.
    pub async fn send_command(&self, id: &str, command: &str, key: Option<&str>) -> Result<()> {
        validate_system_id(id)?;
        validate_command(command, key)?;

        let mut form = vec![("command", command)];
        if let Some(key) = key {
            form.push(("key", key));
        }

        let request = self
            .request(Method::POST, &format!("/system/command/{}", id))?
            .form(&form);
        self.send(request).await.map_err(|e| not_found_as(e, id))?;
        Ok(())
    }
}

fn not_found_as(error: GardenError, id: &str) -> GardenError {
    match error {
        GardenError::UnexpectedStatus { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
            GardenError::SystemNotFound(id.to_string())
        },
        other => other,
    }
}
