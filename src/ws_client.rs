//! Live update transport.
//!
//! Connects to the server's `/socket` endpoint and feeds every `register` and
//! `update` message into a shared [`SystemRegistry`](crate::registry::SystemRegistry).
//! Lost connections are retried forever with exponential backoff; the
//! registry itself never retries anything.

use crate::api::api_url;
use crate::error::{GardenError, Result};
use crate::protocol::{apply_event, ServerEvent};
use crate::registry::SharedRegistry;
use anyhow::Context;
use futures_util::StreamExt;
use reqwest::Url;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};

const SOCKET_PATH: &str = "/socket";

/// Reconnection delays in seconds (exponential backoff with max)
const RECONNECT_DELAYS: &[u64] = &[1, 2, 4, 8, 16, 32];

/// Turn the configured HTTP address into the socket URL.
pub fn socket_url(address: Option<&str>) -> Result<String> {
    let target = api_url(address, SOCKET_PATH)?;
    let invalid = || {
        GardenError::InvalidAddress(format!(
            "{}: expected an http or https address",
            address.unwrap_or_default()
        ))
    };

    // Url lowercases the scheme, so `HTTP://` is accepted like everywhere else
    let mut url = Url::parse(&target).map_err(|_| invalid())?;
    let scheme = match url.scheme() {
        "https" => "wss",
        "http" => "ws",
        _ => return Err(invalid()),
    };
    url.set_scheme(scheme).map_err(|_| invalid())?;

    Ok(url.to_string())
}

/// Delay before reconnection attempt `attempt` (0-based), with ±25% jitter.
pub fn backoff_delay(attempt: usize) -> Duration {
    let delay_index = std::cmp::min(attempt, RECONNECT_DELAYS.len() - 1);
    let base_ms = (RECONNECT_DELAYS[delay_index] * 1000) as f64;

    let jitter_factor = rand::random::<f64>() * 2.0 - 1.0; // Range: -1.0 to 1.0
    let delay_ms = base_ms + base_ms * 0.25 * jitter_factor;
    Duration::from_millis(delay_ms.max(0.0) as u64)
}

/// Keep the registry in sync with the server until the process exits.
pub async fn follow(address: Option<String>, registry: SharedRegistry) -> Result<()> {
    let url = socket_url(address.as_deref())?;
    let mut attempt = 0;

    loop {
        tracing::info!("Connecting to {} (attempt {})...", url, attempt + 1);

        match run_session(&url, &registry).await {
            Ok(()) => {
                tracing::info!("Server closed the live update connection, reconnecting...");
                attempt = 0;
                tokio::time::sleep(Duration::from_secs(1)).await;
            },
            Err(e) => {
                let delay = backoff_delay(attempt);
                tracing::warn!(
                    "Live update connection failed: {:#}. Retrying in {:.1}s",
                    e,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            },
        }
    }
}

/// Run one connection until the server closes it.
///
/// Returns `Ok(())` on a graceful close and an error when the connection
/// could not be established or broke mid-stream.
pub async fn run_session(url: &str, registry: &SharedRegistry) -> anyhow::Result<()> {
    let (mut ws_stream, _) = connect_async(url)
        .await
        .with_context(|| format!("Failed to connect to {}", url))?;

    tracing::debug!("Connected to {}", url);

    while let Some(msg) = ws_stream.next().await {
        match msg.context("Live update stream failed")? {
            Message::Text(text) => handle_text(&text, registry).await,
            Message::Close(_) => {
                tracing::info!("Server closed connection");
                break;
            },
            _ => {},
        }
    }

    Ok(())
}

async fn handle_text(text: &str, registry: &SharedRegistry) {
    match ServerEvent::parse(text) {
        Ok(event) => {
            let mut guard = registry.write().await;
            if let Some(change) = apply_event(&mut guard, event) {
                tracing::debug!(?change, "Applied server event");
            }
        },
        Err(e) => {
            tracing::warn!("Dropping malformed server message: {}", e);
        },
    }
}
