//! HTTP plumbing shared by the provider adapters.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::utils::error::{Error, Result};

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("proofbadge/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::ConfigError(format!("failed to build HTTP client: {}", e)))
}

/// Send a prepared request, mapping transport failures and non-2xx statuses.
pub(crate) async fn send(provider: &'static str, request: reqwest::RequestBuilder) -> Result<Response> {
    let resp = request.send().await.map_err(|e| Error::from_transport(provider, e))?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let body: String = body.chars().take(200).collect();
        return Err(Error::ProviderUnavailable {
            provider,
            message: format!("HTTP {}: {}", status, body),
        });
    }
    Ok(resp)
}

/// Decode a JSON body, reporting shape mismatches as malformed responses.
pub(crate) async fn decode_json<T: DeserializeOwned>(provider: &'static str, resp: Response) -> Result<T> {
    let body = resp.text().await.map_err(|e| Error::from_transport(provider, e))?;
    serde_json::from_str(&body)
        .map_err(|e| Error::MalformedResponse { provider, message: e.to_string() })
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
