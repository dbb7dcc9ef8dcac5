//! Storefront health probe.

use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum HealthError {
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storefront reports unhealthy ({status}): {body}")]
    Unhealthy { status: u16, body: String },
}

/// Query `GET /api/health` and print the reply.
///
/// # Errors
///
/// Returns `Unhealthy` when the storefront answers with a non-success status.
#[allow(clippy::print_stdout)]
pub async fn check(endpoint: &Url) -> Result<(), HealthError> {
    let url = endpoint.join("api/health")?;
    let response = reqwest::Client::new()
        .get(url)
        .timeout(Duration::from_secs(10))
        .send()
        .await?;

    let status = response.status();
    let body: serde_json::Value = response.json().await?;
    let pretty = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());

    if status.is_success() {
        println!("{pretty}");
        Ok(())
    } else {
        Err(HealthError::Unhealthy {
            status: status.as_u16(),
            body: pretty,
        })
    }
}
