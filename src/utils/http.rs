use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;

/// Builds the shared client. The configured proxy is only used by the
/// pre-flight probe, never here; the timeout is left to reqwest unless
/// configured.
pub fn create_client(config: &Config) -> Result<Client> {
    let mut builder = ClientBuilder::new().cookie_store(true);

    if let Some(seconds) = config.request_timeout_seconds {
        builder = builder.timeout(Duration::from_secs(seconds));
    }

    Ok(builder.build()?)
}

/// Single GET with the given headers. No retries: transport errors are
/// returned to the caller and the status is left for it to judge.
pub async fn fetch(client: &Client, url: &str, headers: HeaderMap) -> Result<Response> {
    debug!("GET {}", url);
    let response = client.get(url).headers(headers).send().await?;
    debug!("{} answered {}", url, response.status());
    Ok(response)
}
