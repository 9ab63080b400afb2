use async_trait::async_trait;
use reqwest::{Client, Proxy, StatusCode};
use tracing::{debug, warn};

use crate::error::Result;

/// Pre-flight check run before a search when a proxy is configured.
#[async_trait]
pub trait ProxyProbe: Send + Sync {
    async fn is_alive(&self) -> bool;
}

/// Requests a known-good page through the proxy and expects a 200.
pub struct HttpProxyProbe {
    client: Client,
    probe_url: String,
}

impl HttpProxyProbe {
    pub fn new(proxy: &str, probe_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().proxy(Proxy::all(proxy)?).build()?;
        Ok(Self {
            client,
            probe_url: probe_url.into(),
        })
    }
}

#[async_trait]
impl ProxyProbe for HttpProxyProbe {
    async fn is_alive(&self) -> bool {
        match self.client.get(&self.probe_url).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                debug!("Proxy probe against {} succeeded", self.probe_url);
                true
            }
            Ok(response) => {
                warn!("Proxy probe against {} answered {}", self.probe_url, response.status());
                false
            }
            Err(e) => {
                warn!("Proxy probe against {} failed: {}", self.probe_url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // For a plain-http target the proxy receives the absolute-form request,
    // so the mock server can stand in for the proxy itself.
    #[tokio::test]
    async fn alive_when_probe_returns_ok() {
        let proxy = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&proxy)
            .await;

        let probe = HttpProxyProbe::new(&proxy.uri(), "http://probe.test/").unwrap();
        assert!(probe.is_alive().await);
    }

    #[tokio::test]
    async fn dead_when_probe_returns_error_status() {
        let proxy = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(407))
            .mount(&proxy)
            .await;

        let probe = HttpProxyProbe::new(&proxy.uri(), "http://probe.test/").unwrap();
        assert!(!probe.is_alive().await);
    }

    #[tokio::test]
    async fn dead_when_proxy_unreachable() {
        let probe = HttpProxyProbe::new("http://127.0.0.1:9", "http://probe.test/").unwrap();
        assert!(!probe.is_alive().await);
    }
}
