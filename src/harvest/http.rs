//! Harvester that fetches the dataset as JSON over HTTP.

use std::time::Duration;

use async_trait::async_trait;

use super::error::{HarvestError, HarvestResult};
use super::types::{Region, parse_dataset};
use super::Harvester;
use crate::config::HarvesterConfig;

/// Fetches `url` and decodes the body with [`parse_dataset`].
///
/// Timeouts come from `harvester.timeout_secs`; a timeout is reported as an
/// HTTP error and fails the run.
#[derive(Debug, Clone)]
pub struct HttpHarvester {
    client: reqwest::Client,
    url: String,
}

impl HttpHarvester {
    pub fn new(url: &str, config: &HarvesterConfig) -> HarvestResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Harvester for HttpHarvester {
    fn name(&self) -> &str {
        "http"
    }

    async fn harvest(&self) -> HarvestResult<Vec<Region>> {
        crate::debug_event!("harvest", "fetching", "{}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.bytes().await?;
        parse_dataset(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/beaches.json")
    }

    #[tokio::test]
    async fn test_http_harvester_decodes_dataset() {
        let url = serve_once("200 OK", r#"{"Santos": [{"name": "Gonzaga"}]}"#).await;
        let harvester = HttpHarvester::new(&url, &HarvesterConfig::default()).unwrap();

        let regions = harvester.harvest().await.unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Santos");
        assert_eq!(regions[0].entities[0].region, "Santos");
    }

    #[tokio::test]
    async fn test_http_harvester_rejects_error_status() {
        let url = serve_once("503 Service Unavailable", "").await;
        let harvester = HttpHarvester::new(&url, &HarvesterConfig::default()).unwrap();

        match harvester.harvest().await {
            Err(HarvestError::Status { status, url: failed }) => {
                assert_eq!(status, 503);
                assert_eq!(failed, url);
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_harvester_rejects_malformed_body() {
        let url = serve_once("200 OK", "<html>maintenance</html>").await;
        let harvester = HttpHarvester::new(&url, &HarvesterConfig::default()).unwrap();

        assert!(matches!(
            harvester.harvest().await,
            Err(HarvestError::Decode(_))
        ));
    }
}
