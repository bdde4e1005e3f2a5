//! Timing fetch
//!
//! Issues one HTTP GET per admitted URL and measures wall-clock time from
//! the call to response-headers-received. The body is discarded. The
//! measurement is advisory and precedes the handoff to the crawl engine,
//! which performs its own fetch for traversal.

use crate::config::Config;
use crate::FetchError;
use reqwest::Client;
use std::time::{Duration, Instant};

/// Builds the HTTP client used for timing fetches
///
/// The client carries the configured user agent and the per-request
/// deadline, so a stalled request cannot hold an admission slot forever.
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.user_agent_string())
        .timeout(Duration::from_secs(config.dispatch.fetch_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once and returns the elapsed time to response headers
///
/// Does not retry. The response body is dropped unread.
///
/// # Errors
///
/// * `FetchError::Timeout` - The configured deadline elapsed
/// * `FetchError::Network` - Connection or transport failure
/// * `FetchError::Status` - The response status was not 200
pub async fn timed_fetch(client: &Client, url: &str) -> Result<Duration, FetchError> {
    let start = Instant::now();

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    let elapsed = start.elapsed();

    let status = response.status();
    if status.as_u16() != 200 {
        return Err(FetchError::Status {
            url: url.to_string(),
            code: status.as_u16(),
        });
    }

    // Body intentionally dropped unread.
    drop(response);

    Ok(elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> Config {
        let mut config = Config::default();
        config.dispatch.fetch_timeout_secs = 2;
        config
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&test_config()).is_ok());
    }

    #[tokio::test]
    async fn test_timed_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = build_http_client(&test_config()).unwrap();
        let elapsed = timed_fetch(&client, &format!("{}/", server.uri()))
            .await
            .unwrap();
        assert!(elapsed > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_timed_fetch_non_200_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(&test_config()).unwrap();
        let err = timed_fetch(&client, &format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { code: 404, .. }));
    }

    #[tokio::test]
    async fn test_timed_fetch_connection_refused() {
        // Port 1 is essentially never listening.
        let client = build_http_client(&test_config()).unwrap();
        let err = timed_fetch(&client, "http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
    }

    #[tokio::test]
    async fn test_timed_fetch_deadline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = build_http_client(&test_config()).unwrap();
        let err = timed_fetch(&client, &format!("{}/slow", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }
}
