//! Built-in traversal engine
//!
//! A straightforward breadth-first fetch-and-follow-links engine built on
//! reqwest and scraper. Traversal stays on the host of the starting URL,
//! visits each page at most once, and honors the configured depth limit
//! (0 means unrestricted). Robots-exclusion directives are not consulted;
//! the dispatcher is required to configure the engine that way.

use crate::config::{Config, EngineConfig};
use crate::engine::{CrawlEngine, EngineError};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Default single-site traversal engine
pub struct SiteTraversal {
    client: Client,
    config: EngineConfig,
}

impl SiteTraversal {
    /// Creates a traversal engine with its own HTTP client
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.user_agent_string())
            .timeout(std::time::Duration::from_secs(
                config.dispatch.fetch_timeout_secs,
            ))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(SiteTraversal {
            client,
            config: config.engine.clone(),
        })
    }

    fn within_depth(&self, depth: u32) -> bool {
        self.config.max_depth == 0 || depth <= self.config.max_depth
    }
}

#[async_trait]
impl CrawlEngine for SiteTraversal {
    async fn visit(&self, url: &str) -> Result<(), EngineError> {
        let start = Url::parse(url).map_err(|e| EngineError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let host = start
            .host_str()
            .ok_or_else(|| EngineError::Parse {
                url: url.to_string(),
                message: "missing host".to_string(),
            })?
            .to_string();

        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier: VecDeque<(Url, u32)> = VecDeque::new();
        frontier.push_back((start, 0));
        let mut pages = 0u64;

        while let Some((page, depth)) = frontier.pop_front() {
            if !visited.insert(page.to_string()) {
                continue;
            }

            let response = match self.client.get(page.clone()).send().await {
                Ok(r) => r,
                Err(e) => {
                    // Only the seed page is fatal for the visit; deeper
                    // pages are logged and skipped.
                    if pages == 0 {
                        return Err(EngineError::Http {
                            url: page.to_string(),
                            message: e.to_string(),
                        });
                    }
                    tracing::warn!("Skipping {}: {}", page, e);
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                if pages == 0 {
                    return Err(EngineError::Status {
                        url: page.to_string(),
                        code: status.as_u16(),
                    });
                }
                tracing::warn!("Skipping {}: HTTP {}", page, status);
                continue;
            }

            let is_html = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map_or(false, |ct| ct.contains("text/html"));

            let body = match response.text().await {
                Ok(b) => b,
                Err(e) => {
                    if pages == 0 {
                        return Err(EngineError::Http {
                            url: page.to_string(),
                            message: e.to_string(),
                        });
                    }
                    tracing::warn!("Skipping body of {}: {}", page, e);
                    continue;
                }
            };
            pages += 1;

            if !is_html {
                continue;
            }

            for link in extract_links(&body, &page) {
                let on_site = link.host_str() == Some(host.as_str());
                let supported = link.scheme() == "http" || link.scheme() == "https";
                if on_site && supported && self.within_depth(depth + 1) {
                    frontier.push_back((link, depth + 1));
                }
            }
        }

        tracing::debug!("Traversal of {} visited {} pages", url, pages);
        Ok(())
    }
}

/// Extracts absolute link targets from an HTML document
///
/// Relative hrefs are resolved against the page URL; anything that does
/// not resolve is dropped.
fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("static selector");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .map(|mut u| {
            u.set_fragment(None);
            u
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn html_page(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
    }

    #[test]
    fn test_extract_links_resolves_relative() {
        let base = Url::parse("https://example.com/dir/page").unwrap();
        let html = r#"<a href="/abs">a</a><a href="rel">b</a><a href="https://other.com/">c</a>"#;
        let links = extract_links(html, &base);
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].as_str(), "https://example.com/abs");
        assert_eq!(links[1].as_str(), "https://example.com/dir/rel");
        assert_eq!(links[2].as_str(), "https://other.com/");
    }

    #[test]
    fn test_extract_links_drops_fragment() {
        let base = Url::parse("https://example.com/").unwrap();
        let links = extract_links(r##"<a href="/page#section">x</a>"##, &base);
        assert_eq!(links[0].as_str(), "https://example.com/page");
    }

    #[test]
    fn test_extract_links_ignores_unjoinable() {
        let base = Url::parse("https://example.com/").unwrap();
        let links = extract_links(r#"<a href="http://[broken">x</a>"#, &base);
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_visit_follows_same_site_links() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(r#"<a href="/one">1</a><a href="/two">2</a>"#))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/one"))
            .respond_with(html_page("leaf"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/two"))
            .respond_with(html_page(r#"<a href="/one">again</a>"#))
            .expect(1)
            .mount(&server)
            .await;

        let engine = SiteTraversal::new(&Config::default()).unwrap();
        engine.visit(&format!("{}/", server.uri())).await.unwrap();
    }

    #[tokio::test]
    async fn test_visit_respects_depth_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(r#"<a href="/deep">d</a>"#))
            .expect(1)
            .mount(&server)
            .await;
        // Depth 1 page would link further, but max-depth 1 stops here.
        Mock::given(method("GET"))
            .and(path("/deep"))
            .respond_with(html_page(r#"<a href="/deeper">d</a>"#))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/deeper"))
            .respond_with(html_page("leaf"))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.engine.max_depth = 1;
        let engine = SiteTraversal::new(&config).unwrap();
        engine.visit(&format!("{}/", server.uri())).await.unwrap();
    }

    #[tokio::test]
    async fn test_visit_seed_error_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let engine = SiteTraversal::new(&Config::default()).unwrap();
        let err = engine
            .visit(&format!("{}/gone", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Status { code: 500, .. }));
    }

    #[tokio::test]
    async fn test_visit_non_html_is_not_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"<a href="/never">x</a>"#, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/never"))
            .respond_with(html_page("x"))
            .expect(0)
            .mount(&server)
            .await;

        let engine = SiteTraversal::new(&Config::default()).unwrap();
        engine
            .visit(&format!("{}/data", server.uri()))
            .await
            .unwrap();
    }
}
