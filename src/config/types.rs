use serde::Deserialize;

/// Main configuration structure for Seedwave
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Dispatch pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Maximum number of concurrently in-flight fetch operations
    #[serde(default = "default_max_in_flight", rename = "max-in-flight")]
    pub max_in_flight: u32,

    /// Deadline for a single timing fetch (seconds)
    #[serde(default = "default_fetch_timeout", rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Advisory cap on batch size; larger batches are processed with a warning
    #[serde(default = "default_max_batch_size", rename = "max-batch-size")]
    pub max_batch_size: usize,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(default = "default_crawler_name", rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(default = "default_crawler_version", rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(default, rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(default, rename = "contact-email")]
    pub contact_email: Option<String>,
}

/// Traversal engine configuration
///
/// These mirror the settings the dispatcher is required to hand to the
/// crawl engine: unrestricted depth, asynchronous operation, and no
/// robots-exclusion handling.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum traversal depth; 0 means unrestricted
    #[serde(default, rename = "max-depth")]
    pub max_depth: u32,

    /// Whether the engine runs its visits asynchronously
    #[serde(default = "default_true", rename = "async")]
    pub async_traversal: bool,

    /// Whether robots-exclusion directives are ignored
    #[serde(default = "default_true", rename = "ignore-robots")]
    pub ignore_robots: bool,
}

fn default_max_in_flight() -> u32 {
    10
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_max_batch_size() -> usize {
    25
}

fn default_crawler_name() -> String {
    "seedwave".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            max_in_flight: default_max_in_flight(),
            fetch_timeout_secs: default_fetch_timeout(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        UserAgentConfig {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_depth: 0,
            async_traversal: true,
            ignore_robots: true,
        }
    }
}

impl UserAgentConfig {
    /// Formats the user agent string sent with every request
    ///
    /// Format: `CrawlerName/Version` with an optional `(+ContactURL; ContactEmail)`
    /// suffix when contact information is configured.
    pub fn user_agent_string(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        match (&self.contact_url, &self.contact_email) {
            (Some(url), Some(email)) => format!("{} (+{}; {})", base, url, email),
            (Some(url), None) => format!("{} (+{})", base, url),
            (None, Some(email)) => format!("{} ({})", base, email),
            (None, None) => base,
        }
    }
}
