use serde::Deserialize;
use std::time::Duration;

/// Backend origin used when `RISK_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Port the web front end binds when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5555;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Origin of the prediction service, without a trailing slash.
    pub api_base_url: String,
    pub port: u16,
    /// Per-request timeout for backend calls. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            api_base_url: std::env::var("RISK_API_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| validate_base_url(&url))
                .transpose()?
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            request_timeout_secs: std::env::var("RISK_API_TIMEOUT_SECS")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|secs| match secs.trim().parse::<u64>() {
                    Ok(n) if n > 0 => Ok(n),
                    _ => Err(anyhow::anyhow!(
                        "RISK_API_TIMEOUT_SECS must be a positive number of seconds"
                    )),
                })
                .transpose()?,
        };

        tracing::debug!("Risk API base URL: {}", config.api_base_url);
        tracing::debug!("Server Port: {}", config.port);
        if let Some(secs) = config.request_timeout_secs {
            tracing::debug!("Risk API request timeout: {}s", secs);
        }

        Ok(config)
    }

    /// Replaces the backend origin, validating it the same way `from_env` does.
    pub fn with_api_base_url(mut self, url: &str) -> anyhow::Result<Self> {
        self.api_base_url = validate_base_url(url)?;
        Ok(self)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Host (and port) of the backend, as shown in the page header.
    pub fn backend_host(&self) -> String {
        match url::Url::parse(&self.api_base_url) {
            Ok(parsed) => match (parsed.host_str(), parsed.port()) {
                (Some(host), Some(port)) => format!("{}:{}", host, port),
                (Some(host), None) => host.to_string(),
                _ => self.api_base_url.clone(),
            },
            Err(_) => self.api_base_url.clone(),
        }
    }
}

/// Checks that `url` is an absolute http(s) URL and strips any trailing slash.
pub fn validate_base_url(url: &str) -> anyhow::Result<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        anyhow::bail!("RISK_API_BASE_URL cannot be empty");
    }
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| anyhow::anyhow!("RISK_API_BASE_URL is not a valid URL: {}", e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("RISK_API_BASE_URL must start with http:// or https://");
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
