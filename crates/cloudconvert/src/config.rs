//! Configuration types for the CloudConvert client

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{CloudConvertError, Result};

/// Public CloudConvert API endpoint
pub const CLOUDCONVERT_API_BASE: &str = "https://api.cloudconvert.com/";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "CLOUDCONVERT_API_KEY";
/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "CLOUDCONVERT_BASE_URL";
/// Environment variable holding a request timeout in seconds
pub const TIMEOUT_ENV: &str = "CLOUDCONVERT_TIMEOUT_SECS";

/// Configuration for a [`CloudConvertClient`](crate::CloudConvertClient)
///
/// Fixed once the client is built; the client only ever reads it.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    /// Service root, always ending with `/`
    pub base_url: String,
    /// Per-request timeout. `None` leaves the transport default in place,
    /// which matters for `wait=true` conversions that can run for minutes.
    pub timeout: Option<Duration>,
    pub user_agent: String,
    /// Where `convert_upload_data` puts its temporary files (OS default if unset)
    pub temp_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load configuration from the environment, reading `.env` if present
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Ignore error if .env not present

        let api_key = std::env::var(API_KEY_ENV).map_err(|_| CloudConvertError::Configuration {
            message: format!("{} environment variable not set", API_KEY_ENV),
            field: Some(API_KEY_ENV.to_string()),
            suggestion: Some(
                "Set CLOUDCONVERT_API_KEY in your environment or .env file".to_string(),
            ),
        })?;

        let mut config = Self::new(api_key);

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config = config.with_base_url(base_url);
        }

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| CloudConvertError::Configuration {
                message: format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_ENV, raw),
                field: Some(TIMEOUT_ENV.to_string()),
                suggestion: None,
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_temp_dir<P: Into<PathBuf>>(mut self, temp_dir: P) -> Self {
        self.temp_dir = Some(temp_dir.into());
        self
    }

    /// Check the configuration before a client is built from it
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(CloudConvertError::Configuration {
                message: "API key is empty".to_string(),
                field: Some("api_key".to_string()),
                suggestion: Some("Use the key from your CloudConvert dashboard".to_string()),
            });
        }

        self.base_scheme().map(|_| ())
    }

    /// Scheme of the base URL, used to complete scheme-less conversion URLs
    pub(crate) fn base_scheme(&self) -> Result<String> {
        let url = Url::parse(&self.base_url).map_err(|e| CloudConvertError::Configuration {
            message: format!("Invalid base URL '{}': {}", self.base_url, e),
            field: Some("base_url".to_string()),
            suggestion: Some("Use an absolute URL such as https://api.cloudconvert.com/".to_string()),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url.scheme().to_string()),
            other => Err(CloudConvertError::Configuration {
                message: format!("Unsupported base URL scheme '{}'", other),
                field: Some("base_url".to_string()),
                suggestion: Some("Use http or https".to_string()),
            }),
        }
    }

    /// Endpoint URL relative to the base, e.g. `endpoint("convert")`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: CLOUDCONVERT_API_BASE.to_string(),
            timeout: None,
            user_agent: format!("cloudconvert-rs/{}", env!("CARGO_PKG_VERSION")),
            temp_dir: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}
