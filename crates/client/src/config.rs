/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the layout backend, without a trailing slash.
    pub api_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(api_url.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `MIRRORBOARD_API_URL`        | `http://localhost:8080` |
    /// | `MIRRORBOARD_TIMEOUT_SECS`   | `10`                    |
    ///
    /// An unparsable timeout is logged and replaced by the default.
    pub fn from_env() -> Self {
        let api_url = std::env::var("MIRRORBOARD_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.into());

        let request_timeout_secs = match std::env::var("MIRRORBOARD_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "MIRRORBOARD_TIMEOUT_SECS is not a number, using default");
                DEFAULT_TIMEOUT_SECS
            }),
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            api_url: normalize_url(api_url),
            request_timeout_secs,
        }
    }
}

fn normalize_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(ClientConfig::new("http://mirror:8080/").api_url, "http://mirror:8080");
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.request_timeout_secs, 10);
    }
}
