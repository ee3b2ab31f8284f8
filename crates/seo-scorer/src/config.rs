use seo_engine::ScoringConfig;

use crate::error::AppError;

/// Server configuration loaded from environment variables.
///
/// Everything is optional. Rate limiting reads `RATE_LIMIT_RPS` itself, see
/// [`crate::rate_limit::RateLimiter::from_env`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// The site's own host, e.g. "nhatro.vn". Links to it count as internal.
    pub site_host: Option<String>,
    /// Serve MCP over TCP on this address instead of stdio.
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `SEO_SITE_HOST`: site domain, with or without scheme
    /// - `MCP_TCP_LISTEN_ADDR`: e.g. "127.0.0.1:7400"
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(
            std::env::var("SEO_SITE_HOST").ok(),
            std::env::var("MCP_TCP_LISTEN_ADDR").ok(),
        )
    }

    fn from_vars(
        site_host: Option<String>,
        tcp_listen_addr: Option<String>,
    ) -> Result<Self, AppError> {
        let site_host = match site_host {
            Some(raw) => parse_site_host(&raw)?,
            None => None,
        };
        let tcp_listen_addr = tcp_listen_addr
            .map(|addr| addr.trim().to_string())
            .filter(|addr| !addr.is_empty());

        Ok(Self {
            site_host,
            tcp_listen_addr,
        })
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            site_host: self.site_host.clone(),
        }
    }
}

/// Reduce "https://NhaTro.vn/" to "nhatro.vn". Blank input means unset.
fn parse_site_host(raw: &str) -> Result<Option<String>, AppError> {
    let lower = raw.trim().to_ascii_lowercase();
    let without_scheme = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let host = without_scheme.trim_end_matches('/');

    if host.is_empty() {
        return Ok(None);
    }
    if host.contains(char::is_whitespace) || host.contains('/') {
        return Err(AppError::Config(format!(
            "SEO_SITE_HOST must be a bare host name, got '{raw}'"
        )));
    }
    Ok(Some(host.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_vars(None, None).unwrap();
        assert!(config.site_host.is_none());
        assert!(config.tcp_listen_addr.is_none());
        assert_eq!(config.scoring_config(), ScoringConfig::default());
    }

    #[test]
    fn test_site_host_is_normalized() {
        let config = Config::from_vars(Some(" https://NhaTro.vn/ ".to_string()), None).unwrap();
        assert_eq!(config.site_host.as_deref(), Some("nhatro.vn"));
        assert_eq!(
            config.scoring_config().site_host.as_deref(),
            Some("nhatro.vn")
        );

        let config = Config::from_vars(Some("   ".to_string()), None).unwrap();
        assert!(config.site_host.is_none());
    }

    #[test]
    fn test_site_host_rejects_paths() {
        let err = Config::from_vars(Some("nhatro.vn/blog".to_string()), None).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(Config::from_vars(Some("nha tro.vn".to_string()), None).is_err());
    }

    #[test]
    fn test_blank_listen_addr_means_stdio() {
        let config = Config::from_vars(None, Some("  ".to_string())).unwrap();
        assert!(config.tcp_listen_addr.is_none());
        let config = Config::from_vars(None, Some("127.0.0.1:7400".to_string())).unwrap();
        assert_eq!(config.tcp_listen_addr.as_deref(), Some("127.0.0.1:7400"));
    }
}
