use std::path::PathBuf;

use crate::constants::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the shop REST API, without a trailing slash.
    pub api_url: String,
    /// Where the session token is persisted between runs.
    pub session_path: PathBuf,
    /// Lifetime applied to tokens that carry no `exp` claim.
    pub session_ttl_secs: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(ENV_API_URL)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(format!(
                "{} must start with http:// or https://, got '{}'",
                ENV_API_URL, api_url
            ));
        }

        let session_path = lookup(ENV_SESSION_PATH)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_PATH));

        let session_ttl_secs = match lookup(ENV_SESSION_TTL_SECS) {
            Some(raw) => {
                let ttl: i64 = raw.trim().parse().map_err(|_| {
                    format!("{} must be a whole number of seconds", ENV_SESSION_TTL_SECS)
                })?;
                if ttl <= 0 {
                    return Err(format!("{} must be greater than 0", ENV_SESSION_TTL_SECS));
                }
                ttl
            }
            None => DEFAULT_SESSION_TTL_SECS,
        };

        Ok(Self {
            api_url,
            session_path,
            session_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config =
            Config::from_lookup(lookup(&[(ENV_API_URL, "https://shop.example.com/api/")])).unwrap();
        assert_eq!(config.api_url, "https://shop.example.com/api");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup(&[(ENV_API_URL, "ftp://x")])).is_err());
        assert!(Config::from_lookup(lookup(&[(ENV_SESSION_TTL_SECS, "soon")])).is_err());
        assert!(Config::from_lookup(lookup(&[(ENV_SESSION_TTL_SECS, "0")])).is_err());
    }

    #[test]
    fn custom_session_settings() {
        let config = Config::from_lookup(lookup(&[
            (ENV_SESSION_PATH, "/tmp/s.json"),
            (ENV_SESSION_TTL_SECS, "60"),
        ]))
        .unwrap();
        assert_eq!(config.session_path, PathBuf::from("/tmp/s.json"));
        assert_eq!(config.session_ttl_secs, 60);
    }
}
