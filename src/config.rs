use std::{collections::HashMap, path::PathBuf};

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub struct BomvetConfig {
    pub cache_dir: Option<PathBuf>,
    pub http_timeout: Option<u64>,
}

impl BomvetConfig {
    pub fn load() -> anyhow::Result<Self> {
        let raw_config = RawConfig::load(None)?;

        Ok(Self {
            cache_dir: raw_config.cache.dir,
            http_timeout: raw_config.http.timeout,
        })
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    cache: CacheConfig,
    #[serde(default)]
    http: HttpConfig,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct CacheConfig {
    dir: Option<PathBuf>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct HttpConfig {
    /// Request timeout in seconds.
    timeout: Option<u64>,
}

impl RawConfig {
    fn load(env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                Environment::with_prefix("BOMVET")
                    .separator("_")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn load_empty() {
        let env = HashMap::from([]);
        let config = RawConfig::load(Some(env)).unwrap();
        assert_eq!(
            config,
            RawConfig {
                cache: CacheConfig { dir: None },
                http: HttpConfig { timeout: None }
            }
        )
    }

    #[test]
    fn load_environment() {
        let env = HashMap::from([
            ("BOMVET_CACHE_DIR".to_owned(), "/cache".to_owned()),
            ("BOMVET_HTTP_TIMEOUT".to_owned(), "30".to_owned()),
        ]);
        let config = RawConfig::load(Some(env)).unwrap();
        assert_eq!(
            config,
            RawConfig {
                cache: CacheConfig {
                    dir: Some("/cache".into())
                },
                http: HttpConfig { timeout: Some(30) }
            }
        )
    }
}
