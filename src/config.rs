//! Crate configuration.
//!
//! The configuration is an explicit struct constructed once at process start
//! and threaded through constructors — there is no global lookup. Values come
//! from, in increasing priority: built-in defaults, a TOML file (`orrery.toml`
//! in the working directory, or the path given by `ORRERY_CONFIG`), and the
//! `ORRERY_DATABASE_URL` / `ORRERY_CACHE_DIR` environment variables.

use std::env;
use std::fs;

use camino::Utf8PathBuf;
use serde::Deserialize;

use crate::errors::OrreryError;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL for the orbital-element store.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: "sqlite://orrery.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory caching the downloaded MPCORB file. When unset, falls back
    /// to `$XDG_CACHE_HOME/orrery`, then `~/.cache/orrery`.
    pub asteroid_cache: Option<Utf8PathBuf>,
}

impl Config {
    /// Load the configuration from disk and environment.
    ///
    /// Return
    /// ----------
    /// * The merged [`Config`], or an [`OrreryError`] if a config file exists
    ///   but cannot be read or parsed. A missing file is not an error.
    pub fn load() -> Result<Self, OrreryError> {
        let path = env::var("ORRERY_CONFIG").unwrap_or_else(|_| "orrery.toml".to_string());

        let mut config = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(e.into()),
        };

        if let Ok(url) = env::var("ORRERY_DATABASE_URL") {
            config.database.url = url;
        }
        if let Ok(dir) = env::var("ORRERY_CACHE_DIR") {
            config.paths.asteroid_cache = Some(Utf8PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Directory where MPC data files are cached.
    pub fn cache_dir(&self) -> Utf8PathBuf {
        if let Some(dir) = &self.paths.asteroid_cache {
            return dir.clone();
        }
        let base = env::var("XDG_CACHE_HOME").unwrap_or_else(|_| {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            format!("{home}/.cache")
        });
        Utf8PathBuf::from(base).join("orrery")
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database.url, "sqlite://orrery.db");
        assert!(config.paths.asteroid_cache.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            [database]
            url = "sqlite:///var/lib/orrery/asteroids.db"

            [paths]
            asteroid_cache = "/var/cache/orrery"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.url, "sqlite:///var/lib/orrery/asteroids.db");
        assert_eq!(
            config.cache_dir(),
            Utf8PathBuf::from("/var/cache/orrery")
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[paths]\n").unwrap();
        assert_eq!(config.database.url, "sqlite://orrery.db");
    }
}
