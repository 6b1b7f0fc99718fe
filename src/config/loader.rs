//! Configuration loading from the environment, TOML files and explicit pairs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{ServerConfig, SERVER_KEYS};
use crate::config::validation::validate_config;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid server settings: {0}")]
    Settings(#[source] toml::de::Error),

    #[error("cert file and key file must both be supplied or both be omitted")]
    BadCertConfig,
}

/// Rewrites a configuration key before lookup.
///
/// Lets the same component be mounted several times in one process, each
/// instance reading its own disjoint set of keys.
pub trait TagModifier: Send + Sync {
    fn modify(&self, key: &str) -> String;
}

/// Prefixes every key with `<prefix>_`.
#[derive(Debug, Clone)]
pub struct EnvTagPrefixer {
    prefix: String,
}

impl EnvTagPrefixer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_lowercase(),
        }
    }
}

impl TagModifier for EnvTagPrefixer {
    fn modify(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key)
    }
}

/// A flat source of configuration values keyed by lowercase names.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    /// An empty source; every setting falls back to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the process environment. Variable names are lowercased.
    pub fn from_env() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Build a source from explicit key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_lowercase(), v.into()))
            .collect();
        Self { values }
    }

    /// Parse TOML content. Nested tables flatten into `<table>_<key>`, so
    /// `[api] http_port = 80` reads the same as `api_http_port = 80`.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = content.parse()?;
        let mut values = HashMap::new();
        flatten_table(None, &table, &mut values);
        Ok(Self { values })
    }

    /// Load and parse a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Layer `other` on top of `self`; keys present in both take `other`'s value.
    pub fn merge(mut self, other: Config) -> Self {
        self.values.extend(other.values);
        self
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Load and validate the server settings, applying `modifiers` to every key.
    ///
    /// Each recognized key is looked up under its modified name and handed to
    /// serde under its canonical one; unset keys take their defaults.
    pub fn load_server_config(
        &self,
        modifiers: &[Box<dyn TagModifier>],
    ) -> Result<ServerConfig, ConfigError> {
        let mut table = toml::Table::new();
        for key in SERVER_KEYS {
            let modified = modifiers
                .iter()
                .fold(key.to_string(), |key, modifier| modifier.modify(&key));
            if let Some(value) = self.get(&modified) {
                table.insert(key.to_string(), scalar(value.trim()));
            }
        }

        let config: ServerConfig = toml::Value::Table(table)
            .try_into()
            .map_err(ConfigError::Settings)?;

        validate_config(&config)?;
        Ok(config)
    }
}

fn flatten_table(prefix: Option<&str>, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let key = match prefix {
            Some(prefix) => format!("{}_{}", prefix, key.to_lowercase()),
            None => key.to_lowercase(),
        };
        match value {
            toml::Value::Table(nested) => flatten_table(Some(key.as_str()), nested, out),
            toml::Value::String(s) => {
                out.insert(key, s.clone());
            }
            toml::Value::Array(_) => {
                tracing::warn!(key = %key, "Ignoring array value in config file");
            }
            other => {
                out.insert(key, other.to_string());
            }
        }
    }
}

/// Integers stay integers; everything else is a string.
fn scalar(value: &str) -> toml::Value {
    match value.parse::<i64>() {
        Ok(n) => toml::Value::Integer(n),
        Err(_) => toml::Value::String(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults_when_empty() {
        let config = Config::new().load_server_config(&[]).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn reads_all_keys() {
        let source = Config::from_pairs([
            ("HTTP_HOST", "127.0.0.1"),
            ("http_port", "0"),
            ("http_cert_file", "cert.pem"),
            ("http_key_file", "key.pem"),
            ("http_shutdown_timeout", "250ms"),
        ]);

        let config = source.load_server_config(&[]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 0);
        assert_eq!(config.cert_file, "cert.pem");
        assert_eq!(config.key_file, "key.pem");
        assert_eq!(config.shutdown_timeout, Duration::from_millis(250));
    }

    #[test]
    fn timeout_requires_a_unit() {
        let source = Config::from_pairs([("http_shutdown_timeout", "3")]);
        assert!(matches!(
            source.load_server_config(&[]),
            Err(ConfigError::Settings(_))
        ));

        let source = Config::from_pairs([("http_shutdown_timeout", "0s")]);
        let config = source.load_server_config(&[]).unwrap();
        assert_eq!(config.shutdown_timeout, Duration::ZERO);
    }

    #[test]
    fn prefixer_reads_namespaced_keys() {
        let source = Config::from_pairs([("http_port", "1"), ("prefix_http_port", "1234")]);
        let modifiers: Vec<Box<dyn TagModifier>> = vec![Box::new(EnvTagPrefixer::new("prefix"))];

        let config = source.load_server_config(&modifiers).unwrap();
        assert_eq!(config.port, 1234);
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let source = Config::from_pairs([("http_port", "http")]);
        assert!(matches!(
            source.load_server_config(&[]),
            Err(ConfigError::Settings(_))
        ));
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let source = Config::from_pairs([("path", "/usr/bin"), ("http_port", "8080")]);
        let config = source.load_server_config(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "");
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let source = Config::from_pairs([("http_port", "70000")]);
        assert!(matches!(
            source.load_server_config(&[]),
            Err(ConfigError::Settings(_))
        ));
    }

    #[test]
    fn half_tls_pair_fails_load() {
        let source = Config::from_pairs([("http_cert_file", "cert.pem")]);
        assert!(matches!(
            source.load_server_config(&[]),
            Err(ConfigError::BadCertConfig)
        ));
    }

    #[test]
    fn toml_tables_flatten_into_prefixed_keys() {
        let source = Config::from_toml_str(
            r#"
            http_port = 8080

            [probe]
            http_port = 9090
            http_shutdown_timeout = "1s"
            "#,
        )
        .unwrap();

        assert_eq!(source.get("http_port"), Some("8080"));
        assert_eq!(source.get("probe_http_port"), Some("9090"));

        let modifiers: Vec<Box<dyn TagModifier>> = vec![Box::new(EnvTagPrefixer::new("probe"))];
        let config = source.load_server_config(&modifiers).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(1));
    }

    #[test]
    fn printed_settings_load_back() {
        let source = Config::from_pairs([("http_port", "8443"), ("http_shutdown_timeout", "250ms")]);
        let config = source.load_server_config(&[]).unwrap();

        let printed = toml::to_string_pretty(&config).unwrap();
        let reloaded = Config::from_toml_str(&printed)
            .unwrap()
            .load_server_config(&[])
            .unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn merge_prefers_later_source() {
        let file = Config::from_pairs([("http_port", "80"), ("http_host", "example.com")]);
        let env = Config::from_pairs([("http_port", "81")]);

        let merged = file.merge(env);
        assert_eq!(merged.get("http_port"), Some("81"));
        assert_eq!(merged.get("http_host"), Some("example.com"));
    }
}
