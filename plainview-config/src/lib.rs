//! Loader for proxy configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are attached; environment variables
//! prefixed with `PLAINVIEW__` always win (`PLAINVIEW__SERVER__PORT=9090`
//! overrides `server.port`). String values may reference other environment
//! variables with `${VAR}`; expansion is applied recursively after merging.
//!
//! Every field has a default, so an empty configuration is valid:
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8080
//! fetch:
//!   user_agent: "Mozilla/5.0 (compatible; plainview/0.1.0)"
//!   timeout_secs: 10
//!   connect_timeout_secs: 5
//! rewrite:
//!   link_quota: 3
//! logging:
//!   dir: ~/.local/share/plainview
//!   format: text
//!   stderr: true
//!   filter: info
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "PLAINVIEW";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlainviewConfig {
    pub server: ServerConfig,
    pub fetch: FetchConfig,
    pub rewrite: RewriteConfig,
    pub logging: LoggingConfig,
}

/// Inbound listener.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port`, ready for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Outbound page fetches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: plainview_common::default_user_agent(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Live links allowed between two structural boundaries.
    pub link_quota: usize,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self { link_quota: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<String>,
    /// `text` or `json`.
    pub format: String,
    pub stderr: bool,
    /// Used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: "text".into(),
            stderr: true,
            filter: "info".into(),
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct PlainviewConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for PlainviewConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainviewConfigLoader {
    /// Start with no files and `PLAINVIEW__` env overrides.
    ///
    /// ```
    /// use plainview_config::PlainviewConfigLoader;
    ///
    /// let config = PlainviewConfigLoader::new()
    ///     .with_yaml_str("rewrite:\n  link_quota: 5")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.rewrite.link_quota, 5);
    /// assert_eq!(config.fetch.timeout_secs, 10);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; the format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when missing, so deployments can
    /// rely purely on environment variables.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use plainview_config::PlainviewConfigLoader;
    ///
    /// let cfg = PlainviewConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// server:
    ///   host: "127.0.0.1"
    ///   port: 3000
    /// logging:
    ///   format: json
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.server.bind_addr(), "127.0.0.1:3000");
    /// assert_eq!(cfg.logging.format, "json");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// Environment overrides are attached last so they take precedence over
    /// every file, then `${VAR}` placeholders are expanded and the result is
    /// validated.
    pub fn load(self) -> Result<PlainviewConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: PlainviewConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;

        Ok(typed)
    }
}

impl PlainviewConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "fetch.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ConfigError::Message(
                "fetch.user_agent must not be empty".into(),
            ));
        }
        Ok(())
    }
}
