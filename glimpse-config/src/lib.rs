//! Loader for `glimpse.yaml` with environment overlays.
//!
//! Sources are merged in order: YAML files and inline snippets first, then
//! `GLIMPSE__`-prefixed environment variables (`GLIMPSE__SERVER__BIND`, ...),
//! so the environment always wins. `${VAR}` placeholders inside string values
//! are expanded afterwards, recursively up to a fixed depth.
use config::{Config, ConfigError, Environment, File, FileFormat};
use glimpse_common::observability::{LogConfig, LogFormat};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "GLIMPSE";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlimpseConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub web_base_url: String,
    pub api_base_url: String,
    pub app_id: String,
    pub user_agent: String,
    pub timeline_query_hash: String,
    pub page_size: u32,
    pub max_pages: usize,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            web_base_url: "https://www.instagram.com".into(),
            api_base_url: "https://i.instagram.com".into(),
            app_id: "936619743392459".into(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".into(),
            timeline_query_hash: "69cba40317214236af40e7efa697781d".into(),
            page_size: 50,
            max_pages: 20,
            timeout_secs: 15,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Cookies of a logged-in upstream session.
#[derive(Clone, Default, Deserialize)]
pub struct SessionConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    pub ds_user_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sessionid: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub csrftoken: String,
}

impl SessionConfig {
    pub fn is_complete(&self) -> bool {
        !self.ds_user_id.is_empty() && !self.sessionid.is_empty() && !self.csrftoken.is_empty()
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("ds_user_id", &self.ds_user_id)
            .field("sessionid", &"<redacted>")
            .field("csrftoken", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub dir: Option<PathBuf>,
    pub stderr: bool,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            dir: None,
            stderr: true,
            filter: "info".into(),
        }
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".into()
}

// Environment overrides arrive as strings or, once parsed, as numbers; numeric
// user IDs must still land in a `String`.
fn lenient_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
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

/// Builder over the `config` crate wiring.
pub struct GlimpseConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for GlimpseConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl GlimpseConfigLoader {
    /// ```
    /// use glimpse_config::GlimpseConfigLoader;
    ///
    /// let cfg = GlimpseConfigLoader::new()
    ///     .with_yaml_str("server:\n  bind: '127.0.0.1:9000'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.server.bind, "127.0.0.1:9000");
    /// assert_eq!(cfg.upstream.max_pages, 20);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format follows the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when missing, for env-only deployments.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge every source, expand `${VAR}` placeholders and deserialize.
    pub fn load(self) -> Result<GlimpseConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
