use crate::errors::{AgentError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default location of the tool catalog
pub const DEFAULT_TOOLS_CONFIG_PATH: &str = "config/tools.json";

/// Default agent loop iteration budget
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Default Steam storefront base URL
pub const DEFAULT_STEAM_STORE_URL: &str = "https://store.steampowered.com";

/// Server configuration, sourced from the process environment
#[derive(Clone)]
pub struct ServerConfig {
    pub api_token: String,
    pub model: String,
    pub url: String,
    pub index_model_name: String,
    pub embeddings_path: PathBuf,
    pub steamdb_path: PathBuf,
    pub ollama_host: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_file: PathBuf,
    pub threads: usize,
    pub connection_limit: usize,
    pub request_timeout: Duration,

    pub tools_config_path: PathBuf,
    pub max_iterations: usize,
    pub embed_concurrency: usize,
    pub steam_store_url: String,
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let request_timeout: f64 = env.required("REQUEST_TIMEOUT")?;
        if !request_timeout.is_finite() || request_timeout <= 0.0 {
            return Err(AgentError::ConfigError(format!(
                "REQUEST_TIMEOUT must be a positive number of seconds, got {}",
                request_timeout
            )));
        }

        let config = Self {
            api_token: env.required("API_TOKEN")?,
            model: env.required("MODEL")?,
            url: env.required("URL")?,
            index_model_name: env.required("INDEX_MODEL_NAME")?,
            embeddings_path: env.required::<String>("EMBEDDINGS_PATH")?.into(),
            steamdb_path: env.required::<String>("STEAMDB_PATH")?.into(),
            ollama_host: env.required("OLLAMA_HOST")?,
            debug: env.required_bool("DEBUG")?,
            host: env.required("HOST")?,
            port: env.required("PORT")?,
            log_level: env.required("LOG_LEVEL")?,
            log_file: env.required::<String>("LOG_FILE")?.into(),
            threads: env.required("THREADS")?,
            connection_limit: env.required("CONNECTION_LIMIT")?,
            request_timeout: Duration::from_secs_f64(request_timeout),

            tools_config_path: env
                .optional::<String>("TOOLS_CONFIG_PATH")?
                .unwrap_or_else(|| DEFAULT_TOOLS_CONFIG_PATH.to_string())
                .into(),
            max_iterations: env
                .optional("MAX_ITERATIONS")?
                .unwrap_or(DEFAULT_MAX_ITERATIONS),
            embed_concurrency: env.optional("EMBED_CONCURRENCY")?.unwrap_or(1),
            steam_store_url: env
                .optional("STEAM_STORE_URL")?
                .unwrap_or_else(|| DEFAULT_STEAM_STORE_URL.to_string()),
        };

        if config.threads == 0 || config.connection_limit == 0 {
            return Err(AgentError::ConfigError(
                "THREADS and CONNECTION_LIMIT must be greater than zero".to_string(),
            ));
        }
        if config.max_iterations == 0 {
            return Err(AgentError::ConfigError(
                "MAX_ITERATIONS must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    /// Load a `.env` file into the process environment before reading it.
    ///
    /// An explicit path must exist; without one, a `.env` in the working
    /// directory is used when present.
    pub fn load_env_file(path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AgentError::ConfigError(format!(
                        "Can not find .env file provided by path {}",
                        path.display()
                    )));
                }
                dotenvy::from_path(path).map_err(|e| {
                    AgentError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
                })
            }
            None => {
                dotenvy::dotenv().ok();
                Ok(())
            }
        }
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_token", &"<redacted>")
            .field("model", &self.model)
            .field("url", &self.url)
            .field("index_model_name", &self.index_model_name)
            .field("embeddings_path", &self.embeddings_path)
            .field("steamdb_path", &self.steamdb_path)
            .field("ollama_host", &self.ollama_host)
            .field("debug", &self.debug)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .field("threads", &self.threads)
            .field("connection_limit", &self.connection_limit)
            .field("request_timeout", &self.request_timeout)
            .field("tools_config_path", &self.tools_config_path)
            .field("max_iterations", &self.max_iterations)
            .field("embed_concurrency", &self.embed_concurrency)
            .field("steam_store_url", &self.steam_store_url)
            .finish()
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn raw(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }

    fn required<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let value = self.raw(key).ok_or_else(|| {
            AgentError::ConfigError(format!("Required environment variable {} is not set", key))
        })?;
        convert(key, &value)
    }

    fn optional<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.raw(key).map(|value| convert(key, &value)).transpose()
    }

    fn required_bool(&self, key: &str) -> Result<bool> {
        let value = self.raw(key).ok_or_else(|| {
            AgentError::ConfigError(format!("Required environment variable {} is not set", key))
        })?;
        parse_bool(&value).ok_or_else(|| {
            AgentError::ConfigError(format!(
                "Failed to convert environment variable {} = {} to bool",
                key, value
            ))
        })
    }
}

fn convert<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        AgentError::ConfigError(format!(
            "Failed to convert environment variable {} = {}: {}",
            key, value, e
        ))
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
