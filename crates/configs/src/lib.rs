use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Spaces per indentation level in the persisted file.
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Write to a sibling temp file and rename over the target.
    #[serde(default)]
    pub atomic_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file(), indent: default_indent(), atomic_writes: false }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("unknown log format '{other}' (expected compact|json)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 5000 }
fn default_data_file() -> String { "data.json".into() }
fn default_indent() -> usize { 4 }

const MAX_INDENT: usize = 16;

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) when present, fall back to
    /// defaults otherwise, then apply env overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) => match e.downcast_ref::<std::io::Error>() {
                Some(io) if io.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
                _ => return Err(e),
            },
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay values from the environment. The lookup is injected so tests
    /// don't have to mutate process-wide env vars.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow!("SERVER_PORT must be a port number, got '{port}'"))?;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS") {
            self.server.worker_threads = w.trim().parse().ok();
        }
        if let Some(path) = lookup("DATA_FILE") {
            self.storage.data_file = path;
        }
        if let Some(indent) = lookup("DATA_INDENT") {
            self.storage.indent = indent
                .trim()
                .parse()
                .map_err(|_| anyhow!("DATA_INDENT must be a non-negative integer, got '{indent}'"))?;
        }
        if let Some(flag) = lookup("ATOMIC_WRITES") {
            self.storage.atomic_writes = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(fmt) = lookup("LOG_FORMAT") {
            self.logging.format = fmt.parse()?;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_file.trim().is_empty() {
            return Err(anyhow!("storage.data_file must not be empty"));
        }
        if self.indent > MAX_INDENT {
            return Err(anyhow!("storage.indent must be <= {MAX_INDENT}"));
        }
        Ok(())
    }
}
