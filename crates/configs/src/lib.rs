use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub hypermedia: HypermediaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Which `ProductRepository` implementation the server wires in.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(anyhow!("unknown storage backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HypermediaConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Prefix for generated hrefs, e.g. `http://localhost:8080`. Empty means relative links.
    #[serde(default)]
    pub base_url: String,
}

impl Default for HypermediaConfig {
    fn default() -> Self { Self { enabled: true, base_url: String::new() } }
}

fn default_true() -> bool { true }

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(anyhow!("expected true/false, got {other:?}")),
    }
}

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read config file {path}"))?;
    load_from_str(&content).with_context(|| format!("failed to parse config file {path}"))
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// `CONFIG_PATH` (default `config.toml`) first, process environment when the file is absent.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path(), |key: &str| std::env::var(key).ok())
    }

    /// 文件存在就必须能解析；只有文件不存在时才退回环境变量
    pub fn load_or_env_from(path: &str, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => load_from_str(&content).with_context(|| format!("failed to parse config file {path}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::from_vars(var)?,
            Err(e) => return Err(anyhow::Error::new(e).context(format!("failed to read config file {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a config from `SERVER_HOST`, `SERVER_PORT`, `TOKIO_WORKER_THREADS`, `DATABASE_URL`,
    /// `STORAGE_BACKEND`, `HYPERMEDIA_ENABLED` and `HYPERMEDIA_BASE_URL`.
    /// A variable that is set but unparsable is an error.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(host) = var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = var("SERVER_PORT") {
            cfg.server.port = port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("SERVER_PORT is not a valid port: {port:?}"))?;
        }
        if let Some(threads) = var("TOKIO_WORKER_THREADS") {
            let n: usize = threads
                .trim()
                .parse()
                .with_context(|| format!("TOKIO_WORKER_THREADS is not a number: {threads:?}"))?;
            cfg.server.worker_threads = Some(n);
        }
        if let Some(url) = var("DATABASE_URL") {
            cfg.database.url = url;
        }
        if let Some(backend) = var("STORAGE_BACKEND") {
            cfg.storage.backend = backend.parse::<StorageBackend>().context("STORAGE_BACKEND")?;
        }
        if let Some(enabled) = var("HYPERMEDIA_ENABLED") {
            cfg.hypermedia.enabled = parse_flag(&enabled).context("HYPERMEDIA_ENABLED")?;
        }
        if let Some(base) = var("HYPERMEDIA_BASE_URL") {
            cfg.hypermedia.base_url = base;
        }
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        self.hypermedia.normalize();
        // 内存存储不需要数据库
        if self.storage.backend == StorageBackend::Postgres {
            // 归一化 database（支持从环境变量填充 URL）
            self.database.normalize_from_env();
            self.database.validate()?;
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl HypermediaConfig {
    fn normalize(&mut self) {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        self.base_url = trimmed.to_string();
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供 URL，则尝试从环境变量填充
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn malformed_file_is_an_error_not_a_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = \"9000\"\n").unwrap();

        let env = vars(&[("STORAGE_BACKEND", "memory")]);
        let err = AppConfig::load_or_env_from(path.to_str().unwrap(), env).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }

    #[test]
    fn unknown_backend_in_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nbackend = \"memroy\"\n").unwrap();
        assert!(AppConfig::load_or_env_from(path.to_str().unwrap(), vars(&[])).is_err());
    }

    #[test]
    fn existing_file_wins_over_environment() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9000\n[storage]\nbackend = \"memory\"\n").unwrap();

        let cfg = AppConfig::load_or_env_from(path.to_str().unwrap(), vars(&[("SERVER_PORT", "7000")])).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn missing_file_falls_back_to_environment() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let env = vars(&[
            ("SERVER_PORT", "7000"),
            ("TOKIO_WORKER_THREADS", "2"),
            ("STORAGE_BACKEND", "memory"),
            ("HYPERMEDIA_ENABLED", "false"),
            ("HYPERMEDIA_BASE_URL", "http://api.local/"),
        ]);
        let cfg = AppConfig::load_or_env_from(path.to_str().unwrap(), env).unwrap();
        assert_eq!(cfg.server.port, 7000);
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert!(!cfg.hypermedia.enabled);
        assert_eq!(cfg.hypermedia.base_url, "http://api.local");
    }

    #[test]
    fn unparsable_environment_values_are_errors() {
        assert!(AppConfig::from_vars(vars(&[("SERVER_PORT", "eighty")])).is_err());
        assert!(AppConfig::from_vars(vars(&[("STORAGE_BACKEND", "sqlite")])).is_err());
        assert!(AppConfig::from_vars(vars(&[("HYPERMEDIA_ENABLED", "maybe")])).is_err());
        assert!(AppConfig::from_vars(vars(&[("TOKIO_WORKER_THREADS", "-1")])).is_err());
        assert!(AppConfig::from_vars(vars(&[])).is_ok());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = load_from_str("").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.backend, StorageBackend::Postgres);
        assert!(cfg.hypermedia.enabled);
        assert_eq!(cfg.database.max_connections, 10);
    }

    #[test]
    fn memory_backend_skips_database_validation() {
        let mut cfg = load_from_str(
            r#"
            [server]
            host = ""
            port = 9000
            worker_threads = 0

            [storage]
            backend = "memory"

            [hypermedia]
            enabled = false
            base_url = "http://localhost:9000/"
            "#,
        )
        .unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert!(!cfg.hypermedia.enabled);
        assert_eq!(cfg.hypermedia.base_url, "http://localhost:9000");
    }

    #[test]
    fn rejects_zero_port() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        cfg.storage.backend = StorageBackend::Memory;
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn rejects_non_postgres_url() {
        let db = DatabaseConfig { url: "mysql://localhost/db".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_min_above_max_connections() {
        let db = DatabaseConfig {
            url: "postgres://localhost/db".into(),
            max_connections: 1,
            min_connections: 5,
            ..DatabaseConfig::default()
        };
        assert!(db.validate().is_err());
    }

    #[test]
    fn parses_storage_backend_names() {
        assert_eq!("Memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("postgresql".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }
}
