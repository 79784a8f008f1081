use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP/JSON transport listener.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 9000, worker_threads: Some(4) }
    }
}

/// RPC transport listener.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 50054 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

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
    /// Load `config.toml` (or `CONFIG_PATH`); fall back to env vars only when the file is absent.
    /// A file that exists but fails to read or parse is an error.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => Self::from_env(),
            Err(e) => return Err(e.context("failed to load config file")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `SERVER_HOST`, `SERVER_PORT`, `RPC_HOST`, `RPC_PORT`,
    /// `TOKIO_WORKER_THREADS` and `LOG_FORMAT`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") { cfg.server.host = host; }
        if let Some(port) = env_parse::<u16>("SERVER_PORT") { cfg.server.port = port; }
        if let Some(w) = env_parse::<usize>("TOKIO_WORKER_THREADS") { cfg.server.worker_threads = Some(w); }
        if let Ok(host) = std::env::var("RPC_HOST") { cfg.rpc.host = host; }
        if let Some(port) = env_parse::<u16>("RPC_PORT") { cfg.rpc.port = port; }
        if let Ok(fmt) = std::env::var("LOG_FORMAT") {
            if fmt.eq_ignore_ascii_case("json") { cfg.logging.format = LogFormat::Json; }
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        self.rpc.normalize()?;
        if self.server.bind_addr() == self.rpc.bind_addr() {
            return Err(anyhow!("server and rpc must listen on different addresses ({})", self.server.bind_addr()));
        }
        Ok(())
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String { format!("{}:{}", self.host, self.port) }
}

impl RpcConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("rpc.port must be in 1..=65535"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String { format!("{}:{}", self.host, self.port) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[test]
    fn empty_file_uses_defaults() {
        let mut cfg = parse("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.rpc.bind_addr(), "127.0.0.1:50054");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.logging.format, LogFormat::Compact);
    }

    #[test]
    fn parses_all_sections() {
        let mut cfg = parse(
            r#"
            [server]
            host = ""
            port = 8080
            worker_threads = 0

            [rpc]
            host = "0.0.0.0"
            port = 9090

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.rpc.bind_addr(), "0.0.0.0:9090");
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn rejects_zero_port_and_shared_address() {
        let mut cfg = parse("[server]\nhost = \"127.0.0.1\"\nport = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = parse("[server]\nhost = \"127.0.0.1\"\nport = 7000\n[rpc]\nhost = \"127.0.0.1\"\nport = 7000\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn unknown_log_format_is_an_error() {
        assert!(parse("[logging]\nformat = \"xml\"\n").is_err());
    }

    // tests below mutate process env
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: [&str; 7] = [
        "CONFIG_PATH", "SERVER_HOST", "SERVER_PORT", "RPC_HOST", "RPC_PORT",
        "TOKIO_WORKER_THREADS", "LOG_FORMAT",
    ];

    fn clear_env() {
        for key in ENV_KEYS { std::env::remove_var(key); }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("adboard-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn missing_file_falls_back_to_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        std::env::set_var("CONFIG_PATH", temp_path("does-not-exist"));
        std::env::set_var("SERVER_HOST", "0.0.0.0");
        std::env::set_var("SERVER_PORT", "8123");
        std::env::set_var("RPC_HOST", "127.0.0.2");
        std::env::set_var("RPC_PORT", "6001");
        std::env::set_var("TOKIO_WORKER_THREADS", "2");
        std::env::set_var("LOG_FORMAT", "JSON");

        let cfg = AppConfig::load_and_validate();
        clear_env();
        let cfg = cfg.unwrap();
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:8123");
        assert_eq!(cfg.rpc.bind_addr(), "127.0.0.2:6001");
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn missing_file_without_env_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        std::env::set_var("CONFIG_PATH", temp_path("absent"));

        let cfg = AppConfig::load_and_validate();
        clear_env();
        let cfg = cfg.unwrap();
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.rpc.bind_addr(), "127.0.0.1:50054");
        assert_eq!(cfg.logging.format, LogFormat::Compact);
    }

    #[test]
    fn malformed_file_is_an_error_not_a_fallback() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let path = temp_path("malformed");
        std::fs::write(&path, "[server]\nhost = \"127.0.0.1\"\nport = 8123\n[logging]\nformat = \"xml\"\n").unwrap();
        std::env::set_var("CONFIG_PATH", &path);

        let result = AppConfig::load_and_validate();
        clear_env();
        let _ = std::fs::remove_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn file_wins_over_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let path = temp_path("valid");
        std::fs::write(&path, "[server]\nhost = \"127.0.0.1\"\nport = 8123\n").unwrap();
        std::env::set_var("CONFIG_PATH", &path);
        std::env::set_var("SERVER_PORT", "9999");

        let cfg = AppConfig::load_and_validate();
        clear_env();
        let _ = std::fs::remove_file(&path);
        assert_eq!(cfg.unwrap().server.bind_addr(), "127.0.0.1:8123");
    }
}
