// Configuration module entry point
// Layered configuration (defaults, optional file, environment) and shared state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, LoggingConfig, MimeConfig, ServerConfig};

/// Config file looked up when no path is given (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "wasm-serve";

/// Prefix for environment overrides, e.g. `WASM_SERVE__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "WASM_SERVE";

pub const DEFAULT_PORT: u16 = 8080;

impl Config {
    /// Load configuration from `wasm-serve.{toml,json,yaml,...}` if present
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (extension optional)
    ///
    /// The file is not required; every key has a default.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", i64::from(DEFAULT_PORT))?
        .set_default("server.root", ".")?
        .set_default("server.keep_alive", true)?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "common")
}

/// Defaults only, serving `root` (used by tests)
#[cfg(test)]
pub fn test_config(root: &std::path::Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            root: root.to_string_lossy().into_owned(),
            workers: None,
            keep_alive: true,
        },
        logging: LoggingConfig {
            access_log: false,
            access_log_format: "common".to_string(),
            access_log_file: None,
            error_log_file: None,
        },
        mime: MimeConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::load_from("definitely-missing-wasm-serve-config").unwrap();
        assert_eq!(cfg.server.root, ".");
        assert_eq!(cfg.logging.access_log_format, "common");
        assert!(cfg.mime.overrides.is_empty());
        assert!(cfg.logging.access_log_file.is_none());
    }

    #[test]
    fn test_file_overrides() {
        let dir = std::env::temp_dir().join(format!("wasm-serve-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("serve.toml");
        std::fs::write(
            &file,
            "[server]\nport = 9001\nroot = \"dist\"\n\n[mime.overrides]\nmap = \"application/json\"\n",
        )
        .unwrap();

        let cfg = Config::load_from(file.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.server.root, "dist");
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(
            cfg.mime.overrides.get("map").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 9001);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_host() {
        let mut cfg = test_config(std::path::Path::new("."));
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
