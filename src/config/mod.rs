// Configuration module entry point
// Manages application configuration and the state wired at startup

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, ServerConfig, UiConfig};

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Layering: defaults, then the optional file, then `DASHR_*`
    /// environment variables (nested keys separated by `__`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("DASHR").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("ui.dev", false)?
            .set_default("ui.asset_path", "/assets")?
            .set_default("ui.public_dir", "public")?
            .set_default("ui.views_dir", "views")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .build()?;

        settings.try_deserialize()
    }

    /// Apply a `host:port` listen-address override
    ///
    /// A bare `:port` keeps the configured host.
    pub fn override_addr(&mut self, addr: &str) -> Result<(), String> {
        let Some((host, port)) = addr.rsplit_once(':') else {
            return Err(format!("invalid listen address {addr:?}, expected host:port"));
        };
        let port: u16 = port
            .parse()
            .map_err(|e| format!("invalid port in {addr:?}: {e}"))?;

        if !host.is_empty() {
            self.server.host = host.to_string();
        }
        self.server.port = port;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid listen address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.workers, None);
        assert!(!cfg.ui.dev);
        assert_eq!(cfg.ui.asset_path, "/assets");
        assert_eq!(cfg.ui.public_dir, "public");
        assert_eq!(cfg.ui.views_dir, "views");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.logging.access_log_file, None);
    }

    #[test]
    fn test_override_addr_full() {
        let mut cfg = Config::load_from("no-such-config-file").unwrap();
        cfg.override_addr("0.0.0.0:9000").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
    }

    #[test]
    fn test_override_addr_port_only_keeps_host() {
        let mut cfg = Config::load_from("no-such-config-file").unwrap();
        cfg.override_addr(":9000").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 9000);
    }

    #[test]
    fn test_override_addr_rejects_garbage() {
        let mut cfg = Config::load_from("no-such-config-file").unwrap();
        assert!(cfg.override_addr("9000").is_err());
        assert!(cfg.override_addr("host:notaport").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8080");
    }
}
