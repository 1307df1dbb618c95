use std::path::Path;

use anyhow::Result;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Layered application configuration:
/// defaults -> YAML (if provided) -> env (`FACTURA__*`) -> CLI overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub invoicing: InvoicingConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 4000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite DSN; `mode=rwc` creates the file on first run.
    pub dsn: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite://factura.db?mode=rwc".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for session tokens. Override it in any real deployment.
    pub secret: String,
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    pub const DEFAULT_SECRET: &'static str = "change-this-secret";
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: Self::DEFAULT_SECRET.to_owned(),
            token_ttl_hours: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoicingConfig {
    pub number_prefix: String,
    pub default_currency: String,
}

impl Default for InvoicingConfig {
    fn default() -> Self {
        Self {
            number_prefix: "INV".to_owned(),
            default_currency: "USD".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

/// Origins allowed by CORS in addition to localhost, which is always
/// accepted for development convenience.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load the layered configuration. A missing YAML file is an error;
    /// absent sections fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            anyhow::ensure!(
                path.is_file(),
                "config file does not exist: {}",
                path.display()
            );
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment
            .merge(Env::prefixed("FACTURA__").split("__"))
            .extract()?;
        Ok(config)
    }

    pub fn apply_cli_overrides(&mut self, port: Option<u16>) {
        if let Some(port) = port {
            self.server.port = port;
        }
    }

    /// Effective configuration as pretty JSON for `--print-config`.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.auth.token_ttl_hours, 8);
        assert!(config.database.dsn.starts_with("sqlite://"));
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.invoicing.number_prefix, "INV");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn load_rejects_missing_file() {
        let missing = Path::new("/definitely/not/here.yaml");
        assert!(AppConfig::load(Some(missing)).is_err());
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        std::fs::write(
            file.path(),
            "server:\n  port: 9999\ninvoicing:\n  number_prefix: FAC\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.invoicing.number_prefix, "FAC");
        // Untouched sections keep their defaults.
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn cli_port_override_wins() {
        let mut config = AppConfig::default();
        config.apply_cli_overrides(Some(8080));
        assert_eq!(config.server.port, 8080);
    }
}
