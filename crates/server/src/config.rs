//! Configuration for the Bankfront server
//!
//! Layered as defaults, then an optional file, then `BANKFRONT__*`
//! environment variables (e.g. `BANKFRONT__SERVER__BIND_ADDR`).

use bankfront_core::logging::LogConfig;
use bankfront_http::{UpstreamConfig, middleware::GuardConfig};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "BANKFRONT";

/// Server settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub upstream: UpstreamSettings,
    pub auth: AuthConfig,
    pub guard: GuardConfig,
    pub log: LogConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP server
    pub bind_addr: SocketAddr,
    /// Directory of prebuilt pages served for non-API paths
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
    /// Enable permissive CORS
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: None,
            cors_enabled: false,
        }
    }
}

/// Upstream auth backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        let defaults = UpstreamConfig::default();
        Self {
            base_url: defaults.base_url,
            timeout_secs: defaults.timeout_seconds,
        }
    }
}

impl From<&UpstreamSettings> for UpstreamConfig {
    fn from(settings: &UpstreamSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            timeout_seconds: settings.timeout_secs,
        }
    }
}

/// Bearer token verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the upstream that issues tokens
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// Expected `iss` claim
    pub issuer: String,
    /// Lifetime of locally minted tokens
    pub expiration_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            issuer: "bankfront".to_string(),
            expiration_hours: 24,
        }
    }
}

impl Settings {
    /// Load settings, optionally from a config file
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the result does not
    /// deserialize
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("guard.protected_prefixes")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.server.bind_addr.port(), 3000);
        assert_eq!(settings.guard.login_path, "/login");
        assert_eq!(
            settings.guard.protected_prefixes,
            vec!["/dashboard".to_string(), "/admin".to_string()]
        );
        assert_eq!(settings.upstream.timeout_secs, 30);
        assert!(settings.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
bind_addr = "0.0.0.0:8443"
cors_enabled = true

[upstream]
base_url = "https://auth.bank.test"

[auth]
jwt_secret = "from-file"
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.server.bind_addr.port(), 8443);
        assert!(settings.server.cors_enabled);
        assert_eq!(settings.upstream.base_url, "https://auth.bank.test");
        assert_eq!(settings.upstream.timeout_secs, 30);
        assert_eq!(settings.auth.jwt_secret.as_deref(), Some("from-file"));
    }
}
