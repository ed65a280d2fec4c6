use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    #[serde(default)]
    pub artifacts: ArtifactSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3000 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Expected value of the `Authorisation` request header
    pub api_key: String,
}

/// Request limits per client address; a zero disables that window
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_per_second")]
    pub per_second: u32,
    #[serde(default = "default_per_hour")]
    pub per_hour: u32,
    #[serde(default = "default_per_day")]
    pub per_day: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            per_second: default_per_second(),
            per_hour: default_per_hour(),
            per_day: default_per_day(),
        }
    }
}

fn default_per_second() -> u32 { 1 }
// The prediction route carries only its per-second limit; 0 disables a window
fn default_per_hour() -> u32 { 0 }
fn default_per_day() -> u32 { 0 }

/// Locations of the three trained artifacts
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSettings {
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_transformer_path")]
    pub transformer_path: String,
    #[serde(default = "default_scaling_path")]
    pub scaling_path: String,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            transformer_path: default_transformer_path(),
            scaling_path: default_scaling_path(),
        }
    }
}

fn default_model_path() -> String { "operations_models/model.json".to_string() }
fn default_transformer_path() -> String { "operations_models/poly_transformer.json".to_string() }
fn default_scaling_path() -> String { "operations_models/scaling_params.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_url")]
    pub url: String,
    pub max_connections: Option<u32>,
    #[serde(default = "default_true")]
    pub save_inputs: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: None,
            save_inputs: true,
        }
    }
}

fn default_database_url() -> String { "sqlite://saved_inputs.db".to_string() }
fn default_true() -> bool { true }

/// Output format of the stdout log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Plain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Optional log file, written alongside stdout
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

fn default_log_level() -> String { "info".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with EXAM_SCORE__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., EXAM_SCORE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("EXAM_SCORE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("EXAM_SCORE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional unprefixed variables on top of the layered config
///
/// `EXAM_SCORE_API_KEY` sets `auth.api_key`, `DATABASE_URL` sets `database.url`.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_key) = env::var("EXAM_SCORE_API_KEY") {
        builder = builder.set_override("auth.api_key", api_key)?;
    }
    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_rate_limits() {
        let limits = RateLimitSettings::default();
        assert_eq!(limits.per_second, 1);
        assert_eq!(limits.per_hour, 0);
        assert_eq!(limits.per_day, 0);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Json);
        assert!(logging.file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[auth]
api_key = "test-key"

[artifacts]
model_path = "models/m.json"
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.auth.api_key, "test-key");
        assert_eq!(settings.artifacts.model_path, "models/m.json");
        assert_eq!(settings.artifacts.scaling_path, "operations_models/scaling_params.json");
        assert!(settings.database.save_inputs);
    }

    #[test]
    fn test_log_format_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[auth]\napi_key = \"k\"\n\n[logging]\nformat = \"pretty\"").unwrap();
        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_unknown_log_format_fails() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[auth]\napi_key = \"k\"\n\n[logging]\nformat = \"xml\"").unwrap();
        assert!(Settings::load_from(file.path()).is_err());
    }

    #[test]
    fn test_missing_api_key_fails() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 8080").unwrap();
        assert!(Settings::load_from(file.path()).is_err());
    }
}
