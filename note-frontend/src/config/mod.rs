use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub policy: PolicySettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub session_secret: Secret<String>,
}

#[derive(Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the note backend, e.g. http://localhost:8000.
    pub url: String,
}

#[derive(Deserialize, Clone, Default)]
pub struct PolicySettings {
    /// Single administrative address honoured when the backend issues
    /// tokens without a role claim. Role-claim admins need no entry here.
    #[serde(default)]
    pub admin_email: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    /// OTLP collector endpoint; span export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Directory of this crate on disk. Works both from the workspace root
/// and from inside note-frontend, so config and static assets resolve
/// the same way regardless of where the binary was launched.
pub fn crate_dir() -> std::path::PathBuf {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    if base_path.ends_with("note-frontend") {
        base_path
    } else {
        base_path.join("note-frontend")
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let configuration_directory = crate_dir().join("config");

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
