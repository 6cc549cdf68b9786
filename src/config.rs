use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{LabelMatching, QualityThresholds, ScoringWeights};
use crate::services::HostedTables;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub hosted: HostedSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub notify: NotifySettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    /// Gated document slug -> download URL
    #[serde(default)]
    pub documents: HashMap<String, String>,
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
    /// Allowed CORS origins; empty means permissive
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Which record store backs the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Hosted,
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostedSettings {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub tables: TableSettings,
}

impl Default for HostedSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            tables: TableSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_gp_table")]
    pub gp_registrations: String,
    #[serde(default = "default_lp_table")]
    pub lp_registrations: String,
    #[serde(default = "default_contact_table")]
    pub contact_messages: String,
    #[serde(default = "default_document_table")]
    pub document_requests: String,
    #[serde(default = "default_message_table")]
    pub investor_messages: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            gp_registrations: default_gp_table(),
            lp_registrations: default_lp_table(),
            contact_messages: default_contact_table(),
            document_requests: default_document_table(),
            investor_messages: default_message_table(),
        }
    }
}

impl From<&TableSettings> for HostedTables {
    fn from(tables: &TableSettings) -> Self {
        Self {
            gp_registrations: tables.gp_registrations.clone(),
            lp_registrations: tables.lp_registrations.clone(),
            contact_messages: tables.contact_messages.clone(),
            document_requests: tables.document_requests.clone(),
            investor_messages: tables.investor_messages.clone(),
        }
    }
}

fn default_gp_table() -> String { "gp_registrations".to_string() }
fn default_lp_table() -> String { "lp_registrations".to_string() }
fn default_contact_table() -> String { "contact_messages".to_string() }
fn default_document_table() -> String { "document_requests".to_string() }
fn default_message_table() -> String { "investor_messages".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HS256 secret shared with the hosted auth provider
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_audience")]
    pub audience: Option<String>,
    /// Emails treated as admins even without an admin role claim
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            audience: default_audience(),
            admin_emails: Vec::new(),
        }
    }
}

fn default_audience() -> Option<String> { Some("authenticated".to_string()) }

#[derive(Debug, Clone, Deserialize)]
pub struct NotifySettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_email_function")]
    pub function: String,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            function: default_email_function(),
        }
    }
}

fn default_email_function() -> String { "send-email".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl() -> u64 { 300 }
fn default_cache_capacity() -> u64 { 16 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub bands: BandsConfig,
    #[serde(default)]
    pub label_matching: LabelMatching,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_strategy_weight")]
    pub strategy_overlap: u32,
    #[serde(default = "default_institutional_weight")]
    pub institutional_large_aum: u32,
    #[serde(default = "default_family_office_weight")]
    pub family_office_small_aum: u32,
    #[serde(default = "default_fundraising_weight")]
    pub active_fundraising: u32,
    #[serde(default = "default_jurisdiction_weight")]
    pub jurisdiction: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            strategy_overlap: default_strategy_weight(),
            institutional_large_aum: default_institutional_weight(),
            family_office_small_aum: default_family_office_weight(),
            active_fundraising: default_fundraising_weight(),
            jurisdiction: default_jurisdiction_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            strategy_overlap: config.strategy_overlap,
            institutional_large_aum: config.institutional_large_aum,
            family_office_small_aum: config.family_office_small_aum,
            active_fundraising: config.active_fundraising,
            jurisdiction: config.jurisdiction,
        }
    }
}

fn default_strategy_weight() -> u32 { 30 }
fn default_institutional_weight() -> u32 { 25 }
fn default_family_office_weight() -> u32 { 20 }
fn default_fundraising_weight() -> u32 { 15 }
fn default_jurisdiction_weight() -> u32 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct BandsConfig {
    #[serde(default = "default_excellent")]
    pub excellent: u32,
    #[serde(default = "default_very_good")]
    pub very_good: u32,
    #[serde(default = "default_good")]
    pub good: u32,
}

impl Default for BandsConfig {
    fn default() -> Self {
        Self {
            excellent: default_excellent(),
            very_good: default_very_good(),
            good: default_good(),
        }
    }
}

impl From<&BandsConfig> for QualityThresholds {
    fn from(config: &BandsConfig) -> Self {
        Self {
            excellent: config.excellent,
            very_good: config.very_good,
            good: config.good,
        }
    }
}

fn default_excellent() -> u32 { 70 }
fn default_very_good() -> u32 { 50 }
fn default_good() -> u32 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ADVISORY__)
    /// 5. Well-known variables such as DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ADVISORY__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("ADVISORY")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.admin_emails")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }

    pub fn quality_thresholds(&self) -> QualityThresholds {
        QualityThresholds::from(&self.scoring.bands)
    }
}

/// Apply the conventional unprefixed variables deployment platforms set
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("DATABASE_URL", "database.url"),
        ("HOSTED_ENDPOINT", "hosted.endpoint"),
        ("HOSTED_API_KEY", "hosted.api_key"),
        ("AUTH_JWT_SECRET", "auth.jwt_secret"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights, ScoringWeights::default());
        assert_eq!(weights.strategy_overlap, 30);
        assert_eq!(weights.jurisdiction, 10);
    }

    #[test]
    fn test_default_bands() {
        let thresholds = QualityThresholds::from(&BandsConfig::default());
        assert_eq!(thresholds, QualityThresholds::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "compact");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::builder()
            .add_source(File::from_str(
                r#"
                [storage]
                backend = "memory"

                [scoring]
                label_matching = "taxonomy"

                [scoring.weights]
                jurisdiction = 5

                [documents]
                structured-products-primer = "https://cdn.example.com/primer.pdf"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let settings: Settings = config.try_deserialize().unwrap();

        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.scoring.label_matching, LabelMatching::Taxonomy);
        assert_eq!(settings.scoring_weights().jurisdiction, 5);
        assert_eq!(settings.scoring_weights().strategy_overlap, 30);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.documents.len(), 1);
    }
}
