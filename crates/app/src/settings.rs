//! Application settings.
//!
//! Read from a TOML file (`config/settings.toml` unless `--config` says
//! otherwise) and overridden by `BUDGET_BOT__<SECTION>__<KEY>` environment
//! variables.

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "config/settings";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid time zone \"{0}\"")]
    TimeZone(String),
    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Parser)]
#[command(name = "budget_bot", version)]
struct Args {
    /// Settings file path (TOML, extension optional).
    #[arg(long, env = "BUDGET_BOT_CONFIG")]
    config: Option<String>,
    /// Override the log level.
    #[arg(long)]
    level: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    #[serde(default)]
    pub allowed_users: Vec<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageSettings {
    Yandex {
        token: String,
        #[serde(default = "default_yandex_root")]
        root: String,
        api_url: Option<String>,
    },
    Local {
        path: String,
    },
    Memory,
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings::Local {
            path: "data".to_string(),
        }
    }
}

impl StorageSettings {
    pub fn kind(&self) -> &'static str {
        match self {
            StorageSettings::Yandex { .. } => "yandex",
            StorageSettings::Local { .. } => "local",
            StorageSettings::Memory => "memory",
        }
    }
}

fn default_yandex_root() -> String {
    "disk:".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    pub namespace: Option<String>,
    pub per_user: bool,
    pub prefill_catalog: bool,
    pub currency: String,
    pub timezone: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            namespace: None,
            per_user: true,
            prefill_catalog: false,
            currency: "₽".to_string(),
            timezone: "Europe/Moscow".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub telegram: Telegram,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub ledger: LedgerSettings,
}

impl Settings {
    /// Loads settings from the command line, the settings file and the
    /// environment.
    pub fn new() -> Result<Self, SettingsError> {
        let args = Args::parse();
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings = Self::from_sources(path, Environment::with_prefix("BUDGET_BOT"))?;
        if let Some(level) = args.level {
            settings.app.level = level;
        }
        Ok(settings)
    }

    fn from_sources(path: &str, env: Environment) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                env.prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("telegram.allowed_users")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn timezone(&self) -> Result<chrono_tz::Tz, SettingsError> {
        self.ledger
            .timezone
            .parse()
            .map_err(|_| SettingsError::TimeZone(self.ledger.timezone.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    fn no_env() -> Environment {
        Environment::with_prefix("BUDGET_BOT").source(Some(HashMap::new()))
    }

    fn write_settings(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn minimal_file_uses_defaults() {
        let file = write_settings("[telegram]\ntoken = \"123:abc\"\n");
        let settings = Settings::from_sources(file.path().to_str().unwrap(), no_env()).unwrap();

        assert_eq!(settings.telegram.token, "123:abc");
        assert!(settings.telegram.allowed_users.is_empty());
        assert_eq!(settings.app.level, "info");
        assert!(matches!(settings.storage, StorageSettings::Local { ref path } if path == "data"));
        assert!(settings.ledger.per_user);
        assert_eq!(settings.timezone().unwrap(), chrono_tz::Europe::Moscow);
    }

    #[test]
    fn yandex_storage_section() {
        let file = write_settings(
            r#"
[telegram]
token = "123:abc"
allowed_users = [1, 2]

[storage]
kind = "yandex"
token = "oauth"

[ledger]
namespace = "budget-bot"
prefill_catalog = true
timezone = "Europe/Rome"
"#,
        );
        let settings = Settings::from_sources(file.path().to_str().unwrap(), no_env()).unwrap();

        assert_eq!(settings.telegram.allowed_users, vec![1, 2]);
        match &settings.storage {
            StorageSettings::Yandex {
                token,
                root,
                api_url,
            } => {
                assert_eq!(token, "oauth");
                assert_eq!(root, "disk:");
                assert!(api_url.is_none());
            }
            other => panic!("unexpected storage {other:?}"),
        }
        assert!(settings.ledger.prefill_catalog);
        assert_eq!(settings.ledger.namespace.as_deref(), Some("budget-bot"));
        assert_eq!(settings.timezone().unwrap(), chrono_tz::Europe::Rome);
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_settings("[telegram]\ntoken = \"from-file\"\n");
        let env = HashMap::from([
            ("BUDGET_BOT__TELEGRAM__TOKEN".to_string(), "from-env".to_string()),
            ("BUDGET_BOT__LEDGER__CURRENCY".to_string(), "€".to_string()),
        ]);
        let settings = Settings::from_sources(
            file.path().to_str().unwrap(),
            Environment::with_prefix("BUDGET_BOT").source(Some(env)),
        )
        .unwrap();

        assert_eq!(settings.telegram.token, "from-env");
        assert_eq!(settings.ledger.currency, "€");
    }

    #[test]
    fn bad_time_zone_is_reported() {
        let file = write_settings("[telegram]\ntoken = \"t\"\n[ledger]\ntimezone = \"Mars/Olympus\"\n");
        let settings = Settings::from_sources(file.path().to_str().unwrap(), no_env()).unwrap();
        assert!(matches!(settings.timezone(), Err(SettingsError::TimeZone(_))));
    }
}
