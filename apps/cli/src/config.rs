use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use shared::{domain::Operation, protocol::PROCESS_PATH};

pub const SETTINGS_FILE: &str = "pixform.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub process_path: String,
    pub default_operation: Operation,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            process_path: PROCESS_PATH.into(),
            default_operation: Operation::default(),
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    server_url: Option<String>,
    process_path: Option<String>,
    default_operation: Option<String>,
    log_filter: Option<String>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file if it exists, then environment variables.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let file_cfg: SettingsFile = toml::from_str(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?;
        apply(&mut settings, file_cfg)?;
    }

    let env_cfg = SettingsFile {
        server_url: env("APP__SERVER_URL").or_else(|| env("PIXFORM_SERVER_URL")),
        process_path: env("APP__PROCESS_PATH"),
        default_operation: env("APP__DEFAULT_OPERATION"),
        log_filter: env("APP__LOG_FILTER"),
    };
    apply(&mut settings, env_cfg)?;

    Ok(settings)
}

fn apply(settings: &mut Settings, overrides: SettingsFile) -> anyhow::Result<()> {
    if let Some(v) = overrides.server_url {
        settings.server_url = v.trim_end_matches('/').to_string();
    }
    if let Some(v) = overrides.process_path {
        settings.process_path = v;
    }
    if let Some(v) = overrides.default_operation {
        settings.default_operation = v.parse::<Operation>().context("invalid default_operation")?;
    }
    if let Some(v) = overrides.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}
