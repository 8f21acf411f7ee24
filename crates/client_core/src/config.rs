use std::{collections::HashMap, fs, time::Duration};

use shared::domain::{Axis, SimulationParameters};

pub const SETTINGS_FILE: &str = "viewer.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerSettings {
    pub server_url: String,
    /// Zero disables the timeout.
    pub request_timeout_secs: u64,
    pub default_parameters: SimulationParameters,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            request_timeout_secs: 30,
            default_parameters: SimulationParameters::default(),
        }
    }
}

impl ViewerSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

/// Defaults, then `viewer.toml` in the working directory, then the environment.
pub fn load_settings() -> ViewerSettings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    settings_from_sources(file.as_deref(), |name| std::env::var(name).ok())
}

pub fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ViewerSettings {
    let mut settings = ViewerSettings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => apply_file(&mut settings, &file_cfg),
            Err(err) => tracing::warn!("ignoring unreadable {SETTINGS_FILE}: {err}"),
        }
    }

    if let Some(v) = env("VIEWER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    for axis in Axis::ALL {
        if let Some(v) = env(&format!("APP__DEFAULT_{}", axis.label().to_ascii_uppercase())) {
            *settings.default_parameters.get_mut(axis) = v;
        }
    }

    settings
}

fn apply_file(settings: &mut ViewerSettings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("server_url").and_then(value_text) {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg
        .get("request_timeout_secs")
        .and_then(value_text)
        .and_then(|v| v.parse::<u64>().ok())
    {
        settings.request_timeout_secs = v;
    }
    for axis in Axis::ALL {
        if let Some(v) = file_cfg
            .get(&format!("default_{}", axis.label()))
            .and_then(value_text)
        {
            *settings.default_parameters.get_mut(axis) = v;
        }
    }
}

fn value_text(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(text) => Some(text.clone()),
        toml::Value::Integer(number) => Some(number.to_string()),
        _ => None,
    }
}
