use std::{collections::HashMap, fs, path::Path, time::Duration};

use client_core::{service::DEFAULT_BASE_URL, UserServiceOptions};
use shared::domain::UserId;

pub const CONFIG_FILE: &str = "user_viewer.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub user_id: i64,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            user_id: UserId::default().0,
            api_key: None,
            request_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn service_options(&self) -> UserServiceOptions {
        UserServiceOptions {
            base_url: self.base_url.clone(),
            user_id: UserId(self.user_id),
            api_key: self.api_key.clone(),
            timeout: self.request_timeout(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_with(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file, then environment variables.
pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            if let Some(v) = file_cfg.get("base_url").and_then(toml::Value::as_str) {
                settings.base_url = v.to_string();
            }
            if let Some(v) = file_cfg.get("user_id").and_then(toml::Value::as_integer) {
                settings.user_id = v;
            }
            if let Some(v) = file_cfg.get("api_key").and_then(toml::Value::as_str) {
                settings.api_key = Some(v.to_string());
            }
            if let Some(v) = file_cfg
                .get("request_timeout_secs")
                .and_then(toml::Value::as_integer)
                .and_then(|v| u64::try_from(v).ok())
            {
                settings.request_timeout_secs = v;
            }
        }
    }

    if let Some(v) = env("USER_VIEWER_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = env("APP__USER_ID") {
        if let Ok(parsed) = v.trim().parse::<i64>() {
            settings.user_id = parsed;
        }
    }

    if let Some(v) = env("REQRES_API_KEY") {
        settings.api_key = Some(v);
    }
    if let Some(v) = env("APP__API_KEY") {
        settings.api_key = Some(v);
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings.base_url = normalize_base_url(&settings.base_url);
    settings
}

pub fn normalize_base_url(raw_base_url: &str) -> String {
    let trimmed = raw_base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Settings::default().base_url;
    }
    trimmed.to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
