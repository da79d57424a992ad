use super::{load_settings_with, normalize_base_url, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("user_viewer_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("user_viewer.toml");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn defaults_target_reqres_user_two() {
    let settings = load_settings_with(Path::new("/nonexistent/user_viewer.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.base_url, "https://reqres.in/api");
    assert_eq!(settings.user_id, 2);
    assert_eq!(settings.request_timeout(), Duration::from_secs(10));
}

#[test]
fn file_values_override_defaults() {
    let path = temp_config(
        r#"
base_url = "http://127.0.0.1:9000/api/"
user_id = 7
api_key = "reqres-free-v1"
request_timeout_secs = 3
"#,
    );

    let settings = load_settings_with(&path, no_env);
    assert_eq!(settings.base_url, "http://127.0.0.1:9000/api");
    assert_eq!(settings.user_id, 7);
    assert_eq!(settings.api_key.as_deref(), Some("reqres-free-v1"));
    assert_eq!(settings.request_timeout_secs, 3);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn environment_overrides_file() {
    let path = temp_config("user_id = 7\nbase_url = \"http://file.invalid/api\"\n");
    let vars: HashMap<&str, &str> = [
        ("USER_VIEWER_BASE_URL", "http://legacy.invalid/api"),
        ("APP__BASE_URL", "http://env.invalid/api"),
        ("APP__USER_ID", " 12 "),
        ("APP__API_KEY", "from-env"),
    ]
    .into_iter()
    .collect();

    let settings = load_settings_with(&path, |key| vars.get(key).map(|v| v.to_string()));
    assert_eq!(settings.base_url, "http://env.invalid/api");
    assert_eq!(settings.user_id, 12);
    assert_eq!(settings.api_key.as_deref(), Some("from-env"));

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn unparseable_numbers_keep_previous_values() {
    let settings = load_settings_with(Path::new("/nonexistent/user_viewer.toml"), |key| {
        match key {
            "APP__USER_ID" => Some("janet".to_string()),
            "APP__REQUEST_TIMEOUT_SECS" => Some("-1".to_string()),
            _ => None,
        }
    });
    assert_eq!(settings.user_id, 2);
    assert_eq!(settings.request_timeout_secs, 10);
}

#[test]
fn malformed_file_is_ignored() {
    let path = temp_config("this is = = not toml");
    assert_eq!(load_settings_with(&path, no_env), Settings::default());
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn zero_timeout_is_clamped() {
    let settings = Settings {
        request_timeout_secs: 0,
        ..Settings::default()
    };
    assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    assert_eq!(settings.service_options().timeout, Duration::from_secs(1));
}

#[test]
fn normalizes_base_url() {
    assert_eq!(normalize_base_url("  https://reqres.in/api//  "), "https://reqres.in/api");
    assert_eq!(normalize_base_url("   "), "https://reqres.in/api");
}
