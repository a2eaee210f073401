use search_pulse::config::Config;
use search_pulse::search_console::TrafficType;
use serial_test::serial;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

fn sample_config() -> Config {
    Config {
        site_url: "sc-domain:example.com".to_string(),
        site_name: "Example Site".to_string(),
        traffic_type: TrafficType::Web,
        emoji: "📈".to_string(),
        timezone: "America/Argentina/Buenos_Aires".to_string(),
        service_account_key_file: "/etc/search-pulse/key.json".to_string(),
        telegram_bot_token: "123456:fake-token".to_string(),
        telegram_chat_id: "-1000000000000".to_string(),
        notify_on_failure: false,
        api_base_url: "https://www.googleapis.com/webmasters/v3".to_string(),
        chart_base_url: "https://quickchart.io".to_string(),
        telegram_base_url: "https://api.telegram.org".to_string(),
    }
}

#[test]
#[serial]
fn test_config_save_and_load() {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join("search-pulse");
    std::env::set_var("SEARCH_PULSE_CONFIG_DIR", config_dir.to_str().unwrap());

    sample_config().save().expect("save should succeed");

    let loaded = Config::load().expect("load should succeed");
    assert_eq!(loaded.site_url, "sc-domain:example.com");
    assert_eq!(loaded.site_name, "Example Site");
    assert_eq!(loaded.traffic_type, TrafficType::Web);
    assert_eq!(loaded.timezone, "America/Argentina/Buenos_Aires");
    assert_eq!(loaded.telegram_bot_token, "123456:fake-token");
    assert!(!loaded.notify_on_failure);

    std::env::remove_var("SEARCH_PULSE_CONFIG_DIR");
}

#[test]
#[serial]
fn test_config_file_permissions_are_restrictive() {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join("search-pulse");
    std::env::set_var("SEARCH_PULSE_CONFIG_DIR", config_dir.to_str().unwrap());

    sample_config().save().unwrap();

    let file_mode = fs::metadata(Config::config_file())
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(
        file_mode & 0o777,
        0o600,
        "config file holds secrets and should be owner-only"
    );

    let dir_mode = fs::metadata(&config_dir).unwrap().permissions().mode();
    assert_eq!(dir_mode & 0o777, 0o700);

    std::env::remove_var("SEARCH_PULSE_CONFIG_DIR");
}

#[test]
#[serial]
fn test_config_load_missing_file() {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join("nonexistent");
    std::env::set_var("SEARCH_PULSE_CONFIG_DIR", config_dir.to_str().unwrap());

    let result = Config::load();
    assert!(result.is_err(), "loading missing config should fail");

    std::env::remove_var("SEARCH_PULSE_CONFIG_DIR");
}

#[test]
#[serial]
fn test_optional_fields_default_when_absent() {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join("search-pulse");
    fs::create_dir_all(&config_dir).unwrap();
    std::env::set_var("SEARCH_PULSE_CONFIG_DIR", config_dir.to_str().unwrap());

    let minimal = r#"
site_url = "https://example.com/"
site_name = "Example"
traffic_type = "discover"
emoji = "🚀"
timezone = "UTC"
service_account_key_file = "/tmp/key.json"
telegram_bot_token = "t"
telegram_chat_id = "c"
"#;
    fs::write(config_dir.join("config.toml"), minimal).unwrap();

    let loaded = Config::load().expect("minimal config should load");
    assert_eq!(loaded.traffic_type, TrafficType::Discover);
    assert!(!loaded.notify_on_failure);
    assert_eq!(loaded.api_base_url, "https://www.googleapis.com/webmasters/v3");
    assert_eq!(loaded.chart_base_url, "https://quickchart.io");
    assert_eq!(loaded.telegram_base_url, "https://api.telegram.org");

    std::env::remove_var("SEARCH_PULSE_CONFIG_DIR");
}

#[test]
fn test_load_from_explicit_dir_ignores_env_lookup() {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join("elsewhere");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        toml::to_string_pretty(&sample_config()).unwrap(),
    )
    .unwrap();

    // no SEARCH_PULSE_CONFIG_DIR involved, the path is given directly
    let loaded = Config::load_from_dir(&config_dir).expect("explicit dir should load");
    assert_eq!(loaded.site_name, "Example Site");

    let missing = Config::load_from_dir(&tmp.path().join("nope"));
    assert!(missing.is_err());
}

#[test]
fn test_timezone_resolution() {
    let config = sample_config();
    assert!(config.timezone().is_ok());

    let mut bad = sample_config();
    bad.timezone = "Mars/Olympus_Mons".to_string();
    assert!(bad.timezone().is_err());
}
