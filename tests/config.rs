//! Integration tests for configuration layering.

use flagwatch::cli::Cli;
use flagwatch::config::Config;
use serial_test::serial;
use std::io::Write;

fn cli_with_config(path: Option<&std::path::Path>) -> Cli {
    Cli {
        config: path.map(|p| p.to_path_buf()),
        listen: None,
        webhook_url: None,
        bigquery_url: None,
    }
}

#[test]
#[serial]
fn test_defaults_when_no_file_present() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("flagwatch.toml");

    let config = Config::load(&cli_with_config(Some(&missing))).unwrap();

    assert_eq!(config.log_level, "info");
    assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
    assert_eq!(
        config.bigquery.base_url,
        "https://bigquery.googleapis.com/bigquery/v2"
    );
    assert!(config.bigquery.auth_token.is_none());
    assert!(config.chat.webhook_url.is_empty());
}

#[test]
#[serial]
fn test_file_values_override_defaults() {
    let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(
        file,
        r#"
log_level = "debug"

[server]
bind_addr = "127.0.0.1:9090"

[bigquery]
base_url = "http://localhost:9050/bigquery/v2"
auth_token = "file-token"

[chat]
webhook_url = "https://chat.example.com/hook"
"#
    )
    .unwrap();

    let config = Config::load(&cli_with_config(Some(file.path()))).unwrap();

    assert_eq!(config.log_level, "debug");
    assert_eq!(config.server.bind_addr, "127.0.0.1:9090");
    assert_eq!(config.bigquery.base_url, "http://localhost:9050/bigquery/v2");
    assert_eq!(config.bigquery.auth_token.as_deref(), Some("file-token"));
    assert_eq!(config.chat.webhook_url, "https://chat.example.com/hook");
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(
        file,
        r#"
log_level = "warn"

[chat]
webhook_url = "https://chat.example.com/from-file"
"#
    )
    .unwrap();

    std::env::set_var("FLAGWATCH_LOG_LEVEL", "trace");
    std::env::set_var(
        "FLAGWATCH_CHAT__WEBHOOK_URL",
        "https://chat.example.com/from-env",
    );

    let config = Config::load(&cli_with_config(Some(file.path())));

    std::env::remove_var("FLAGWATCH_LOG_LEVEL");
    std::env::remove_var("FLAGWATCH_CHAT__WEBHOOK_URL");

    let config = config.unwrap();
    assert_eq!(config.log_level, "trace");
    assert_eq!(config.chat.webhook_url, "https://chat.example.com/from-env");
}

#[test]
#[serial]
fn test_cli_overrides_everything() {
    let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(
        file,
        r#"
[chat]
webhook_url = "https://chat.example.com/from-file"
"#
    )
    .unwrap();

    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        listen: Some("127.0.0.1:7070".to_string()),
        webhook_url: Some("https://chat.example.com/from-cli".to_string()),
        bigquery_url: Some("http://localhost:9050".to_string()),
    };

    let config = Config::load(&cli).unwrap();

    assert_eq!(config.server.bind_addr, "127.0.0.1:7070");
    assert_eq!(config.chat.webhook_url, "https://chat.example.com/from-cli");
    assert_eq!(config.bigquery.base_url, "http://localhost:9050");
}
