use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use fitcoach::config::{ApiConfig, Config};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Configuration pointing the chat client at a mock server
#[allow(dead_code)]
pub fn config_for(server_uri: &str, token: Option<&str>) -> Config {
    Config {
        api: ApiConfig {
            base_url: server_uri.to_string(),
            access_token: token.map(str::to_string),
            timeout_seconds: 5,
        },
        ..Default::default()
    }
}
