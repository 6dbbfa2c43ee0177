// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::hid::DeviceRole;
use std::io::Write;

const FULL: &str = r#"
[general]
workbench_number = 3
production_stage_name = "soldering"
send_upload_request = true

[endpoints]
hub_url = "http://hub.local:5000/"
hub_timeout = "250ms"
listen = "127.0.0.1:8081"

[hid_devices]
rfid_reader = "reader"
barcode_reader = "scanner"

[developer]
disable_id_validation = true

[screen]
enforce_headless = true
rotate_output = true
alert_duration = "2s"
timer_refresh = "500ms"

[logging]
path = "spoke.log"
"#;

#[test]
fn parses_full_config() {
    let config = SpokeConfig::parse(FULL).unwrap();

    assert_eq!(config.general.workbench_number, 3);
    assert_eq!(config.general.production_stage_name, "soldering");
    assert!(config.general.send_upload_request);
    assert_eq!(config.hub_url(), "http://hub.local:5000");
    assert_eq!(config.endpoints.hub_timeout, Duration::from_millis(250));
    assert_eq!(config.endpoints.listen, "127.0.0.1:8081");
    assert_eq!(
        config.hid_devices.identify("scanner"),
        Some(DeviceRole::BarcodeReader)
    );
    assert!(config.developer.disable_id_validation);
    assert!(!config.developer.disable_barcode_validation);
    assert!(config.screen.enforce_headless);
    assert!(config.screen.rotate_output);
    assert_eq!(config.screen.alert_duration, Duration::from_secs(2));
    assert_eq!(config.screen.timer_refresh, Duration::from_millis(500));
    assert_eq!(config.logging.path, Some(PathBuf::from("spoke.log")));
}

#[test]
fn optional_sections_have_defaults() {
    let config = SpokeConfig::parse(
        r#"
        [general]
        workbench_number = 1

        [endpoints]
        hub_url = "http://127.0.0.1:5000"
        "#,
    )
    .unwrap();

    assert_eq!(config, SpokeConfig::new(1, "http://127.0.0.1:5000"));
    assert_eq!(config.endpoints.hub_timeout, Duration::from_secs(1));
    assert_eq!(config.endpoints.listen, "0.0.0.0:8080");
    assert_eq!(config.screen.alert_duration, Duration::from_secs(1));
    assert!(!config.screen.enforce_headless);
    assert_eq!(config.logging.path, None);
}

#[test]
fn rejects_zero_workbench_number() {
    let err = SpokeConfig::new(0, "http://hub").validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "general.workbench_number",
            ..
        }
    ));
}

#[test]
fn rejects_non_http_hub_url() {
    let err = SpokeConfig::new(1, "hub.local:5000").validate().unwrap_err();
    assert!(err.to_string().contains("endpoints.hub_url"));
}

#[test]
fn rejects_zero_timer_refresh() {
    let mut config = SpokeConfig::new(1, "http://hub");
    config.screen.timer_refresh = Duration::ZERO;
    assert!(config.validate().is_err());
}

#[test]
fn rejects_missing_general_section() {
    let err = SpokeConfig::parse("[endpoints]\nhub_url = \"http://hub\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FULL.as_bytes()).unwrap();

    let config = SpokeConfig::load(file.path()).unwrap();
    assert_eq!(config.general.workbench_number, 3);
}

#[test]
fn missing_file_reports_path() {
    let err = SpokeConfig::load(Path::new("/nonexistent/spoke.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/spoke.toml"));
}
