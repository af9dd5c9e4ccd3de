use super::*;
use crate::schema::VendorOverride;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    // The unbounded readiness wait is flagged, not rejected.
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "engine.readiness_deadline_secs"));
}

#[test]
fn test_validate_zero_poll_interval() {
    let mut config = Config::default();
    config.engine.poll_interval_ms = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "engine.poll_interval_ms"));
}

#[test]
fn test_validate_zero_readiness_deadline() {
    let mut config = Config::default();
    config.engine.readiness_deadline_secs = Some(0);

    let result = ConfigValidator::validate(&config);
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "engine.readiness_deadline_secs"));
}

#[test]
fn test_validate_invalid_endpoint() {
    let mut config = Config::default();
    config.cdp.endpoint = "localhost:9222".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "cdp.endpoint"));
}

#[test]
fn test_validate_vendor_override() {
    let mut config = Config::default();
    config.vendors.insert(
        "kimi".to_string(),
        VendorOverride {
            url: Some("kimi.com/chat".to_string()),
            completion_timeout_secs: Some(0),
            ..VendorOverride::default()
        },
    );

    let result = ConfigValidator::validate(&config);
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors.iter().any(|e| e.path == "vendors.kimi.url"));
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "vendors.kimi.completion_timeout_secs"));
}

#[test]
fn test_validate_zero_dwell_warning() {
    let mut config = Config::default();
    config.engine.readiness_deadline_secs = Some(300);
    config.vendors.insert(
        "qwen".to_string(),
        VendorOverride {
            dwell_ms: Some(0),
            ..VendorOverride::default()
        },
    );

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].path, "vendors.qwen.dwell_ms");
}
