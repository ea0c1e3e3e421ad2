use kartela_core::config::{AccessConfig, Config, DEV_JWT_SECRET};
use kartela_core::testing::test_config;

#[test]
fn test_session_ttl_clamped() {
    assert_eq!(AccessConfig::clamp_session_ttl(1), 8);
    assert_eq!(AccessConfig::clamp_session_ttl(8), 8);
    assert_eq!(AccessConfig::clamp_session_ttl(12), 12);
    assert_eq!(AccessConfig::clamp_session_ttl(24), 24);
    assert_eq!(AccessConfig::clamp_session_ttl(72), 24);
}

#[test]
fn test_access_defaults() {
    let access = AccessConfig::default();
    assert_eq!(access.session_ttl_hours, 8);
    assert_eq!(access.badge_ticket_ttl_secs, 300);
    assert!(access.enable_rate_limit);
    assert!(!access.secure_cookies);
    assert!(!access.trust_proxy_headers);
}

#[test]
fn test_dev_secret_refused_in_production() {
    let config = Config {
        jwt_secret: DEV_JWT_SECRET.to_string(),
        environment: "production".to_string(),
        ..test_config()
    };
    assert!(config.is_production());
    assert!(config.check().is_err());

    let config = Config {
        jwt_secret: DEV_JWT_SECRET.to_string(),
        environment: "development".to_string(),
        ..test_config()
    };
    assert!(config.is_dev());
    assert!(config.check().is_ok());
}

#[test]
fn test_empty_secret_refused() {
    let config = Config {
        jwt_secret: String::new(),
        ..test_config()
    };
    assert!(config.check().is_err());
}

#[test]
fn test_server_addr() {
    let config = Config {
        server_host: "0.0.0.0".to_string(),
        server_port: 8080,
        ..test_config()
    };
    assert_eq!(config.server_addr(), "0.0.0.0:8080");
}
