#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use schoolhub_config::{
    Config, ConfigError, Defaults, Profile, load_config_from, profile_to_portal_config,
    save_config_to,
};
use schoolhub_core::TlsVerification;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(cfg.default_profile.as_deref(), Some("default"));
    assert_eq!(cfg.defaults.output, "table");
    assert_eq!(cfg.defaults.timeout, 30);
    assert!(cfg.profiles.is_empty());
}

#[test]
fn reads_profiles_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
default_profile = "campus"

[defaults]
output = "json"
timeout = 12

[profiles.campus]
base_url = "https://campus.school.test/api"
session_cookie_env = "CAMPUS_SESSION"
insecure = true
"#,
    )
    .unwrap();

    let cfg = load_config_from(&path).unwrap();
    assert_eq!(cfg.active_profile_name(None), "campus");
    assert_eq!(cfg.defaults.output, "json");

    let profile = cfg.profile("campus").unwrap();
    assert_eq!(profile.base_url, "https://campus.school.test/api");
    assert_eq!(profile.session_cookie_env.as_deref(), Some("CAMPUS_SESSION"));
    assert_eq!(profile.insecure, Some(true));

    assert!(matches!(
        cfg.profile("other"),
        Err(ConfigError::UnknownProfile { .. })
    ));
}

#[test]
fn save_then_load_keeps_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.profiles.insert(
        "default".into(),
        Profile {
            timeout: Some(5),
            ..Profile::new("http://localhost:5000/api")
        },
    );
    save_config_to(&cfg, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[profiles.default]"));
    assert!(!written.contains("session_cookie"));

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.profile("default").unwrap(), cfg.profile("default").unwrap());
    assert_eq!(loaded.profile_names(), ["default"]);
}

#[test]
fn portal_config_applies_profile_overrides() {
    let profile = Profile {
        timeout: Some(7),
        ca_cert: Some("/etc/ssl/school-ca.pem".into()),
        ..Profile::new("https://school.test/api")
    };
    let portal = profile_to_portal_config(&profile, "schoolhub-test-overrides", &Defaults::default())
        .unwrap();

    assert_eq!(portal.base_url.as_str(), "https://school.test/api");
    assert_eq!(portal.timeout, Duration::from_secs(7));
    assert_eq!(
        portal.tls,
        TlsVerification::CustomCa("/etc/ssl/school-ca.pem".into())
    );
}

#[test]
fn insecure_default_applies_when_profile_is_silent() {
    let defaults = Defaults {
        insecure: true,
        ..Defaults::default()
    };
    let portal = profile_to_portal_config(
        &Profile::new("https://localhost:5000/api"),
        "schoolhub-test-insecure",
        &defaults,
    )
    .unwrap();
    assert_eq!(portal.tls, TlsVerification::DangerAcceptInvalid);
    assert_eq!(portal.timeout, Duration::from_secs(30));
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = profile_to_portal_config(
        &Profile::new("not a url"),
        "schoolhub-test-invalid",
        &Defaults::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "base_url"));
}

#[test]
fn malformed_plaintext_cookie_is_rejected() {
    let profile = Profile {
        session_cookie: Some("just-a-token".into()),
        ..Profile::new("https://school.test/api")
    };
    let err = profile_to_portal_config(&profile, "schoolhub-test-cookie", &Defaults::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "session_cookie"));
}
