//! CLI configuration: a thin layer over `schoolhub_config` that applies
//! `GlobalOpts` flag overrides (--base-url, --session-cookie, ...).

use std::time::Duration;

use secrecy::SecretString;

use schoolhub_core::{PortalConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use schoolhub_config::{
    Config, Profile, config_path, load_config_or_default, profile_to_portal_config, save_config,
    store_session_cookie,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build a `PortalConfig` from the config file, the active profile and
/// CLI overrides. Flags win over the profile; without a profile,
/// `--base-url` alone is enough.
pub fn resolve_portal_config(
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<PortalConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut portal = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile_to_portal_config(profile, &profile_name, &cfg.defaults)?,
        None => {
            if global.profile.is_some() {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: available_profiles(cfg),
                });
            }
            let url_str = global.base_url.as_deref().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            let mut portal = PortalConfig::new(parse_base_url(url_str)?);
            portal.timeout = Duration::from_secs(cfg.defaults.timeout);
            if cfg.defaults.insecure {
                portal.tls = TlsVerification::DangerAcceptInvalid;
            }
            portal
        }
    };

    if let Some(ref url_str) = global.base_url {
        portal.base_url = parse_base_url(url_str)?;
    }
    if let Some(ref cookie) = global.session_cookie {
        portal = portal.with_session_cookie(SecretString::from(cookie.clone()));
    }
    if global.insecure {
        portal.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        portal.timeout = Duration::from_secs(secs);
    }

    Ok(portal)
}

/// Comma-separated profile names, or "(none)".
pub fn available_profiles(cfg: &Config) -> String {
    let names = cfg.profile_names();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

fn parse_base_url(url_str: &str) -> Result<url::Url, CliError> {
    url_str.parse().map_err(|_| CliError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {url_str}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["schoolhub"];
        argv.extend_from_slice(args);
        argv.push("dashboard");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, profile: Profile) -> Config {
        let mut cfg = Config {
            default_profile: Some(name.into()),
            ..Config::default()
        };
        cfg.profiles.insert(name.into(), profile);
        cfg
    }

    #[test]
    fn base_url_flag_alone_is_enough() {
        let portal = resolve_portal_config(
            &Config::default(),
            &global(&["--base-url", "http://localhost:5000/api", "--timeout", "5"]),
        )
        .unwrap();
        assert_eq!(portal.base_url.as_str(), "http://localhost:5000/api");
        assert_eq!(portal.timeout, Duration::from_secs(5));
        assert!(portal.session_cookie.is_none());
    }

    #[test]
    fn nothing_configured_is_an_error() {
        let err = resolve_portal_config(&Config::default(), &global(&[])).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn unknown_explicit_profile_lists_alternatives() {
        let cfg = config_with("campus", Profile::new("https://campus.test/api"));
        let err = resolve_portal_config(&cfg, &global(&["--profile", "other"])).unwrap_err();
        match err {
            CliError::ProfileNotFound { available, .. } => assert_eq!(available, "campus"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with(
            "schoolhub-cli-test",
            Profile {
                timeout: Some(12),
                ..Profile::new("https://campus.test/api")
            },
        );
        let portal = resolve_portal_config(
            &cfg,
            &global(&["--insecure", "--session-cookie", "connect.sid=abc"]),
        )
        .unwrap();

        assert_eq!(portal.base_url.as_str(), "https://campus.test/api");
        assert_eq!(portal.timeout, Duration::from_secs(12));
        assert_eq!(portal.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(
            portal.session_cookie.unwrap().expose_secret(),
            "connect.sid=abc"
        );
    }
}
