//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_cookie() -> Result<SecretString, CliError> {
    let cookie = rpassword::prompt_password("Session cookie (name=value): ").map_err(prompt_err)?;
    if cookie.trim().is_empty() {
        return Err(CliError::Validation {
            field: "session_cookie".into(),
            reason: "cookie cannot be empty".into(),
        });
    }
    Ok(SecretString::from(cookie.trim().to_owned()))
}

/// Config as JSON with plaintext cookies masked.
fn redacted(cfg: &Config) -> Value {
    let mut value = serde_json::to_value(cfg).unwrap_or(Value::Null);
    if let Some(profiles) = value.get_mut("profiles").and_then(Value::as_object_mut) {
        for profile in profiles.values_mut() {
            if let Some(cookie) = profile.get_mut("session_cookie") {
                if !cookie.is_null() {
                    *cookie = Value::String("********".into());
                }
            }
        }
    }
    value
}

fn show_text(cfg: &Config) -> String {
    let mut lines = vec![
        format!("Config file:     {}", config::config_path().display()),
        format!(
            "Default profile: {}",
            cfg.default_profile.as_deref().unwrap_or("-")
        ),
        format!("Timeout:         {}s", cfg.defaults.timeout),
        format!("Insecure:        {}", cfg.defaults.insecure),
    ];
    for name in cfg.profile_names() {
        let Some(p) = cfg.profiles.get(name) else {
            continue;
        };
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.push(format!("  base_url:    {}", p.base_url));
        let session = match (&p.session_cookie_env, &p.session_cookie) {
            (Some(var), _) => format!("${var}"),
            (None, Some(_)) => "******** (plaintext)".into(),
            (None, None) => "keyring".into(),
        };
        lines.push(format!("  session:     {session}"));
        if let Some(ref ca) = p.ca_cert {
            lines.push(format!("  ca_cert:     {}", ca.display()));
        }
        if let Some(insecure) = p.insecure {
            lines.push(format!("  insecure:    {insecure}"));
        }
        if let Some(timeout) = p.timeout {
            lines.push(format!("  timeout:     {timeout}s"));
        }
    }
    lines.join("\n")
}

fn parse_flag<T: std::str::FromStr>(field: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}"),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            eprintln!("SchoolHub CLI configuration");
            eprintln!("  Config path: {}\n", config::config_path().display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let base_url: String = Input::new()
                .with_prompt("API URL")
                .default("http://localhost:5000/api".into())
                .interact_text()
                .map_err(prompt_err)?;
            url::Url::parse(&base_url).map_err(|e| CliError::Validation {
                field: "base_url".into(),
                reason: e.to_string(),
            })?;

            let cookie = prompt_cookie()?;

            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the session cookie?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let session_cookie = if store_selection == 0 {
                config::store_session_cookie(&profile_name, &cookie)?;
                eprintln!("  ✓ Session cookie stored in system keyring");
                None
            } else {
                Some(cookie.expose_secret().to_owned())
            };

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    session_cookie,
                    ..Profile::new(base_url)
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            let path = config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: schoolhub dashboard");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                &global.output,
                &redacted(&cfg),
                |_| show_text(&cfg),
                |_| config::config_path().display().to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "base_url" | "base-url" => {
                    url::Url::parse(&value).map_err(|e| CliError::Validation {
                        field: "base_url".into(),
                        reason: e.to_string(),
                    })?;
                    profile.base_url = value;
                }
                "session_cookie_env" | "session-cookie-env" => {
                    profile.session_cookie_env = Some(value);
                }
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                "insecure" => {
                    profile.insecure = Some(parse_flag("insecure", &value, "'true' or 'false'")?);
                }
                "timeout" => {
                    profile.timeout = Some(parse_flag("timeout", &value, "a number (seconds)")?);
                }
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: base_url, \
                             session_cookie_env, ca_cert, insecure, timeout"
                        ),
                    });
                }
            }

            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.active_profile_name(None);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: schoolhub config init");
            } else {
                for name in cfg.profile_names() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetSession ──────────────────────────────────────────────
        ConfigCommand::SetSession { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: config::available_profiles(&cfg),
                });
            }

            let cookie = prompt_cookie()?;
            config::store_session_cookie(&profile_name, &cookie)?;
            eprintln!("✓ Session cookie stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_plaintext_cookies() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "campus".into(),
            Profile {
                session_cookie: Some("connect.sid=s3cret".into()),
                ..Profile::new("https://campus.test/api")
            },
        );
        let json = redacted(&cfg).to_string();
        assert!(!json.contains("s3cret"));
        assert!(json.contains("********"));
        assert!(!show_text(&cfg).contains("s3cret"));
    }
}
