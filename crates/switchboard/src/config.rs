//! CLI configuration: thin wrapper around `switchboard_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--console, --timeout, etc.).

use std::time::Duration;

use secrecy::SecretString;

use switchboard_core::{ConsoleConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use switchboard_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a `Profile` + global flags into a `ConsoleConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ConsoleConfig, CliError> {
    // Console URL (flag > env > profile)
    let mut profile = profile.clone();
    if let Some(ref url_str) = global.console {
        profile.console.clone_from(url_str);
    }
    let mut config = switchboard_config::profile_to_console_config(&profile, defaults)?;

    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(ref token) = global.csrf_token {
        config.csrf_token = Some(SecretString::from(token.clone()));
    }
    Ok(config)
}

/// Build a `ConsoleConfig` from flags alone, for runs without a profile.
pub fn resolve_flags_only(
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<Option<ConsoleConfig>, CliError> {
    let Some(ref url_str) = global.console else {
        return Ok(None);
    };
    let profile = Profile {
        console: url_str.clone(),
        ..Profile::default()
    };
    resolve_profile(&profile, defaults, global).map(Some)
}

/// Build the `ConsoleConfig` for this invocation from the config file,
/// the active profile, and CLI overrides.
pub fn build_console_config(global: &GlobalOpts) -> Result<ConsoleConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &cfg.defaults, global);
    }

    // An explicitly named profile must exist.
    if global.profile.is_some() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    resolve_flags_only(&cfg.defaults, global)?.ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })
}
