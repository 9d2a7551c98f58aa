//! CLI configuration: a thin wrapper around `astroproxy_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--base-url, --api-key, --timeout, --output).

use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use astroproxy_api::{ClientConfig, DEFAULT_BASE_URL};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use astroproxy_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Output format: `--output` flag, else `defaults.output` from the config.
pub fn resolve_output(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(ref format) = global.output {
        return Ok(format.clone());
    }
    OutputFormat::from_str(&cfg.defaults.output, true).map_err(|_| CliError::Validation {
        field: "defaults.output".into(),
        reason: format!(
            "unknown output format '{}' (expected json, json-compact or yaml)",
            cfg.defaults.output
        ),
    })
}

/// Build a `ClientConfig` from the config file, active profile, and flags.
///
/// Flags take priority over profile values. A missing profile is fine as
/// long as an API key arrives through `--api-key` or the keyring.
pub fn build_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);
    let profile = cfg.profiles.get(&profile_name).cloned().unwrap_or_default();

    // 1. Base URL (flag or env > profile > production)
    let raw_url = global
        .base_url
        .as_deref()
        .or(profile.base_url.as_deref())
        .unwrap_or(DEFAULT_BASE_URL);
    let base_url = astroproxy_config::parse_base_url(raw_url)?;

    // 2. API key (flag > profile chain)
    let api_key = match global.api_key {
        Some(ref key) if !key.is_empty() => SecretString::from(key.clone()),
        _ => astroproxy_config::resolve_api_key(&profile, &profile_name)?,
    };

    // 3. Transport (flag timeout wins)
    let mut transport = astroproxy_config::transport_for(&profile, &cfg.defaults);
    if let Some(secs) = global.timeout {
        transport = transport.with_timeout(Duration::from_secs(secs));
    }

    Ok(ClientConfig {
        base_url,
        api_key,
        transport,
    })
}
