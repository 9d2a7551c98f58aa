//! Shared configuration for AstroProxy tools.
//!
//! TOML profiles, API key resolution (env + keyring + plaintext), and
//! translation to `astroproxy_api::ClientConfig`. The CLI layers its
//! flag overrides on top of this crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use astroproxy_api::{ClientConfig, DEFAULT_BASE_URL, TlsMode, TransportConfig};

/// Keyring service name for stored API keys.
const KEYRING_SERVICE: &str = "astroproxy";

/// Environment prefix for config overrides (`ASTROPROXY_DEFAULTS__TIMEOUT=10`).
pub const ENV_PREFIX: &str = "ASTROPROXY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds. Unset keeps the transport default.
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: None,
        }
    }
}

fn default_output() -> String {
    "json".into()
}

/// A named AstroProxy account.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Provider base URL. Defaults to the production endpoint.
    pub base_url: Option<String>,

    /// API key in plaintext. Prefer the keyring or an env var.
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Path to an extra CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override the default timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "astroproxy", "astroproxy").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("astroproxy");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from an explicit file path + environment.
///
/// A missing file is not an error; defaults and env still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve an API key from the credential chain.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store an API key for a profile in the system keyring.
pub fn store_api_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    entry.set_password(key)?;
    Ok(())
}

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/api-key")
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse and validate a base URL string.
pub fn parse_base_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Build a transport config from a profile and the global defaults.
pub fn transport_for(profile: &Profile, defaults: &Defaults) -> TransportConfig {
    let mut transport = TransportConfig::default();
    if let Some(secs) = profile.timeout.or(defaults.timeout) {
        transport = transport.with_timeout(Duration::from_secs(secs));
    }
    if let Some(ref ca_path) = profile.ca_cert {
        transport.tls = TlsMode::CustomCa(ca_path.clone());
    }
    transport
}

/// Build a `ClientConfig` from a profile without CLI flag overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let base_url = parse_base_url(profile.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
    let api_key = resolve_api_key(profile, profile_name)?;

    Ok(ClientConfig {
        base_url,
        api_key,
        transport: transport_for(profile, defaults),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn loads_profiles_from_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                default_profile = "work"

                [defaults]
                timeout = 20

                [profiles.work]
                base_url = "https://staging.astroproxy.com"
                api_key = "plain-key"
                "#,
            )?;

            let cfg = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert_eq!(cfg.default_profile.as_deref(), Some("work"));
            assert_eq!(cfg.defaults.output, "json");
            assert_eq!(cfg.defaults.timeout, Some(20));
            let work = &cfg.profiles["work"];
            assert_eq!(work.base_url.as_deref(), Some("https://staging.astroproxy.com"));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[defaults]\noutput = \"yaml\"\n")?;
            jail.set_env("ASTROPROXY_DEFAULTS__OUTPUT", "json-compact");

            let cfg = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert_eq!(cfg.defaults.output, "json-compact");
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("absent.toml")).unwrap();
            assert_eq!(cfg.default_profile.as_deref(), Some("default"));
            assert!(cfg.profiles.is_empty());
            Ok(())
        });
    }

    #[test]
    fn api_key_env_takes_priority() {
        Jail::expect_with(|jail| {
            jail.set_env("ASTROPROXY_TEST_KEY_PRIORITY", "from-env");
            let profile = Profile {
                api_key: Some("from-file".into()),
                api_key_env: Some("ASTROPROXY_TEST_KEY_PRIORITY".into()),
                ..Profile::default()
            };
            let key = resolve_api_key(&profile, "jail-env-priority").unwrap();
            assert_eq!(key.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn profile_without_key_is_rejected() {
        let profile = Profile {
            api_key_env: Some("ASTROPROXY_TEST_KEY_DEFINITELY_UNSET".into()),
            ..Profile::default()
        };
        let result = resolve_api_key(&profile, "astroproxy-test-profile-without-key");
        assert!(matches!(result, Err(ConfigError::NoCredentials { .. })));
    }

    #[test]
    fn client_config_uses_production_by_default() {
        let profile = Profile {
            api_key: Some("k".into()),
            ..Profile::default()
        };
        let defaults = Defaults {
            output: default_output(),
            timeout: Some(15),
        };
        let cfg = profile_to_client_config(&profile, "astroproxy-test-default-url", &defaults)
            .unwrap();
        assert_eq!(cfg.base_url.as_str(), "https://astroproxy.com/");
        assert_eq!(cfg.transport.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn profile_timeout_overrides_default() {
        let profile = Profile {
            timeout: Some(5),
            ..Profile::default()
        };
        let transport = transport_for(&profile, &Defaults::default());
        assert_eq!(transport.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(matches!(
            parse_base_url("ftp://astroproxy.com"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(parse_base_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("nested/config.toml");
            let mut cfg = Config::default();
            cfg.profiles.insert(
                "default".into(),
                Profile {
                    api_key_env: Some("MY_KEY".into()),
                    ..Profile::default()
                },
            );
            save_config_to(&cfg, &path).unwrap();

            let loaded = load_config_from(&path).unwrap();
            assert_eq!(
                loaded.profiles["default"].api_key_env.as_deref(),
                Some("MY_KEY")
            );
            Ok(())
        });
    }
}
