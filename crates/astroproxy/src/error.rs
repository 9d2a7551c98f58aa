//! CLI error types with miette diagnostics.
//!
//! Maps `astroproxy_api::Error` and `ConfigError` into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use astroproxy_api::Error as ApiError;
use astroproxy_config::ConfigError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach AstroProxy at {url}")]
    #[diagnostic(
        code(astroproxy::connection_failed),
        help(
            "Check your network connection and the base URL.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: ApiError,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("API key rejected (HTTP {status})")]
    #[diagnostic(
        code(astroproxy::auth_failed),
        help(
            "Verify the API key in your AstroProxy account settings.\n\
             Run: astroproxy config set-key"
        )
    )]
    AuthFailed { status: u16 },

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(astroproxy::no_credentials),
        help(
            "Configure one with: astroproxy config init\n\
             Or set the ASTROPROXY_API_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Port {port_id} not found")]
    #[diagnostic(
        code(astroproxy::not_found),
        help("Run: astroproxy ports list to see your ports")
    )]
    PortNotFound { port_id: u64 },

    #[error("AstroProxy API error (HTTP {status})")]
    #[diagnostic(code(astroproxy::api_error), help("Response body: {body}"))]
    Api { status: u16, body: String },

    #[error("AstroProxy returned a response that is not JSON")]
    #[diagnostic(code(astroproxy::bad_response), help("Response body: {body}"))]
    BadResponse { body: String },

    #[error(transparent)]
    #[diagnostic(code(astroproxy::client))]
    Client(ApiError),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(astroproxy::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' was not confirmed")]
    #[diagnostic(
        code(astroproxy::not_confirmed),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NotConfirmed { action: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(astroproxy::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::PortNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NotConfirmed { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the port id to a "not found" API error.
    pub fn for_port(self, port_id: u64) -> Self {
        match self {
            Self::Api { status: 404, .. } => Self::PortNotFound { port_id },
            other => other,
        }
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        let offline_url = match &err {
            ApiError::Transport(e) if e.is_connect() || e.is_timeout() => Some(
                e.url()
                    .map(|u| format!("{}://{}", u.scheme(), u.host_str().unwrap_or_default()))
                    .unwrap_or_default(),
            ),
            _ => None,
        };
        if let Some(url) = offline_url {
            return CliError::ConnectionFailed { url, source: err };
        }

        match err {
            ApiError::Api {
                status: status @ (401 | 403),
                ..
            } => CliError::AuthFailed { status },
            ApiError::Api { status, body } => CliError::Api { status, body },
            ApiError::Deserialization { body, .. } => CliError::BadResponse { body },
            ApiError::MissingApiKey => CliError::NoCredentials {
                profile: "current".into(),
            },
            other => CliError::Client(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
