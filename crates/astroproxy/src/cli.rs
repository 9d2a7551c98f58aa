//! Clap derive structures for the `astroproxy` CLI.

use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use strum::VariantNames;

use astroproxy_api::{
    NetworkType, OrderDirection, OrderField, Rotation, RotationTimeUnit, RotationTrigger,
    TrafficMode, VpnClient,
};

use crate::error::CliError;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// astroproxy -- manage rented proxy ports from the command line
#[derive(Debug, Parser)]
#[command(
    name = "astroproxy",
    version,
    about = "Manage AstroProxy proxy ports from the command line",
    long_about = "Command-line client for the AstroProxy proxy-rental API.\n\n\
        Every command issues one API call and prints the provider's JSON response.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "ASTROPROXY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "ASTROPROXY_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// API key (overrides profile)
    #[arg(long, env = "ASTROPROXY_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format (defaults to `defaults.output` in the config file)
    #[arg(long, short = 'o', env = "ASTROPROXY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (default: none)
    #[arg(long, env = "ASTROPROXY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show account balance
    Balance,

    /// Manage proxy ports
    #[command(alias = "port", alias = "p")]
    Ports(PortsArgs),

    /// List available countries
    Countries,

    /// List cities of a country
    Cities {
        /// Country code or name as returned by `countries`
        country: String,
    },

    /// List operators for a country, city and network type
    Operators {
        country: String,
        city: String,
        #[arg(value_parser = parse_enum::<NetworkType>)]
        network: NetworkType,
    },

    /// Show the full country / city / operator tree
    Lists,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Ports ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PortsArgs {
    #[command(subcommand)]
    pub command: PortsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortsCommand {
    /// List ports
    #[command(alias = "ls")]
    List {
        /// Sort field
        #[arg(long, default_value = "id", value_parser = parse_enum::<OrderField>)]
        order: OrderField,

        /// Sort direction
        #[arg(long, default_value = "desc", value_parser = parse_enum::<OrderDirection>)]
        direction: OrderDirection,
    },

    /// Rent a new port
    Create(PortSpecArgs),

    /// Price a port without creating it
    #[command(alias = "price")]
    Calculate(PortSpecArgs),

    /// Delete a port
    #[command(alias = "rm")]
    Delete { id: u64 },

    /// Update a port's settings
    Update {
        id: u64,

        #[arg(long)]
        name: Option<String>,

        /// VPN client platform
        #[arg(long, value_parser = parse_enum::<VpnClient>)]
        vpn: Option<VpnClient>,

        #[command(flatten)]
        rotation: RotationArgs,

        #[arg(long, value_parser = parse_enum::<TrafficMode>)]
        traffic: Option<TrafficMode>,
    },

    /// Add traffic volume to a port
    Renew {
        id: u64,

        /// Volume in GB
        #[arg(long)]
        volume: f64,
    },

    /// Force a new exit IP on a port
    RotateIp { id: u64 },
}

#[derive(Debug, Args)]
pub struct PortSpecArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, value_parser = parse_enum::<NetworkType>)]
    pub network: NetworkType,

    #[arg(long)]
    pub country: String,

    #[arg(long)]
    pub city: String,

    #[command(flatten)]
    pub rotation: RotationArgs,

    #[arg(long, default_value = "limited", value_parser = parse_enum::<TrafficMode>)]
    pub traffic: TrafficMode,

    /// Volume in GB
    #[arg(long)]
    pub volume: f64,

    #[arg(long)]
    pub username: String,

    #[arg(long, env = "ASTROPROXY_PORT_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Bind the port to this IP
    #[arg(long)]
    pub ip: Option<String>,
}

#[derive(Debug, Args)]
pub struct RotationArgs {
    /// Rotation trigger
    #[arg(long, value_parser = parse_enum::<RotationTrigger>)]
    pub rotate_by: Option<RotationTrigger>,

    /// Time unit for time-based rotation
    #[arg(long, value_parser = parse_enum::<RotationTimeUnit>)]
    pub rotate_unit: Option<RotationTimeUnit>,

    /// Interval for time-based rotation
    #[arg(long)]
    pub rotate_every: Option<u32>,
}

impl RotationArgs {
    /// Build the rotation policy, or `None` if no trigger was given.
    pub fn to_rotation(&self) -> Result<Option<Rotation>, CliError> {
        let Some(trigger) = self.rotate_by else {
            if self.rotate_unit.is_some() || self.rotate_every.is_some() {
                return Err(CliError::Validation {
                    field: "rotate-by".into(),
                    reason: "--rotate-unit and --rotate-every require --rotate-by".into(),
                });
            }
            return Ok(None);
        };

        match (trigger, self.rotate_unit, self.rotate_every) {
            (RotationTrigger::Time, Some(unit), Some(every)) => {
                Ok(Some(Rotation::by_time(unit, every)))
            }
            (RotationTrigger::Time, _, _) => Err(CliError::Validation {
                field: "rotate-by".into(),
                reason: "time rotation needs --rotate-unit and --rotate-every".into(),
            }),
            (trigger, None, None) => Ok(Some(Rotation {
                trigger,
                time_unit: None,
                interval: None,
            })),
            (_, _, _) => Err(CliError::Validation {
                field: "rotate-by".into(),
                reason: "--rotate-unit and --rotate-every only apply to --rotate-by time".into(),
            }),
        }
    }
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,
    /// Show the current configuration (secrets masked)
    Show,
    /// Print the config file path
    Path,
    /// Store an API key in the system keyring
    SetKey,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    pub shell: clap_complete::Shell,
}

// ── Value parsing ────────────────────────────────────────────────────

/// Parse an API enum by its kebab-case name.
fn parse_enum<T>(raw: &str) -> Result<T, String>
where
    T: FromStr + VariantNames,
{
    raw.parse()
        .map_err(|_| format!("expected one of: {}", T::VARIANTS.join(", ")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_with_time_rotation() {
        let cli = Cli::try_parse_from([
            "astroproxy",
            "ports",
            "create",
            "--name",
            "p1",
            "--network",
            "residential",
            "--country",
            "DE",
            "--city",
            "Berlin",
            "--rotate-by",
            "time",
            "--rotate-unit",
            "minutes",
            "--rotate-every",
            "10",
            "--volume",
            "1.5",
            "--username",
            "u",
            "--password",
            "p",
        ])
        .unwrap();

        let Command::Ports(PortsArgs {
            command: PortsCommand::Create(spec),
        }) = cli.command
        else {
            panic!("expected ports create");
        };
        assert_eq!(spec.network, NetworkType::Residential);
        assert_eq!(spec.traffic, TrafficMode::Limited);
        assert_eq!(
            spec.rotation.to_rotation().unwrap(),
            Some(Rotation::by_time(RotationTimeUnit::Minutes, 10))
        );
    }

    #[test]
    fn rejects_unknown_network() {
        let err = Cli::try_parse_from(["astroproxy", "operators", "DE", "Berlin", "satellite"])
            .unwrap_err();
        assert!(err.to_string().contains("residential"));
    }

    #[test]
    fn time_rotation_requires_unit() {
        let args = RotationArgs {
            rotate_by: Some(RotationTrigger::Time),
            rotate_unit: None,
            rotate_every: Some(5),
        };
        assert!(args.to_rotation().is_err());
    }

    #[test]
    fn link_rotation_rejects_time_flags() {
        for (unit, every) in [
            (None, Some(5)),
            (Some(RotationTimeUnit::Hours), None),
        ] {
            let args = RotationArgs {
                rotate_by: Some(RotationTrigger::Link),
                rotate_unit: unit,
                rotate_every: every,
            };
            assert!(matches!(
                args.to_rotation(),
                Err(CliError::Validation { .. })
            ));
        }

        let args = RotationArgs {
            rotate_by: Some(RotationTrigger::Request),
            rotate_unit: None,
            rotate_every: None,
        };
        assert_eq!(args.to_rotation().unwrap(), Some(Rotation::by_request()));
    }

    #[test]
    fn no_rotation_flags_means_no_change() {
        let args = RotationArgs {
            rotate_by: None,
            rotate_unit: None,
            rotate_every: None,
        };
        assert_eq!(args.to_rotation().unwrap(), None);
    }
}
