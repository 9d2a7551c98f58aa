//! Command handlers, one module per command group.

pub mod account;
pub mod config_cmd;
pub mod geo;
pub mod ports;
pub mod util;

use astroproxy_api::AstroProxyClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route an API command to its handler.
pub async fn dispatch(
    cmd: Command,
    client: &AstroProxyClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Balance => account::handle(client, global).await,
        Command::Ports(args) => ports::handle(client, args, global).await,
        Command::Countries | Command::Cities { .. } | Command::Operators { .. } | Command::Lists => {
            geo::handle(client, cmd, global).await
        }
        // Handled in main before a client is built
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
