//! Geo and network metadata command handlers.

use astroproxy_api::AstroProxyClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &AstroProxyClient,
    cmd: Command,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let data = match cmd {
        Command::Countries => client.list_countries().await?,
        Command::Cities { country } => client.list_cities(&country).await?,
        Command::Operators {
            country,
            city,
            network,
        } => client.list_operators(&country, &city, network).await?,
        Command::Lists => client.list_all().await?,
        _ => return Ok(()),
    };
    output::emit(global, &data)
}
