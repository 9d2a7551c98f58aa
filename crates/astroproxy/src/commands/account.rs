//! Account balance command handler.

use astroproxy_api::AstroProxyClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(client: &AstroProxyClient, global: &GlobalOpts) -> Result<(), CliError> {
    let balance = client.get_balance().await?;
    output::emit(global, &balance)
}
