//! Port lifecycle command handlers.

use tracing::info;

use astroproxy_api::{AstroProxyClient, Ordering, PortSpec, PortUpdate};

use crate::cli::{GlobalOpts, PortSpecArgs, PortsArgs, PortsCommand};
use crate::commands::util;
use crate::error::CliError;
use crate::output;

impl PortSpecArgs {
    fn to_spec(&self) -> Result<PortSpec, CliError> {
        let rotation = self.rotation.to_rotation()?.ok_or_else(|| CliError::Validation {
            field: "rotate-by".into(),
            reason: "a rotation trigger is required (time, link or request)".into(),
        })?;

        Ok(PortSpec {
            name: self.name.clone(),
            network: self.network,
            country: self.country.clone(),
            city: self.city.clone(),
            rotation,
            traffic: self.traffic,
            volume: self.volume,
            username: self.username.clone(),
            password: self.password.clone(),
            ip: self.ip.clone(),
        })
    }
}

pub async fn handle(
    client: &AstroProxyClient,
    args: PortsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let data = match args.command {
        PortsCommand::List { order, direction } => {
            client.list_ports(Ordering::new(order, direction)).await?
        }

        PortsCommand::Create(spec) => {
            let spec = spec.to_spec()?;
            info!(name = %spec.name, "creating port");
            client.create_port(&spec).await?
        }

        PortsCommand::Calculate(spec) => client.calculate_cost(&spec.to_spec()?).await?,

        PortsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete port {id}?"), global.yes)? {
                return Err(CliError::NotConfirmed {
                    action: format!("delete port {id}"),
                });
            }
            client
                .delete_port(id)
                .await
                .map_err(|e| CliError::from(e).for_port(id))?
        }

        PortsCommand::Update {
            id,
            name,
            vpn,
            rotation,
            traffic,
        } => {
            let update = PortUpdate {
                name,
                vpn,
                rotation: rotation.to_rotation()?,
                traffic,
            };
            if update == PortUpdate::default() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to update; pass at least one field".into(),
                });
            }
            client
                .update_port(id, &update)
                .await
                .map_err(|e| CliError::from(e).for_port(id))?
        }

        PortsCommand::Renew { id, volume } => {
            if !(volume.is_finite() && volume > 0.0) {
                return Err(CliError::Validation {
                    field: "volume".into(),
                    reason: format!("must be a positive number, got {volume}"),
                });
            }
            client
                .renew_port(id, volume)
                .await
                .map_err(|e| CliError::from(e).for_port(id))?
        }

        PortsCommand::RotateIp { id } => client
            .rotate_ip(id)
            .await
            .map_err(|e| CliError::from(e).for_port(id))?,
    };

    output::emit(global, &data)
}
