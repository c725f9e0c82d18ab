// ABOUTME: Link command implementations: create, read, update, delete.
// ABOUTME: Each runs the link manager against a simulated inventory.

use std::net::IpAddr;

use nodelink::config::Config;
use nodelink::error::Result;
use nodelink::gateway::{LinkMode, LinkParams};
use nodelink::link::{LinkManager, TeardownOutcome};
use nodelink::output::Output;
use nodelink::types::{LinkId, SubnetId};

use super::simulation::Simulation;
use crate::cli::InterfaceTarget;

pub struct CreateArgs {
    pub subnet: SubnetId,
    pub mode: Option<LinkMode>,
    pub ip_address: Option<IpAddr>,
    pub default_gateway: bool,
}

pub async fn create(
    config: &Config,
    target: &InterfaceTarget,
    args: CreateArgs,
    output: &Output,
) -> Result<()> {
    let sim = Simulation::open(target)?;
    let manager = LinkManager::new(&sim.gateway, &config.teardown);

    let mut params = LinkParams::new(args.subnet, args.mode.unwrap_or(config.default_mode))
        .default_gateway(args.default_gateway);
    params.ip_address = args.ip_address;

    output.progress(&format!(
        "Linking interface {} on {} to subnet {}",
        target.interface, target.machine, args.subnet
    ));
    let result = manager
        .create(&target.machine, target.interface, &params)
        .await;
    sim.finish(output)?;

    let link = result?;
    output.success_with(&format!("Created link {}", link.id), &link);
    Ok(())
}

pub async fn read(
    config: &Config,
    target: &InterfaceTarget,
    link: LinkId,
    output: &Output,
) -> Result<()> {
    let sim = Simulation::open(target)?;
    let manager = LinkManager::new(&sim.gateway, &config.teardown);

    let result = manager.read(&target.machine, target.interface, link).await;
    sim.finish(output)?;

    let link = result?;
    let address = link
        .ip_address
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "-".to_string());
    output.success_with(
        &format!(
            "Link {}: subnet {} mode {} address {} default gateway {}",
            link.id, link.subnet, link.mode, address, link.default_gateway
        ),
        &link,
    );
    Ok(())
}

pub async fn update(
    config: &Config,
    target: &InterfaceTarget,
    link: LinkId,
    default_gateway: bool,
    output: &Output,
) -> Result<()> {
    let sim = Simulation::open(target)?;
    let manager = LinkManager::new(&sim.gateway, &config.teardown);

    let result = manager
        .update(&target.machine, target.interface, link, default_gateway)
        .await;
    sim.finish(output)?;
    result?;

    if default_gateway {
        output.success(&format!("Link {link} is now the default gateway"));
    } else {
        output.success(&format!("Cleared default gateways on {}", target.machine));
    }
    Ok(())
}

pub async fn delete(
    config: &Config,
    target: &InterfaceTarget,
    link: LinkId,
    output: &Output,
) -> Result<()> {
    let sim = Simulation::open(target)?;
    let manager = LinkManager::new(&sim.gateway, &config.teardown);

    let result = manager.delete(&target.machine, target.interface, link).await;
    sim.finish(output)?;

    match result? {
        TeardownOutcome::NodeAbsent => output.success(&format!(
            "Machine {} no longer exists; nothing to remove",
            target.machine
        )),
        TeardownOutcome::Unlinked(plan) => {
            output.success(&format!("Removed link {link} ({plan})"))
        }
    }
    Ok(())
}
