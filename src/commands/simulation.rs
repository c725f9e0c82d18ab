// ABOUTME: Shared helper for running link commands against an inventory file.
// ABOUTME: Loads the inventory into an in-memory gateway and persists it on request.

use std::path::PathBuf;

use nodelink::error::Result;
use nodelink::gateway::{InMemoryGateway, Inventory};
use nodelink::output::Output;

use crate::cli::InterfaceTarget;

/// An inventory file opened for one command.
pub struct Simulation {
    path: PathBuf,
    write: bool,
    pub gateway: InMemoryGateway,
}

impl Simulation {
    pub fn open(target: &InterfaceTarget) -> Result<Self> {
        let inventory = Inventory::load(&target.inventory)?;
        tracing::debug!(
            "Loaded {} machine(s) from {}",
            inventory.nodes.len(),
            target.inventory.display()
        );
        Ok(Self {
            path: target.inventory.clone(),
            write: target.write,
            gateway: InMemoryGateway::new(inventory),
        })
    }

    /// Report the calls issued and, if requested, save the resulting inventory.
    ///
    /// Runs whether or not the command succeeded, since calls before a
    /// failure have already changed the machines.
    pub fn finish(&self, output: &Output) -> Result<()> {
        output.calls(&self.gateway.calls());

        if self.write {
            let yaml = self.gateway.snapshot().to_yaml()?;
            std::fs::write(&self.path, yaml)?;
            output.progress(&format!("  ✓ Wrote {}", self.path.display()));
        }
        Ok(())
    }
}
