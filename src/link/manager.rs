// ABOUTME: Create, read, update, and delete for interface links.
// ABOUTME: Keeps one link per interface and one default gateway per node.

use snafu::{OptionExt, ResultExt};

use crate::config::TeardownConfig;
use crate::gateway::{Link, LinkOps, LinkParams, NodeLifecycleOps};
use crate::types::{InterfaceId, LinkId, SystemId};

use super::error::{
    ClearDefaultGatewaysSnafu, EmptyLinkResponseSnafu, InterfaceLookupSnafu,
    InvalidParamsSnafu, LinkError, LinkNotFoundSnafu, LinkSubnetSnafu, SetDefaultGatewaySnafu,
};
use super::teardown::{LinkTeardown, TeardownOutcome};

/// Manages the link between one network interface and a subnet.
///
/// An interface managed here carries at most one link: `create` tears down
/// every existing link before linking. Default-gateway exclusivity across the
/// node is kept by clearing the flag everywhere before setting it. Neither
/// step is atomic; callers are expected to serialize operations per node.
pub struct LinkManager<'a, G: ?Sized> {
    gateway: &'a G,
    config: &'a TeardownConfig,
}

impl<'a, G> LinkManager<'a, G>
where
    G: NodeLifecycleOps + LinkOps + ?Sized,
{
    pub fn new(gateway: &'a G, config: &'a TeardownConfig) -> Self {
        Self { gateway, config }
    }

    fn teardown(&self) -> LinkTeardown<'a, G> {
        LinkTeardown::new(self.gateway, self.config)
    }

    /// Replace the interface's links with a new one built from `params`.
    ///
    /// Existing links are torn down one by one first. When the new link is to
    /// be the default gateway, the role is cleared across the node before
    /// linking. If any step fails the error is returned as is; links already
    /// removed stay removed.
    pub async fn create(
        &self,
        node: &SystemId,
        interface: InterfaceId,
        params: &LinkParams,
    ) -> Result<Link, LinkError> {
        params.validate().context(InvalidParamsSnafu)?;

        let current = self.fetch_interface(node, interface).await?;
        if !current.links.is_empty() {
            tracing::debug!(
                "Clearing {} existing link(s) from interface {} on machine {}",
                current.links.len(),
                interface,
                node
            );
        }
        for existing in &current.links {
            self.teardown().unlink(node, interface, existing.id).await?;
        }

        if params.default_gateway {
            self.gateway
                .clear_default_gateways(node)
                .await
                .context(ClearDefaultGatewaysSnafu { node: node.clone() })?;
        }

        let updated = self
            .gateway
            .link_subnet(node, interface, params)
            .await
            .context(LinkSubnetSnafu {
                node: node.clone(),
                interface,
                subnet: params.subnet,
            })?;

        let link = updated
            .links
            .into_iter()
            .next()
            .context(EmptyLinkResponseSnafu {
                node: node.clone(),
                interface,
            })?;

        tracing::info!(
            "Linked interface {} on machine {} to subnet {} as link {} ({})",
            interface,
            node,
            link.subnet,
            link.id,
            link.mode
        );
        Ok(link)
    }

    /// Find a link among the interface's current links.
    pub async fn read(
        &self,
        node: &SystemId,
        interface: InterfaceId,
        link: LinkId,
    ) -> Result<Link, LinkError> {
        let current = self.fetch_interface(node, interface).await?;
        current
            .links
            .into_iter()
            .find(|l| l.id == link)
            .context(LinkNotFoundSnafu {
                node: node.clone(),
                interface,
                link,
            })
    }

    /// Set or clear the link's default-gateway role.
    ///
    /// Default gateways are always cleared across the whole node first, so at
    /// most one link ends up holding the role.
    pub async fn update(
        &self,
        node: &SystemId,
        interface: InterfaceId,
        link: LinkId,
        default_gateway: bool,
    ) -> Result<(), LinkError> {
        self.gateway
            .clear_default_gateways(node)
            .await
            .context(ClearDefaultGatewaysSnafu { node: node.clone() })?;

        if default_gateway {
            tracing::info!(
                "Setting link {} on interface {} as default gateway for machine {}",
                link,
                interface,
                node
            );
            self.gateway
                .set_default_gateway(node, interface, link)
                .await
                .context(SetDefaultGatewaySnafu {
                    node: node.clone(),
                    interface,
                    link,
                })?;
        }

        Ok(())
    }

    /// Remove the link, honouring the node's lifecycle state.
    pub async fn delete(
        &self,
        node: &SystemId,
        interface: InterfaceId,
        link: LinkId,
    ) -> Result<TeardownOutcome, LinkError> {
        self.teardown().unlink(node, interface, link).await
    }

    async fn fetch_interface(
        &self,
        node: &SystemId,
        interface: InterfaceId,
    ) -> Result<crate::gateway::NetworkInterface, LinkError> {
        self.gateway
            .get_interface(node, interface)
            .await
            .context(InterfaceLookupSnafu {
                node: node.clone(),
                interface,
            })
    }
}
