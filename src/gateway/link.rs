// ABOUTME: Interface link operations trait.
// ABOUTME: Link and unlink subnets, inspect interfaces, manage default gateways.

use super::error::GatewayError;
use super::types::{LinkParams, NetworkInterface};
use crate::types::{InterfaceId, LinkId, SystemId};
use async_trait::async_trait;

/// Link operations on a node's network interfaces.
#[async_trait]
pub trait LinkOps: Send + Sync {
    /// Fetch an interface together with its current links.
    async fn get_interface(
        &self,
        node: &SystemId,
        interface: InterfaceId,
    ) -> Result<NetworkInterface, GatewayError>;

    /// Link the interface to a subnet. Returns the interface with the new link.
    async fn link_subnet(
        &self,
        node: &SystemId,
        interface: InterfaceId,
        params: &LinkParams,
    ) -> Result<NetworkInterface, GatewayError>;

    /// Remove one link from the interface.
    async fn unlink_subnet(
        &self,
        node: &SystemId,
        interface: InterfaceId,
        link: LinkId,
    ) -> Result<(), GatewayError>;

    /// Use the link's subnet gateway as the node's default route.
    ///
    /// Does not clear the flag elsewhere on the node.
    async fn set_default_gateway(
        &self,
        node: &SystemId,
        interface: InterfaceId,
        link: LinkId,
    ) -> Result<(), GatewayError>;

    /// Clear the default-gateway flag on every interface of the node.
    async fn clear_default_gateways(&self, node: &SystemId) -> Result<(), GatewayError>;
}
