// ABOUTME: Lifecycle-aware removal of a single interface link.
// ABOUTME: Inspects the node's status and runs the matching abort/release/unlink sequence.

use snafu::ResultExt;

use crate::config::TeardownConfig;
use crate::gateway::{GatewayError, LinkOps, NodeLifecycleOps};
use crate::status::classify;
use crate::types::{InterfaceId, LinkId, SystemId};

use super::error::{
    AbortSnafu, LinkError, NodeLookupSnafu, ReleaseSnafu, UnlinkSnafu, UnsafeStatusSnafu,
};
use super::plan::{TeardownPlan, TeardownStep};

/// What a teardown ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// The node no longer exists; nothing to remove.
    NodeAbsent,
    /// The link was removed using the given plan.
    Unlinked(TeardownPlan),
}

/// Removes links without disturbing the owning node's provisioning workflow.
///
/// Unlinking is only accepted by the managed system while the node is idle.
/// For busy nodes the in-progress operation is aborted and the node released
/// first; for settled-but-held nodes it is only released. Statuses outside
/// the known table are refused rather than guessed at.
///
/// Steps run strictly in order and stop at the first error. Nothing is
/// retried or rolled back.
pub struct LinkTeardown<'a, G: ?Sized> {
    gateway: &'a G,
    config: &'a TeardownConfig,
}

impl<'a, G> LinkTeardown<'a, G>
where
    G: NodeLifecycleOps + LinkOps + ?Sized,
{
    pub fn new(gateway: &'a G, config: &'a TeardownConfig) -> Self {
        Self { gateway, config }
    }

    /// Remove `link` from `interface` on `node`.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::UnsafeStatus` if the node's status is unrecognized,
    /// or the error of the first gateway step that failed. A node that no
    /// longer exists is not an error.
    pub async fn unlink(
        &self,
        node: &SystemId,
        interface: InterfaceId,
        link: LinkId,
    ) -> Result<TeardownOutcome, LinkError> {
        let machine = match self.gateway.get_node(node).await {
            Ok(machine) => machine,
            Err(GatewayError::NotFound(_)) => {
                tracing::debug!("Machine {} no longer exists, skipping unlink of {}", node, link);
                return Ok(TeardownOutcome::NodeAbsent);
            }
            Err(source) => {
                return Err(source).context(NodeLookupSnafu { node: node.clone() });
            }
        };

        let class = classify(&machine.status);
        let Some(plan) = TeardownPlan::for_class(class) else {
            tracing::warn!(
                "Refusing to unlink {} from machine {} in unrecognized status {}",
                link,
                node,
                machine.status
            );
            return UnsafeStatusSnafu {
                node: node.clone(),
                status: machine.status,
            }
            .fail();
        };

        tracing::debug!(
            "Machine {} is {} ({}), removing link {} via: {}",
            node,
            machine.status,
            class,
            link,
            plan
        );

        for step in plan.steps() {
            self.run_step(*step, node, interface, link).await?;
        }

        Ok(TeardownOutcome::Unlinked(plan))
    }

    async fn run_step(
        &self,
        step: TeardownStep,
        node: &SystemId,
        interface: InterfaceId,
        link: LinkId,
    ) -> Result<(), LinkError> {
        match step {
            TeardownStep::Abort => {
                let message = self.config.abort_message_for(node);
                tracing::info!("Aborting current operation on machine {}", node);
                self.gateway
                    .abort_node(node, &message)
                    .await
                    .context(AbortSnafu { node: node.clone() })?;
            }
            TeardownStep::Release => {
                tracing::info!("Releasing machine {}", node);
                self.gateway
                    .release_node(node, &self.config.release)
                    .await
                    .context(ReleaseSnafu { node: node.clone() })?;
            }
            TeardownStep::Unlink => {
                tracing::info!(
                    "Unlinking {} from interface {} on machine {}",
                    link,
                    interface,
                    node
                );
                self.gateway
                    .unlink_subnet(node, interface, link)
                    .await
                    .context(UnlinkSnafu {
                        node: node.clone(),
                        interface,
                        link,
                    })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{
        GatewayCall, GatewayCallKind, InMemoryGateway, Link, LinkMode, NetworkInterface, Node,
    };
    use crate::link::LinkErrorKind;
    use crate::status::NodeStatus;
    use crate::types::SubnetId;

    fn sid() -> SystemId {
        SystemId::new("abc123").unwrap()
    }

    fn gateway(status: NodeStatus) -> InMemoryGateway {
        InMemoryGateway::with_node(Node::new(sid(), status).with_interface(
            NetworkInterface::new(InterfaceId::new(1), "eth0").with_link(Link {
                id: LinkId::new(42),
                mode: LinkMode::Auto,
                ip_address: None,
                subnet: SubnetId::new(3),
                default_gateway: false,
            }),
        ))
    }

    async fn run(gw: &InMemoryGateway) -> Result<TeardownOutcome, LinkError> {
        let config = TeardownConfig::default();
        LinkTeardown::new(gw, &config)
            .unlink(&sid(), InterfaceId::new(1), LinkId::new(42))
            .await
    }

    #[tokio::test]
    async fn valid_node_unlinks_directly() {
        let gw = gateway(NodeStatus::Ready);
        let outcome = run(&gw).await.unwrap();
        assert_eq!(outcome, TeardownOutcome::Unlinked(TeardownPlan::Unlink));
        assert_eq!(
            gw.call_kinds(),
            vec![GatewayCallKind::GetNode, GatewayCallKind::UnlinkSubnet]
        );
    }

    #[tokio::test]
    async fn abort_message_names_the_machine() {
        let gw = gateway(NodeStatus::Testing);
        run(&gw).await.unwrap();
        let abort = gw
            .calls()
            .into_iter()
            .find_map(|c| match c {
                GatewayCall::AbortNode { comment, .. } => Some(comment),
                _ => None,
            })
            .expect("abort should be issued");
        assert!(abort.contains("abc123"));
        assert!(abort.contains("Aborting current operation"));
    }

    #[tokio::test]
    async fn lookup_failure_other_than_not_found_propagates() {
        let gw = gateway(NodeStatus::Ready);
        gw.fail_on(GatewayCallKind::GetNode, GatewayError::Api("timeout".into()));

        let err = run(&gw).await.unwrap_err();
        assert_eq!(err.kind(), LinkErrorKind::GatewayFailure);
        assert_eq!(gw.call_kinds(), vec![GatewayCallKind::GetNode]);
    }

    #[tokio::test]
    async fn unlink_failure_identifies_the_link() {
        let gw = gateway(NodeStatus::Ready);
        gw.fail_on(GatewayCallKind::UnlinkSubnet, GatewayError::Api("busy".into()));

        let err = run(&gw).await.unwrap_err();
        assert!(matches!(err, LinkError::Unlink { link, .. } if link == LinkId::new(42)));
    }
}
