// ABOUTME: Node lifecycle operations trait.
// ABOUTME: Fetch a node, abort its current operation, release it.

use super::error::GatewayError;
use super::types::{Node, ReleaseParams};
use crate::types::SystemId;
use async_trait::async_trait;

/// Node lifecycle operations: fetch, abort, release.
#[async_trait]
pub trait NodeLifecycleOps: Send + Sync {
    /// Fetch a node. Must return [`GatewayError::NotFound`] when the node does not exist.
    async fn get_node(&self, id: &SystemId) -> Result<Node, GatewayError>;

    /// Abort the node's in-progress operation, recording `comment` in its event log.
    async fn abort_node(&self, id: &SystemId, comment: &str) -> Result<Node, GatewayError>;

    /// Release the node back to the pool.
    async fn release_node(&self, id: &SystemId, params: &ReleaseParams)
    -> Result<Node, GatewayError>;
}
