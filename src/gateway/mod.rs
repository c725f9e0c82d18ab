// ABOUTME: Collaborator contracts for the managed node/network system.
// ABOUTME: Defines NodeLifecycleOps, LinkOps, shared data types, and an in-memory implementation.

mod error;
mod link;
pub mod memory;
mod node;
mod types;

pub use error::GatewayError;
pub use link::LinkOps;
pub use memory::{GatewayCall, GatewayCallKind, InMemoryGateway, Inventory};
pub use node::NodeLifecycleOps;
pub use types::*;

/// Everything the link manager needs from the managed system.
///
/// Automatically implemented for any type providing both capabilities.
pub trait Gateway: NodeLifecycleOps + LinkOps {}

impl<T: NodeLifecycleOps + LinkOps> Gateway for T {}
