// ABOUTME: Node lifecycle statuses and their teardown classification.
// ABOUTME: Exports NodeStatus and the pure status classifier.

mod classify;
mod node_status;

pub use classify::{StatusClass, classify};
pub use node_status::NodeStatus;
