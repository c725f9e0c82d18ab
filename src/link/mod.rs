// ABOUTME: Interface link management with lifecycle-aware teardown.
// ABOUTME: Exports the teardown planner, orchestrator, link manager, and their errors.

mod error;
mod manager;
mod plan;
mod teardown;

pub use error::{LinkError, LinkErrorKind};
pub use manager::LinkManager;
pub use plan::{TeardownPlan, TeardownStep};
pub use teardown::{LinkTeardown, TeardownOutcome};
