// ABOUTME: Type-safe identifiers for nodes, interfaces, links, and subnets.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
mod system_id;

pub use id::{Id, InterfaceId, LinkId, SubnetId};
pub use system_id::{SystemId, SystemIdError};
