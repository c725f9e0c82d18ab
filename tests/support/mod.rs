// ABOUTME: Test support utilities.
// ABOUTME: Provides tracing setup and machine fixtures for integration tests.

use std::sync::Once;

use nodelink::gateway::{InMemoryGateway, Link, LinkMode, NetworkInterface, Node};
use nodelink::status::NodeStatus;
use nodelink::types::{InterfaceId, LinkId, SubnetId, SystemId};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("nodelink=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const ETH0: InterfaceId = InterfaceId::new(1);
#[allow(dead_code)]
pub const ETH1: InterfaceId = InterfaceId::new(2);

#[allow(dead_code)]
pub fn system_id() -> SystemId {
    SystemId::new("4y3h7n").unwrap()
}

#[allow(dead_code)]
pub fn link(id: u64, mode: LinkMode, default_gateway: bool) -> Link {
    Link {
        id: LinkId::new(id),
        mode,
        ip_address: None,
        subnet: SubnetId::new(3),
        default_gateway,
    }
}

/// A machine with eth0 carrying link `link_id` and an empty eth1.
#[allow(dead_code)]
pub fn machine(status: NodeStatus, link_id: u64) -> Node {
    Node::new(system_id(), status)
        .with_interface(
            NetworkInterface::new(ETH0, "eth0").with_link(link(link_id, LinkMode::Auto, false)),
        )
        .with_interface(NetworkInterface::new(ETH1, "eth1"))
}

#[allow(dead_code)]
pub fn gateway(status: NodeStatus, link_id: u64) -> InMemoryGateway {
    init_tracing();
    InMemoryGateway::with_node(machine(status, link_id))
}
