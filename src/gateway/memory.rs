// ABOUTME: In-process gateway backed by an inventory of nodes.
// ABOUTME: Records every call in order and supports one-shot failure injection.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::error::GatewayError;
use super::link::LinkOps;
use super::node::NodeLifecycleOps;
use super::types::{Link, LinkMode, LinkParams, NetworkInterface, Node, ReleaseParams};
use crate::status::{NodeStatus, StatusClass, classify};
use crate::types::{InterfaceId, LinkId, SubnetId, SystemId};

/// A set of nodes as the managed system would report them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Inventory {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml(&content)?)
    }

    pub fn node(&self, id: &SystemId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.system_id == id)
    }

    fn node_mut(&mut self, id: &SystemId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.system_id == id)
    }

    fn max_link_id(&self) -> u64 {
        self.nodes
            .iter()
            .flat_map(|n| n.links())
            .map(|l| l.id.get())
            .max()
            .unwrap_or(0)
    }
}

/// Kind of a recorded call, used for failure injection and order assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayCallKind {
    GetNode,
    AbortNode,
    ReleaseNode,
    GetInterface,
    LinkSubnet,
    UnlinkSubnet,
    SetDefaultGateway,
    ClearDefaultGateways,
}

/// A call issued against the gateway, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum GatewayCall {
    GetNode {
        node: SystemId,
    },
    AbortNode {
        node: SystemId,
        comment: String,
    },
    ReleaseNode {
        node: SystemId,
        params: ReleaseParams,
    },
    GetInterface {
        node: SystemId,
        interface: InterfaceId,
    },
    LinkSubnet {
        node: SystemId,
        interface: InterfaceId,
        subnet: SubnetId,
        mode: LinkMode,
    },
    UnlinkSubnet {
        node: SystemId,
        interface: InterfaceId,
        link: LinkId,
    },
    SetDefaultGateway {
        node: SystemId,
        interface: InterfaceId,
        link: LinkId,
    },
    ClearDefaultGateways {
        node: SystemId,
    },
}

impl GatewayCall {
    pub fn kind(&self) -> GatewayCallKind {
        match self {
            GatewayCall::GetNode { .. } => GatewayCallKind::GetNode,
            GatewayCall::AbortNode { .. } => GatewayCallKind::AbortNode,
            GatewayCall::ReleaseNode { .. } => GatewayCallKind::ReleaseNode,
            GatewayCall::GetInterface { .. } => GatewayCallKind::GetInterface,
            GatewayCall::LinkSubnet { .. } => GatewayCallKind::LinkSubnet,
            GatewayCall::UnlinkSubnet { .. } => GatewayCallKind::UnlinkSubnet,
            GatewayCall::SetDefaultGateway { .. } => GatewayCallKind::SetDefaultGateway,
            GatewayCall::ClearDefaultGateways { .. } => GatewayCallKind::ClearDefaultGateways,
        }
    }
}

impl fmt::Display for GatewayCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayCall::GetNode { node } => write!(f, "get node {node}"),
            GatewayCall::AbortNode { node, comment } => write!(f, "abort {node}: {comment}"),
            GatewayCall::ReleaseNode { node, .. } => write!(f, "release {node}"),
            GatewayCall::GetInterface { node, interface } => {
                write!(f, "get interface {interface} on {node}")
            }
            GatewayCall::LinkSubnet {
                node,
                interface,
                subnet,
                mode,
            } => write!(f, "link interface {interface} on {node} to subnet {subnet} ({mode})"),
            GatewayCall::UnlinkSubnet {
                node,
                interface,
                link,
            } => write!(f, "unlink {link} from interface {interface} on {node}"),
            GatewayCall::SetDefaultGateway {
                node,
                interface,
                link,
            } => write!(f, "set default gateway {link} on interface {interface} of {node}"),
            GatewayCall::ClearDefaultGateways { node } => {
                write!(f, "clear default gateways on {node}")
            }
        }
    }
}

/// Status a transitional node falls back to when its operation is aborted.
fn aborted_status(status: &NodeStatus) -> Option<NodeStatus> {
    let next = match status {
        NodeStatus::Commissioning => NodeStatus::New,
        NodeStatus::Deploying | NodeStatus::Releasing | NodeStatus::DiskErasing => {
            NodeStatus::Allocated
        }
        NodeStatus::EnteringRescueMode => NodeStatus::Deployed,
        NodeStatus::ExitingRescueMode => NodeStatus::RescueMode,
        NodeStatus::Testing => NodeStatus::Ready,
        _ => return None,
    };
    Some(next)
}

struct State {
    inventory: Inventory,
    calls: Vec<GatewayCall>,
    events: Vec<(SystemId, String)>,
    failures: HashMap<GatewayCallKind, GatewayError>,
    next_link_id: u64,
}

impl State {
    /// Record the call, then fail it if a failure was injected for its kind.
    fn issue(&mut self, call: GatewayCall) -> Result<(), GatewayError> {
        let kind = call.kind();
        self.calls.push(call);
        match self.failures.remove(&kind) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn node_mut(&mut self, id: &SystemId) -> Result<&mut Node, GatewayError> {
        self.inventory
            .node_mut(id)
            .ok_or_else(|| GatewayError::NotFound(format!("machine {id}")))
    }

    fn interface_mut(
        &mut self,
        node: &SystemId,
        interface: InterfaceId,
    ) -> Result<&mut NetworkInterface, GatewayError> {
        self.node_mut(node)?
            .interface_mut(interface)
            .ok_or_else(|| GatewayError::NotFound(format!("interface {interface} on {node}")))
    }

    /// The managed system rejects link changes unless the node is idle.
    fn require_linkable(&mut self, node: &SystemId) -> Result<(), GatewayError> {
        let status = &self.node_mut(node)?.status;
        if classify(status) != StatusClass::Valid {
            return Err(GatewayError::Conflict(format!(
                "machine {node} is in status {status}; links cannot be changed"
            )));
        }
        Ok(())
    }
}

/// Gateway implementation that keeps nodes in memory.
///
/// Behaves like the managed system closely enough to exercise the teardown
/// rules: link changes are rejected on busy nodes, abort only applies to
/// nodes with an operation in progress, and release returns nodes to Ready.
pub struct InMemoryGateway {
    state: Mutex<State>,
}

impl InMemoryGateway {
    pub fn new(inventory: Inventory) -> Self {
        let next_link_id = inventory.max_link_id() + 1;
        Self {
            state: Mutex::new(State {
                inventory,
                calls: Vec::new(),
                events: Vec::new(),
                failures: HashMap::new(),
                next_link_id,
            }),
        }
    }

    /// Convenience constructor for a single-node inventory.
    pub fn with_node(node: Node) -> Self {
        Self::new(Inventory { nodes: vec![node] })
    }

    /// Make the next call of `kind` fail with `err`.
    pub fn fail_on(&self, kind: GatewayCallKind, err: GatewayError) {
        self.state.lock().failures.insert(kind, err);
    }

    /// All calls issued so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().calls.clone()
    }

    pub fn call_kinds(&self) -> Vec<GatewayCallKind> {
        self.state.lock().calls.iter().map(GatewayCall::kind).collect()
    }

    /// Audit messages recorded by abort calls.
    pub fn events(&self) -> Vec<(SystemId, String)> {
        self.state.lock().events.clone()
    }

    pub fn node(&self, id: &SystemId) -> Option<Node> {
        self.state.lock().inventory.node(id).cloned()
    }

    pub fn snapshot(&self) -> Inventory {
        self.state.lock().inventory.clone()
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new(Inventory::default())
    }
}

#[async_trait]
impl NodeLifecycleOps for InMemoryGateway {
    async fn get_node(&self, id: &SystemId) -> Result<Node, GatewayError> {
        let mut state = self.state.lock();
        state.issue(GatewayCall::GetNode { node: id.clone() })?;
        state.node_mut(id).map(|n| n.clone())
    }

    async fn abort_node(&self, id: &SystemId, comment: &str) -> Result<Node, GatewayError> {
        let mut state = self.state.lock();
        state.issue(GatewayCall::AbortNode {
            node: id.clone(),
            comment: comment.to_string(),
        })?;

        let node = state.node_mut(id)?;
        let next = aborted_status(&node.status).ok_or_else(|| {
            GatewayError::Conflict(format!(
                "machine {id} in status {} has no operation to abort",
                node.status
            ))
        })?;
        node.status = next;
        let node = node.clone();
        state.events.push((id.clone(), comment.to_string()));
        Ok(node)
    }

    async fn release_node(
        &self,
        id: &SystemId,
        params: &ReleaseParams,
    ) -> Result<Node, GatewayError> {
        let mut state = self.state.lock();
        state.issue(GatewayCall::ReleaseNode {
            node: id.clone(),
            params: params.clone(),
        })?;

        let node = state.node_mut(id)?;
        if !node.status.is_recognized() {
            return Err(GatewayError::Conflict(format!(
                "machine {id} cannot be released from status {}",
                node.status
            )));
        }
        node.status = NodeStatus::Ready;
        Ok(node.clone())
    }
}

#[async_trait]
impl LinkOps for InMemoryGateway {
    async fn get_interface(
        &self,
        node: &SystemId,
        interface: InterfaceId,
    ) -> Result<NetworkInterface, GatewayError> {
        let mut state = self.state.lock();
        state.issue(GatewayCall::GetInterface {
            node: node.clone(),
            interface,
        })?;
        state.interface_mut(node, interface).map(|i| i.clone())
    }

    async fn link_subnet(
        &self,
        node: &SystemId,
        interface: InterfaceId,
        params: &LinkParams,
    ) -> Result<NetworkInterface, GatewayError> {
        let mut state = self.state.lock();
        state.issue(GatewayCall::LinkSubnet {
            node: node.clone(),
            interface,
            subnet: params.subnet,
            mode: params.mode,
        })?;

        params
            .validate()
            .map_err(|e| GatewayError::Api(e.to_string()))?;
        state.require_linkable(node)?;
        state.interface_mut(node, interface)?;

        let id = LinkId::new(state.next_link_id);
        state.next_link_id += 1;

        let iface = state.interface_mut(node, interface)?;
        iface.links = vec![Link {
            id,
            mode: params.mode,
            ip_address: params.ip_address,
            subnet: params.subnet,
            default_gateway: params.default_gateway,
        }];
        Ok(iface.clone())
    }

    async fn unlink_subnet(
        &self,
        node: &SystemId,
        interface: InterfaceId,
        link: LinkId,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        state.issue(GatewayCall::UnlinkSubnet {
            node: node.clone(),
            interface,
            link,
        })?;

        state.require_linkable(node)?;
        let iface = state.interface_mut(node, interface)?;
        let before = iface.links.len();
        iface.links.retain(|l| l.id != link);
        if iface.links.len() == before {
            return Err(GatewayError::NotFound(format!(
                "link {link} on interface {interface}"
            )));
        }
        Ok(())
    }

    async fn set_default_gateway(
        &self,
        node: &SystemId,
        interface: InterfaceId,
        link: LinkId,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        state.issue(GatewayCall::SetDefaultGateway {
            node: node.clone(),
            interface,
            link,
        })?;

        let iface = state.interface_mut(node, interface)?;
        let target = iface
            .links
            .iter_mut()
            .find(|l| l.id == link)
            .ok_or_else(|| GatewayError::NotFound(format!("link {link} on interface {interface}")))?;
        if !target.mode.supports_default_gateway() {
            return Err(GatewayError::Conflict(format!(
                "link {link} uses mode {}; default gateway needs AUTO or STATIC",
                target.mode
            )));
        }
        target.default_gateway = true;
        Ok(())
    }

    async fn clear_default_gateways(&self, node: &SystemId) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        state.issue(GatewayCall::ClearDefaultGateways { node: node.clone() })?;

        for link in state
            .node_mut(node)?
            .interfaces
            .iter_mut()
            .flat_map(|i| i.links.iter_mut())
        {
            link.default_gateway = false;
        }
        Ok(())
    }
}
