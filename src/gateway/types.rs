// ABOUTME: Data types exchanged with the managed system.
// ABOUTME: Nodes, interfaces, links, link parameters, and release parameters.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::NodeStatus;
use crate::types::{InterfaceId, LinkId, SubnetId, SystemId};

/// A managed compute node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub system_id: SystemId,
    #[serde(default)]
    pub hostname: String,
    pub status: NodeStatus,
    #[serde(default)]
    pub interfaces: Vec<NetworkInterface>,
}

impl Node {
    pub fn new(system_id: SystemId, status: NodeStatus) -> Self {
        Self {
            system_id,
            hostname: String::new(),
            status,
            interfaces: Vec::new(),
        }
    }

    pub fn with_interface(mut self, interface: NetworkInterface) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn interface(&self, id: InterfaceId) -> Option<&NetworkInterface> {
        self.interfaces.iter().find(|i| i.id == id)
    }

    pub fn interface_mut(&mut self, id: InterfaceId) -> Option<&mut NetworkInterface> {
        self.interfaces.iter_mut().find(|i| i.id == id)
    }

    /// Iterate over every link on every interface.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.interfaces.iter().flat_map(|i| i.links.iter())
    }
}

/// A network interface and its current subnet links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub id: InterfaceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl NetworkInterface {
    pub fn new(id: InterfaceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            links: Vec::new(),
        }
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }
}

/// A binding of an interface to a subnet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub mode: LinkMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<IpAddr>,
    pub subnet: SubnetId,
    #[serde(default)]
    pub default_gateway: bool,
}

/// How the interface obtains its address on the subnet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkMode {
    /// Random static address from the subnet.
    #[default]
    Auto,
    /// Address from DHCP on the subnet.
    Dhcp,
    /// The address given in `ip_address`.
    Static,
    /// Interface brought up on the subnet without an address.
    LinkUp,
}

impl LinkMode {
    /// Modes for which the subnet gateway can become the default route.
    pub fn supports_default_gateway(self) -> bool {
        matches!(self, LinkMode::Auto | LinkMode::Static)
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkMode::Auto => "AUTO",
            LinkMode::Dhcp => "DHCP",
            LinkMode::Static => "STATIC",
            LinkMode::LinkUp => "LINK_UP",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Error)]
#[error("unknown link mode '{0}' (expected AUTO, DHCP, STATIC or LINK_UP)")]
pub struct ParseLinkModeError(String);

impl FromStr for LinkMode {
    type Err = ParseLinkModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "AUTO" => Ok(LinkMode::Auto),
            "DHCP" => Ok(LinkMode::Dhcp),
            "STATIC" => Ok(LinkMode::Static),
            "LINK_UP" => Ok(LinkMode::LinkUp),
            _ => Err(ParseLinkModeError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkParamsError {
    #[error("mode STATIC requires an ip_address")]
    MissingIpAddress,

    #[error("ip_address is only used with mode STATIC, not {0}")]
    UnexpectedIpAddress(LinkMode),

    #[error("default_gateway can only be used with AUTO or STATIC, not {0}")]
    DefaultGatewayUnsupported(LinkMode),
}

/// Parameters for creating a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkParams {
    pub subnet: SubnetId,
    #[serde(default)]
    pub mode: LinkMode,
    #[serde(default)]
    pub default_gateway: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<IpAddr>,
}

impl LinkParams {
    pub fn new(subnet: SubnetId, mode: LinkMode) -> Self {
        Self {
            subnet,
            mode,
            default_gateway: false,
            ip_address: None,
        }
    }

    /// Shorthand for a STATIC link with the given address.
    pub fn static_ip(subnet: SubnetId, ip_address: IpAddr) -> Self {
        Self::new(subnet, LinkMode::Static).ip_address(ip_address)
    }

    pub fn ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    pub fn default_gateway(mut self, enabled: bool) -> Self {
        self.default_gateway = enabled;
        self
    }

    /// Check the combination of mode, address and gateway flag.
    pub fn validate(&self) -> Result<(), LinkParamsError> {
        match (self.mode, self.ip_address) {
            (LinkMode::Static, None) => return Err(LinkParamsError::MissingIpAddress),
            (LinkMode::Static, Some(_)) | (_, None) => {}
            (mode, Some(_)) => return Err(LinkParamsError::UnexpectedIpAddress(mode)),
        }

        if self.default_gateway && !self.mode.supports_default_gateway() {
            return Err(LinkParamsError::DefaultGatewayUnsupported(self.mode));
        }

        Ok(())
    }
}

/// Options passed when releasing a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseParams {
    /// Recorded in the node's event log.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Erase disks on release.
    pub erase: bool,
    pub secure_erase: bool,
    pub quick_erase: bool,
    /// Release even if the node is locked or has pending operations.
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subnet() -> SubnetId {
        SubnetId::new(1)
    }

    #[test]
    fn static_requires_address() {
        let params = LinkParams::new(subnet(), LinkMode::Static);
        assert_eq!(params.validate(), Err(LinkParamsError::MissingIpAddress));
    }

    #[test]
    fn address_rejected_outside_static() {
        let params = LinkParams::new(subnet(), LinkMode::Dhcp).ip_address("10.0.0.5".parse().unwrap());
        assert_eq!(
            params.validate(),
            Err(LinkParamsError::UnexpectedIpAddress(LinkMode::Dhcp))
        );
    }

    #[test]
    fn default_gateway_needs_auto_or_static() {
        let params = LinkParams::new(subnet(), LinkMode::LinkUp).default_gateway(true);
        assert_eq!(
            params.validate(),
            Err(LinkParamsError::DefaultGatewayUnsupported(LinkMode::LinkUp))
        );

        let params = LinkParams::new(subnet(), LinkMode::Auto).default_gateway(true);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn static_with_address_is_valid() {
        let params = LinkParams::static_ip(subnet(), "10.0.0.5".parse().unwrap());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn link_mode_parses_loosely() {
        assert_eq!("link-up".parse::<LinkMode>().unwrap(), LinkMode::LinkUp);
        assert_eq!("static".parse::<LinkMode>().unwrap(), LinkMode::Static);
        assert!("bridge".parse::<LinkMode>().is_err());
    }

    #[test]
    fn link_mode_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&LinkMode::LinkUp).unwrap(),
            "\"LINK_UP\""
        );
    }
}
