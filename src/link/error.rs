// ABOUTME: Error types for link teardown and binding operations.
// ABOUTME: Each gateway failure names the step that failed and keeps the gateway error as source.

use snafu::Snafu;

use crate::gateway::{GatewayError, LinkParamsError};
use crate::status::NodeStatus;
use crate::types::{InterfaceId, LinkId, SubnetId, SystemId};

/// Errors from link operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LinkError {
    #[snafu(display("failed to fetch machine {node}: {source}"))]
    NodeLookup { node: SystemId, source: GatewayError },

    #[snafu(display("cannot unlink subnet from machine {node} in status {status}"))]
    UnsafeStatus { node: SystemId, status: NodeStatus },

    #[snafu(display("failed to abort current operation on machine {node}: {source}"))]
    Abort { node: SystemId, source: GatewayError },

    #[snafu(display("failed to release machine {node}: {source}"))]
    Release { node: SystemId, source: GatewayError },

    #[snafu(display(
        "failed to unlink link {link} from interface {interface} on machine {node}: {source}"
    ))]
    Unlink {
        node: SystemId,
        interface: InterfaceId,
        link: LinkId,
        source: GatewayError,
    },

    #[snafu(display("failed to fetch interface {interface} on machine {node}: {source}"))]
    InterfaceLookup {
        node: SystemId,
        interface: InterfaceId,
        source: GatewayError,
    },

    #[snafu(display(
        "failed to link interface {interface} on machine {node} to subnet {subnet}: {source}"
    ))]
    LinkSubnet {
        node: SystemId,
        interface: InterfaceId,
        subnet: SubnetId,
        source: GatewayError,
    },

    #[snafu(display("linking interface {interface} on machine {node} returned no links"))]
    EmptyLinkResponse {
        node: SystemId,
        interface: InterfaceId,
    },

    #[snafu(display(
        "cannot find link ({link}) on the network interface ({interface}) from machine ({node})"
    ))]
    LinkNotFound {
        node: SystemId,
        interface: InterfaceId,
        link: LinkId,
    },

    #[snafu(display("failed to clear default gateways on machine {node}: {source}"))]
    ClearDefaultGateways { node: SystemId, source: GatewayError },

    #[snafu(display(
        "failed to set default gateway to link {link} on interface {interface} of machine {node}: {source}"
    ))]
    SetDefaultGateway {
        node: SystemId,
        interface: InterfaceId,
        link: LinkId,
        source: GatewayError,
    },

    #[snafu(display("invalid link parameters: {source}"))]
    InvalidParams { source: LinkParamsError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkErrorKind {
    /// Node, interface, or link does not exist.
    NotFound,
    /// The node's status is not one teardown knows how to handle.
    UnsafeState,
    /// A gateway call failed.
    GatewayFailure,
    /// Link parameters were rejected before any call was made.
    InvalidParams,
}

impl LinkError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> LinkErrorKind {
        match self {
            LinkError::UnsafeStatus { .. } => LinkErrorKind::UnsafeState,
            LinkError::InvalidParams { .. } => LinkErrorKind::InvalidParams,
            LinkError::LinkNotFound { .. } => LinkErrorKind::NotFound,
            LinkError::EmptyLinkResponse { .. } => LinkErrorKind::GatewayFailure,
            other => match other.gateway_error() {
                Some(source) if source.is_not_found() => LinkErrorKind::NotFound,
                _ => LinkErrorKind::GatewayFailure,
            },
        }
    }

    /// The underlying gateway error, if a gateway call failed.
    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            LinkError::NodeLookup { source, .. }
            | LinkError::Abort { source, .. }
            | LinkError::Release { source, .. }
            | LinkError::Unlink { source, .. }
            | LinkError::InterfaceLookup { source, .. }
            | LinkError::LinkSubnet { source, .. }
            | LinkError::ClearDefaultGateways { source, .. }
            | LinkError::SetDefaultGateway { source, .. } => Some(source),
            LinkError::UnsafeStatus { .. }
            | LinkError::EmptyLinkResponse { .. }
            | LinkError::LinkNotFound { .. }
            | LinkError::InvalidParams { .. } => None,
        }
    }
}
