// ABOUTME: Pure classifier mapping node statuses to teardown categories.
// ABOUTME: Hand-maintained table; unrecognized statuses are never guessed.

use std::fmt;

use serde::Serialize;

use super::NodeStatus;

/// How a node's status constrains removal of one of its interface links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// Nothing holds the node's network configuration; unlink directly.
    Valid,
    /// An operation is in progress and must be aborted, then the node released.
    Transitional,
    /// Stable but not ready; release the node before unlinking.
    NonTransitional,
    /// Outside the known table. Teardown is refused.
    Unknown,
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusClass::Valid => "valid",
            StatusClass::Transitional => "transitional",
            StatusClass::NonTransitional => "non-transitional",
            StatusClass::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Classify a node status.
///
/// Every named status is listed explicitly. There is no wildcard arm, so a
/// status added to [`NodeStatus`] fails to compile until it is placed here.
pub fn classify(status: &NodeStatus) -> StatusClass {
    match status {
        NodeStatus::New | NodeStatus::Ready | NodeStatus::Allocated | NodeStatus::Broken => {
            StatusClass::Valid
        }

        NodeStatus::Commissioning
        | NodeStatus::Deploying
        | NodeStatus::Releasing
        | NodeStatus::DiskErasing
        | NodeStatus::EnteringRescueMode
        | NodeStatus::ExitingRescueMode
        | NodeStatus::Testing => StatusClass::Transitional,

        NodeStatus::FailedCommissioning
        | NodeStatus::Missing
        | NodeStatus::Reserved
        | NodeStatus::Deployed
        | NodeStatus::Retired
        | NodeStatus::FailedDeployment
        | NodeStatus::FailedReleasing
        | NodeStatus::FailedDiskErasing
        | NodeStatus::RescueMode
        | NodeStatus::FailedEnteringRescueMode
        | NodeStatus::FailedExitingRescueMode
        | NodeStatus::FailedTesting => StatusClass::NonTransitional,

        NodeStatus::Unrecognized(_) => StatusClass::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_statuses() {
        for s in ["New", "Ready", "Allocated", "Broken"] {
            assert_eq!(classify(&NodeStatus::parse(s)), StatusClass::Valid, "{s}");
        }
    }

    #[test]
    fn transitional_statuses() {
        for s in [
            "Commissioning",
            "Deploying",
            "Releasing",
            "Disk erasing",
            "Entering rescue mode",
            "Exiting rescue mode",
            "Testing",
        ] {
            assert_eq!(
                classify(&NodeStatus::parse(s)),
                StatusClass::Transitional,
                "{s}"
            );
        }
    }

    #[test]
    fn failure_variants_are_non_transitional() {
        for s in [
            "Failed commissioning",
            "Failed deployment",
            "Releasing failed",
            "Failed disk erasing",
            "Failed to enter rescue mode",
            "Failed to exit rescue mode",
            "Failed testing",
        ] {
            assert_eq!(
                classify(&NodeStatus::parse(s)),
                StatusClass::NonTransitional,
                "{s}"
            );
        }
    }

    #[test]
    fn only_unrecognized_is_unknown() {
        assert_eq!(
            classify(&NodeStatus::Unrecognized("Default".into())),
            StatusClass::Unknown
        );
        assert!(
            NodeStatus::known().all(|s| classify(&s) != StatusClass::Unknown),
            "every named status must be classified"
        );
    }

    #[test]
    fn class_counts_match_table() {
        let count = |class| NodeStatus::known().filter(|s| classify(s) == class).count();
        assert_eq!(count(StatusClass::Valid), 4);
        assert_eq!(count(StatusClass::Transitional), 7);
        assert_eq!(count(StatusClass::NonTransitional), 12);
    }
}
