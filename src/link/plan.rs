// ABOUTME: Pure decision of which gateway steps remove a link safely.
// ABOUTME: Maps a status class to an ordered list of teardown steps.

use std::fmt;

use serde::Serialize;

use crate::status::{NodeStatus, StatusClass, classify};

/// One gateway action in a teardown sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownStep {
    /// Interrupt the node's in-progress operation.
    Abort,
    /// Return the node to a stable, unlinkable state.
    Release,
    /// Remove the link.
    Unlink,
}

/// Ordered gateway actions chosen for a node's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownPlan {
    /// Node is idle: unlink directly.
    Unlink,
    /// Node is settled but held: release, then unlink.
    ReleaseThenUnlink,
    /// Node is mid-operation: abort, release, then unlink.
    AbortReleaseUnlink,
}

impl TeardownPlan {
    /// Plan for a status class. `None` means teardown must be refused.
    pub fn for_class(class: StatusClass) -> Option<Self> {
        match class {
            StatusClass::Valid => Some(TeardownPlan::Unlink),
            StatusClass::NonTransitional => Some(TeardownPlan::ReleaseThenUnlink),
            StatusClass::Transitional => Some(TeardownPlan::AbortReleaseUnlink),
            StatusClass::Unknown => None,
        }
    }

    pub fn for_status(status: &NodeStatus) -> Option<Self> {
        Self::for_class(classify(status))
    }

    pub fn steps(self) -> &'static [TeardownStep] {
        match self {
            TeardownPlan::Unlink => &[TeardownStep::Unlink],
            TeardownPlan::ReleaseThenUnlink => &[TeardownStep::Release, TeardownStep::Unlink],
            TeardownPlan::AbortReleaseUnlink => &[
                TeardownStep::Abort,
                TeardownStep::Release,
                TeardownStep::Unlink,
            ],
        }
    }
}

impl fmt::Display for TeardownPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TeardownPlan::Unlink => "unlink",
            TeardownPlan::ReleaseThenUnlink => "release, unlink",
            TeardownPlan::AbortReleaseUnlink => "abort, release, unlink",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_plan_ends_with_unlink() {
        for plan in [
            TeardownPlan::Unlink,
            TeardownPlan::ReleaseThenUnlink,
            TeardownPlan::AbortReleaseUnlink,
        ] {
            assert_eq!(plan.steps().last(), Some(&TeardownStep::Unlink));
        }
    }

    #[test]
    fn abort_only_for_transitional() {
        assert_eq!(
            TeardownPlan::for_status(&NodeStatus::Deploying),
            Some(TeardownPlan::AbortReleaseUnlink)
        );
        assert_eq!(
            TeardownPlan::for_status(&NodeStatus::Deployed),
            Some(TeardownPlan::ReleaseThenUnlink)
        );
        assert_eq!(
            TeardownPlan::for_status(&NodeStatus::Ready),
            Some(TeardownPlan::Unlink)
        );
    }

    #[test]
    fn unknown_status_has_no_plan() {
        assert_eq!(
            TeardownPlan::for_status(&NodeStatus::Unrecognized("Default".into())),
            None
        );
    }
}
