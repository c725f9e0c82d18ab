// ABOUTME: Node lifecycle statuses as reported by the managed system.
// ABOUTME: Closed enumeration with numeric codes, display names, and an escape hatch for unknown values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lifecycle status of a managed node.
///
/// The managed system reports statuses either as a numeric code or as a
/// display name. Anything outside the known table parses to
/// [`NodeStatus::Unrecognized`] rather than failing, so that a newer server
/// never breaks deserialization. What to do with an unrecognized status is
/// the classifier's decision, not the parser's.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    New,
    Commissioning,
    FailedCommissioning,
    Missing,
    Ready,
    Reserved,
    Deployed,
    Retired,
    Broken,
    Deploying,
    Allocated,
    FailedDeployment,
    Releasing,
    FailedReleasing,
    DiskErasing,
    FailedDiskErasing,
    RescueMode,
    EnteringRescueMode,
    FailedEnteringRescueMode,
    ExitingRescueMode,
    FailedExitingRescueMode,
    Testing,
    FailedTesting,
    /// A status value not present in the table above, kept verbatim.
    Unrecognized(String),
}

struct StatusEntry {
    status: NodeStatus,
    code: i64,
    display: &'static str,
    variant: &'static str,
}

const fn entry(
    status: NodeStatus,
    code: i64,
    display: &'static str,
    variant: &'static str,
) -> StatusEntry {
    StatusEntry {
        status,
        code,
        display,
        variant,
    }
}

static TABLE: [StatusEntry; 23] = [
    entry(NodeStatus::New, 0, "New", "New"),
    entry(NodeStatus::Commissioning, 1, "Commissioning", "Commissioning"),
    entry(
        NodeStatus::FailedCommissioning,
        2,
        "Failed commissioning",
        "FailedCommissioning",
    ),
    entry(NodeStatus::Missing, 3, "Missing", "Missing"),
    entry(NodeStatus::Ready, 4, "Ready", "Ready"),
    entry(NodeStatus::Reserved, 5, "Reserved", "Reserved"),
    entry(NodeStatus::Deployed, 6, "Deployed", "Deployed"),
    entry(NodeStatus::Retired, 7, "Retired", "Retired"),
    entry(NodeStatus::Broken, 8, "Broken", "Broken"),
    entry(NodeStatus::Deploying, 9, "Deploying", "Deploying"),
    entry(NodeStatus::Allocated, 10, "Allocated", "Allocated"),
    entry(
        NodeStatus::FailedDeployment,
        11,
        "Failed deployment",
        "FailedDeployment",
    ),
    entry(NodeStatus::Releasing, 12, "Releasing", "Releasing"),
    entry(
        NodeStatus::FailedReleasing,
        13,
        "Releasing failed",
        "FailedReleasing",
    ),
    entry(NodeStatus::DiskErasing, 14, "Disk erasing", "DiskErasing"),
    entry(
        NodeStatus::FailedDiskErasing,
        15,
        "Failed disk erasing",
        "FailedDiskErasing",
    ),
    entry(NodeStatus::RescueMode, 16, "Rescue mode", "RescueMode"),
    entry(
        NodeStatus::EnteringRescueMode,
        17,
        "Entering rescue mode",
        "EnteringRescueMode",
    ),
    entry(
        NodeStatus::FailedEnteringRescueMode,
        18,
        "Failed to enter rescue mode",
        "FailedEnteringRescueMode",
    ),
    entry(
        NodeStatus::ExitingRescueMode,
        19,
        "Exiting rescue mode",
        "ExitingRescueMode",
    ),
    entry(
        NodeStatus::FailedExitingRescueMode,
        20,
        "Failed to exit rescue mode",
        "FailedExitingRescueMode",
    ),
    entry(NodeStatus::Testing, 21, "Testing", "Testing"),
    entry(NodeStatus::FailedTesting, 22, "Failed testing", "FailedTesting"),
];

/// Lowercase and drop separators so "Failed disk erasing", "FAILED_DISK_ERASING"
/// and "FailedDiskErasing" compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl NodeStatus {
    /// Every named status, in code order.
    pub fn known() -> impl Iterator<Item = NodeStatus> {
        TABLE.iter().map(|e| e.status.clone())
    }

    /// Look up a status by its numeric code.
    pub fn from_code(code: i64) -> Self {
        TABLE
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.status.clone())
            .unwrap_or_else(|| NodeStatus::Unrecognized(code.to_string()))
    }

    /// Parse a status from a code, display name, or variant name.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return Self::from_code(code);
        }

        let wanted = normalize(trimmed);
        TABLE
            .iter()
            .find(|e| normalize(e.display) == wanted || normalize(e.variant) == wanted)
            .map(|e| e.status.clone())
            .unwrap_or_else(|| NodeStatus::Unrecognized(trimmed.to_string()))
    }

    fn entry(&self) -> Option<&'static StatusEntry> {
        TABLE.iter().find(|e| &e.status == self)
    }

    /// Numeric code, or `None` for unrecognized statuses.
    pub fn code(&self) -> Option<i64> {
        self.entry().map(|e| e.code)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, NodeStatus::Unrecognized(_))
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Unrecognized(raw) => write!(f, "{raw}"),
            known => match known.entry() {
                Some(e) => write!(f, "{}", e.display),
                None => write!(f, "{known:?}"),
            },
        }
    }
}

impl From<&str> for NodeStatus {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl Serialize for NodeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Code(i64),
    Name(String),
}

impl<'de> Deserialize<'de> for NodeStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawStatus::deserialize(deserializer)? {
            RawStatus::Code(code) => NodeStatus::from_code(code),
            RawStatus::Name(name) => NodeStatus::parse(&name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_codes_are_sequential() {
        for (i, status) in NodeStatus::known().enumerate() {
            assert_eq!(status.code(), Some(i as i64), "{status}");
        }
    }

    #[test]
    fn parses_display_and_variant_names() {
        assert_eq!(NodeStatus::parse("Ready"), NodeStatus::Ready);
        assert_eq!(
            NodeStatus::parse("failed disk erasing"),
            NodeStatus::FailedDiskErasing
        );
        assert_eq!(
            NodeStatus::parse("FAILED_ENTERING_RESCUE_MODE"),
            NodeStatus::FailedEnteringRescueMode
        );
        assert_eq!(
            NodeStatus::parse("Failed to exit rescue mode"),
            NodeStatus::FailedExitingRescueMode
        );
        assert_eq!(NodeStatus::parse("9"), NodeStatus::Deploying);
    }

    #[test]
    fn unknown_values_are_kept_verbatim() {
        assert_eq!(
            NodeStatus::parse("Hibernating"),
            NodeStatus::Unrecognized("Hibernating".to_string())
        );
        assert_eq!(
            NodeStatus::from_code(99),
            NodeStatus::Unrecognized("99".to_string())
        );
        assert!(!NodeStatus::parse("Hibernating").is_recognized());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for status in NodeStatus::known() {
            assert_eq!(NodeStatus::parse(&status.to_string()), status);
        }
    }

    #[test]
    fn deserializes_from_code_or_name() {
        let from_code: NodeStatus = serde_json::from_str("6").unwrap();
        assert_eq!(from_code, NodeStatus::Deployed);

        let from_name: NodeStatus = serde_json::from_str("\"Releasing failed\"").unwrap();
        assert_eq!(from_name, NodeStatus::FailedReleasing);
    }
}
