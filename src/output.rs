// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;

use crate::gateway::GatewayCall;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print the gateway calls a command issued.
    pub fn calls(&self, calls: &[GatewayCall]) {
        match self.mode {
            OutputMode::Normal => {
                for call in calls {
                    println!("  → {call}");
                }
            }
            OutputMode::Quiet => {}
            OutputMode::Json => {
                for call in calls {
                    emit(&JsonCall {
                        event: "call",
                        call,
                    });
                }
            }
        }
    }

    /// Print a success message, with a structured payload in JSON mode.
    pub fn success_with<T: Serialize>(&self, message: &str, data: &T) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => emit(&JsonEvent {
                event: "success",
                message,
                data: Some(data),
            }),
        }
    }

    /// Print a success message.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => emit(&JsonEvent::<()> {
                event: "success",
                message,
                data: None,
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                let event = JsonEvent::<()> {
                    event: "error",
                    message,
                    data: None,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

fn emit<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        println!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a, T: Serialize> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
}

#[derive(Serialize)]
struct JsonCall<'a> {
    event: &'a str,
    #[serde(flatten)]
    call: &'a GatewayCall,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ReleaseParams;
    use crate::types::SystemId;

    #[test]
    fn json_call_flattens_call_fields() {
        let call = GatewayCall::ReleaseNode {
            node: SystemId::new("abc123").unwrap(),
            params: ReleaseParams {
                force: true,
                ..ReleaseParams::default()
            },
        };
        let json = serde_json::to_value(JsonCall {
            event: "call",
            call: &call,
        })
        .unwrap();
        assert_eq!(json["event"], "call");
        assert_eq!(json["call"], "release_node");
        assert_eq!(json["node"], "abc123");
        assert_eq!(json["params"]["force"], true);
    }
}
