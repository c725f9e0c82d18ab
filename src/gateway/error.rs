// ABOUTME: Errors reported by gateway implementations.
// ABOUTME: NotFound is kept distinct so callers can treat absence specially.

/// Errors from calls against the managed system.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("api error: {0}")]
    Api(String),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound(_))
    }
}
