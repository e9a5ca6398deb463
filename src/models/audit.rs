//! Audit event payload

use serde_json::Value;

/// Structured event appended after each successful transition.
/// Writes are fire-and-forget; a failed append never blocks asset movement.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub actor_id: i32,
    pub action: String,
    pub module: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
}
