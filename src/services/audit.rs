//! Audit sink — fire-and-forget structured events
//!
//! Every successful transition emits an event. Writes happen on a detached
//! task; a failed write is logged and never rolls back or blocks the
//! business operation that produced it.

use serde_json::Value;

use crate::{models::audit::AuditEvent, repository::Repository};

#[derive(Clone)]
pub struct AuditService {
    repository: Repository,
}

impl AuditService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Emit an event after a successful transition
    pub fn record(
        &self,
        actor_id: i32,
        action: &str,
        module: &str,
        before: Option<Value>,
        after: Option<Value>,
    ) {
        let repository = self.repository.clone();
        let event = AuditEvent {
            actor_id,
            action: action.to_string(),
            module: module.to_string(),
            before,
            after,
        };
        tokio::spawn(async move {
            if let Err(e) = repository.audit.insert(&event).await {
                tracing::warn!(
                    action = %event.action,
                    module = %event.module,
                    "audit write failed: {}",
                    e
                );
            }
        });
    }
}
