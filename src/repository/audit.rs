//! Audit log repository

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::audit::AuditEvent};

#[derive(Clone)]
pub struct AuditRepository {
    pool: Pool<Postgres>,
}

impl AuditRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append one audit entry. Runs outside any business transaction.
    pub async fn insert(&self, event: &AuditEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (actor_id, action, module, before, after)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.actor_id)
        .bind(&event.action)
        .bind(&event.module)
        .bind(&event.before)
        .bind(&event.after)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
