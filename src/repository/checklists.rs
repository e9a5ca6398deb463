//! Checklist template repository — ordered prompts per category

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::checklist::ChecklistTemplateItem,
};

#[derive(Clone)]
pub struct ChecklistsRepository {
    pool: Pool<Postgres>,
}

impl ChecklistsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Active prompts of a category in sequence order
    pub async fn list_active(&self, category_id: i32) -> AppResult<Vec<ChecklistTemplateItem>> {
        let rows = sqlx::query_as::<_, ChecklistTemplateItem>(
            r#"
            SELECT * FROM checklist_template_items
            WHERE category_id = $1 AND is_active
            ORDER BY seq
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Every prompt of a category, soft-deleted ones included
    pub async fn list_all(&self, category_id: i32) -> AppResult<Vec<ChecklistTemplateItem>> {
        let rows = sqlx::query_as::<_, ChecklistTemplateItem>(
            "SELECT * FROM checklist_template_items WHERE category_id = $1 ORDER BY seq",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Append a prompt with the next sequence number. The INSERT computes the
    /// number itself; the (category_id, seq) unique constraint rejects the
    /// loser of a concurrent append.
    pub async fn append(&self, category_id: i32, prompt: &str) -> AppResult<ChecklistTemplateItem> {
        let row = sqlx::query_as::<_, ChecklistTemplateItem>(
            r#"
            INSERT INTO checklist_template_items (category_id, seq, prompt)
            SELECT $1, COALESCE(MAX(seq), 0) + 1, $2
            FROM checklist_template_items WHERE category_id = $1
            RETURNING *
            "#,
        )
        .bind(category_id)
        .bind(prompt)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Soft-delete a prompt; sequence numbers are never reassigned
    pub async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE checklist_template_items SET is_active = FALSE WHERE id = $1 AND is_active",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Checklist template item {} not found or already inactive",
                id
            )));
        }
        Ok(())
    }
}
