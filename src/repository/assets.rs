//! Assets repository — owns the stock ledger

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::asset::{Asset, CreateAsset, UpdateAsset},
    models::enums::ConditionGrade,
};

#[derive(Clone)]
pub struct AssetsRepository {
    pool: Pool<Postgres>,
}

impl AssetsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List assets, optionally including deactivated ones
    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Asset>> {
        let rows = if include_inactive {
            sqlx::query_as::<_, Asset>("SELECT * FROM assets ORDER BY name")
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE is_active ORDER BY name")
                .fetch_all(&self.pool)
                .await?
        };
        Ok(rows)
    }

    /// Get asset by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", id)))
    }

    /// Create asset; available_units starts equal to total_units
    pub async fn create(&self, data: &CreateAsset) -> AppResult<Asset> {
        let row = sqlx::query_as::<_, Asset>(
            r#"
            INSERT INTO assets (name, category_id, location_id, total_units, available_units, condition_grade, notes)
            VALUES ($1, $2, $3, $4, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.category_id)
        .bind(data.location_id)
        .bind(data.total_units)
        .bind(data.condition_grade.unwrap_or(ConditionGrade::Good))
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update asset descriptive fields. A total_units change shifts
    /// available_units by the same delta; the guard refuses shrinking the
    /// fleet below what is currently out on loan.
    pub async fn update(&self, id: i32, data: &UpdateAsset) -> AppResult<Asset> {
        let mut tx = self.pool.begin().await?;

        if let Some(new_total) = data.total_units {
            let result = sqlx::query(
                r#"
                UPDATE assets
                SET available_units = available_units + ($2 - total_units),
                    total_units = $2,
                    modif_date = NOW()
                WHERE id = $1 AND available_units + ($2 - total_units) >= 0
                "#,
            )
            .bind(id)
            .bind(new_total)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM assets WHERE id = $1)")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;
                return Err(if exists {
                    AppError::StateConflict(format!(
                        "Cannot reduce asset {} to {} total units while issued stock is outstanding",
                        id, new_total
                    ))
                } else {
                    AppError::NotFound(format!("Asset {} not found", id))
                });
            }
        }

        let row = sqlx::query_as::<_, Asset>(
            r#"
            UPDATE assets
            SET name = COALESCE($2, name),
                category_id = COALESCE($3, category_id),
                location_id = COALESCE($4, location_id),
                condition_grade = COALESCE($5, condition_grade),
                notes = COALESCE($6, notes),
                modif_date = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.category_id)
        .bind(data.location_id)
        .bind(data.condition_grade)
        .bind(&data.notes)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", id)))?;

        tx.commit().await?;
        Ok(row)
    }

    /// Deactivate an asset so it cannot appear on new requests
    pub async fn deactivate(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("UPDATE assets SET is_active = FALSE, modif_date = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Asset {} not found", id)));
        }
        Ok(())
    }

    /// The single stock mutation primitive. Applies `delta` to
    /// available_units only if the result stays within [0, total_units];
    /// the guard is evaluated atomically in the same statement, so two
    /// racing adjustments can never jointly overdraw the counter.
    ///
    /// Returns false when the adjustment was refused.
    pub async fn adjust_stock(
        tx: &mut Transaction<'_, Postgres>,
        asset_id: i32,
        delta: i32,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE assets
            SET available_units = available_units + $2, modif_date = NOW()
            WHERE id = $1
              AND available_units + $2 >= 0
              AND available_units + $2 <= total_units
            "#,
        )
        .bind(asset_id)
        .bind(delta)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Current (available, total) counters, read inside the caller's transaction
    pub async fn stock_levels(
        tx: &mut Transaction<'_, Postgres>,
        asset_id: i32,
    ) -> AppResult<(i32, i32)> {
        let row: Option<(i32, i32)> =
            sqlx::query_as("SELECT available_units, total_units FROM assets WHERE id = $1")
                .bind(asset_id)
                .fetch_optional(&mut **tx)
                .await?;
        row.ok_or_else(|| AppError::NotFound(format!("Asset {} not found", asset_id)))
    }
}
