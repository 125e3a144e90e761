use crate::domain::{
    models::{
        assignment::{AssignmentScope, InventoryAssignment},
        inventory::{InventoryItem, ItemFilters, ItemStatus},
        job::StatusCount,
    },
    ports::InventoryRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};

pub struct PostgresInventoryRepo {
    pool: PgPool,
}

impl PostgresInventoryRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl InventoryRepository for PostgresInventoryRepo {
    async fn create_item(&self, item: &InventoryItem) -> Result<InventoryItem, AppError> {
        sqlx::query_as::<_, InventoryItem>(
            "INSERT INTO inventory_items (id, sku, name, description, category, status, condition, purchase_price, current_value, latitude, longitude, location_description, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) RETURNING *"
        )
            .bind(&item.id)
            .bind(&item.sku)
            .bind(&item.name)
            .bind(&item.description)
            .bind(&item.category)
            .bind(item.status.as_str())
            .bind(&item.condition)
            .bind(item.purchase_price)
            .bind(item.current_value)
            .bind(item.latitude)
            .bind(item.longitude)
            .bind(&item.location_description)
            .bind(&item.created_by)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_store(e, "SKU"))
    }

    async fn find_item(&self, id: &str) -> Result<Option<InventoryItem>, AppError> {
        sqlx::query_as::<_, InventoryItem>("SELECT * FROM inventory_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_items(&self, filters: &ItemFilters) -> Result<Vec<InventoryItem>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM inventory_items WHERE TRUE");
        if let Some(status) = filters.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(category) = &filters.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(term) = &filters.search {
            qb.push(" AND (strpos(name, ").push_bind(term.clone())
                .push(") > 0 OR strpos(sku, ").push_bind(term.clone())
                .push(") > 0 OR strpos(COALESCE(description, ''), ").push_bind(term.clone())
                .push(") > 0)");
        }
        qb.push(" ORDER BY name ASC, id ASC");
        qb.build_query_as::<InventoryItem>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn check_out(&self, assignment: &InventoryAssignment) -> Result<InventoryAssignment, AppError> {
        let mut tx = self.pool.begin().await?;

        // A shared lock on the job keeps a concurrent delete out until commit.
        let job: Option<String> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1 FOR SHARE")
            .bind(&assignment.job_id)
            .fetch_optional(&mut *tx)
            .await?;
        if job.is_none() {
            return Err(AppError::NotFound("Job not found".into()));
        }

        let claimed = sqlx::query(
            "UPDATE inventory_items SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4"
        )
            .bind(ItemStatus::InUse.as_str())
            .bind(Utc::now())
            .bind(&assignment.item_id)
            .bind(ItemStatus::Available.as_str())
            .execute(&mut *tx)
            .await?;
        if claimed.rows_affected() == 0 {
            let status: Option<String> = sqlx::query_scalar("SELECT status FROM inventory_items WHERE id = $1")
                .bind(&assignment.item_id)
                .fetch_optional(&mut *tx)
                .await?;
            return Err(match status {
                Some(status) => AppError::Conflict(format!("Item is not available (status: {status})")),
                None => AppError::NotFound("Item not found".into()),
            });
        }

        let created = sqlx::query_as::<_, InventoryAssignment>(
            "INSERT INTO inventory_assignments (id, item_id, job_id, user_id, status, check_out_time, check_in_time, expected_return_date, condition_at_checkout, condition_at_checkin, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *"
        )
            .bind(&assignment.id)
            .bind(&assignment.item_id)
            .bind(&assignment.job_id)
            .bind(&assignment.user_id)
            .bind(assignment.status.as_str())
            .bind(assignment.check_out_time)
            .bind(assignment.check_in_time)
            .bind(assignment.expected_return_date)
            .bind(&assignment.condition_at_checkout)
            .bind(&assignment.condition_at_checkin)
            .bind(&assignment.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn check_in(&self, assignment: &InventoryAssignment, item_status: ItemStatus, item_condition: Option<&str>) -> Result<InventoryAssignment, AppError> {
        let mut tx = self.pool.begin().await?;

        let closed = sqlx::query_as::<_, InventoryAssignment>(
            "UPDATE inventory_assignments SET status = $1, check_in_time = $2, condition_at_checkin = $3, notes = $4 \
             WHERE id = $5 AND status = 'checked_out' RETURNING *"
        )
            .bind(assignment.status.as_str())
            .bind(assignment.check_in_time)
            .bind(&assignment.condition_at_checkin)
            .bind(&assignment.notes)
            .bind(&assignment.id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::Conflict("Item is not checked out".into()))?;

        sqlx::query(
            "UPDATE inventory_items SET status = $1, condition = COALESCE($2, condition), updated_at = $3 WHERE id = $4"
        )
            .bind(item_status.as_str())
            .bind(item_condition)
            .bind(Utc::now())
            .bind(&closed.item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(closed)
    }

    async fn find_open_assignment(&self, item_id: &str) -> Result<Option<InventoryAssignment>, AppError> {
        sqlx::query_as::<_, InventoryAssignment>(
            "SELECT * FROM inventory_assignments WHERE item_id = $1 AND status = 'checked_out' ORDER BY check_out_time DESC LIMIT 1"
        )
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_job(&self, job_id: &str) -> Result<Vec<InventoryAssignment>, AppError> {
        sqlx::query_as::<_, InventoryAssignment>(
            "SELECT * FROM inventory_assignments WHERE job_id = $1 ORDER BY check_out_time DESC, id ASC"
        )
            .bind(job_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_status(&self, scope: &AssignmentScope) -> Result<Vec<StatusCount>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT status, COUNT(*) AS count FROM inventory_assignments");
        match scope {
            AssignmentScope::All => {}
            AssignmentScope::Jobs(ids) if ids.is_empty() => return Ok(Vec::new()),
            AssignmentScope::Jobs(ids) => {
                qb.push(" WHERE job_id IN (");
                let mut list = qb.separated(", ");
                for id in ids {
                    list.push_bind(id.clone());
                }
                qb.push(")");
            }
            AssignmentScope::User(user_id) => {
                qb.push(" WHERE user_id = ").push_bind(user_id.clone());
            }
        }
        qb.push(" GROUP BY status");
        qb.build_query_as::<StatusCount>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_distinct_jobs(&self, user_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(DISTINCT job_id) FROM inventory_assignments WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
