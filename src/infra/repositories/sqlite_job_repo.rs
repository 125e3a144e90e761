use crate::domain::{
    models::{job::{Job, JobFilters, Priority, StatusCount}, media::JobMedia, page::PageRequest},
    ports::JobRepository,
    services::access_policy::JobScope,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::error;

pub struct SqliteJobRepo {
    pool: SqlitePool,
}

impl SqliteJobRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

/// `SELECT <select> FROM jobs WHERE <scope> [AND <filters>]`.
fn scoped_query<'a>(select: &str, scope: &JobScope, filters: Option<&JobFilters>) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new(format!("SELECT {select} FROM jobs WHERE "));
    match scope {
        JobScope::All => { qb.push("1 = 1"); }
        JobScope::SupervisedBy(user_id) => {
            qb.push("(assigned_foreman = ").push_bind(user_id.clone())
                .push(" OR created_by = ").push_bind(user_id.clone()).push(")");
        }
        JobScope::AssignedTo(user_id) => {
            qb.push("id IN (SELECT job_id FROM inventory_assignments WHERE user_id = ")
                .push_bind(user_id.clone()).push(")");
        }
    }

    let Some(filters) = filters else { return qb };
    if let Some(status) = filters.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(priority) = filters.priority {
        qb.push(" AND priority = ").push_bind(priority.as_str());
    }
    if let Some(term) = &filters.search {
        qb.push(" AND (");
        for (i, column) in ["name", "claim_id", "description", "customer_name"].into_iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            // instr is case-sensitive, unlike LIKE
            qb.push(format!("instr(COALESCE({column}, ''), ")).push_bind(term.clone()).push(") > 0");
        }
        qb.push(")");
    }
    qb
}

#[async_trait]
impl JobRepository for SqliteJobRepo {
    async fn create(&self, job: &Job) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (id, claim_id, xactimate_id, name, description, location, address, latitude, longitude, start_date, end_date, estimated_completion, status, priority, customer_name, customer_phone, customer_email, created_by, assigned_foreman, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&job.id)
            .bind(&job.claim_id)
            .bind(&job.xactimate_id)
            .bind(&job.name)
            .bind(&job.description)
            .bind(&job.location)
            .bind(&job.address)
            .bind(job.latitude)
            .bind(job.longitude)
            .bind(job.start_date)
            .bind(job.end_date)
            .bind(job.estimated_completion)
            .bind(job.status.as_str())
            .bind(job.priority.as_str())
            .bind(&job.customer_name)
            .bind(&job.customer_phone)
            .bind(&job.customer_email)
            .bind(&job.created_by)
            .bind(&job.assigned_foreman)
            .bind(job.created_at)
            .bind(job.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_store(e, "Claim ID"))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Job>, AppError> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_claim_id(&self, claim_id: &str) -> Result<Option<Job>, AppError> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE claim_id = ?")
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, job: &Job) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET claim_id = ?, xactimate_id = ?, name = ?, description = ?, location = ?, address = ?, latitude = ?, longitude = ?, \
             start_date = ?, end_date = ?, estimated_completion = ?, status = ?, priority = ?, customer_name = ?, customer_phone = ?, \
             customer_email = ?, assigned_foreman = ?, updated_at = ? WHERE id = ? RETURNING *"
        )
            .bind(&job.claim_id)
            .bind(&job.xactimate_id)
            .bind(&job.name)
            .bind(&job.description)
            .bind(&job.location)
            .bind(&job.address)
            .bind(job.latitude)
            .bind(job.longitude)
            .bind(job.start_date)
            .bind(job.end_date)
            .bind(job.estimated_completion)
            .bind(job.status.as_str())
            .bind(job.priority.as_str())
            .bind(&job.customer_name)
            .bind(&job.customer_phone)
            .bind(&job.customer_email)
            .bind(&job.assigned_foreman)
            .bind(job.updated_at)
            .bind(&job.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from_store(e, "Claim ID"))?
            .ok_or_else(|| AppError::NotFound("Job not found".into()))
    }

    async fn delete_unless_checked_out(&self, id: &str) -> Result<(), AppError> {
        // Guard and delete in one statement so a concurrent checkout cannot slip in between.
        let result = sqlx::query(
            "DELETE FROM jobs WHERE id = ? AND NOT EXISTS \
             (SELECT 1 FROM inventory_assignments WHERE job_id = jobs.id AND status = 'checked_out')"
        )
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("SQLite job deletion failed: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() > 0 {
            return Ok(());
        }
        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match exists {
            Some(_) => Err(AppError::Conflict("Cannot delete job with active inventory assignments".into())),
            None => Err(AppError::NotFound("Job not found".into())),
        }
    }

    async fn list(&self, scope: &JobScope, filters: &JobFilters, page: &PageRequest) -> Result<(Vec<Job>, i64), AppError> {
        // Count and page read from the same snapshot.
        let mut tx = self.pool.begin().await?;

        let total = scoped_query("COUNT(*)", scope, Some(filters))
            .build_query_scalar::<i64>()
            .fetch_one(&mut *tx)
            .await?;

        let mut qb = scoped_query("*", scope, Some(filters));
        qb.push(format!(" ORDER BY {} DESC, created_at DESC, id DESC", Priority::rank_sql("priority")));
        qb.push(" LIMIT ").push_bind(page.limit());
        qb.push(" OFFSET ").push_bind(page.offset());
        let jobs = qb.build_query_as::<Job>().fetch_all(&mut *tx).await?;

        tx.commit().await?;
        Ok((jobs, total))
    }

    async fn visible_ids(&self, scope: &JobScope) -> Result<Vec<String>, AppError> {
        scoped_query("id", scope, None)
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_status(&self, scope: &JobScope) -> Result<Vec<StatusCount>, AppError> {
        let mut qb = scoped_query("status, COUNT(*) AS count", scope, None);
        qb.push(" GROUP BY status");
        qb.build_query_as::<StatusCount>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn add_media(&self, media: &JobMedia) -> Result<JobMedia, AppError> {
        sqlx::query_as::<_, JobMedia>(
            "INSERT INTO job_media (id, job_id, filename, file_type, description, uploaded_by, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&media.id)
            .bind(&media.job_id)
            .bind(&media.filename)
            .bind(&media.file_type)
            .bind(&media.description)
            .bind(&media.uploaded_by)
            .bind(media.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_media(&self, job_id: &str) -> Result<Vec<JobMedia>, AppError> {
        sqlx::query_as::<_, JobMedia>("SELECT * FROM job_media WHERE job_id = ? ORDER BY created_at ASC, id ASC")
            .bind(job_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
