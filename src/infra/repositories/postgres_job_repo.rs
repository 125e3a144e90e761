use crate::domain::{
    models::{job::{Job, JobFilters, Priority, StatusCount}, media::JobMedia, page::PageRequest},
    ports::JobRepository,
    services::access_policy::JobScope,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::error;

pub struct PostgresJobRepo {
    pool: PgPool,
}

impl PostgresJobRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

fn scoped_query<'a>(select: &str, scope: &JobScope, filters: Option<&JobFilters>) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {select} FROM jobs WHERE "));
    match scope {
        JobScope::All => { qb.push("TRUE"); }
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
            qb.push(format!("strpos(COALESCE({column}, ''), ")).push_bind(term.clone()).push(") > 0");
        }
        qb.push(")");
    }
    qb
}

#[async_trait]
impl JobRepository for PostgresJobRepo {
    async fn create(&self, job: &Job) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (id, claim_id, xactimate_id, name, description, location, address, latitude, longitude, start_date, end_date, estimated_completion, status, priority, customer_name, customer_phone, customer_email, created_by, assigned_foreman, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21) RETURNING *"
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
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_claim_id(&self, claim_id: &str) -> Result<Option<Job>, AppError> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE claim_id = $1")
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, job: &Job) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET claim_id = $1, xactimate_id = $2, name = $3, description = $4, location = $5, address = $6, latitude = $7, longitude = $8, \
             start_date = $9, end_date = $10, estimated_completion = $11, status = $12, priority = $13, customer_name = $14, customer_phone = $15, \
             customer_email = $16, assigned_foreman = $17, updated_at = $18 WHERE id = $19 RETURNING *"
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
        let mut tx = self.pool.begin().await?;

        // Row lock on the job blocks checkouts (FOR SHARE) until we commit.
        let locked: Option<String> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(AppError::NotFound("Job not found".into()));
        }

        let checked_out: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM inventory_assignments WHERE job_id = $1 AND status = 'checked_out')"
        )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if checked_out {
            return Err(AppError::Conflict("Cannot delete job with active inventory assignments".into()));
        }

        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Postgres job deletion failed: {:?}", e);
                AppError::Database(e)
            })?;

        tx.commit().await?;
        Ok(())
    }

    async fn list(&self, scope: &JobScope, filters: &JobFilters, page: &PageRequest) -> Result<(Vec<Job>, i64), AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

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
            "INSERT INTO job_media (id, job_id, filename, file_type, description, uploaded_by, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *"
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
        sqlx::query_as::<_, JobMedia>("SELECT * FROM job_media WHERE job_id = $1 ORDER BY created_at ASC, id ASC")
            .bind(job_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
