use crate::domain::{
    models::{
        job::StatusCount,
        report::{CategoryCount, JobSummaryFilters, JobSummaryRecord, OpenAssignmentRecord, UsageFilters, UsageRecord},
    },
    ports::ReportRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

const USAGE_SELECT: &str = r#"
    SELECT a.id AS assignment_id, i.sku AS item_sku, i.name AS item_name, i.category AS item_category,
           j.name AS job_name, j.claim_id AS job_claim_id,
           u.username AS user_username, u.first_name AS user_first_name, u.last_name AS user_last_name, u.role AS user_role,
           a.check_out_time, a.check_in_time, a.status, a.condition_at_checkout, a.condition_at_checkin, a.notes
    FROM inventory_assignments a
    JOIN inventory_items i ON i.id = a.item_id
    JOIN jobs j ON j.id = a.job_id
    JOIN users u ON u.id = a.user_id
    WHERE TRUE"#;

const JOB_SUMMARY_SELECT: &str = r#"
    SELECT j.*,
           (SELECT COUNT(*) FROM inventory_assignments a WHERE a.job_id = j.id) AS total_assignments,
           (SELECT COUNT(*) FROM inventory_assignments a WHERE a.job_id = j.id AND a.status = 'checked_out') AS active_assignments
    FROM jobs j
    WHERE TRUE"#;

const OPEN_ASSIGNMENTS: &str = r#"
    SELECT a.id AS assignment_id, i.sku AS item_sku, i.name AS item_name, i.category AS item_category,
           j.name AS job_name, j.claim_id AS job_claim_id,
           u.username AS user_username, u.first_name AS user_first_name, u.last_name AS user_last_name,
           u.email AS user_email, u.phone AS user_phone,
           a.check_out_time, a.expected_return_date
    FROM inventory_assignments a
    JOIN inventory_items i ON i.id = a.item_id
    JOIN jobs j ON j.id = a.job_id
    JOIN users u ON u.id = a.user_id
    WHERE a.status = 'checked_out'
    ORDER BY a.check_out_time ASC, a.id ASC"#;

pub struct PostgresReportRepo {
    pool: PgPool,
}

impl PostgresReportRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl ReportRepository for PostgresReportRepo {
    async fn usage_records(&self, filters: &UsageFilters) -> Result<Vec<UsageRecord>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(USAGE_SELECT);
        if let Some(start) = filters.start_date {
            qb.push(" AND a.check_out_time >= ").push_bind(start);
        }
        if let Some(end) = filters.end_date {
            qb.push(" AND a.check_out_time <= ").push_bind(end);
        }
        if let Some(job_id) = &filters.job_id {
            qb.push(" AND a.job_id = ").push_bind(job_id.clone());
        }
        if let Some(user_id) = &filters.user_id {
            qb.push(" AND a.user_id = ").push_bind(user_id.clone());
        }
        qb.push(" ORDER BY a.check_out_time DESC, a.id ASC");
        qb.build_query_as::<UsageRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn job_summary_records(&self, filters: &JobSummaryFilters) -> Result<Vec<JobSummaryRecord>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(JOB_SUMMARY_SELECT);
        if let Some(start) = filters.start_date {
            qb.push(" AND j.created_at >= ").push_bind(start);
        }
        if let Some(end) = filters.end_date {
            qb.push(" AND j.created_at <= ").push_bind(end);
        }
        if let Some(status) = filters.status {
            qb.push(" AND j.status = ").push_bind(status.as_str());
        }
        qb.push(" ORDER BY j.created_at DESC, j.id ASC");
        qb.build_query_as::<JobSummaryRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn item_status_counts(&self) -> Result<Vec<StatusCount>, AppError> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM inventory_items GROUP BY status ORDER BY status"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn item_category_counts(&self) -> Result<Vec<CategoryCount>, AppError> {
        sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS count FROM inventory_items GROUP BY category"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn open_assignment_records(&self) -> Result<Vec<OpenAssignmentRecord>, AppError> {
        sqlx::query_as::<_, OpenAssignmentRecord>(OPEN_ASSIGNMENTS)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
