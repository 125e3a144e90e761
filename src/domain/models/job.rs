use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use crate::domain::models::{assignment::InventoryAssignment, media::JobMedia};

text_enum!(JobStatus, "job status" {
    Pending => "pending",
    Active => "active",
    OnHold => "on_hold",
    Completed => "completed",
    Cancelled => "cancelled",
});

text_enum!(Priority, "priority" {
    Low => "low",
    Medium => "medium",
    High => "high",
    Urgent => "urgent",
});

impl Priority {
    pub fn rank(self) -> i32 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Urgent => 4,
        }
    }

    /// SQL expression ranking the `priority` column, highest priority largest.
    pub fn rank_sql(column: &str) -> String {
        let arms: String = Priority::ALL
            .iter()
            .map(|p| format!(" WHEN '{}' THEN {}", p.as_str(), p.rank()))
            .collect();
        format!("CASE {column}{arms} ELSE 0 END")
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Job {
    pub id: String,
    pub claim_id: Option<String>,
    pub xactimate_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub estimated_completion: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub created_by: String,
    pub assigned_foreman: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(name: String, created_by: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            claim_id: None,
            xactimate_id: None,
            name,
            description: None,
            location: None,
            address: None,
            latitude: None,
            longitude: None,
            start_date: None,
            end_date: None,
            estimated_completion: None,
            status: JobStatus::Pending,
            priority: Priority::Medium,
            customer_name: None,
            customer_phone: None,
            customer_email: None,
            created_by,
            assigned_foreman: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Client-supplied fields of a new job. Dates arrive as ISO-8601 strings.
#[derive(Debug, Deserialize, Default)]
pub struct JobDraft {
    pub claim_id: Option<String>,
    pub xactimate_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub estimated_completion: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub assigned_foreman: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct JobFilters {
    pub status: Option<JobStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    pub assignments: Vec<InventoryAssignment>,
    pub media: Vec<JobMedia>,
}

/// Role-scoped counters. Fields a role is not entitled to are omitted.
#[derive(Debug, Serialize, Default, PartialEq)]
pub struct DashboardStats {
    pub total_jobs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_jobs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_jobs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_jobs: Option<i64>,
    pub total_assignments: i64,
    pub active_assignments: i64,
}

#[derive(Debug, FromRow, Clone, PartialEq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

pub fn count_for(counts: &[StatusCount], status: &str) -> i64 {
    counts.iter().filter(|c| c.status == status).map(|c| c.count).sum()
}

pub fn count_total(counts: &[StatusCount]) -> i64 {
    counts.iter().map(|c| c.count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rank_sql_covers_every_priority() {
        let sql = Priority::rank_sql("priority");
        assert!(sql.starts_with("CASE priority"));
        for p in Priority::ALL {
            assert!(sql.contains(&format!("WHEN '{}' THEN {}", p.as_str(), p.rank())));
        }
        assert!(Priority::Urgent.rank() > Priority::High.rank());
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn test_new_job_defaults() {
        let job = Job::new("Roof tarp".into(), "u1".into());
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.priority, Priority::Medium);
        assert_eq!(job.created_at, job.updated_at);
    }

    #[test]
    fn test_status_counts() {
        let counts = vec![
            StatusCount { status: "active".into(), count: 2 },
            StatusCount { status: "pending".into(), count: 3 },
        ];
        assert_eq!(count_for(&counts, "active"), 2);
        assert_eq!(count_for(&counts, "completed"), 0);
        assert_eq!(count_total(&counts), 5);
    }
}
