use serde::Serialize;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::domain::models::{
    assignment::AssignmentStatus,
    job::{Job, JobStatus, Priority},
    user::Role,
};

/// A report row that can be flattened into a table. `COLUMNS` lists the
/// serialized field names in declaration order.
pub trait TabularRow: Serialize {
    const COLUMNS: &'static [&'static str];
}

// ---- store records (pre-joined) ----

#[derive(Debug, FromRow, Clone)]
pub struct UsageRecord {
    pub assignment_id: String,
    pub item_sku: String,
    pub item_name: String,
    pub item_category: Option<String>,
    pub job_name: String,
    pub job_claim_id: Option<String>,
    pub user_username: String,
    pub user_first_name: Option<String>,
    pub user_last_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub user_role: Role,
    pub check_out_time: Option<DateTime<Utc>>,
    pub check_in_time: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub status: AssignmentStatus,
    pub condition_at_checkout: Option<String>,
    pub condition_at_checkin: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, FromRow, Clone)]
pub struct JobSummaryRecord {
    #[sqlx(flatten)]
    pub job: Job,
    pub total_assignments: i64,
    pub active_assignments: i64,
}

/// A `checked_out` assignment joined with its item, job and assignee.
#[derive(Debug, FromRow, Clone)]
pub struct OpenAssignmentRecord {
    pub assignment_id: String,
    pub item_sku: String,
    pub item_name: String,
    pub item_category: Option<String>,
    pub job_name: String,
    pub job_claim_id: Option<String>,
    pub user_username: String,
    pub user_first_name: Option<String>,
    pub user_last_name: Option<String>,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub expected_return_date: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: Option<String>,
    pub count: i64,
}

// ---- filters ----

#[derive(Debug, Default, Clone, Serialize)]
pub struct UsageFilters {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub job_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct JobSummaryFilters {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<JobStatus>,
}

// ---- rows ----

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct UsageRow {
    pub assignment_id: String,
    pub item_sku: String,
    pub item_name: String,
    pub item_category: Option<String>,
    pub job_name: String,
    pub job_claim_id: Option<String>,
    pub user_name: String,
    pub user_role: Role,
    pub check_out_time: Option<DateTime<Utc>>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub duration_hours: Option<f64>,
    pub status: AssignmentStatus,
    pub condition_at_checkout: Option<String>,
    pub condition_at_checkin: Option<String>,
    pub notes: Option<String>,
}

impl TabularRow for UsageRow {
    const COLUMNS: &'static [&'static str] = &[
        "assignment_id", "item_sku", "item_name", "item_category", "job_name", "job_claim_id",
        "user_name", "user_role", "check_out_time", "check_in_time", "duration_hours", "status",
        "condition_at_checkout", "condition_at_checkin", "notes",
    ];
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct JobSummaryRow {
    pub job_id: String,
    pub claim_id: Option<String>,
    pub xactimate_id: Option<String>,
    pub name: String,
    pub location: Option<String>,
    pub status: JobStatus,
    pub priority: Priority,
    pub customer_name: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub duration_days: Option<i64>,
    pub total_assignments: i64,
    pub active_assignments: i64,
    pub created_at: DateTime<Utc>,
}

impl TabularRow for JobSummaryRow {
    const COLUMNS: &'static [&'static str] = &[
        "job_id", "claim_id", "xactimate_id", "name", "location", "status", "priority",
        "customer_name", "start_date", "end_date", "duration_days", "total_assignments",
        "active_assignments", "created_at",
    ];
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ItemInUseRow {
    pub item_sku: String,
    pub item_name: String,
    pub category: Option<String>,
    pub job_name: String,
    pub job_claim_id: Option<String>,
    pub assigned_to: String,
    pub check_out_time: Option<DateTime<Utc>>,
    pub expected_return: Option<DateTime<Utc>>,
}

impl TabularRow for ItemInUseRow {
    const COLUMNS: &'static [&'static str] = &[
        "item_sku", "item_name", "category", "job_name", "job_claim_id", "assigned_to",
        "check_out_time", "expected_return",
    ];
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct OverdueRow {
    pub assignment_id: String,
    pub item_sku: String,
    pub item_name: String,
    pub job_name: String,
    pub job_claim_id: Option<String>,
    pub assigned_to: String,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub expected_return_date: Option<DateTime<Utc>>,
    pub days_overdue: i64,
}

impl TabularRow for OverdueRow {
    const COLUMNS: &'static [&'static str] = &[
        "assignment_id", "item_sku", "item_name", "job_name", "job_claim_id", "assigned_to",
        "user_email", "user_phone", "check_out_time", "expected_return_date", "days_overdue",
    ];
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StatusSummary {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub count: i64,
}

// ---- envelopes ----

#[derive(Debug, Serialize)]
pub struct UsageReport {
    pub report_type: &'static str,
    pub generated_at: DateTime<Utc>,
    pub filters: UsageFilters,
    pub total_records: usize,
    pub data: Vec<UsageRow>,
}

#[derive(Debug, Serialize)]
pub struct JobSummaryReport {
    pub report_type: &'static str,
    pub generated_at: DateTime<Utc>,
    pub filters: JobSummaryFilters,
    pub total_records: usize,
    pub data: Vec<JobSummaryRow>,
}

#[derive(Debug, Serialize)]
pub struct InventoryStatusData {
    pub status_summary: Vec<StatusSummary>,
    pub category_summary: Vec<CategorySummary>,
    pub items_in_use: Vec<ItemInUseRow>,
}

#[derive(Debug, Serialize)]
pub struct InventoryStatusReport {
    pub report_type: &'static str,
    pub generated_at: DateTime<Utc>,
    pub data: InventoryStatusData,
}

#[derive(Debug, Serialize)]
pub struct OverdueReport {
    pub report_type: &'static str,
    pub generated_at: DateTime<Utc>,
    pub total_overdue: usize,
    pub data: Vec<OverdueRow>,
}
