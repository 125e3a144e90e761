use std::collections::BTreeMap;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::info;
use crate::domain::models::{
    job::StatusCount,
    report::{
        CategoryCount, CategorySummary, InventoryStatusData, InventoryStatusReport, ItemInUseRow, JobSummaryFilters,
        JobSummaryRecord, JobSummaryReport, JobSummaryRow, OpenAssignmentRecord, OverdueReport, OverdueRow,
        StatusSummary, UsageFilters, UsageRecord, UsageReport, UsageRow,
    },
    user::{display_name, User},
};
use crate::domain::ports::ReportRepository;
use crate::domain::services::access_policy::{self, Operation};
use crate::error::AppError;

pub const UNCATEGORIZED: &str = "Uncategorized";
const SECONDS_PER_DAY: i64 = 86_400;

/// Hours between check-out and check-in, rounded to two decimals.
pub fn duration_hours(check_out: Option<DateTime<Utc>>, check_in: Option<DateTime<Utc>>) -> Option<f64> {
    let (out, back) = (check_out?, check_in?);
    let hours = (back - out).num_milliseconds() as f64 / 3_600_000.0;
    Some((hours * 100.0).round() / 100.0)
}

/// Whole days from `start` to `end`, floored.
pub fn whole_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_seconds().div_euclid(SECONDS_PER_DAY)
}

pub fn usage_rows(records: Vec<UsageRecord>) -> Vec<UsageRow> {
    records
        .into_iter()
        .map(|r| UsageRow {
            user_name: display_name(r.user_first_name.as_deref(), r.user_last_name.as_deref(), &r.user_username),
            duration_hours: duration_hours(r.check_out_time, r.check_in_time),
            assignment_id: r.assignment_id,
            item_sku: r.item_sku,
            item_name: r.item_name,
            item_category: r.item_category,
            job_name: r.job_name,
            job_claim_id: r.job_claim_id,
            user_role: r.user_role,
            check_out_time: r.check_out_time,
            check_in_time: r.check_in_time,
            status: r.status,
            condition_at_checkout: r.condition_at_checkout,
            condition_at_checkin: r.condition_at_checkin,
            notes: r.notes,
        })
        .collect()
}

pub fn job_summary_rows(records: Vec<JobSummaryRecord>) -> Vec<JobSummaryRow> {
    records
        .into_iter()
        .map(|r| {
            let job = r.job;
            let duration_days = match (job.start_date, job.end_date) {
                (Some(start), Some(end)) => Some(whole_days(start, end)),
                _ => None,
            };
            JobSummaryRow {
                job_id: job.id,
                claim_id: job.claim_id,
                xactimate_id: job.xactimate_id,
                name: job.name,
                location: job.location,
                status: job.status,
                priority: job.priority,
                customer_name: job.customer_name,
                start_date: job.start_date,
                end_date: job.end_date,
                duration_days,
                total_assignments: r.total_assignments,
                active_assignments: r.active_assignments,
                created_at: job.created_at,
            }
        })
        .collect()
}

pub fn status_summary(counts: Vec<StatusCount>) -> Vec<StatusSummary> {
    counts
        .into_iter()
        .map(|c| StatusSummary { status: c.status, count: c.count })
        .collect()
}

/// Groups category counts, folding missing categories into "Uncategorized".
pub fn category_summary(counts: Vec<CategoryCount>) -> Vec<CategorySummary> {
    let mut grouped: BTreeMap<String, i64> = BTreeMap::new();
    for c in counts {
        let key = c.category
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        *grouped.entry(key).or_default() += c.count;
    }
    grouped
        .into_iter()
        .map(|(category, count)| CategorySummary { category, count })
        .collect()
}

pub fn items_in_use(records: &[OpenAssignmentRecord]) -> Vec<ItemInUseRow> {
    records
        .iter()
        .map(|r| ItemInUseRow {
            item_sku: r.item_sku.clone(),
            item_name: r.item_name.clone(),
            category: r.item_category.clone(),
            job_name: r.job_name.clone(),
            job_claim_id: r.job_claim_id.clone(),
            assigned_to: display_name(r.user_first_name.as_deref(), r.user_last_name.as_deref(), &r.user_username),
            check_out_time: r.check_out_time,
            expected_return: r.expected_return_date,
        })
        .collect()
}

/// Open assignments whose expected return date lies strictly before `now`.
pub fn overdue_rows(records: &[OpenAssignmentRecord], now: DateTime<Utc>) -> Vec<OverdueRow> {
    let mut rows: Vec<OverdueRow> = records
        .iter()
        .filter_map(|r| {
            let expected = r.expected_return_date.filter(|expected| *expected < now)?;
            Some(OverdueRow {
                assignment_id: r.assignment_id.clone(),
                item_sku: r.item_sku.clone(),
                item_name: r.item_name.clone(),
                job_name: r.job_name.clone(),
                job_claim_id: r.job_claim_id.clone(),
                assigned_to: display_name(r.user_first_name.as_deref(), r.user_last_name.as_deref(), &r.user_username),
                user_email: r.user_email.clone(),
                user_phone: r.user_phone.clone(),
                check_out_time: r.check_out_time,
                expected_return_date: Some(expected),
                days_overdue: whole_days(expected, now),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue).then_with(|| a.assignment_id.cmp(&b.assignment_id)));
    rows
}

pub struct ReportService {
    repo: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(repo: Arc<dyn ReportRepository>) -> Self {
        Self { repo }
    }

    pub async fn inventory_usage(&self, user: &User, filters: UsageFilters) -> Result<UsageReport, AppError> {
        access_policy::require(user, Operation::InventoryUsageReport)?;
        let data = usage_rows(self.repo.usage_records(&filters).await?);
        info!(rows = data.len(), "Generated inventory usage report");
        Ok(UsageReport {
            report_type: "inventory_usage",
            generated_at: Utc::now(),
            filters,
            total_records: data.len(),
            data,
        })
    }

    pub async fn job_summary(&self, user: &User, filters: JobSummaryFilters) -> Result<JobSummaryReport, AppError> {
        access_policy::require(user, Operation::JobSummaryReport)?;
        let data = job_summary_rows(self.repo.job_summary_records(&filters).await?);
        info!(rows = data.len(), "Generated job summary report");
        Ok(JobSummaryReport {
            report_type: "job_summary",
            generated_at: Utc::now(),
            filters,
            total_records: data.len(),
            data,
        })
    }

    pub async fn inventory_status(&self, user: &User) -> Result<InventoryStatusReport, AppError> {
        access_policy::require(user, Operation::InventoryStatusReport)?;
        let open = self.repo.open_assignment_records().await?;
        let data = InventoryStatusData {
            status_summary: status_summary(self.repo.item_status_counts().await?),
            category_summary: category_summary(self.repo.item_category_counts().await?),
            items_in_use: items_in_use(&open),
        };
        info!(items_in_use = data.items_in_use.len(), "Generated inventory status report");
        Ok(InventoryStatusReport {
            report_type: "inventory_status",
            generated_at: Utc::now(),
            data,
        })
    }

    pub async fn overdue_items(&self, user: &User, now: DateTime<Utc>) -> Result<OverdueReport, AppError> {
        access_policy::require(user, Operation::OverdueItemsReport)?;
        let data = overdue_rows(&self.repo.open_assignment_records().await?, now);
        info!(rows = data.len(), "Generated overdue items report");
        Ok(OverdueReport {
            report_type: "overdue_items",
            generated_at: now,
            total_overdue: data.len(),
            data,
        })
    }
}
