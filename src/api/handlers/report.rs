use axum::{
    extract::{State, Query},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{FormatQuery, JobSummaryQuery, ReportFormat, UsageReportQuery};
use crate::domain::services::{
    access_policy::{self, Operation},
    export::to_csv,
};
use crate::error::AppError;
use std::sync::Arc;

fn csv_attachment(report: &str, body: String) -> Response {
    let filename = format!("{report}_report_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        body,
    )
        .into_response()
}

pub async fn inventory_usage(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<UsageReportQuery>,
) -> Result<Response, AppError> {
    access_policy::require(&user, Operation::InventoryUsageReport)?;
    let format = ReportFormat::parse(&query.format)?;
    let report = state.report_service.inventory_usage(&user, query.filters()?).await?;
    Ok(match format {
        ReportFormat::Csv => csv_attachment("inventory_usage", to_csv(&report.data)?),
        ReportFormat::Json => Json(report).into_response(),
    })
}

pub async fn job_summary(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<JobSummaryQuery>,
) -> Result<Response, AppError> {
    access_policy::require(&user, Operation::JobSummaryReport)?;
    let format = ReportFormat::parse(&query.format)?;
    let report = state.report_service.job_summary(&user, query.filters()?).await?;
    Ok(match format {
        ReportFormat::Csv => csv_attachment("job_summary", to_csv(&report.data)?),
        ReportFormat::Json => Json(report).into_response(),
    })
}

pub async fn inventory_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<FormatQuery>,
) -> Result<Response, AppError> {
    access_policy::require(&user, Operation::InventoryStatusReport)?;
    let format = ReportFormat::parse(&query.format)?;
    let report = state.report_service.inventory_status(&user).await?;
    Ok(match format {
        ReportFormat::Csv => csv_attachment("inventory_status", to_csv(&report.data.items_in_use)?),
        ReportFormat::Json => Json(report).into_response(),
    })
}

pub async fn overdue_items(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<FormatQuery>,
) -> Result<Response, AppError> {
    access_policy::require(&user, Operation::OverdueItemsReport)?;
    let format = ReportFormat::parse(&query.format)?;
    let report = state.report_service.overdue_items(&user, Utc::now()).await?;
    Ok(match format {
        ReportFormat::Csv => csv_attachment("overdue_items", to_csv(&report.data)?),
        ReportFormat::Json => Json(report).into_response(),
    })
}
