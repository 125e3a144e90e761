use serde::Deserialize;
use crate::domain::models::{
    inventory::ItemFilters,
    job::JobFilters,
    report::{JobSummaryFilters, UsageFilters},
};
use crate::domain::services::dates::parse_optional;
use crate::error::AppError;

fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Unparseable numbers fall back to the defaults instead of failing the request.
fn lenient_number(value: &Option<String>) -> Option<i64> {
    blank_to_none(value).and_then(|v| v.parse().ok())
}

#[derive(Debug, Deserialize, Default)]
pub struct ListJobsQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListJobsQuery {
    pub fn filters(&self) -> Result<JobFilters, AppError> {
        Ok(JobFilters {
            status: blank_to_none(&self.status).map(str::parse).transpose()?,
            priority: blank_to_none(&self.priority).map(str::parse).transpose()?,
            // Search is case-sensitive and untrimmed; only an empty term is dropped.
            search: self.search.clone().filter(|s| !s.is_empty()),
        })
    }

    pub fn page(&self) -> Option<i64> {
        lenient_number(&self.page)
    }

    pub fn per_page(&self) -> Option<i64> {
        lenient_number(&self.per_page)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct InventoryQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl InventoryQuery {
    pub fn filters(&self) -> Result<ItemFilters, AppError> {
        Ok(ItemFilters {
            status: blank_to_none(&self.status).map(str::parse).transpose()?,
            category: blank_to_none(&self.category).map(String::from),
            search: self.search.clone().filter(|s| !s.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    pub fn parse(raw: &Option<String>) -> Result<Self, AppError> {
        match blank_to_none(raw) {
            None | Some("json") => Ok(ReportFormat::Json),
            Some("csv") => Ok(ReportFormat::Csv),
            Some(other) => Err(AppError::Validation(format!("Unsupported format: {other}"))),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct UsageReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub job_id: Option<String>,
    pub user_id: Option<String>,
    pub format: Option<String>,
}

impl UsageReportQuery {
    pub fn filters(&self) -> Result<UsageFilters, AppError> {
        Ok(UsageFilters {
            start_date: parse_optional("start_date", self.start_date.as_deref())?,
            end_date: parse_optional("end_date", self.end_date.as_deref())?,
            job_id: blank_to_none(&self.job_id).map(String::from),
            user_id: blank_to_none(&self.user_id).map(String::from),
        })
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct JobSummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    pub format: Option<String>,
}

impl JobSummaryQuery {
    pub fn filters(&self) -> Result<JobSummaryFilters, AppError> {
        Ok(JobSummaryFilters {
            start_date: parse_optional("start_date", self.start_date.as_deref())?,
            end_date: parse_optional("end_date", self.end_date.as_deref())?,
            status: blank_to_none(&self.status).map(str::parse).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FormatQuery {
    pub format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::job::{JobStatus, Priority};

    #[test]
    fn test_list_jobs_query_parsing() {
        let query = ListJobsQuery {
            status: Some("active".into()),
            priority: Some("".into()),
            search: Some("Smith".into()),
            page: Some("two".into()),
            per_page: Some("5".into()),
        };
        let filters = query.filters().unwrap();
        assert_eq!(filters.status, Some(JobStatus::Active));
        assert_eq!(filters.priority, None::<Priority>);
        assert_eq!(filters.search.as_deref(), Some("Smith"));
        assert_eq!(query.page(), None);
        assert_eq!(query.per_page(), Some(5));
    }

    #[test]
    fn test_unknown_status_is_a_validation_error() {
        let query = ListJobsQuery { status: Some("archived".into()), ..Default::default() };
        assert!(matches!(query.filters(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_report_format() {
        assert_eq!(ReportFormat::parse(&None).unwrap(), ReportFormat::Json);
        assert_eq!(ReportFormat::parse(&Some("csv".into())).unwrap(), ReportFormat::Csv);
        assert!(matches!(ReportFormat::parse(&Some("xml".into())), Err(AppError::Validation(_))));
    }
}
