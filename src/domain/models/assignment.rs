use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

text_enum!(AssignmentStatus, "assignment status" {
    CheckedOut => "checked_out",
    CheckedIn => "checked_in",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct InventoryAssignment {
    pub id: String,
    pub item_id: String,
    pub job_id: String,
    pub user_id: String,
    #[sqlx(try_from = "String")]
    pub status: AssignmentStatus,
    pub check_out_time: Option<DateTime<Utc>>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub expected_return_date: Option<DateTime<Utc>>,
    pub condition_at_checkout: Option<String>,
    pub condition_at_checkin: Option<String>,
    pub notes: Option<String>,
}

impl InventoryAssignment {
    pub fn check_out(item_id: String, job_id: String, user_id: String, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            item_id,
            job_id,
            user_id,
            status: AssignmentStatus::CheckedOut,
            check_out_time: Some(at),
            check_in_time: None,
            expected_return_date: None,
            condition_at_checkout: None,
            condition_at_checkin: None,
            notes: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckoutDraft {
    pub job_id: Option<String>,
    pub user_id: Option<String>,
    pub expected_return_date: Option<String>,
    pub condition: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CheckinDraft {
    pub condition: Option<String>,
    pub notes: Option<String>,
    /// Item status after return; defaults to `available`.
    pub status: Option<String>,
}

/// Which assignments a dashboard counter ranges over.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentScope {
    All,
    Jobs(Vec<String>),
    User(String),
}
