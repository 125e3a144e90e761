use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata of a file attached to a job. The bytes live outside the store.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct JobMedia {
    pub id: String,
    pub job_id: String,
    pub filename: String,
    pub file_type: Option<String>,
    pub description: Option<String>,
    pub uploaded_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JobMedia {
    pub fn new(job_id: String, filename: String, uploaded_by: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_id,
            filename,
            file_type: None,
            description: None,
            uploaded_by: Some(uploaded_by),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MediaDraft {
    pub filename: Option<String>,
    pub file_type: Option<String>,
    pub description: Option<String>,
}
