use std::sync::Arc;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::info;
use crate::domain::models::{
    assignment::{AssignmentScope, AssignmentStatus, InventoryAssignment},
    job::{count_for, count_total, DashboardStats, Job, JobDetail, JobDraft, JobFilters, JobStatus, Priority},
    media::{JobMedia, MediaDraft},
    page::{JobPage, PageRequest},
    user::User,
};
use crate::domain::ports::{InventoryRepository, JobRepository, UserRepository};
use crate::domain::services::access_policy::{self, JobScope, Operation, Visibility};
use crate::domain::services::dates::{parse_iso_datetime, parse_optional};
use crate::error::AppError;

pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    assignments: Arc<dyn InventoryRepository>,
    users: Arc<dyn UserRepository>,
}

impl JobService {
    pub fn new(jobs: Arc<dyn JobRepository>, assignments: Arc<dyn InventoryRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { jobs, assignments, users }
    }

    pub async fn list_jobs(&self, user: &User, filters: &JobFilters, page: PageRequest) -> Result<JobPage<Job>, AppError> {
        let scope = access_policy::visible_jobs(user);
        let (jobs, total) = self.jobs.list(&scope, filters, &page).await?;
        Ok(JobPage::new(jobs, total, page))
    }

    /// Loads a job and its assignments, failing `NotFound` before `AccessDenied`.
    async fn load_accessible(&self, user: &User, id: &str) -> Result<(Job, Vec<InventoryAssignment>), AppError> {
        let job = self.jobs.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Job not found".into()))?;
        let assignments = self.assignments.list_by_job(&job.id).await?;
        access_policy::ensure_job_access(user, &job, &assignments)?;
        Ok((job, assignments))
    }

    pub async fn get_job(&self, user: &User, id: &str) -> Result<JobDetail, AppError> {
        let (job, assignments) = self.load_accessible(user, id).await?;
        let media = self.jobs.list_media(&job.id).await?;
        Ok(JobDetail { job, assignments, media })
    }

    pub async fn list_job_assignments(&self, user: &User, job_id: &str) -> Result<Vec<InventoryAssignment>, AppError> {
        let (_, assignments) = self.load_accessible(user, job_id).await?;
        Ok(assignments)
    }

    pub async fn create_job(&self, user: &User, draft: JobDraft) -> Result<Job, AppError> {
        access_policy::require(user, Operation::CreateJob)?;

        let name = non_empty(draft.name)
            .ok_or_else(|| AppError::Validation("name is required".into()))?;

        let claim_id = non_empty(draft.claim_id);
        if let Some(claim) = &claim_id {
            self.ensure_claim_available(claim, None).await?;
        }

        let mut job = Job::new(name, user.id.clone());
        job.claim_id = claim_id;
        job.xactimate_id = draft.xactimate_id;
        job.description = draft.description;
        job.location = draft.location;
        job.address = draft.address;
        job.latitude = draft.latitude;
        job.longitude = draft.longitude;
        job.start_date = parse_optional("start_date", draft.start_date.as_deref())?;
        job.end_date = parse_optional("end_date", draft.end_date.as_deref())?;
        job.estimated_completion = parse_optional("estimated_completion", draft.estimated_completion.as_deref())?;
        if let Some(status) = non_empty(draft.status) {
            job.status = status.parse()?;
        }
        if let Some(priority) = non_empty(draft.priority) {
            job.priority = priority.parse()?;
        }
        job.customer_name = draft.customer_name;
        job.customer_phone = draft.customer_phone;
        job.customer_email = draft.customer_email;
        job.assigned_foreman = non_empty(draft.assigned_foreman);
        if let Some(foreman_id) = &job.assigned_foreman {
            self.ensure_user_exists(foreman_id).await?;
        }

        let created = self.jobs.create(&job).await?;
        info!(job_id = %created.id, created_by = %user.id, "Job created: {}", created.name);
        Ok(created)
    }

    pub async fn update_job(&self, user: &User, id: &str, patch: &Map<String, Value>) -> Result<Job, AppError> {
        access_policy::require(user, Operation::UpdateJob)?;

        let mut job = self.jobs.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Job not found".into()))?;
        access_policy::ensure_job_access(user, &job, &[])?;

        let previous_claim = job.claim_id.clone();
        apply_patch(&mut job, patch)?;

        if job.claim_id != previous_claim
            && let Some(claim) = &job.claim_id
        {
            self.ensure_claim_available(claim, Some(&job.id)).await?;
        }
        if patch.contains_key("assigned_foreman")
            && let Some(foreman_id) = &job.assigned_foreman
        {
            self.ensure_user_exists(foreman_id).await?;
        }

        job.updated_at = Utc::now();
        let updated = self.jobs.update(&job).await?;
        info!(job_id = %updated.id, updated_by = %user.id, "Job updated");
        Ok(updated)
    }

    pub async fn delete_job(&self, user: &User, id: &str) -> Result<(), AppError> {
        access_policy::require(user, Operation::DeleteJob)?;
        self.jobs.delete_unless_checked_out(id).await?;
        info!(job_id = %id, deleted_by = %user.id, "Job deleted");
        Ok(())
    }

    pub async fn attach_media(&self, user: &User, job_id: &str, draft: MediaDraft) -> Result<JobMedia, AppError> {
        access_policy::require(user, Operation::AttachMedia)?;
        let (job, _) = self.load_accessible(user, job_id).await?;

        let filename = non_empty(draft.filename)
            .ok_or_else(|| AppError::Validation("filename is required".into()))?;
        let mut media = JobMedia::new(job.id, filename, user.id.clone());
        media.file_type = draft.file_type;
        media.description = draft.description;

        let created = self.jobs.add_media(&media).await?;
        info!(job_id = %created.job_id, media_id = %created.id, "Media attached");
        Ok(created)
    }

    pub async fn dashboard_stats(&self, user: &User) -> Result<DashboardStats, AppError> {
        let scope = access_policy::visible_jobs(user);
        match access_policy::visibility(user.role) {
            Visibility::All | Visibility::Supervised => {
                let job_counts = self.jobs.count_by_status(&scope).await?;
                let assignment_scope = match &scope {
                    JobScope::All => AssignmentScope::All,
                    _ => AssignmentScope::Jobs(self.jobs.visible_ids(&scope).await?),
                };
                let assignment_counts = self.assignments.count_by_status(&assignment_scope).await?;

                Ok(DashboardStats {
                    total_jobs: count_total(&job_counts),
                    active_jobs: Some(count_for(&job_counts, JobStatus::Active.as_str())),
                    pending_jobs: Some(count_for(&job_counts, JobStatus::Pending.as_str())),
                    completed_jobs: Some(count_for(&job_counts, JobStatus::Completed.as_str())),
                    total_assignments: count_total(&assignment_counts),
                    active_assignments: count_for(&assignment_counts, AssignmentStatus::CheckedOut.as_str()),
                })
            }
            Visibility::Assigned => {
                let assignment_counts = self.assignments
                    .count_by_status(&AssignmentScope::User(user.id.clone()))
                    .await?;
                Ok(DashboardStats {
                    total_jobs: self.assignments.count_distinct_jobs(&user.id).await?,
                    total_assignments: count_total(&assignment_counts),
                    active_assignments: count_for(&assignment_counts, AssignmentStatus::CheckedOut.as_str()),
                    ..DashboardStats::default()
                })
            }
        }
    }

    async fn ensure_claim_available(&self, claim_id: &str, own_id: Option<&str>) -> Result<(), AppError> {
        match self.jobs.find_by_claim_id(claim_id).await? {
            Some(existing) if Some(existing.id.as_str()) != own_id => {
                Err(AppError::DuplicateKey("Claim ID already exists".into()))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_user_exists(&self, user_id: &str) -> Result<(), AppError> {
        self.users.find_by_id(user_id).await?
            .map(|_| ())
            .ok_or_else(|| AppError::Validation(format!("Unknown user: {user_id}")))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Applies the recognised fields of a partial update. Unknown keys are ignored.
pub fn apply_patch(job: &mut Job, patch: &Map<String, Value>) -> Result<(), AppError> {
    for (key, value) in patch {
        match key.as_str() {
            "name" => {
                job.name = patch_string(key, value)?
                    .filter(|n| !n.trim().is_empty())
                    .ok_or_else(|| AppError::Validation("name is required".into()))?;
            }
            "claim_id" => job.claim_id = patch_string(key, value)?.filter(|c| !c.trim().is_empty()),
            "xactimate_id" => job.xactimate_id = patch_string(key, value)?,
            "description" => job.description = patch_string(key, value)?,
            "location" => job.location = patch_string(key, value)?,
            "address" => job.address = patch_string(key, value)?,
            "latitude" => job.latitude = patch_number(key, value)?,
            "longitude" => job.longitude = patch_number(key, value)?,
            "start_date" => job.start_date = patch_date(key, value)?,
            "end_date" => job.end_date = patch_date(key, value)?,
            "estimated_completion" => job.estimated_completion = patch_date(key, value)?,
            "status" => {
                job.status = patch_string(key, value)?
                    .ok_or_else(|| AppError::Validation("status cannot be null".into()))?
                    .parse::<JobStatus>()?;
            }
            "priority" => {
                job.priority = patch_string(key, value)?
                    .ok_or_else(|| AppError::Validation("priority cannot be null".into()))?
                    .parse::<Priority>()?;
            }
            "customer_name" => job.customer_name = patch_string(key, value)?,
            "customer_phone" => job.customer_phone = patch_string(key, value)?,
            "customer_email" => job.customer_email = patch_string(key, value)?,
            "assigned_foreman" => job.assigned_foreman = patch_string(key, value)?.filter(|f| !f.is_empty()),
            _ => {}
        }
    }
    Ok(())
}

fn patch_string(key: &str, value: &Value) -> Result<Option<String>, AppError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(AppError::Validation(format!("{key} must be a string"))),
    }
}

fn patch_number(key: &str, value: &Value) -> Result<Option<f64>, AppError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64()
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("{key} must be a number"))),
        _ => Err(AppError::Validation(format!("{key} must be a number"))),
    }
}

fn patch_date(key: &str, value: &Value) -> Result<Option<chrono::DateTime<Utc>>, AppError> {
    match patch_string(key, value)? {
        Some(raw) if !raw.trim().is_empty() => parse_iso_datetime(key, &raw).map(Some),
        _ => Ok(None),
    }
}
