//! Role-keyed access rules.
//!
//! Two flat tables drive every authorization decision: `VISIBILITY` says which
//! jobs (and through them, assignments) a role can see, `PERMISSIONS` says which
//! operations a role may invoke at all. List queries turn the visibility rule
//! into a store filter via [`JobScope`]; single-record fetches apply the same
//! rule after loading the record, so a denied record answers 403, not 404.

use crate::domain::models::{assignment::InventoryAssignment, job::Job, user::{Role, User}};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Every job and assignment.
    All,
    /// Jobs the user supervises (`assigned_foreman`) or created.
    Supervised,
    /// Jobs holding at least one assignment for the user; only their own assignments.
    Assigned,
}

pub const VISIBILITY: [(Role, Visibility); 4] = [
    (Role::Admin, Visibility::All),
    (Role::Finance, Visibility::All),
    (Role::Foreman, Visibility::Supervised),
    (Role::Technician, Visibility::Assigned),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateJob,
    UpdateJob,
    DeleteJob,
    AttachMedia,
    ManageUsers,
    ListUsers,
    ManageInventory,
    CheckOut,
    CheckOutForOthers,
    CheckIn,
    InventoryUsageReport,
    JobSummaryReport,
    InventoryStatusReport,
    OverdueItemsReport,
}

const SUPERVISORS: &[Role] = &[Role::Admin, Role::Foreman];
const REPORT_READERS: &[Role] = &[Role::Admin, Role::Foreman, Role::Finance];
const FIELD_ROLES: &[Role] = &[Role::Admin, Role::Foreman, Role::Technician];

pub const PERMISSIONS: [(Operation, &[Role]); 14] = [
    (Operation::CreateJob, SUPERVISORS),
    (Operation::UpdateJob, SUPERVISORS),
    (Operation::DeleteJob, &[Role::Admin]),
    (Operation::AttachMedia, FIELD_ROLES),
    (Operation::ManageUsers, &[Role::Admin]),
    (Operation::ListUsers, SUPERVISORS),
    (Operation::ManageInventory, SUPERVISORS),
    (Operation::CheckOut, FIELD_ROLES),
    (Operation::CheckOutForOthers, SUPERVISORS),
    (Operation::CheckIn, FIELD_ROLES),
    (Operation::InventoryUsageReport, REPORT_READERS),
    (Operation::JobSummaryReport, REPORT_READERS),
    (Operation::InventoryStatusReport, REPORT_READERS),
    (Operation::OverdueItemsReport, SUPERVISORS),
];

pub fn visibility(role: Role) -> Visibility {
    VISIBILITY
        .iter()
        .find(|(r, _)| *r == role)
        .map_or(Visibility::Assigned, |(_, v)| *v)
}

pub fn is_permitted(role: Role, operation: Operation) -> bool {
    PERMISSIONS
        .iter()
        .find(|(op, _)| *op == operation)
        .is_some_and(|(_, roles)| roles.contains(&role))
}

/// Role gate: fails `InsufficientPermission` when the caller's role may not invoke `operation`.
pub fn require(user: &User, operation: Operation) -> Result<(), AppError> {
    if is_permitted(user.role, operation) {
        Ok(())
    } else {
        Err(AppError::InsufficientPermission)
    }
}

/// The set of jobs visible to one user, as consumed by list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobScope {
    All,
    SupervisedBy(String),
    AssignedTo(String),
}

impl JobScope {
    /// Whether `job` is in scope. `assignments` must hold the job's assignments
    /// (only consulted for `AssignedTo`).
    pub fn admits(&self, job: &Job, assignments: &[InventoryAssignment]) -> bool {
        match self {
            JobScope::All => true,
            JobScope::SupervisedBy(user_id) => {
                job.assigned_foreman.as_deref() == Some(user_id.as_str()) || job.created_by == *user_id
            }
            JobScope::AssignedTo(user_id) => assignments
                .iter()
                .any(|a| a.job_id == job.id && a.user_id == *user_id),
        }
    }
}

pub fn visible_jobs(user: &User) -> JobScope {
    match visibility(user.role) {
        Visibility::All => JobScope::All,
        Visibility::Supervised => JobScope::SupervisedBy(user.id.clone()),
        Visibility::Assigned => JobScope::AssignedTo(user.id.clone()),
    }
}

pub fn can_access_job(user: &User, job: &Job, assignments: &[InventoryAssignment]) -> bool {
    visible_jobs(user).admits(job, assignments)
}

/// Whether `assignment` (belonging to `job`) is visible to `user`.
pub fn can_access_assignment(user: &User, job: &Job, assignment: &InventoryAssignment) -> bool {
    match visibility(user.role) {
        Visibility::All => true,
        Visibility::Supervised => visible_jobs(user).admits(job, &[]),
        Visibility::Assigned => assignment.user_id == user.id,
    }
}

/// Post-fetch check for single-record endpoints.
pub fn ensure_job_access(user: &User, job: &Job, assignments: &[InventoryAssignment]) -> Result<(), AppError> {
    if can_access_job(user, job, assignments) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, job_id = %job.id, "job outside caller scope");
        Err(AppError::AccessDenied)
    }
}
