use crate::domain::models::{
    assignment::{AssignmentScope, InventoryAssignment},
    inventory::{InventoryItem, ItemFilters, ItemStatus},
    job::{Job, JobFilters, StatusCount},
    media::JobMedia,
    page::PageRequest,
    report::{CategoryCount, JobSummaryFilters, JobSummaryRecord, OpenAssignmentRecord, UsageFilters, UsageRecord},
    user::User,
};
use crate::domain::services::access_policy::JobScope;
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<Job, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Job>, AppError>;
    async fn find_by_claim_id(&self, claim_id: &str) -> Result<Option<Job>, AppError>;
    async fn update(&self, job: &Job) -> Result<Job, AppError>;
    /// Deletes the job unless it has a `checked_out` assignment. The check and the
    /// delete are one atomic unit: fails `NotFound` or `Conflict`.
    async fn delete_unless_checked_out(&self, id: &str) -> Result<(), AppError>;
    /// Returns the requested page of the scoped, filtered, sorted jobs and the total match count.
    async fn list(&self, scope: &JobScope, filters: &JobFilters, page: &PageRequest) -> Result<(Vec<Job>, i64), AppError>;
    async fn visible_ids(&self, scope: &JobScope) -> Result<Vec<String>, AppError>;
    async fn count_by_status(&self, scope: &JobScope) -> Result<Vec<StatusCount>, AppError>;
    async fn add_media(&self, media: &JobMedia) -> Result<JobMedia, AppError>;
    async fn list_media(&self, job_id: &str) -> Result<Vec<JobMedia>, AppError>;
}

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn create_item(&self, item: &InventoryItem) -> Result<InventoryItem, AppError>;
    async fn find_item(&self, id: &str) -> Result<Option<InventoryItem>, AppError>;
    async fn list_items(&self, filters: &ItemFilters) -> Result<Vec<InventoryItem>, AppError>;
    /// Marks the item `in-use` and records the assignment in one transaction.
    /// Fails `Conflict` if the item is not available and `NotFound` if the job vanished.
    async fn check_out(&self, assignment: &InventoryAssignment) -> Result<InventoryAssignment, AppError>;
    /// Closes the assignment and sets the returned item's status in one transaction.
    async fn check_in(&self, assignment: &InventoryAssignment, item_status: ItemStatus, item_condition: Option<&str>) -> Result<InventoryAssignment, AppError>;
    async fn find_open_assignment(&self, item_id: &str) -> Result<Option<InventoryAssignment>, AppError>;
    async fn list_by_job(&self, job_id: &str) -> Result<Vec<InventoryAssignment>, AppError>;
    async fn count_by_status(&self, scope: &AssignmentScope) -> Result<Vec<StatusCount>, AppError>;
    async fn count_distinct_jobs(&self, user_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn usage_records(&self, filters: &UsageFilters) -> Result<Vec<UsageRecord>, AppError>;
    async fn job_summary_records(&self, filters: &JobSummaryFilters) -> Result<Vec<JobSummaryRecord>, AppError>;
    async fn item_status_counts(&self) -> Result<Vec<StatusCount>, AppError>;
    async fn item_category_counts(&self) -> Result<Vec<CategoryCount>, AppError>;
    async fn open_assignment_records(&self) -> Result<Vec<OpenAssignmentRecord>, AppError>;
}
