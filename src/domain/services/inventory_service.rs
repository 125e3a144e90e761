use std::sync::Arc;
use chrono::Utc;
use tracing::info;
use crate::domain::models::{
    assignment::{AssignmentStatus, CheckinDraft, CheckoutDraft, InventoryAssignment},
    inventory::{InventoryItem, ItemDraft, ItemFilters, ItemStatus},
    user::{Role, User},
};
use crate::domain::ports::{InventoryRepository, JobRepository, UserRepository};
use crate::domain::services::access_policy::{self, Operation};
use crate::domain::services::dates::parse_optional;
use crate::error::AppError;

pub struct InventoryService {
    inventory: Arc<dyn InventoryRepository>,
    jobs: Arc<dyn JobRepository>,
    users: Arc<dyn UserRepository>,
}

impl InventoryService {
    pub fn new(inventory: Arc<dyn InventoryRepository>, jobs: Arc<dyn JobRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { inventory, jobs, users }
    }

    pub async fn list_items(&self, filters: &ItemFilters) -> Result<Vec<InventoryItem>, AppError> {
        self.inventory.list_items(filters).await
    }

    pub async fn create_item(&self, user: &User, draft: ItemDraft) -> Result<InventoryItem, AppError> {
        access_policy::require(user, Operation::ManageInventory)?;

        let sku = required(draft.sku, "sku")?;
        let name = required(draft.name, "name")?;

        let mut item = InventoryItem::new(sku, name, Some(user.id.clone()));
        item.description = draft.description;
        item.category = draft.category.filter(|c| !c.trim().is_empty());
        if let Some(status) = draft.status.filter(|s| !s.is_empty()) {
            item.status = status.parse()?;
        }
        item.condition = draft.condition;
        item.purchase_price = draft.purchase_price;
        item.current_value = draft.current_value;
        item.latitude = draft.latitude;
        item.longitude = draft.longitude;
        item.location_description = draft.location_description;

        let created = self.inventory.create_item(&item).await?;
        info!(item_id = %created.id, sku = %created.sku, "Inventory item created");
        Ok(created)
    }

    pub async fn check_out(&self, user: &User, item_id: &str, draft: CheckoutDraft) -> Result<InventoryAssignment, AppError> {
        access_policy::require(user, Operation::CheckOut)?;

        let job_id = required(draft.job_id, "job_id")?;
        let expected_return_date = parse_optional("expected_return_date", draft.expected_return_date.as_deref())?;

        let assignee_id = match draft.user_id.filter(|u| !u.is_empty()) {
            Some(other) if other != user.id => {
                access_policy::require(user, Operation::CheckOutForOthers)?;
                self.users.find_by_id(&other).await?
                    .ok_or_else(|| AppError::Validation(format!("Unknown user: {other}")))?;
                other
            }
            _ => user.id.clone(),
        };

        let item = self.inventory.find_item(item_id).await?
            .ok_or_else(|| AppError::NotFound("Item not found".into()))?;
        if item.status != ItemStatus::Available {
            return Err(AppError::Conflict(format!("Item is not available (status: {})", item.status)));
        }

        let job = self.jobs.find_by_id(&job_id).await?
            .ok_or_else(|| AppError::NotFound("Job not found".into()))?;
        // Checking out is how a technician joins a job, so only supervisors are scoped here.
        if user.role != Role::Technician {
            access_policy::ensure_job_access(user, &job, &[])?;
        }

        let mut assignment = InventoryAssignment::check_out(item.id, job.id, assignee_id, Utc::now());
        assignment.expected_return_date = expected_return_date;
        assignment.condition_at_checkout = draft.condition.or(item.condition);
        assignment.notes = draft.notes;

        let created = self.inventory.check_out(&assignment).await?;
        info!(
            assignment_id = %created.id,
            item_id = %created.item_id,
            job_id = %created.job_id,
            user_id = %created.user_id,
            "Item checked out"
        );
        Ok(created)
    }

    pub async fn check_in(&self, user: &User, item_id: &str, draft: CheckinDraft) -> Result<InventoryAssignment, AppError> {
        access_policy::require(user, Operation::CheckIn)?;

        let item_status = match draft.status.filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<ItemStatus>()?,
            None => ItemStatus::Available,
        };
        if item_status == ItemStatus::InUse {
            return Err(AppError::Validation("A returned item cannot stay in-use".into()));
        }

        self.inventory.find_item(item_id).await?
            .ok_or_else(|| AppError::NotFound("Item not found".into()))?;
        let mut assignment = self.inventory.find_open_assignment(item_id).await?
            .ok_or_else(|| AppError::Conflict("Item is not checked out".into()))?;

        let job = self.jobs.find_by_id(&assignment.job_id).await?
            .ok_or_else(|| AppError::NotFound("Job not found".into()))?;
        if !access_policy::can_access_assignment(user, &job, &assignment) {
            return Err(AppError::AccessDenied);
        }

        assignment.status = AssignmentStatus::CheckedIn;
        assignment.check_in_time = Some(Utc::now());
        assignment.condition_at_checkin = draft.condition.clone();
        assignment.notes = merge_notes(assignment.notes.take(), draft.notes);

        let updated = self.inventory
            .check_in(&assignment, item_status, draft.condition.as_deref())
            .await?;
        info!(assignment_id = %updated.id, item_id = %updated.item_id, item_status = %item_status, "Item checked in");
        Ok(updated)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

fn merge_notes(existing: Option<String>, added: Option<String>) -> Option<String> {
    match (existing, added.filter(|n| !n.trim().is_empty())) {
        (Some(old), Some(new)) if !old.is_empty() => Some(format!("{old}\n{new}")),
        (_, Some(new)) => Some(new),
        (old, None) => old,
    }
}
