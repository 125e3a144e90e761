use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{InventoryRepository, JobRepository, ReportRepository, UserRepository};
use crate::domain::services::{
    inventory_service::InventoryService, job_service::JobService, reporting::ReportService,
    user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub job_service: Arc<JobService>,
    pub inventory_service: Arc<InventoryService>,
    pub report_service: Arc<ReportService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Wires the services over one backend's repositories.
    pub fn new(
        config: Config,
        user_repo: Arc<dyn UserRepository>,
        job_repo: Arc<dyn JobRepository>,
        inventory_repo: Arc<dyn InventoryRepository>,
        report_repo: Arc<dyn ReportRepository>,
    ) -> Self {
        Self {
            job_service: Arc::new(JobService::new(job_repo.clone(), inventory_repo.clone(), user_repo.clone())),
            inventory_service: Arc::new(InventoryService::new(inventory_repo, job_repo, user_repo.clone())),
            report_service: Arc::new(ReportService::new(report_repo)),
            user_service: Arc::new(UserService::new(user_repo.clone())),
            user_repo,
            config,
        }
    }
}
