pub mod sqlite_user_repo;
pub mod sqlite_job_repo;
pub mod sqlite_inventory_repo;
pub mod sqlite_report_repo;

pub mod postgres_user_repo;
pub mod postgres_job_repo;
pub mod postgres_inventory_repo;
pub mod postgres_report_repo;
