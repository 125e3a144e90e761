pub mod access_policy;
pub mod dates;
pub mod export;
pub mod inventory_service;
pub mod job_service;
pub mod reporting;
pub mod user_service;
