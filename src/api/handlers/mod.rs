pub mod auth;
pub mod health;
pub mod inventory;
pub mod job;
pub mod report;
pub mod user;
