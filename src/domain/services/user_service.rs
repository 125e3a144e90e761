use std::sync::Arc;
use tracing::info;
use crate::domain::models::user::{Role, User, UserDraft};
use crate::domain::ports::UserRepository;
use crate::domain::services::access_policy::{self, Operation};
use crate::error::AppError;

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn list_users(&self, caller: &User) -> Result<Vec<User>, AppError> {
        access_policy::require(caller, Operation::ListUsers)?;
        self.users.list().await
    }

    pub async fn create_user(&self, caller: &User, draft: UserDraft) -> Result<User, AppError> {
        access_policy::require(caller, Operation::ManageUsers)?;

        let username = draft.username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::Validation("username is required".into()))?;
        let role: Role = draft.role
            .ok_or_else(|| AppError::Validation("role is required".into()))?
            .parse()?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::DuplicateKey("Username already exists".into()));
        }

        let mut user = User::new(username, role);
        user.first_name = draft.first_name;
        user.last_name = draft.last_name;
        user.email = draft.email;
        user.phone = draft.phone;

        let created = self.users.create(&user).await?;
        info!(user_id = %created.id, role = %created.role, created_by = %caller.id, "User created");
        Ok(created)
    }

    /// Creates the bootstrap administrator unless a user with that name exists.
    pub async fn ensure_admin(&self, username: &str) -> Result<(), AppError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Ok(());
        }
        let mut admin = User::new(username.to_string(), Role::Admin);
        admin.first_name = Some("System".into());
        admin.last_name = Some("Administrator".into());
        self.users.create(&admin).await?;
        info!(username = %username, "Seeded default admin user");
        Ok(())
    }
}
