use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

text_enum!(Role, "role" {
    Admin => "admin",
    Foreman => "foreman",
    Technician => "technician",
    Finance => "finance",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            role,
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            created_at: Utc::now(),
        }
    }

    pub fn display_name(&self) -> String {
        display_name(self.first_name.as_deref(), self.last_name.as_deref(), &self.username)
    }
}

/// "First Last" when a first name is on file, otherwise the username.
pub fn display_name(first_name: Option<&str>, last_name: Option<&str>, username: &str) -> String {
    match first_name.map(str::trim).filter(|f| !f.is_empty()) {
        Some(first) => match last_name.map(str::trim).filter(|l| !l.is_empty()) {
            Some(last) => format!("{first} {last}"),
            None => first.to_string(),
        },
        None => username.to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub struct UserDraft {
    pub username: Option<String>,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
