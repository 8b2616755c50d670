//! User model and roles
//!
//! Users exist only to authenticate API callers; the lifecycle engine
//! receives the acting role, never the user row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// System roles - maps to the ENUM user_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Manager,
    Dispatcher,
    Safety,
    Finance,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Manager => "manager",
            UserRole::Dispatcher => "dispatcher",
            UserRole::Safety => "safety",
            UserRole::Finance => "finance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "manager" => Some(UserRole::Manager),
            "dispatcher" => Some(UserRole::Dispatcher),
            "safety" => Some(UserRole::Safety),
            "finance" => Some(UserRole::Finance),
            _ => None,
        }
    }
}

/// Maps exactly to the users table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_string_round_trip() {
        for role in [
            UserRole::Manager,
            UserRole::Dispatcher,
            UserRole::Safety,
            UserRole::Finance,
        ] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("admin"), None);
    }
}
