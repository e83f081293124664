//! User entity representing a registered account in the MoveMates system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role a user holds in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// A rider booking moves
    User,
    /// A driver carrying out moves
    Driver,
    /// A platform administrator
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UserRole::User => "user",
            UserRole::Driver => "driver",
            UserRole::Admin => "admin",
        };
        f.write_str(s)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "driver" => Ok(UserRole::Driver),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown user role: {}", other)),
        }
    }
}

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login email, unique across the system
    pub email: String,

    /// bcrypt hash of the user's password
    pub password_hash: String,

    /// Display name
    pub name: String,

    /// Role of the user
    pub role: UserRole,

    /// Optional contact phone number
    pub phone: Option<String>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User with the `user` role
    pub fn new(email: String, password_hash: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            role: UserRole::User,
            phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the contact phone number
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    /// Sets the role
    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Checks if the user is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Checks if the user is a driver
    pub fn is_driver(&self) -> bool {
        self.role == UserRole::Driver
    }
}
