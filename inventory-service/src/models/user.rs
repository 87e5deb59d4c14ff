//! User and role models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Application user. The password hash is loaded for login verification
/// and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub usercode: i32,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role_id: i32,
    pub role_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    pub role_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    pub role_id: i32,
}
