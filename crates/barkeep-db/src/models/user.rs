//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for users table
///
/// The password hash column is never selected into this model.
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub favorite_base: String,
    pub token_version: i32,
    pub created_at: DateTime<Utc>,
}
