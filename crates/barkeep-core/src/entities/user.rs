//! User entity - an account that can hold refresh sessions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Preferred spirit base chosen at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FavoriteBase {
    Ron,
    Tequila,
    Whisky,
    Gin,
    Vodka,
    Brandy,
    Na,
}

impl FavoriteBase {
    /// All accepted values, in display order
    pub const ALL: [FavoriteBase; 7] = [
        Self::Ron,
        Self::Tequila,
        Self::Whisky,
        Self::Gin,
        Self::Vodka,
        Self::Brandy,
        Self::Na,
    ];

    /// Stored / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ron => "RON",
            Self::Tequila => "TEQUILA",
            Self::Whisky => "WHISKY",
            Self::Gin => "GIN",
            Self::Vodka => "VODKA",
            Self::Brandy => "BRANDY",
            Self::Na => "NA",
        }
    }
}

impl fmt::Display for FavoriteBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored favorite base is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown favorite base: {0}")]
pub struct ParseFavoriteBaseError(pub String);

impl FromStr for FavoriteBase {
    type Err = ParseFavoriteBaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|base| base.as_str() == s)
            .ok_or_else(|| ParseFavoriteBaseError(s.to_string()))
    }
}

/// User entity
///
/// The password hash is deliberately not part of the entity; it is only
/// reachable through `UserRepository::get_password_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub favorite_base: FavoriteBase,
    /// Incremented on global logout; refresh tokens carry a snapshot of it
    pub token_version: i32,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with a fresh id and token version 0
    pub fn new(email: String, display_name: String, favorite_base: FavoriteBase) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            favorite_base,
            token_version: 0,
            created_at: Utc::now(),
        }
    }

    /// Check whether a token version snapshot is still honoured
    #[inline]
    pub fn accepts_token_version(&self, snapshot: i32) -> bool {
        self.token_version == snapshot
    }
}
