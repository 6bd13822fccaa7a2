//! User model -> entity mapper

use barkeep_core::entities::{FavoriteBase, User};
use barkeep_core::error::DomainError;

use crate::models::UserModel;

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let favorite_base = model
            .favorite_base
            .parse::<FavoriteBase>()
            .map_err(|e| DomainError::CorruptRecord(format!("users.{}: {e}", model.id)))?;

        Ok(User {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            favorite_base,
            token_version: model.token_version,
            created_at: model.created_at,
        })
    }
}
