//! Model to entity mappers
//!
//! - `TryFrom<UserModel> for User`: rejects unknown enum values stored in the row
//! - `From<RefreshTokenModel> for RefreshSession`

mod refresh_token;
mod user;
