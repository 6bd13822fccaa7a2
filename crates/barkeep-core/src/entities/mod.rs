//! Domain entities - core business objects

mod refresh_session;
mod user;

pub use refresh_session::{NewRefreshSession, RefreshSession, SessionState};
pub use user::{FavoriteBase, ParseFavoriteBaseError, User};
