//! HTTP middleware

mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
pub(crate) use auth::Claims;
