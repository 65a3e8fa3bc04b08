pub mod auth;

pub use auth::{RequireRole, SessionGate, TOKEN_COOKIE};
