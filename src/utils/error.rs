use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::services::token_service::TokenError;

#[derive(Debug)]
pub enum AppError {
    /// No credential on a protected route
    Unauthorized,
    /// Credential present but not trustworthy
    InvalidToken(TokenError),
    /// Valid credential, insufficient role
    Forbidden,
    UserNotFound,
    InvalidRequest(String),
    StoreUnavailable(String),
    Config(String),
}

impl AppError {
    fn message(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "Unauthorized access",
            AppError::InvalidToken(_) => "Invalid token",
            AppError::Forbidden => "Forbidden access",
            AppError::UserNotFound => "User not found",
            AppError::InvalidRequest(_) => "Invalid request",
            AppError::StoreUnavailable(_) => "Identity store unavailable",
            AppError::Config(_) => "Configuration error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidToken(e) => write!(f, "Invalid token: {}", e),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::StoreUnavailable(msg) => write!(f, "Database error: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            other => f.write_str(other.message()),
        }
    }
}

impl std::error::Error for AppError {}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        AppError::InvalidToken(e)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "message": self.message(),
            "error": self.to_string(),
        }))
    }
}
