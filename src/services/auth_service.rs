use serde::{Deserialize, Serialize};

use crate::database::{IdentityStore, StoreError};
use crate::models::{Role, User};
use crate::services::token_service::TokenService;
use crate::utils::AppError;

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub role: Role,
    pub message: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub inserted_id: Option<String>,
    pub role: Role,
}

/// Token plus the role it was issued for; the handler turns it into a cookie.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub role: Role,
}

/// Anonymous -> Authenticated: issues a token carrying the stored role.
pub async fn login(
    store: &dyn IdentityStore,
    tokens: &TokenService,
    email: &str,
) -> Result<LoginOutcome, AppError> {
    let user = store
        .find_one(email)
        .await?
        .ok_or(AppError::UserNotFound)?;

    let token = tokens.issue(&user.email, user.role)?;

    Ok(LoginOutcome {
        token,
        role: user.role,
    })
}

/// Creates the user, or reports the existing one.
///
/// The insert is attempted first and the unique index decides; a lookup
/// beforehand would race with a concurrent registration.
pub async fn register(
    store: &dyn IdentityStore,
    request: RegisterRequest,
) -> Result<RegisterResponse, AppError> {
    let email = request
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::InvalidRequest("Email is required".to_string()))?;

    let new_user = User {
        id: None,
        email: email.clone(),
        name: request.name,
        photo_url: request.photo_url,
        role: request.role.unwrap_or_default(),
    };

    match store.insert_one(&new_user).await {
        Ok(id) => {
            log::info!("✅ User registered: {} ({})", email, new_user.role);
            Ok(RegisterResponse {
                success: true,
                message: "User created successfully".to_string(),
                inserted_id: Some(id.to_hex()),
                role: new_user.role,
            })
        }
        Err(StoreError::Duplicate) => {
            let existing = store.find_one(&email).await?;
            log::info!("ℹ️  User already exists: {}", email);
            Ok(RegisterResponse {
                success: true,
                message: "User already exists".to_string(),
                inserted_id: existing.as_ref().and_then(|u| u.id).map(|id| id.to_hex()),
                role: existing.map(|u| u.role).unwrap_or_default(),
            })
        }
        Err(e) => Err(e.into()),
    }
}
