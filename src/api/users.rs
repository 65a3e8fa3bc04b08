use actix_web::{web, HttpResponse};

use crate::api::failure;
use crate::database::IdentityStore;
use crate::services::auth_service::{self, RegisterRequest, RegisterResponse};
use crate::services::user_service::{self, RoleResponse, UpdateRoleRequest};
use crate::services::Claims;

/// POST /users - Registra usuário (idempotente por email)
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created, or already existed", body = RegisterResponse),
        (status = 400, description = "Email missing")
    )
)]
pub async fn register(
    store: web::Data<dyn IdentityStore>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    let email = request.email.clone().unwrap_or_else(|| "N/A".to_string());
    log::info!("📝 POST /users - email: {}", email);

    match auth_service::register(store.get_ref(), request.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => failure(&format!("Failed to save user {}", email), e),
    }
}

#[utoipa::path(
    get,
    path = "/users/role/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Role and profile", body = RoleResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_role(
    store: web::Data<dyn IdentityStore>,
    email: web::Path<String>,
) -> HttpResponse {
    log::info!("👤 GET /users/role/{}", email);

    match user_service::get_role(store.get_ref(), &email).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => failure(&format!("Failed to fetch role of {}", email), e),
    }
}

/// Sets a user's role
///
/// Any authenticated session may change the role of any user, including
/// granting `admin`; the caller is not checked against the target email.
// TODO: restrict to admins or to the caller's own email
#[utoipa::path(
    put,
    path = "/users/role/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "User not found")
    ),
    security(("cookie_auth" = []))
)]
pub async fn update_role(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn IdentityStore>,
    email: web::Path<String>,
    request: web::Json<UpdateRoleRequest>,
) -> HttpResponse {
    log::info!("🔧 PUT /users/role/{} -> {} (by {})", email, request.role, claims.email);

    match user_service::update_role(store.get_ref(), &email, request.role).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Role updated successfully"
        })),
        Err(e) => failure(&format!("Failed to update role of {}", email), e),
    }
}
