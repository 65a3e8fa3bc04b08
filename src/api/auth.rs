use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpResponse};

use crate::api::failure;
use crate::database::IdentityStore;
use crate::middleware::TOKEN_COOKIE;
use crate::services::auth_service::{self, LoginRequest, LoginResponse};
use crate::services::TokenService;
use crate::utils::AppConfig;

/// Session cookie attributes; production serves the frontend cross-site over TLS
fn session_cookie(value: String, production: bool) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, value)
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(if production { SameSite::None } else { SameSite::Strict })
        .finish()
}

#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued and set as the `token` cookie", body = LoginResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn login(
    store: web::Data<dyn IdentityStore>,
    tokens: web::Data<TokenService>,
    config: web::Data<AppConfig>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /jwt - email: {}", request.email);

    match auth_service::login(store.get_ref(), &tokens, &request.email).await {
        Ok(outcome) => {
            log::info!("✅ Token issued: {} ({})", request.email, outcome.role);
            HttpResponse::Ok()
                .cookie(session_cookie(outcome.token, config.production))
                .json(LoginResponse {
                    success: true,
                    role: outcome.role,
                    message: "Token generated successfully".to_string(),
                })
        }
        Err(e) => failure(&format!("Login failed for {}", request.email), e),
    }
}

/// Clears the cookie only; a copy of the token kept elsewhere stays valid until it expires.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared")
    )
)]
pub async fn logout(config: web::Data<AppConfig>) -> HttpResponse {
    log::info!("👋 POST /logout");

    let mut cookie = session_cookie(String::new(), config.production);
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
        "success": true,
        "message": "Logged out successfully"
    }))
}
