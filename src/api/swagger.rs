use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TutorHub API",
        version = "1.0.0",
        description = "Backend for the TutorHub tutoring platform.\n\n**Authentication:** `POST /jwt` sets an HttpOnly `token` cookie valid for 7 days. Protected endpoints read it (an `Authorization: Bearer` header is accepted as well). Admin endpoints additionally require the `admin` role."
    ),
    paths(
        // Auth
        crate::api::auth::login,
        crate::api::auth::logout,

        // Users
        crate::api::users::register,
        crate::api::users::get_role,
        crate::api::users::update_role,

        // Admin
        crate::api::admin::list_users,
        crate::api::admin::delete_user,
        crate::api::admin::update_user,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::Role,
            crate::models::UserView,
            crate::models::UserPatch,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::LoginResponse,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::RegisterResponse,
            crate::services::user_service::RoleResponse,
            crate::services::user_service::UpdateRoleRequest,
            crate::api::admin::DeleteUserResponse,
            crate::api::admin::UpdateUserResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Session issuance (cookie) and logout."),
        (name = "Users", description = "Registration and role lookup/update."),
        (name = "Admin", description = "User management. Requires an admin session."),
        (name = "Health", description = "Liveness and database connectivity."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("token"))),
            );
        }
    }
}
