pub mod admin;
pub mod auth;
pub mod health;
pub mod swagger;
pub mod users;

use actix_web::{error::JsonPayloadError, guard, web, HttpRequest, HttpResponse, ResponseError};

use crate::middleware::{RequireRole, SessionGate};
use crate::utils::AppError;

/// Logs a failed request and renders the error
pub(crate) fn failure(context: &str, e: AppError) -> HttpResponse {
    match e {
        AppError::StoreUnavailable(_) | AppError::Config(_) => log::error!("❌ {}: {}", context, e),
        _ => log::warn!("❌ {}: {}", context, e),
    }
    e.error_response()
}

/// Malformed or mistyped JSON bodies answer with the regular error body
fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("❌ {} {} rejected body: {}", req.method(), req.path(), err);
    AppError::InvalidRequest(err.to_string()).into()
}

/// Route table. Expects `Data<dyn IdentityStore>`, `Data<TokenService>` and
/// `Data<AppConfig>` to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error));

    cfg
        // Health check
        .route("/", web::get().to(health::index))
        .route("/health", web::get().to(health::health_check))
        // Auth endpoints
        .route("/jwt", web::post().to(auth::login))
        .route("/logout", web::post().to(auth::logout))
        // Users: registration and role lookup are public, role update requires a session
        .route("/users", web::post().to(users::register))
        .service(
            web::resource("/users/role/{email}")
                .guard(guard::Get())
                .route(web::get().to(users::get_role)),
        )
        .service(
            web::resource("/users/role/{email}")
                .guard(guard::Put())
                .wrap(SessionGate)
                .route(web::put().to(users::update_role)),
        )
        // Admin: session + admin role
        .service(
            web::scope("/admin")
                .wrap(RequireRole::admin())
                .wrap(SessionGate)
                .route("/users", web::get().to(admin::list_users))
                .route("/users/{id}", web::delete().to(admin::delete_user))
                .route("/users/{id}", web::patch().to(admin::update_user)),
        );
}
