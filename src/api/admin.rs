use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::api::failure;
use crate::database::IdentityStore;
use crate::models::{UserPatch, UserView};
use crate::services::user_service;
use crate::services::Claims;

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserResponse {
    pub success: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserResponse {
    pub success: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

/// GET /admin/users - Lista todos os usuários
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    responses(
        (status = 200, description = "All users", body = [UserView]),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Not an admin")
    ),
    security(("cookie_auth" = []))
)]
pub async fn list_users(
    admin: web::ReqData<Claims>,
    store: web::Data<dyn IdentityStore>,
) -> HttpResponse {
    log::info!("📋 GET /admin/users (by {})", admin.email);

    match user_service::list_users(store.get_ref()).await {
        Ok(users) => {
            log::info!("✅ Listed {} users", users.len());
            HttpResponse::Ok().json(users)
        }
        Err(e) => failure("Failed to list users", e),
    }
}

/// DELETE /admin/users/{id}
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "User ObjectId (hex)")),
    responses(
        (status = 200, description = "Delete result", body = DeleteUserResponse),
        (status = 400, description = "Malformed id"),
        (status = 403, description = "Not an admin")
    ),
    security(("cookie_auth" = []))
)]
pub async fn delete_user(
    admin: web::ReqData<Claims>,
    store: web::Data<dyn IdentityStore>,
    id: web::Path<String>,
) -> HttpResponse {
    log::info!("🗑️  DELETE /admin/users/{} (by {})", id, admin.email);

    match user_service::delete_user(store.get_ref(), &id).await {
        Ok(deleted_count) => HttpResponse::Ok().json(DeleteUserResponse {
            success: true,
            deleted_count,
        }),
        Err(e) => failure(&format!("Failed to delete user {}", id), e),
    }
}

/// PATCH /admin/users/{id} - Atualiza perfil ou papel
#[utoipa::path(
    patch,
    path = "/admin/users/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "User ObjectId (hex)")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "Update result", body = UpdateUserResponse),
        (status = 400, description = "Malformed id or empty patch"),
        (status = 403, description = "Not an admin")
    ),
    security(("cookie_auth" = []))
)]
pub async fn update_user(
    admin: web::ReqData<Claims>,
    store: web::Data<dyn IdentityStore>,
    id: web::Path<String>,
    patch: web::Json<UserPatch>,
) -> HttpResponse {
    log::info!("🔧 PATCH /admin/users/{} (by {})", id, admin.email);

    match user_service::update_user(store.get_ref(), &id, &patch).await {
        Ok(outcome) => HttpResponse::Ok().json(UpdateUserResponse {
            success: true,
            matched_count: outcome.matched,
            modified_count: outcome.modified,
        }),
        Err(e) => failure(&format!("Failed to update user {}", id), e),
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{self, app, user};
    use crate::database::IdentityStore;
    use crate::middleware::TOKEN_COOKIE;
    use crate::models::Role;
    use actix_web::{cookie::Cookie, http::StatusCode, test};

    fn seeded() -> Vec<crate::models::User> {
        vec![
            user("root@x.com", Role::Admin),
            user("t@x.com", Role::Tutor),
            user("s@x.com", Role::Student),
        ]
    }

    fn session(email: &str, role: Role) -> Cookie<'static> {
        Cookie::new(TOKEN_COOKIE, test_support::tokens().issue(email, role).unwrap())
    }

    #[actix_web::test]
    async fn test_student_is_forbidden() {
        let (_, store) = test_support::store_data(seeded());
        let app = app!(store).await;

        let req = test::TestRequest::get()
            .uri("/admin/users")
            .cookie(session("s@x.com", Role::Student))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Forbidden access");
    }

    #[actix_web::test]
    async fn test_admin_lists_users() {
        let (_, store) = test_support::store_data(seeded());
        let app = app!(store).await;

        let req = test::TestRequest::get()
            .uri("/admin/users")
            .cookie(session("root@x.com", Role::Admin))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 3);
        assert!(users.iter().all(|u| u["id"].is_string()));
    }

    #[actix_web::test]
    async fn test_admin_patch_and_delete() {
        let (memory, store) = test_support::store_data(seeded());
        let app = app!(store).await;
        let id = memory.find_one("s@x.com").await.unwrap().unwrap().id.unwrap().to_hex();

        let req = test::TestRequest::patch()
            .uri(&format!("/admin/users/{}", id))
            .cookie(session("root@x.com", Role::Admin))
            .set_json(serde_json::json!({ "role": "tutor", "name": "Promoted" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["matchedCount"], 1);
        assert_eq!(body["modifiedCount"], 1);
        let stored = memory.find_one("s@x.com").await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Tutor);
        assert_eq!(stored.name.as_deref(), Some("Promoted"));

        let req = test::TestRequest::delete()
            .uri(&format!("/admin/users/{}", id))
            .cookie(session("root@x.com", Role::Admin))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["deletedCount"], 1);
        assert!(memory.find_one("s@x.com").await.unwrap().is_none());

        let req = test::TestRequest::delete()
            .uri("/admin/users/not-an-id")
            .cookie(session("root@x.com", Role::Admin))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_patch_by_tutor_is_forbidden() {
        let (memory, store) = test_support::store_data(seeded());
        let app = app!(store).await;
        let id = memory.find_one("t@x.com").await.unwrap().unwrap().id.unwrap().to_hex();

        let req = test::TestRequest::patch()
            .uri(&format!("/admin/users/{}", id))
            .cookie(session("t@x.com", Role::Tutor))
            .set_json(serde_json::json!({ "role": "admin" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
        assert_eq!(memory.find_one("t@x.com").await.unwrap().unwrap().role, Role::Tutor);
    }
}
