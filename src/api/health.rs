use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::database::IdentityStore;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: i64,
}

pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Hello tutorHub!")
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(store: web::Data<dyn IdentityStore>) -> impl Responder {
    let (mut builder, status) = match store.ping().await {
        Ok(()) => (HttpResponse::Ok(), "healthy"),
        Err(e) => {
            log::error!("❌ Health check: database unreachable: {}", e);
            (HttpResponse::ServiceUnavailable(), "degraded")
        }
    };

    builder.json(HealthResponse {
        status: status.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{self, app};
    use crate::database::memory::MemoryStore;
    use actix_web::{http::StatusCode, test};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_index_and_health() {
        let (_, store) = test_support::store_data(vec![]);
        let app = app!(store).await;

        let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(body, "Hello tutorHub!");

        let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_health_reports_store_outage() {
        let offline: Arc<dyn IdentityStore> = Arc::new(MemoryStore::offline());
        let store = web::Data::from(offline);
        let app = app!(store).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: HealthResponse = test::read_body_json(res).await;
        assert_eq!(body.status, "degraded");
    }

    #[actix_web::test]
    async fn test_store_outage_surfaces_as_500() {
        let offline: Arc<dyn IdentityStore> = Arc::new(MemoryStore::offline());
        let store = web::Data::from(offline);
        let app = app!(store).await;

        let req = test::TestRequest::post()
            .uri("/jwt")
            .set_json(serde_json::json!({ "email": "a@x.com" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
