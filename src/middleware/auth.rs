use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::models::Role;
use crate::services::token_service::{Claims, TokenService};
use crate::utils::AppError;

/// Cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

/// Cookie first, then `Authorization: Bearer`
fn credential(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &ServiceRequest) -> Result<Claims, AppError> {
    let token = credential(req).ok_or(AppError::Unauthorized)?;

    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| AppError::Config("TokenService is not registered".to_string()))?;

    Ok(tokens.verify(&token)?)
}

/// Role predicate for gated routes
pub fn authorize(claims: &Claims, required: Role) -> Result<(), AppError> {
    if claims.role != required {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

fn reject<B>(req: ServiceRequest, err: AppError) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>>
where
    B: 'static,
{
    log::warn!("🔒 {} {} rejected: {}", req.method(), req.path(), err);
    let res = req.into_response(err.error_response()).map_into_right_body();
    Box::pin(async move { Ok(res) })
}

/// Verifies the session token and attaches its `Claims` to the request.
///
/// Requests without a credential, or with one that fails verification, are
/// answered with 401 and never reach the wrapped service.
pub struct SessionGate;

impl<S, B> Transform<S, ServiceRequest> for SessionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGateService { service }))
    }
}

pub struct SessionGateService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SessionGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = match authenticate(&req) {
            Ok(claims) => claims,
            Err(e) => return reject(req, e),
        };

        log::debug!("🔑 {} {} as {} ({})", req.method(), req.path(), claims.email, claims.role);
        req.extensions_mut().insert(claims);

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Admits only requests whose attached claims carry the required role.
///
/// Must sit inside `SessionGate`; without claims the request is treated as
/// unauthenticated.
pub struct RequireRole(pub Role);

impl RequireRole {
    pub fn admin() -> Self {
        RequireRole(Role::Admin)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service,
            role: self.0,
        }))
    }
}

pub struct RequireRoleService<S> {
    service: S,
    role: Role,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let verdict = match req.extensions().get::<Claims>() {
            Some(claims) => authorize(claims, self.role),
            None => Err(AppError::Unauthorized),
        };

        if let Err(e) = verdict {
            return reject(req, e);
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
