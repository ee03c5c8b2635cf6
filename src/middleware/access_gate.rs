//! Optional access-code gate.
//!
//! When `server.access_code` is configured, every route except the `GET /`
//! liveness probe and CORS preflight requests must carry an `X-Access-Code`
//! header equal to the configured secret; otherwise the request is answered
//! with 401 before reaching any handler. Without a configured code the gate
//! is inert.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the caller's access code.
pub const ACCESS_CODE_HEADER: &str = "X-Access-Code";

pub struct AccessGate;

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateMiddleware { service }))
    }
}

pub struct AccessGateMiddleware<S> {
    service: S,
}

fn is_exempt(req: &ServiceRequest) -> bool {
    req.method() == Method::OPTIONS || req.uri().path() == "/"
}

fn check_access(req: &ServiceRequest) -> Result<(), AppError> {
    let expected = req
        .app_data::<web::Data<AppState>>()
        .and_then(|state| state.config.server.access_code.clone());

    let Some(expected) = expected else {
        return Ok(());
    };

    if is_exempt(req) {
        return Ok(());
    }

    let supplied = req
        .headers()
        .get(ACCESS_CODE_HEADER)
        .and_then(|value| value.to_str().ok());

    match supplied {
        Some(code) if code == expected => Ok(()),
        Some(_) => Err(AppError::Auth("Invalid access code".to_string())),
        None => Err(AppError::Auth("Missing access code".to_string())),
    }
}

impl<S, B> Service<ServiceRequest> for AccessGateMiddleware<S>
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
        if let Err(err) = check_access(&req) {
            let (request, _payload) = req.into_parts();
            let response = err.error_response().map_into_right_body();
            return Box::pin(ready(Ok(ServiceResponse::new(request, response))));
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
    }
}
