//! Authentication middleware and extractors.

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{self, HeaderMap},
    web,
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;

use postbox_core::ports::{AuthError, TokenClaims, TokenService};
use postbox_shared::ErrorResponse;

use crate::middleware::error::AppError;
use crate::observability::RequestId;
use crate::state::AppState;

/// Authenticated caller identity, resolved by [`RequireAuth`].
///
/// Only usable in handlers mounted under a scope wrapped with `RequireAuth`.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject: String,
    pub roles: Vec<String>,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            subject: claims.subject,
            roles: claims.roles,
        }
    }
}

/// Resolve the caller from a `Bearer` token in the request headers.
pub fn authenticate(headers: &HeaderMap, tokens: &dyn TokenService) -> Result<Identity, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    tokens.validate_token(token).map(Identity::from)
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl AuthenticationError {
    fn problem(&self) -> ErrorResponse {
        match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            AuthError::Encoding(_) => ErrorResponse::internal_error(),
        }
    }

    /// Problem-details response, tagged with the request ID when known.
    pub fn to_response(&self, request_id: Option<&str>) -> HttpResponse {
        let mut problem = self.problem();
        if let Some(request_id) = request_id {
            problem = problem.with_request_id(request_id);
        }

        HttpResponse::build(actix_web::ResponseError::status_code(self))
            .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
            .json(problem)
    }
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::Encoding(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            _ => actix_web::http::StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.to_response(None)
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<Identity>().cloned();

        ready(identity.ok_or_else(|| {
            AppError::Internal("Identity requested outside an authenticated scope".to_string())
        }))
    }
}

/// Middleware that rejects unauthenticated requests with 401 before any
/// extractor or handler of the wrapped scope runs.
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService { service }))
    }
}

pub struct RequireAuthService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map(|id| id.as_str().to_string());

        let state = req.app_data::<web::Data<AppState>>().cloned();
        let Some(state) = state else {
            tracing::error!("AppState not found in app data");
            let response = AppError::Internal("AppState not configured".to_string())
                .to_response(request_id.as_deref());
            return reject(req, response);
        };

        match authenticate(req.headers(), state.tokens.as_ref()) {
            Ok(identity) => {
                tracing::debug!(subject = %identity.subject, "Authenticated request");
                req.extensions_mut().insert(identity);

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(err) => {
                tracing::debug!(error = %err, path = %req.path(), "Rejected unauthenticated request");

                let response = AuthenticationError(err).to_response(request_id.as_deref());

                reject(req, response)
            }
        }
    }
}

fn reject<B: 'static>(
    req: ServiceRequest,
    response: HttpResponse,
) -> Pin<Box<dyn Future<Output = Result<ServiceResponse<EitherBody<B>>, Error>>>> {
    let (http_req, _payload) = req.into_parts();
    let srv_response = ServiceResponse::new(http_req, response);

    Box::pin(async move { Ok(srv_response.map_into_right_body()) })
}
