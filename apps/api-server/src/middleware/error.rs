//! Error handling - RFC 7807 compliant responses.

use actix_web::{
    HttpResponse, ResponseError,
    body::EitherBody,
    dev::ServiceResponse,
    http::StatusCode,
};
use postbox_core::RepoError;
use postbox_shared::{ErrorResponse, FieldErrors};

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Validation errors: {0:?}")]
    Validation(FieldErrors),
}

impl AppError {
    fn problem(&self) -> ErrorResponse {
        match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Internal(_) => ErrorResponse::internal_error(),
            AppError::Validation(errors) => ErrorResponse::validation(errors.clone()),
        }
    }

    /// Problem-details response, tagged with the request ID when known.
    pub fn to_response(&self, request_id: Option<&str>) -> HttpResponse {
        let mut problem = self.problem();
        if let Some(request_id) = request_id {
            problem = problem.with_request_id(request_id);
        }

        HttpResponse::build(self.status_code()).json(problem)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }

        self.to_response(None)
    }
}

/// Re-render an `AppError` response so its body carries `request_id`.
///
/// Responses that did not originate from an `AppError` pass through unchanged.
pub fn with_request_id<B>(res: ServiceResponse<B>, request_id: &str) -> ServiceResponse<EitherBody<B>> {
    let tagged = res
        .response()
        .error()
        .and_then(|err| err.as_error::<AppError>())
        .map(|err| err.to_response(Some(request_id)));

    match tagged {
        Some(response) => {
            let (req, _res) = res.into_parts();
            ServiceResponse::new(req, response).map_into_right_body()
        }
        None => res.map_into_left_body(),
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
