use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::error::{ApiError, ErrorVerbosityProvider, MethodNotAllowedError};

/// Middleware to map axum's empty `405` responses to our [`ApiError`].
pub async fn method_not_allowed<S: ErrorVerbosityProvider>(
    State(state): State<S>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = req.method().clone();
    let res = next.run(req).await;

    if res.status() != StatusCode::METHOD_NOT_ALLOWED {
        return Ok(res);
    }

    tracing::debug!(%method, "Method not allowed");

    Err(MethodNotAllowedError::new(state.error_verbosity()).into())
}
