use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// HTTP header carrying the authenticated caller's id, inserted by the
/// auth layer in front of this service. Absent for anonymous callers.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the caller, if any
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallerId(pub Option<Uuid>);

impl CallerId {
    /// The caller's id, or an error for endpoints that require identity
    pub fn required(&self) -> AppResult<Uuid> {
        self.0
            .ok_or_else(|| AppError::InvalidInput("authentication required".to_string()))
    }
}

/// Middleware that extracts the caller identity from the `x-user-id`
/// header into the request extensions for handlers to consume.
/// Malformed ids are treated as anonymous.
pub async fn identity_middleware(mut request: Request, next: Next) -> Response {
    let caller = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok());

    request.extensions_mut().insert(CallerId(caller));

    next.run(request).await
}
