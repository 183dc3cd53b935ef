//! Middleware that rejects requests without a session cookie.

use axum::{extract::Request, middleware::Next, response::IntoResponse, response::Response};
use axum_extra::extract::CookieJar;

use crate::{Error, session::get_session_id};

/// Middleware function that checks for a session cookie.
///
/// The session ID is placed into the request and then the request is executed
/// normally if the cookie is present, otherwise a 401 Unauthorized response is
/// returned without running the handler.
///
/// **Note**: Route handlers can use the function argument `Extension(session_id): Extension<SessionId>` to receive the session ID.
pub async fn session_guard(request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());

    let Some(session_id) = get_session_id(&jar) else {
        tracing::debug!("Rejected {} without a session cookie.", request.uri());
        return Error::MissingSession.into_response();
    };

    let (mut parts, body) = request.into_parts();
    parts.extensions.insert(session_id);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}
