use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts},
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::TypedHeader;
use headers::{Origin, UserAgent};
use std::net::SocketAddr;
use tracing::info;

use crate::auth::claims::AuthUser;

/// Emits one `info` event per request to the storefront API, tagged with the
/// caller's user id when a valid chat token is attached. CORS preflight
/// `OPTIONS` requests pass through unlogged.
///
/// The token is decoded here only to label the log line. A missing or bad token
/// is logged as user `0` and left for the chat guard to reject.
///
/// ### Usage:
/// Layer it over the whole router and serve with connect info, as `main` does:
///
/// ```ignore
/// use axum::middleware::from_fn;
/// use api::auth::middleware::log_request;
///
/// let app = api::routes::routes(state).layer(from_fn(log_request));
/// axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
/// ```
///
/// ### Fields Logged:
/// - `method`, `path`: the request line
/// - `ip`: peer address from `ConnectInfo`
/// - `user`: the token's `sub`, or `0` when unauthenticated
/// - `origin`, `user_agent`: header values, or `"unknown"`
pub async fn log_request(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let (mut parts, body) = req.into_parts();

    // Preflight
    if parts.method == Method::OPTIONS {
        let req = Request::from_parts(parts, body);
        return Ok(next.run(req).await);
    }

    // Label only; rejection happens in the guard.
    let user_id = AuthUser::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|AuthUser(c)| c.sub);

    let origin = TypedHeader::<Origin>::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|TypedHeader(o)| o.to_string());

    let user_agent = TypedHeader::<UserAgent>::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|TypedHeader(ua)| ua.to_string());

    info!(
        method = ?parts.method,
        path = %parts.uri.path(),
        ip = %addr.ip(),
        user = user_id.unwrap_or(0),
        origin = origin.unwrap_or_else(|| "unknown".into()),
        user_agent = user_agent.unwrap_or_else(|| "unknown".into()),
        "Incoming request"
    );

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}
