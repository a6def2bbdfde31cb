use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use headers::{Cookie, HeaderMapExt};
use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::infrastructure::session::SESSION_COOKIE;

pub const METHOD_FIELD: &str = "_METHOD";
pub const METHOD_OVERRIDE_HEADER: &str = "x-http-method-override";

const MAX_FORM_BYTES: usize = 64 * 1024;

/// Resumes or opens the client's session and exposes it to handlers.
pub async fn session_middleware(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let sid = req
        .headers()
        .typed_get::<Cookie>()
        .and_then(|c| c.get(SESSION_COOKIE).map(str::to_string));
    let (session, opened) = state.sessions.resume(sid.as_deref()).await;
    req.extensions_mut().insert(session.clone());

    let mut response = next.run(req).await;
    if opened {
        match HeaderValue::from_str(&session.cookie()) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "Session cookie is not a valid header value"),
        }
    }
    response
}

/// Lets plain HTML forms reach PATCH, PUT and DELETE routes.
///
/// A POST is re-dispatched with the method named in the
/// `X-HTTP-Method-Override` header or the `_METHOD` form field. Must wrap the
/// router, since routing happens on the rewritten method.
pub async fn method_override(mut req: Request, next: Next) -> Response {
    if req.method() != Method::POST {
        return next.run(req).await;
    }

    let from_header = req
        .headers()
        .get(METHOD_OVERRIDE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(overridable);
    if let Some(method) = from_header {
        debug!(%method, "Method overridden by header");
        *req.method_mut() = method;
        return next.run(req).await;
    }

    if !is_form(req.headers()) {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();
    let bytes = match to_bytes(body, MAX_FORM_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Rejected form body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "413 Payload too large").into_response();
        }
    };
    if let Some(method) = form_method(&bytes) {
        debug!(%method, "Method overridden by form field");
        parts.method = method;
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Methods a POST may be turned into.
pub fn overridable(value: &str) -> Option<Method> {
    match value.trim().to_ascii_uppercase().as_str() {
        "PATCH" => Some(Method::PATCH),
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

pub fn form_method(body: &[u8]) -> Option<Method> {
    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == METHOD_FIELD)
        .and_then(|(_, value)| overridable(&value))
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}
