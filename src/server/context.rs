//! Per-request context: locale, admin status and the locale-free path

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{uri::PathAndQuery, HeaderMap, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use super::ServerState;
use crate::i18n::Localizer;

/// What every handler knows about the request it serves
///
/// Built once by [`resolve_request`] before routing, then read-only.
#[derive(Debug, Clone)]
pub struct RequestContext {
    localizer: Localizer,
    is_admin: bool,
    current_path: String,
}

impl RequestContext {
    pub fn new(localizer: Localizer, is_admin: bool, current_path: String) -> Self {
        Self {
            localizer,
            is_admin,
            current_path,
        }
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Request path with the language prefix removed
    pub fn current_path(&self) -> &str {
        &self.current_path
    }
}

/// Middleware run ahead of the router
///
/// Resolves the locale, strips it from the URI so routes are declared once
/// for every language, checks the session cookie and attaches the resulting
/// [`RequestContext`].
pub async fn resolve_request(
    State(state): State<Arc<ServerState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = session_token(request.headers(), &state.config.session_cookie);
    let (localizer, path) = state.locales.resolve(request.uri().path());
    let is_admin = state.auth.check_session(&token);

    match with_path(request.uri(), &path) {
        Ok(uri) => *request.uri_mut() = uri,
        Err(e) => tracing::warn!("Could not rewrite {} to {}: {}", request.uri(), path, e),
    }

    request
        .extensions_mut()
        .insert(RequestContext::new(localizer, is_admin, path));

    next.run(request).await
}

/// Gate for admin routes: anyone without a session is sent to the login form
pub async fn require_admin(
    Extension(context): Extension<RequestContext>,
    request: Request,
    next: Next,
) -> Response {
    if context.is_admin() {
        next.run(request).await
    } else {
        tracing::debug!("Admin route {} refused", context.current_path());
        Redirect::to(&context.localizer().link("/login")).into_response()
    }
}

/// Value of the session cookie, or an empty string when absent
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> String {
    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .unwrap_or_default()
}

/// HTTP-only session cookie valid for the whole site
pub fn session_cookie(cookie_name: &str, token: &str) -> Cookie<'static> {
    Cookie::build((cookie_name.to_string(), token.to_string()))
        .http_only(true)
        .path("/")
        .build()
}

/// Replace the path of a URI, keeping its query string
fn with_path(uri: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    #[test]
    fn test_session_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers, "session-id"), "");

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session-id=abc123; other=1"),
        );
        assert_eq!(session_token(&headers, "session-id"), "abc123");
        assert_eq!(session_token(&headers, "missing"), "");
    }

    #[test]
    fn test_session_token_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("session-id=xyz"));
        assert_eq!(session_token(&headers, "session-id"), "xyz");
    }

    #[test]
    fn test_session_cookie() {
        let cookie = session_cookie("session-id", "tok");
        assert_eq!(cookie.name(), "session-id");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_session_cookie_round_trip() {
        let jar = CookieJar::new().add(session_cookie("session-id", "tok"));
        let set_cookie = jar.get("session-id").unwrap().to_string();
        assert!(set_cookie.starts_with("session-id=tok"));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Path=/"));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session-id=tok"));
        assert_eq!(session_token(&headers, "session-id"), "tok");
    }

    #[test]
    fn test_with_path_keeps_query() {
        let uri: Uri = "/en/articles/?lang=x".parse().unwrap();
        let rewritten = with_path(&uri, "/articles/").unwrap();
        assert_eq!(rewritten.path(), "/articles/");
        assert_eq!(rewritten.query(), Some("lang=x"));

        let uri: Uri = "http://example.com/fr".parse().unwrap();
        let rewritten = with_path(&uri, "/").unwrap();
        assert_eq!(rewritten.to_string(), "http://example.com/");
    }
}
