//! Route guard for the protected area. Runs ahead of any page logic and
//! checks only that the credential cookie is present; token validity is
//! established downstream by the principal fetch, whose fallback policy then
//! applies. Stateless across requests.

use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use crate::session::TOKEN_COOKIE;

/// Prefix under which every request requires the credential cookie.
pub const PROTECTED_PREFIX: &str = "/dashboard";
/// Where unauthenticated traffic is sent.
pub const ENTRY_PATH: &str = "/";

pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie").or_else(|| headers.get("Cookie"))?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some((k, v)) = p.split_once('=') {
            if k == name && !v.is_empty() {
                return Some(v.to_string());
            }
        }
    }
    None
}

/// Redirect target for a blocked request: the entry path with the originally
/// requested path attached so the entry point can resume navigation.
pub fn entry_redirect(requested_path: &str) -> String {
    format!("{}?from={}", ENTRY_PATH, urlencoding::encode(requested_path))
}

/// Middleware: cookie present → forward unmodified; absent → redirect to the
/// entry path carrying the original path in `from`.
pub async fn require_portal_cookie(req: Request, next: Next) -> Response {
    match parse_cookie(req.headers(), TOKEN_COOKIE) {
        Some(_) => next.run(req).await,
        None => {
            let path = req.uri().path().to_string();
            debug!(target: "guard", "no credential cookie, redirecting from {}", path);
            Redirect::temporary(&entry_redirect(&path)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("cookie", HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn parses_cookie_among_many() {
        let h = headers_with_cookie("a=1; doj_token=tok-9; b=2");
        assert_eq!(parse_cookie(&h, TOKEN_COOKIE), Some("tok-9".to_string()));
        assert_eq!(parse_cookie(&h, "missing"), None);
    }

    #[test]
    fn empty_value_counts_as_absent() {
        let h = headers_with_cookie("doj_token=");
        assert_eq!(parse_cookie(&h, TOKEN_COOKIE), None);
    }

    #[test]
    fn no_cookie_header_is_absent() {
        assert_eq!(parse_cookie(&HeaderMap::new(), TOKEN_COOKIE), None);
    }

    #[test]
    fn redirect_encodes_original_path() {
        assert_eq!(entry_redirect("/dashboard/cases"), "/?from=%2Fdashboard%2Fcases");
    }
}
