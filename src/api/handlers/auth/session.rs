//! Session-token extraction from request headers.

use axum::http::{header::AUTHORIZATION, HeaderMap};

pub const SESSION_COOKIE_NAME: &str = "laborejo_session";

/// Pull the session token from the bearer header or the session cookie.
///
/// The bearer header wins when both are present; API clients use bearer,
/// browsers use the cookie set by the identity provider's frontend.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("theme=dark; laborejo_session=tok-123; lang=eo"),
        );
        assert_eq!(extract_session_token(&headers), Some("tok-123".to_string()));
    }

    #[test]
    fn extracts_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok-456"));
        assert_eq!(extract_session_token(&headers), Some("tok-456".to_string()));
    }

    #[test]
    fn bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok-bearer"));
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("laborejo_session=tok-cookie"),
        );
        assert_eq!(
            extract_session_token(&headers),
            Some("tok-bearer".to_string())
        );
    }

    #[test]
    fn missing_or_empty_tokens_yield_none() {
        assert_eq!(extract_session_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_session_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("other_cookie=value"),
        );
        assert_eq!(extract_session_token(&headers), None);
    }
}
