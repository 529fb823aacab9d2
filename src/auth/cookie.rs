use axum::http::{header, HeaderMap};

pub const TOKEN_COOKIE: &str = "token";

/// `Set-Cookie` value carrying a freshly issued token.
pub fn session_cookie(token: &str, expires_days: i64) -> String {
    let max_age = expires_days.max(0) * 24 * 60 * 60;
    format!("{TOKEN_COOKIE}={token}; Path=/; HttpOnly; Secure; SameSite=None; Max-Age={max_age}")
}

/// `Set-Cookie` value that expires the session immediately.
pub fn cleared_cookie() -> String {
    format!("{TOKEN_COOKIE}=; Path=/; HttpOnly; Secure; SameSite=None; Max-Age=0")
}

/// Token value from the request's `Cookie` headers, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_cookie_is_cross_site_and_http_only() {
        let c = session_cookie("abc", 2);
        assert!(c.starts_with("token=abc;"));
        assert!(c.contains("HttpOnly"));
        assert!(c.contains("Secure"));
        assert!(c.contains("SameSite=None"));
        assert!(c.ends_with("Max-Age=172800"));
    }

    #[test]
    fn cleared_cookie_expires_now() {
        let c = cleared_cookie();
        assert!(c.starts_with("token=;"));
        assert!(c.ends_with("Max-Age=0"));
    }

    #[test]
    fn reads_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=xyz.abc.def; lang=en"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("xyz.abc.def"));
    }

    #[test]
    fn empty_or_missing_token_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        assert_eq!(token_from_headers(&headers), None);
        headers.insert(header::COOKIE, HeaderValue::from_static("tokens=abc"));
        assert_eq!(token_from_headers(&headers), None);
    }
}
