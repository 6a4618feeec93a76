//! Refresh cookie plumbing.
//!
//! The refresh token never appears in a response body. It travels in an
//! HTTP-only cookie scoped strictly to the refresh endpoint, so scripts
//! cannot read it and browsers only attach it where it is consumed.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Cookie name carrying the raw refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// The only path the cookie is sent to.
pub const REFRESH_COOKIE_PATH: &str = "/api/auth/refresh";

/// Installs (or replaces) the refresh cookie.
pub fn with_refresh_cookie(jar: CookieJar, refresh_token: String) -> CookieJar {
    let cookie = Cookie::build((REFRESH_COOKIE, refresh_token))
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clears the refresh cookie.
pub fn clear_refresh_cookie(jar: CookieJar) -> CookieJar {
    let cookie = Cookie::build((REFRESH_COOKIE, ""))
        .path(REFRESH_COOKIE_PATH)
        .build();
    jar.remove(cookie)
}

/// Reads the raw refresh token from the request's cookie jar.
pub fn refresh_cookie_value(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_COOKIE).map(|c| c.value().to_string())
}
