//! Session keys and login redirect helpers.

/// Session key holding the logged-in user's id.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Where anonymous visitors of protected pages are sent.
pub const LOGIN_URL: &str = "/auth/login/";

/// Default landing page after a login without `next`.
pub const DEFAULT_LOGIN_REDIRECT: &str = "/";

/// Build `/auth/login/?next=<path>`.
///
/// `next` is percent-encoded except for `/`, so the query reads like the
/// path it points back to.
pub fn login_url_with_next(next: &str) -> String {
    let encoded = urlencoding::encode(next).replace("%2F", "/");
    format!("{LOGIN_URL}?next={encoded}")
}

/// Accept `next` only when it is a path on this site.
///
/// Rejects absolute URLs, scheme-relative `//host` paths and backslash
/// tricks so a crafted login link cannot bounce users elsewhere.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}
