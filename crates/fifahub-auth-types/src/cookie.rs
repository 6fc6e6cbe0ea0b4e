//! Cookie builders for the session tokens and the pending 2FA session.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the access token.
pub const FIFAHUB_ACCESS_TOKEN: &str = "fifahub_access_token";

/// Cookie name for the refresh token.
pub const FIFAHUB_REFRESH_TOKEN: &str = "fifahub_refresh_token";

/// Cookie name for the opaque id of a login waiting on its second factor.
pub const FIFAHUB_2FA_SESSION: &str = "fifahub_2fa_session";

/// Access-token JWT lifetime in seconds (4 hours).
pub const ACCESS_TOKEN_EXP: u64 = 14400;

/// Refresh-token lifetime and remembered-cookie Max-Age in seconds (7 days).
pub const REFRESH_TOKEN_EXP: u64 = 604800;

const REFRESH_TOKEN_PATH: &str = "/auth/token";
const TWO_FACTOR_PATH: &str = "/auth/2fa";

/// How long the browser keeps a token cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieLifetime {
    /// Max-Age of [`REFRESH_TOKEN_EXP`]; survives browser restarts.
    Remembered,
    /// No Max-Age; dropped when the browser session ends.
    BrowserSession,
}

impl CookieLifetime {
    pub fn from_remember(remember: bool) -> Self {
        if remember {
            Self::Remembered
        } else {
            Self::BrowserSession
        }
    }
}

fn token_cookie(
    name: &'static str,
    value: String,
    path: &'static str,
    domain: String,
    lifetime: CookieLifetime,
) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, value))
        .path(path)
        .domain(domain)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    if lifetime == CookieLifetime::Remembered {
        cookie.set_max_age(Duration::seconds(REFRESH_TOKEN_EXP as i64));
    }
    cookie
}

/// Set the access-token cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use fifahub_auth_types::cookie::{set_access_token_cookie, CookieLifetime, FIFAHUB_ACCESS_TOKEN};
///
/// let jar = set_access_token_cookie(
///     CookieJar::new(),
///     "token_value".to_string(),
///     "example.com".to_string(),
///     CookieLifetime::Remembered,
/// );
/// let cookie = jar.get(FIFAHUB_ACCESS_TOKEN).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// ```
pub fn set_access_token_cookie(
    jar: CookieJar,
    value: String,
    domain: String,
    lifetime: CookieLifetime,
) -> CookieJar {
    jar.add(token_cookie(FIFAHUB_ACCESS_TOKEN, value, "/", domain, lifetime))
}

/// Set the refresh-token cookie on the jar. Scoped to the refresh endpoint.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use fifahub_auth_types::cookie::{set_refresh_token_cookie, CookieLifetime, FIFAHUB_REFRESH_TOKEN};
///
/// let jar = set_refresh_token_cookie(
///     CookieJar::new(),
///     "refresh_value".to_string(),
///     "example.com".to_string(),
///     CookieLifetime::BrowserSession,
/// );
/// let cookie = jar.get(FIFAHUB_REFRESH_TOKEN).unwrap();
/// assert_eq!(cookie.path(), Some("/auth/token"));
/// assert_eq!(cookie.max_age(), None);
/// ```
pub fn set_refresh_token_cookie(
    jar: CookieJar,
    value: String,
    domain: String,
    lifetime: CookieLifetime,
) -> CookieJar {
    jar.add(token_cookie(
        FIFAHUB_REFRESH_TOKEN,
        value,
        REFRESH_TOKEN_PATH,
        domain,
        lifetime,
    ))
}

/// Set the pending 2FA session cookie. `max_age_secs` should cover the
/// challenge lifetime.
pub fn set_two_factor_session_cookie(
    jar: CookieJar,
    session_id: String,
    domain: String,
    max_age_secs: i64,
) -> CookieJar {
    let cookie = Cookie::build((FIFAHUB_2FA_SESSION, session_id))
        .path(TWO_FACTOR_PATH)
        .domain(domain)
        .max_age(Duration::seconds(max_age_secs))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

fn expired(name: &'static str, path: &'static str, domain: String) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path(path)
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Expire the pending 2FA session cookie.
pub fn clear_two_factor_session_cookie(jar: CookieJar, domain: String) -> CookieJar {
    jar.add(expired(FIFAHUB_2FA_SESSION, TWO_FACTOR_PATH, domain))
}

/// Expire both token cookies.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use fifahub_auth_types::cookie::{
///     clear_cookies, set_access_token_cookie, set_refresh_token_cookie, CookieLifetime,
///     FIFAHUB_ACCESS_TOKEN, FIFAHUB_REFRESH_TOKEN,
/// };
///
/// let domain = "example.com".to_string();
/// let jar = CookieJar::new();
/// let jar = set_access_token_cookie(jar, "a".into(), domain.clone(), CookieLifetime::Remembered);
/// let jar = set_refresh_token_cookie(jar, "r".into(), domain.clone(), CookieLifetime::Remembered);
/// let jar = clear_cookies(jar, domain);
/// assert_eq!(jar.get(FIFAHUB_ACCESS_TOKEN).unwrap().max_age(), Some(time::Duration::ZERO));
/// assert_eq!(jar.get(FIFAHUB_REFRESH_TOKEN).unwrap().max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_cookies(jar: CookieJar, domain: String) -> CookieJar {
    jar.add(expired(FIFAHUB_ACCESS_TOKEN, "/", domain.clone()))
        .add(expired(FIFAHUB_REFRESH_TOKEN, REFRESH_TOKEN_PATH, domain))
}
