//! Reads and writes the session cookie.

use axum_extra::extract::{CookieJar, cookie::Cookie};
use time::Duration;

use super::SessionId;

/// The name of the cookie holding the session identifier.
pub const SESSION_COOKIE: &str = "sessionId";
/// How long a newly minted session cookie is kept by the client.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::days(7);

/// Get the session identifier from the cookie jar, if there is one.
pub fn get_session_id(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| SessionId::new(cookie.value_trimmed()))
}

/// Add the session cookie to the cookie jar.
///
/// The cookie applies to the whole site and the client should keep it for
/// `duration`.
///
/// Returns the cookie jar with the cookie added.
pub fn set_session_cookie(jar: CookieJar, session_id: &SessionId, duration: Duration) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, session_id.to_string()))
            .path("/")
            .max_age(duration)
            .http_only(true),
    )
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{CookieJar, cookie::Cookie};
    use time::Duration;

    use crate::session::{
        SessionId,
        cookie::{DEFAULT_SESSION_DURATION, SESSION_COOKIE, get_session_id, set_session_cookie},
    };

    #[test]
    fn can_set_cookie() {
        let session_id = SessionId::generate();

        let jar = set_session_cookie(CookieJar::new(), &session_id, DEFAULT_SESSION_DURATION);
        let cookie = jar.get(SESSION_COOKIE).unwrap();

        assert_eq!(cookie.value(), session_id.as_str());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(604800)));
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn get_session_id_from_cookie_succeeds() {
        let session_id = SessionId::generate();
        let jar = set_session_cookie(CookieJar::new(), &session_id, DEFAULT_SESSION_DURATION);

        assert_eq!(get_session_id(&jar), Some(session_id));
    }

    #[test]
    fn get_session_id_from_empty_jar_returns_none() {
        assert_eq!(get_session_id(&CookieJar::new()), None);
    }

    #[test]
    fn get_session_id_ignores_empty_cookie() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, ""));

        assert_eq!(get_session_id(&jar), None);
    }
}
