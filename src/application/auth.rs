//! Console authentication: credential check and signed session tokens.

use std::sync::Arc;

use jwt_simple::{
    algorithms::{HS256Key, MACLike},
    claims::{Claims, NoCustomClaims},
    reexports::coarsetime::Duration as JwtDuration,
};
use metrics::counter;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{info, warn};

use crate::infra::telemetry::{LOGIN_FAILURE_TOTAL, LOGIN_SUCCESS_TOTAL};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// Lifetime of an issued session token.
pub const SESSION_TTL_HOURS: u64 = 24;

/// Lifetime of an issued session token in seconds, used for cookie `Max-Age`.
pub const SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("account or password mismatch")]
    InvalidCredentials,
    #[error("failed to sign session token: {0}")]
    Token(String),
}

/// Per-request authentication state resolved from the session cookie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
}

impl Session {
    pub const ANONYMOUS: Session = Session {
        authenticated: false,
    };

    pub const AUTHENTICATED: Session = Session {
        authenticated: true,
    };
}

#[derive(Clone)]
pub struct AuthService {
    inner: Arc<AuthInner>,
}

struct AuthInner {
    account: Option<String>,
    password: Option<String>,
    key: HS256Key,
}

impl AuthService {
    /// Build the gate. Without a configured account or password every login is rejected.
    pub fn new(account: Option<String>, password: Option<String>, secret: &[u8]) -> Self {
        Self {
            inner: Arc::new(AuthInner {
                account,
                password,
                key: HS256Key::from_bytes(secret),
            }),
        }
    }

    /// Check the submitted credentials and issue a session token.
    pub fn login(&self, account: &str, password: &str) -> Result<String, AuthError> {
        if !self.credentials_match(account, password) {
            counter!(LOGIN_FAILURE_TOTAL).increment(1);
            warn!(
                target = "blockflare::application::auth",
                "Rejected console login"
            );
            return Err(AuthError::InvalidCredentials);
        }

        let claims = Claims::create(JwtDuration::from_hours(SESSION_TTL_HOURS));
        let token = self
            .inner
            .key
            .authenticate(claims)
            .map_err(|err| AuthError::Token(err.to_string()))?;

        counter!(LOGIN_SUCCESS_TOTAL).increment(1);
        info!(
            target = "blockflare::application::auth",
            "Issued console session"
        );
        Ok(token)
    }

    /// Whether `token` carries a valid, unexpired signature from this gate.
    pub fn verify(&self, token: &str) -> bool {
        self.inner
            .key
            .verify_token::<NoCustomClaims>(token, None)
            .is_ok()
    }

    /// Resolve an optional cookie value into a session.
    pub fn session_for(&self, token: Option<&str>) -> Session {
        match token {
            Some(token) if !token.is_empty() && self.verify(token) => Session::AUTHENTICATED,
            _ => Session::ANONYMOUS,
        }
    }

    fn credentials_match(&self, account: &str, password: &str) -> bool {
        let (Some(expected_account), Some(expected_password)) =
            (self.inner.account.as_deref(), self.inner.password.as_deref())
        else {
            return false;
        };

        let account_ok = expected_account.as_bytes().ct_eq(account.as_bytes());
        let password_ok = expected_password.as_bytes().ct_eq(password.as_bytes());
        bool::from(account_ok & password_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn service() -> AuthService {
        AuthService::new(Some("admin".into()), Some("hunter2".into()), SECRET)
    }

    #[test]
    fn valid_credentials_issue_verifiable_token() {
        let auth = service();
        let token = auth.login("admin", "hunter2").expect("login");
        assert!(auth.verify(&token));
        assert_eq!(auth.session_for(Some(&token)), Session::AUTHENTICATED);
    }

    #[test]
    fn wrong_password_or_account_is_rejected() {
        let auth = service();
        assert!(matches!(
            auth.login("admin", "nope"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("root", "hunter2"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn unconfigured_credentials_reject_everything() {
        let auth = AuthService::new(None, None, SECRET);
        assert!(auth.login("", "").is_err());
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let other = AuthService::new(
            Some("admin".into()),
            Some("hunter2".into()),
            b"another-secret-another-secret!!!",
        );
        let token = other.login("admin", "hunter2").expect("login");
        assert!(!service().verify(&token));
    }

    #[test]
    fn missing_or_garbage_token_is_anonymous() {
        let auth = service();
        assert_eq!(auth.session_for(None), Session::ANONYMOUS);
        assert_eq!(auth.session_for(Some("")), Session::ANONYMOUS);
        assert_eq!(auth.session_for(Some("not.a.jwt")), Session::ANONYMOUS);
    }
}
