//! Session access.
//!
//! The authentication provider owns the session; shipdeck only reads it. The
//! [`Session`] trait is the seam the store and the view controller consume,
//! and [`TokenSession`] is the implementation backed by a configured bearer
//! token.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Authentication state as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// The provider has not resolved the session yet.
    Loading,
    /// A valid session exists.
    Authenticated,
    /// No session, or the session expired or was logged out.
    Unauthenticated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Authenticated => write!(f, "authenticated"),
            Self::Unauthenticated => write!(f, "unauthenticated"),
        }
    }
}

/// Read access to the authentication provider's session.
pub trait Session: Send + Sync + fmt::Debug {
    /// Current authentication state.
    fn state(&self) -> SessionState;

    /// Display name of the signed-in user, if known.
    fn user_name(&self) -> Option<String>;

    /// Bearer token to attach to outgoing requests.
    fn session_token(&self) -> Option<String>;

    /// End the session.
    fn logout(&self);

    /// Check if a valid session exists.
    fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Check if the provider is still resolving the session.
    fn is_session_loading(&self) -> bool {
        self.state() == SessionState::Loading
    }
}

/// Claims read from a JWT-shaped session token.
///
/// The signature is not verified here; the ship service does that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Subject identifier.
    #[serde(default)]
    pub sub: Option<String>,
    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of a `header.payload.signature` token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] if the token does not have three
    /// segments or the payload is not base64url-encoded JSON.
    pub fn decode(token: &str) -> Result<Self> {
        let segments: Vec<&str> = token.split('.').collect();
        let [_, payload, _] = segments.as_slice() else {
            return Err(Error::invalid_token("not enough segments"));
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| Error::invalid_token(format!("payload is not base64url: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::invalid_token(format!("payload is not JSON: {e}")))
    }

    /// Expiry as a timestamp.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    /// Check if the token has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}

/// Capitalize the first character of a user name for greetings.
#[must_use]
pub fn greeting_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A session backed by a bearer token handed over by the provider.
///
/// Tokens that look like JWTs have their claims read for the display name
/// and expiry; other tokens are treated as opaque and never expire.
#[derive(Debug)]
pub struct TokenSession {
    token: RwLock<Option<String>>,
    user_name: Option<String>,
}

impl TokenSession {
    /// Create a session from an optional token and display-name override.
    #[must_use]
    pub fn new(token: Option<String>, user_name: Option<String>) -> Self {
        let token = token.filter(|t| !t.trim().is_empty());
        Self {
            token: RwLock::new(token),
            user_name,
        }
    }

    /// Create a session with no token.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::new(None, None)
    }

    /// Replace the current token, as after the provider's sign-in flow.
    pub fn sign_in(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(token.into());
    }

    /// Authentication state evaluated at `now`.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        match self.current_token() {
            None => SessionState::Unauthenticated,
            Some(token) => match TokenClaims::decode(&token) {
                Ok(claims) if claims.is_expired_at(now) => SessionState::Unauthenticated,
                _ => SessionState::Authenticated,
            },
        }
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Session for TokenSession {
    fn state(&self) -> SessionState {
        self.state_at(Utc::now())
    }

    fn user_name(&self) -> Option<String> {
        if let Some(name) = &self.user_name {
            return Some(name.clone());
        }
        let claims = TokenClaims::decode(&self.current_token()?).ok()?;
        claims.name.or(claims.sub)
    }

    fn session_token(&self) -> Option<String> {
        self.current_token()
    }

    fn logout(&self) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        tracing::info!("session ended");
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build an unsigned JWT-shaped token carrying `claims`.
    pub fn jwt(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.c2ln")
    }

    /// Session whose state is fixed, for exercising the view gate.
    #[derive(Debug)]
    pub struct FixedSession(pub SessionState);

    impl Session for FixedSession {
        fn state(&self) -> SessionState {
            self.0
        }

        fn user_name(&self) -> Option<String> {
            Some("tester".to_string())
        }

        fn session_token(&self) -> Option<String> {
            (self.0 == SessionState::Authenticated).then(|| "token".to_string())
        }

        fn logout(&self) {}
    }
}
