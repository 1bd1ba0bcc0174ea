//! Delegated authentication.
//!
//! The crate never checks credentials itself. Anything that needs an
//! authenticated user (an administration screen, say) asks the
//! [`Authenticator`] held by the [`AppContext`](crate::context::AppContext)
//! and works with the returned [`Session`]. Which identity provider sits
//! behind it is the host's decision; the default, [`DenyAll`], admits nobody.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Failures of authentication or authorization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The credentials were rejected.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No authenticator is configured to accept anyone.
    #[error("Authentication is not available")]
    Unavailable,

    /// The session ended before the request.
    #[error("Session for {user} expired at {expired_at}")]
    Expired {
        user: String,
        expired_at: DateTime<Utc>,
    },

    /// The session is valid but lacks a role.
    #[error("{user} lacks the {role} role")]
    Forbidden { user: String, role: String },
}

/// What a user presents to log in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: String,
    pub roles: BTreeSet<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(user: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            user: user.into(),
            roles: BTreeSet::new(),
            issued_at,
            expires_at: None,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    #[must_use]
    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Checks that the session is live at `now` and carries `role`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Expired`] or [`AuthError::Forbidden`].
    pub fn require_role(&self, role: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        if let Some(expired_at) = self.expires_at.filter(|_| self.is_expired(now)) {
            return Err(AuthError::Expired {
                user: self.user.clone(),
                expired_at,
            });
        }
        if !self.roles.contains(role) {
            return Err(AuthError::Forbidden {
                user: self.user.clone(),
                role: role.to_string(),
            });
        }
        Ok(())
    }
}

/// Capability to turn credentials into a session.
pub trait Authenticator: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the credentials are not accepted.
    fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError>;
}

/// Authenticator that rejects everyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl Authenticator for DenyAll {
    fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        tracing::debug!(user = %credentials.username, "authentication refused, no provider configured");
        Err(AuthError::Unavailable)
    }
}
