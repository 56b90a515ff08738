//! Client session
//!
//! The session is the only proof of authentication the client holds. There
//! is no expiry or revocation check: a held token counts as authenticated
//! until it is cleared.

use std::fmt;

/// Authentication state of the client
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(String),
}

impl Session {
    /// Build a session from a raw token; an empty token is anonymous
    pub fn from_token(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.is_empty() {
            Session::Anonymous
        } else {
            Session::Authenticated(token)
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    /// Bearer token, if authenticated
    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(token) => Some(token),
        }
    }
}

// Tokens never show up in logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Anonymous => f.write_str("Anonymous"),
            Session::Authenticated(_) => f.write_str("Authenticated(***)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_anonymous() {
        assert_eq!(Session::from_token(""), Session::Anonymous);
        assert!(!Session::from_token("").is_authenticated());
    }

    #[test]
    fn test_token_round_trip() {
        let session = Session::from_token("abc");
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("abc"));
        assert_eq!(Session::Anonymous.token(), None);
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::from_token("secret");
        assert_eq!(format!("{:?}", session), "Authenticated(***)");
    }
}
