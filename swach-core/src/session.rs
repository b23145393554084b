//! Session provider state machine. A session starts resolving, settles into
//! authenticated or anonymous, and can only leave authenticated through
//! sign-out. Views must fetch nothing while the session is resolving.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Resolving,
    Anonymous,
    Authenticated(Identity),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Resolving)
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// Settles a resolving session. Ignored in any other state.
    pub fn resolve(&mut self, identity: Option<Identity>) {
        if let SessionState::Resolving = self {
            *self = match identity {
                Some(identity) => SessionState::Authenticated(identity),
                None => SessionState::Anonymous,
            };
        }
    }

    pub fn sign_out(&mut self) {
        if let SessionState::Authenticated(_) = self {
            *self = SessionState::Anonymous;
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Resolving
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(user: &str) -> Identity {
        Identity {
            user_id: user.into(),
            email: None,
        }
    }

    #[test]
    fn resolving_settles_once() {
        let mut session = SessionState::default();
        assert!(session.is_loading());

        session.resolve(Some(identity("u1")));
        assert_eq!(session.identity().map(|i| i.user_id.as_str()), Some("u1"));

        // a second resolve is ignored
        session.resolve(None);
        assert!(session.identity().is_some());
    }

    #[test]
    fn resolving_can_settle_anonymous() {
        let mut session = SessionState::default();
        session.resolve(None);
        assert_eq!(session, SessionState::Anonymous);
        assert!(!session.is_loading());
    }

    #[test]
    fn sign_out_only_leaves_authenticated() {
        let mut session = SessionState::Authenticated(identity("u1"));
        session.sign_out();
        assert_eq!(session, SessionState::Anonymous);

        let mut resolving = SessionState::Resolving;
        resolving.sign_out();
        assert_eq!(resolving, SessionState::Resolving);
    }
}
