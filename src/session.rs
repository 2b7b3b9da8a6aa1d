//! Operator session state and the routing decisions derived from it.
//!
//! Pages are rendered on the server after the identity cookie has been read,
//! so a request always knows whether its operator is signed in.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::watch;

use crate::domain::auth::Operator;

/// Who is using the dashboard.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state", content = "operator", rename_all = "snake_case")]
pub enum SessionStatus {
    SignedIn(Operator),
    SignedOut,
}

impl SessionStatus {
    pub fn operator(&self) -> Option<&Operator> {
        match self {
            Self::SignedIn(operator) => Some(operator),
            Self::SignedOut => None,
        }
    }
}

/// Operators currently signed in, keyed by uid.
pub type ActiveSessions = HashMap<String, Operator>;

/// Application-level registry of signed-in operators.
///
/// Created once at startup with [`SessionState::init`] and injected into the
/// routing layer, which only trusts an identity cookie whose operator is
/// registered here. [`SessionState::teardown`] at shutdown signs everyone out
/// and stops accepting new sessions. Subscribers are notified of every
/// sign-in and sign-out.
pub struct SessionState {
    sender: watch::Sender<ActiveSessions>,
    closed: AtomicBool,
}

impl SessionState {
    pub fn init() -> Self {
        let (sender, _) = watch::channel(ActiveSessions::new());
        Self {
            sender,
            closed: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ActiveSessions> {
        self.sender.subscribe()
    }

    /// Number of signed-in operators.
    pub fn active(&self) -> usize {
        self.sender.borrow().len()
    }

    /// Session of the operator named by a request's identity cookie.
    pub fn status_of(&self, claimed: Option<Operator>) -> SessionStatus {
        match claimed {
            Some(operator) if self.sender.borrow().get(&operator.uid) == Some(&operator) => {
                SessionStatus::SignedIn(operator)
            }
            _ => SessionStatus::SignedOut,
        }
    }

    /// Registers a sign-in. Ignored after teardown.
    pub fn sign_in(&self, operator: Operator) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        self.sender.send_modify(|active| {
            active.insert(operator.uid.clone(), operator);
        });
        true
    }

    /// Forgets the operator's session. Returns whether it was registered.
    pub fn sign_out(&self, operator: &Operator) -> bool {
        self.sender
            .send_if_modified(|active| active.remove(&operator.uid).is_some())
    }

    /// Signs every operator out and stops accepting new sessions.
    pub fn teardown(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.sender.send_modify(ActiveSessions::clear);
        }
    }
}

/// Logical pages behind the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Login form.
    Landing,
    /// Listings table and every operator action.
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Render,
    Redirect(&'static str),
}

pub const LANDING_PATH: &str = "/";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Decides what a request for `page` gets given the current session.
pub fn resolve(page: Page, status: &SessionStatus) -> RouteDecision {
    match (page, status) {
        (Page::Landing, SessionStatus::SignedIn(_)) => RouteDecision::Redirect(DASHBOARD_PATH),
        (Page::Landing, SessionStatus::SignedOut) => RouteDecision::Render,
        (Page::Dashboard, SessionStatus::SignedIn(_)) => RouteDecision::Render,
        (Page::Dashboard, SessionStatus::SignedOut) => RouteDecision::Redirect(LANDING_PATH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator(uid: &str) -> Operator {
        Operator {
            uid: uid.into(),
            email: format!("{uid}@example.com"),
        }
    }

    #[test]
    fn routing_table() {
        let signed_in = SessionStatus::SignedIn(operator("uid-1"));
        let signed_out = SessionStatus::SignedOut;

        assert_eq!(
            resolve(Page::Landing, &signed_in),
            RouteDecision::Redirect(DASHBOARD_PATH)
        );
        assert_eq!(resolve(Page::Landing, &signed_out), RouteDecision::Render);
        assert_eq!(resolve(Page::Dashboard, &signed_in), RouteDecision::Render);
        assert_eq!(
            resolve(Page::Dashboard, &signed_out),
            RouteDecision::Redirect(LANDING_PATH)
        );
    }

    #[test]
    fn only_registered_operators_are_signed_in() {
        let state = SessionState::init();
        assert_eq!(state.status_of(None), SessionStatus::SignedOut);
        assert_eq!(
            state.status_of(Some(operator("uid-1"))),
            SessionStatus::SignedOut
        );

        state.sign_in(operator("uid-1"));

        assert_eq!(
            state.status_of(Some(operator("uid-1"))),
            SessionStatus::SignedIn(operator("uid-1"))
        );
        assert_eq!(
            state.status_of(Some(operator("uid-2"))),
            SessionStatus::SignedOut
        );
    }

    #[test]
    fn operators_sign_out_independently() {
        let state = SessionState::init();
        state.sign_in(operator("uid-1"));
        state.sign_in(operator("uid-2"));

        assert!(state.sign_out(&operator("uid-1")));
        assert!(!state.sign_out(&operator("uid-1")));

        assert_eq!(state.active(), 1);
        assert_eq!(
            state.status_of(Some(operator("uid-2"))),
            SessionStatus::SignedIn(operator("uid-2"))
        );
    }

    #[test]
    fn subscribers_see_sign_ins() {
        let state = SessionState::init();
        let mut rx = state.subscribe();

        state.sign_in(operator("uid-1"));

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().contains_key("uid-1"));
    }

    #[test]
    fn teardown_signs_everyone_out_and_ignores_later_sign_ins() {
        let state = SessionState::init();
        state.sign_in(operator("uid-1"));

        state.teardown();
        assert_eq!(state.active(), 0);

        assert!(!state.sign_in(operator("uid-1")));
        assert_eq!(
            state.status_of(Some(operator("uid-1"))),
            SessionStatus::SignedOut
        );
    }
}
