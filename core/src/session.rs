//! Per-client connection state: base URL and bearer token.
//!
//! # Design
//! Both fields live in one immutable `SessionState` behind an `ArcSwap`.
//! A dispatch loads the current state once, so a single request always
//! pairs a base URL with the token that was current alongside it. Updates
//! swap in a new state and never block readers. Ordering between "set token"
//! and calls already in flight is not coordinated: a call that loaded the
//! state before the swap keeps the old token.

use std::sync::Arc;

use arc_swap::ArcSwap;

pub const DEFAULT_BASE_URL: &str = "https://api.proposalpage.com";

/// A consistent view of the session, taken at dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub base_url: String,
    pub token: Option<String>,
}

impl SessionState {
    /// `Authorization` header value. An unauthenticated session sends
    /// `Bearer ` with an empty credential.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token.as_deref().unwrap_or_default())
    }
}

#[derive(Debug)]
pub struct Session {
    state: ArcSwap<SessionState>,
}

impl Session {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            state: ArcSwap::from_pointee(SessionState {
                base_url: normalize_base_url(base_url),
                token,
            }),
        }
    }

    pub fn snapshot(&self) -> Arc<SessionState> {
        self.state.load_full()
    }

    pub fn base_url(&self) -> String {
        self.state.load().base_url.clone()
    }

    pub fn set_base_url(&self, base_url: &str) {
        let base_url = normalize_base_url(base_url);
        self.state.rcu(|current| SessionState {
            base_url: base_url.clone(),
            token: current.token.clone(),
        });
    }

    pub fn token(&self) -> Option<String> {
        self.state.load().token.clone()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.state.rcu(|current| SessionState {
            base_url: current.base_url.clone(),
            token: Some(token.clone()),
        });
    }

    pub fn clear_token(&self) {
        self.state.rcu(|current| SessionState {
            base_url: current.base_url.clone(),
            token: None,
        });
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, None)
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
