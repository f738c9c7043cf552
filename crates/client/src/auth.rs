use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

/// The authenticated account, as the backend's auth endpoint returns it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Current session snapshot. Cheap to clone; swapped atomically as a whole.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub token: Option<String>,
}

impl AuthState {
    pub fn is_valid(&self) -> bool {
        self.user.is_some() && self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Holds the resolved session and notifies watchers on every change.
///
/// Token issuance and refresh belong to the backend client; this store only
/// mirrors whatever session the embedding application hands it.
pub struct AuthStore {
    state: ArcSwap<AuthState>,
    tx: watch::Sender<AuthState>,
}

impl AuthStore {
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = watch::channel(AuthState::default());
        Arc::new(Self { state: ArcSwap::from_pointee(AuthState::default()), tx })
    }

    /// Lock-free read of the current session.
    pub fn snapshot(&self) -> AuthState {
        self.state.load().as_ref().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.load().token.clone()
    }

    pub fn is_valid(&self) -> bool {
        self.state.load().is_valid()
    }

    /// Watch for session changes; the receiver yields the new snapshot.
    pub fn on_change(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub fn set_session(&self, user: AuthUser, token: String) {
        let next = AuthState { user: Some(user), token: Some(token) };
        self.state.store(Arc::new(next.clone()));
        self.tx.send_replace(next);
        info!("auth session updated");
    }

    pub fn clear(&self) {
        self.state.store(Arc::new(AuthState::default()));
        self.tx.send_replace(AuthState::default());
        info!("auth session cleared");
    }
}
