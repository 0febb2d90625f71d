//! Admin sessions
//!
//! There is a single admin secret. Logging in mints an opaque token; every
//! token in the session store grants admin rights, and logging out empties
//! the store, which ends every session at once.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

/// Bytes of entropy in a session token
pub const TOKEN_BYTES: usize = 32;

/// Errors returned by [`Authenticator::authenticate`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("wrong password")]
    WrongPassword,
}

/// Set of valid session tokens
pub trait SessionStore: Send + Sync {
    fn add(&self, token: String);
    fn contains(&self, token: &str) -> bool;
    /// Forget every token
    fn clear(&self);
}

/// Process-lifetime session store behind one lock
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    tokens: Mutex<HashSet<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tokens(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // A panic while holding the lock cannot leave a HashSet half-updated
        self.tokens.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn add(&self, token: String) {
        self.tokens().insert(token);
    }

    fn contains(&self, token: &str) -> bool {
        self.tokens().contains(token)
    }

    fn clear(&self) {
        self.tokens().clear();
    }
}

/// Checks the admin password and tracks sessions
pub struct Authenticator {
    password: String,
    sessions: Arc<dyn SessionStore>,
}

impl Authenticator {
    pub fn new(password: impl Into<String>, sessions: Arc<dyn SessionStore>) -> Self {
        let password = password.into();
        if password.is_empty() {
            tracing::warn!("No admin password configured, admin login is disabled");
        }
        Self { password, sessions }
    }

    /// Open a session if `password` is the admin password
    ///
    /// The comparison is plain equality. An empty configured password never
    /// matches.
    pub fn authenticate(&self, password: &str) -> Result<String, AuthError> {
        if self.password.is_empty() || password != self.password {
            return Err(AuthError::WrongPassword);
        }

        let token = new_token();
        self.sessions.add(token.clone());
        tracing::info!("Admin session opened");
        Ok(token)
    }

    /// Whether `token` belongs to an open session
    pub fn check_session(&self, token: &str) -> bool {
        !token.is_empty() && self.sessions.contains(token)
    }

    /// Close every open session, not only the caller's
    pub fn logout(&self) {
        self.sessions.clear();
        tracing::info!("All admin sessions closed");
    }
}

fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
