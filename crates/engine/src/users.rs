//! Account registration and the single-session login slot.
//!
//! Passwords are opaque string compares; hashing and a real auth
//! surface are out of scope.

use tracing::info;

use types::{Role, User};

use crate::error::{EngineError, Result};
use crate::CrisisSim;

impl CrisisSim {
    /// Register a new trading account with the configured starting
    /// balance.
    pub fn register_user(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User> {
        if self.store.user_by_name(username).is_some() {
            return Err(EngineError::UsernameTaken(username.to_string()));
        }

        let user = User {
            id: self.store.alloc_user_id(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::User,
            balance: self.config.user_starting_balance,
            risk_index: 0.0,
        };
        self.store.add_user(user.clone());

        info!(user = %user.id, username, "registered user");
        Ok(user)
    }

    /// Authenticate and set the session user.
    pub fn login(&mut self, username: &str, password: &str) -> Result<User> {
        let user = self
            .store
            .user_by_name(username)
            .filter(|u| u.password == password)
            .cloned()
            .ok_or(EngineError::InvalidCredentials)?;
        self.store.set_session_user(Some(user.id));

        info!(user = %user.id, username, "logged in");
        Ok(user)
    }

    /// Clear the session user.
    pub fn logout(&mut self) {
        self.store.set_session_user(None);
    }

    /// The currently logged-in user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.store
            .session_user()
            .and_then(|id| self.store.user(id))
    }
}
