//! User accounts.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;
use crate::money::Cash;

/// Account role. Admins drive the simulation; only `User` accounts
/// participate in weekly analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

/// A registered account.
///
/// `balance` and `risk_index` mutate only through the trade executor
/// and behavior classifier; the password is an opaque credential
/// (authentication UI is out of scope).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub balance: Cash,
    /// Unbounded signed running total of risk deltas.
    pub risk_index: f64,
}

impl User {
    /// Whether this account is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
