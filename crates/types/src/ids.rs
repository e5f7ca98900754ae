//! Identifier and time types for the simulator.
//!
//! Every entity in the store is keyed by a `u64` newtype so that a
//! user id can never be passed where a stock id is expected.

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Time Types
// =============================================================================

/// Wall clock timestamp in milliseconds since epoch.
pub type Timestamp = u64;

/// Day index within a simulation week (0 through 5 inclusive).
pub type DayIndex = u8;

/// Last day of a simulation week.
pub const FINAL_DAY: DayIndex = 5;

/// One simulated day in milliseconds.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

// =============================================================================
// Core ID Types
// =============================================================================

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            Default,
            From,
            Into,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Unique identifier for a user account.
    UserId,
    "User"
);
id_type!(
    /// Unique identifier for a listed stock.
    StockId,
    "Stock"
);
id_type!(
    /// Unique identifier for a simulation run (one 5-day week).
    RunId,
    "Run"
);
id_type!(
    /// Unique identifier for an admin-defined crisis event.
    CrisisId,
    "Crisis"
);
id_type!(
    /// Unique identifier for a ledger transaction.
    TxId,
    "Tx"
);
id_type!(
    /// Unique identifier for a behavior event.
    EventId,
    "Event"
);
id_type!(
    /// Unique identifier for a weekly summary record.
    SummaryId,
    "Summary"
);
