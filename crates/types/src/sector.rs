//! Industry sector classification.
//!
//! Crisis events are scoped to one sector; a crisis only moves the
//! prices of stocks whose sector matches.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Industry sector of a listed stock.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Sector {
    Energy,
    It,
    Banking,
    Fmcg,
    Telecom,
    Infrastructure,
    Automobile,
}

impl Sector {
    /// All known sectors, in display order.
    pub fn all() -> &'static [Sector] {
        &[
            Sector::Energy,
            Sector::It,
            Sector::Banking,
            Sector::Fmcg,
            Sector::Telecom,
            Sector::Infrastructure,
            Sector::Automobile,
        ]
    }

    /// Human-readable sector name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Energy => "Energy",
            Sector::It => "IT",
            Sector::Banking => "Banking",
            Sector::Fmcg => "FMCG",
            Sector::Telecom => "Telecom",
            Sector::Infrastructure => "Infrastructure",
            Sector::Automobile => "Automobile",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
