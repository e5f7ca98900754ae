//! Central configuration for the crisis-market simulator.
//!
//! All tunable parameters are defined here for easy adjustment.

use market::PathConfig;
use types::{Cash, Price};

/// Master configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Randomness
    // ─────────────────────────────────────────────────────────────────────────
    /// Seed for the price path generator.
    pub seed: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Account Balances
    // ─────────────────────────────────────────────────────────────────────────
    /// Starting balance for newly registered users.
    pub user_starting_balance: Cash,
    /// Starting balance for the seeded admin account.
    pub admin_starting_balance: Cash,

    // ─────────────────────────────────────────────────────────────────────────
    // Price Generation
    // ─────────────────────────────────────────────────────────────────────────
    /// Half-width of the uniform daily noise term (0.02 = ±2%).
    pub noise_amplitude: f64,
    /// Generated prices never drop below this tick.
    pub price_floor: Price,
    /// Half-width of the admin price-import jitter (0.05 = ±5%).
    pub base_jitter: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            user_starting_balance: Cash::from_float(100_000.0),
            admin_starting_balance: Cash::from_float(1_000_000.0),
            noise_amplitude: 0.02,
            price_floor: Price::MIN_TICK,
            base_jitter: 0.05,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder-style setters for fluent configuration
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the price generator seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the starting balance for new users.
    pub fn user_balance(mut self, balance: f64) -> Self {
        self.user_starting_balance = Cash::from_float(balance);
        self
    }

    /// Set the starting balance for the seeded admin.
    pub fn admin_balance(mut self, balance: f64) -> Self {
        self.admin_starting_balance = Cash::from_float(balance);
        self
    }

    /// Set the daily noise amplitude.
    pub fn noise_amplitude(mut self, amplitude: f64) -> Self {
        self.noise_amplitude = amplitude;
        self
    }

    /// Set the price-import jitter half-width.
    pub fn base_jitter(mut self, jitter: f64) -> Self {
        self.base_jitter = jitter;
        self
    }

    /// Derive the path-generation config slice.
    pub fn path_config(&self) -> PathConfig {
        PathConfig {
            noise_amplitude: self.noise_amplitude,
            price_floor: self.price_floor,
            base_jitter: self.base_jitter,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preset Configurations
// ─────────────────────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Calm market: half the usual daily noise.
    pub fn calm() -> Self {
        Self::default().noise_amplitude(0.01)
    }

    /// Volatile market: double the usual daily noise and wider imports.
    pub fn volatile() -> Self {
        Self::default().noise_amplitude(0.04).base_jitter(0.10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_consistency() {
        let config = EngineConfig::default();
        assert!(config.noise_amplitude > 0.0);
        assert!(config.base_jitter > 0.0);
        assert!(config.price_floor > Price::ZERO);
        assert!(config.admin_starting_balance > config.user_starting_balance);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::new()
            .seed(7)
            .user_balance(50_000.0)
            .noise_amplitude(0.03);
        assert_eq!(config.seed, 7);
        assert_eq!(config.user_starting_balance, Cash::from_float(50_000.0));
        assert_eq!(config.noise_amplitude, 0.03);
    }

    #[test]
    fn test_path_config_mirrors_engine_fields() {
        let config = EngineConfig::new().noise_amplitude(0.015).base_jitter(0.08);
        let paths = config.path_config();
        assert_eq!(paths.noise_amplitude, 0.015);
        assert_eq!(paths.base_jitter, 0.08);
        assert_eq!(paths.price_floor, config.price_floor);
    }

    #[test]
    fn test_preset_configs_differ_from_default() {
        let default = EngineConfig::default();
        assert_ne!(EngineConfig::calm().noise_amplitude, default.noise_amplitude);
        assert_ne!(EngineConfig::volatile().base_jitter, default.base_jitter);
    }
}
