//! Read-only collaborators injected into a battle.
//!
//! [`BattleEnv`] bundles the configuration and the RNG oracle. It is built once
//! at the composition root and handed to the battle, so nothing inside the
//! engine reaches for ambient globals.
mod rng;

use std::sync::Arc;

pub use rng::{FixedRng, FnRng, PcgRng, RngOracle, compute_seed};

use crate::config::BattleConfig;

/// Explicit context threaded through the engine.
#[derive(Clone)]
pub struct BattleEnv {
    config: BattleConfig,
    rng: Arc<dyn RngOracle>,
}

impl BattleEnv {
    pub fn new(config: BattleConfig, rng: Arc<dyn RngOracle>) -> Self {
        Self { config, rng }
    }

    /// Default configuration with the PCG oracle.
    pub fn with_defaults() -> Self {
        Self::new(BattleConfig::default(), Arc::new(PcgRng))
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn rng(&self) -> &dyn RngOracle {
        self.rng.as_ref()
    }

    /// Replaces the RNG oracle (builder pattern).
    #[must_use]
    pub fn with_rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = rng;
        self
    }

    /// Replaces the configuration (builder pattern).
    #[must_use]
    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }
}

impl Default for BattleEnv {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl core::fmt::Debug for BattleEnv {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
