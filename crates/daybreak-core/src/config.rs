//! Orchestrator tuning knobs.
//!
//! The engine binary fills this from its YAML file; every field has a
//! workable default so tests and bare deployments need no config.

/// Tuning for pagination, fan-out, determinism, and upkeep.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Keyset page size for every paginated step.
    pub page_size: i64,
    /// How many items of a page resolve concurrently.
    pub batch_size: usize,
    /// World seed mixed into every per-character RNG stream.
    pub rng_seed: u64,
    /// How far reputation moves toward zero each tick.
    pub reputation_decay_step: u32,
}

impl TickConfig {
    /// World seed used when no explicit seed is configured.
    pub const DEFAULT_RNG_SEED: u64 = 0x00DA_FB07_2026_0001;
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            page_size: daybreak_db::DEFAULT_PAGE_SIZE,
            batch_size: 16,
            rng_seed: Self::DEFAULT_RNG_SEED,
            reputation_decay_step: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let c = TickConfig::default();
        assert!(c.page_size > 0);
        assert!(c.batch_size > 0);
        assert!(c.reputation_decay_step > 0);
    }
}
