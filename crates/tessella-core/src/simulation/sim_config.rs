//! Tunables for the simulation rules

use serde::{Deserialize, Serialize};

/// Simulation settings
///
/// Every field has a default, so a partial RON section or environment override
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the simulation RNG
    pub seed: u64,
    /// Air cells wider or taller than this split
    pub air_max: f64,
    /// Maximum depth a falling or sliding cell moves per tick
    pub fall_speed: f64,
    /// Probability that a sand cell skips its update
    pub sand_idle_chance: f32,
    /// Probability that plant converts a touching water cell
    pub plant_growth_chance: f32,
    /// Probability that fire converts a touching wood or plant cell
    pub fire_spread_chance: f32,
    /// Probability that fire turns to air on its update
    pub fire_burnout_chance: f32,
    /// Validate the full tiling around every edit (slow)
    pub verify_tiling: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            air_max: 0.05,
            fall_speed: 0.01,
            sand_idle_chance: 0.2,
            plant_growth_chance: 0.05,
            fire_spread_chance: 0.1,
            fire_burnout_chance: 0.02,
            verify_tiling: false,
        }
    }
}
