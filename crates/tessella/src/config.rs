//! Driver configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `tessella.ron` file (if exists)
//! 3. Environment variables prefixed with `TESSELLA_`
//!
//! Example environment variable: `TESSELLA_SIMULATION__AIR_MAX=0.1`

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tessella_core::SimConfig;

/// Main driver configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub simulation: SimConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Pixel buffer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Side length of the square pixel buffer
    pub resolution: u32,
    /// Outline each cell with a thin dark border
    pub border: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: 512,
            border: true,
        }
    }
}

/// Where and how often snapshots are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for PNG snapshots and scenario reports
    pub directory: String,
    /// Write a snapshot every N ticks (0 disables periodic snapshots)
    pub snapshot_every: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            snapshot_every: 0,
        }
    }
}

impl AppConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `tessella.ron` file (if exists)
    /// 3. Environment variables prefixed with `TESSELLA_` (highest priority)
    pub fn load() -> Result<Self> {
        Self::load_from("tessella")
    }

    /// Same as [`AppConfig::load`] with a different config file name (extension optional)
    pub fn load_from(file_name: &str) -> Result<Self> {
        let sim = SimConfig::default();
        let render = RenderConfig::default();
        let output = OutputConfig::default();

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("simulation.seed", sim.seed as i64)?
            .set_default("simulation.air_max", sim.air_max)?
            .set_default("simulation.fall_speed", sim.fall_speed)?
            .set_default("simulation.sand_idle_chance", f64::from(sim.sand_idle_chance))?
            .set_default(
                "simulation.plant_growth_chance",
                f64::from(sim.plant_growth_chance),
            )?
            .set_default(
                "simulation.fire_spread_chance",
                f64::from(sim.fire_spread_chance),
            )?
            .set_default(
                "simulation.fire_burnout_chance",
                f64::from(sim.fire_burnout_chance),
            )?
            .set_default("simulation.verify_tiling", sim.verify_tiling)?
            .set_default("render.resolution", i64::from(render.resolution))?
            .set_default("render.border", render.border)?
            .set_default("output.directory", output.directory)?
            .set_default("output.snapshot_every", output.snapshot_every as i64)?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name(file_name)
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (TESSELLA_RENDER__RESOLUTION, etc.)
            .add_source(Environment::with_prefix("TESSELLA").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
