//! Simulation systems - materials, movement, reactions, rule dispatch

mod dispatch;
pub mod movement;
pub mod reactions;
pub mod rules;
mod sim_config;

// Re-export from tessella-simulation so callers need one crate
pub use tessella_simulation::{MaterialDef, MaterialId, MaterialType, Materials};

pub use dispatch::Simulation;
pub use movement::CellMovement;
pub use rules::{Behavior, MaterialRule, RuleTable, UpdateContext};
pub use sim_config::SimConfig;
