pub mod entity;
pub mod simulation;
pub mod world;

pub use simulation::{SimConfig, Simulation};
pub use world::{Bounds, Cell, CellId, World};
