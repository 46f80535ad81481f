//! World management - cells, the partition, contacts, sleep

mod cell;
mod contacts;
pub mod direction;
pub mod geometry;
pub mod rng_trait;
pub mod sleep;
pub mod stats;
mod tiling;
#[allow(clippy::module_inception)]
mod world;

pub use cell::{Bounds, Cell, CellId};
pub use contacts::ContactQueries;
pub use direction::{Axis, Direction, Edge};
pub use geometry::GeometryError;
pub use rng_trait::WorldRng;
pub use sleep::{SleepStrategy, try_to_sleep};
pub use stats::{SimStats, TickStats};
pub use tiling::TilingError;
pub use world::{World, WorldError};
