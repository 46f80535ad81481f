//! User-facing entities - pointer input and the paint brush

pub mod brush;
pub mod input;

pub use input::{InputState, PointerState};
