//! Windowless running: pixel buffer rendering, input replay and snapshots

mod pixel_renderer;
mod session;

pub use pixel_renderer::{PixelRenderer, VOID};
pub use session::HeadlessSession;
