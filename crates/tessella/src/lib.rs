//! Headless driver for the Tessella sandbox
//!
//! Wraps a [`tessella_core::Simulation`] with a CPU pixel buffer, a device
//! view for pointer input, layered configuration and RON scenario scripts.

pub mod config;
pub mod headless;
pub mod render;
pub mod scenario;

pub use config::AppConfig;
pub use headless::{HeadlessSession, PixelRenderer};
