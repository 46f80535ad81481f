//! Material data for Tessella
//!
//! This crate provides the foundational data types shared by the simulation core
//! and its front ends:
//! - Material identifiers (MaterialId)
//! - Material definitions and the registry (MaterialDef, Materials)
//! - Physical classes used by movement rules (MaterialType)

mod materials;

pub use materials::{MaterialDef, MaterialId, MaterialType, Materials};
