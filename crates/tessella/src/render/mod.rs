//! Mapping between the device and the normalized world

mod view;

pub use view::View;
