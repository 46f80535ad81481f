//! View transform between device pixels and normalized world coordinates

use glam::DVec2;

/// A rectangle of the normalized world shown on a device
///
/// `position` and `dimensions` are in device units: the world point `(0, 0)`
/// appears at `position` and `(1, 1)` at `position + dimensions`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub position: DVec2,
    pub dimensions: DVec2,
}

impl View {
    /// Identity view: device space equals world space
    pub const UNIT: View = View {
        position: DVec2::ZERO,
        dimensions: DVec2::ONE,
    };

    pub fn new(position: DVec2, dimensions: DVec2) -> Self {
        Self {
            position,
            dimensions,
        }
    }

    /// View filling a square device of `resolution` pixels
    pub fn square(resolution: u32) -> Self {
        Self::new(DVec2::ZERO, DVec2::splat(f64::from(resolution)))
    }

    /// Device point to normalized world point
    pub fn cast(&self, device: DVec2) -> DVec2 {
        (device - self.position) / self.dimensions
    }

    /// Normalized world point to device point
    pub fn get(&self, world: DVec2) -> DVec2 {
        self.position + world * self.dimensions
    }

    pub fn center(&self) -> DVec2 {
        self.get(DVec2::splat(0.5))
    }

    /// Device-space corners `(min, max)`, ordered even for negative dimensions
    pub fn bounds(&self) -> (DVec2, DVec2) {
        let far = self.position + self.dimensions;
        (self.position.min(far), self.position.max(far))
    }

    pub fn pan(&mut self, delta: DVec2) {
        self.position += delta;
    }

    /// Scale the view about `center` (the view centre when `None`)
    ///
    /// The device point at `center` stays fixed.
    pub fn zoom(&mut self, scale: f64, center: Option<DVec2>) {
        let center = center.unwrap_or_else(|| self.center());
        self.position += (center - self.position) * (1.0 - scale);
        self.dimensions *= scale;
    }

    /// Whether a device point lies inside the view, edges included
    pub fn contains(&self, device: DVec2) -> bool {
        let (min, max) = self.bounds();
        device.x >= min.x && device.x <= max.x && device.y >= min.y && device.y <= max.y
    }

    pub fn resize(&mut self, dimensions: DVec2) {
        self.dimensions = dimensions;
    }
}

impl Default for View {
    fn default() -> Self {
        Self::UNIT
    }
}
