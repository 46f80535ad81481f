//! Cells - axis-aligned rectangles holding one material

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::direction::{Axis, Edge};
use crate::simulation::MaterialId;

/// Rectangle in normalized world coordinates (0..1 per axis, y grows downward)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    /// The whole world
    pub const UNIT: Bounds = Bounds {
        left: 0.0,
        right: 1.0,
        top: 0.0,
        bottom: 1.0,
    };

    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn get(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }

    pub fn set(&mut self, edge: Edge, value: f64) {
        match edge {
            Edge::Left => self.left = value,
            Edge::Right => self.right = value,
            Edge::Top => self.top = value,
            Edge::Bottom => self.bottom = value,
        }
    }

    /// Low coordinate along an axis
    pub fn min(&self, axis: Axis) -> f64 {
        self.get(axis.min_edge())
    }

    /// High coordinate along an axis
    pub fn max(&self, axis: Axis) -> f64 {
        self.get(axis.max_edge())
    }

    pub fn extent(&self, axis: Axis) -> f64 {
        self.max(axis) - self.min(axis)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Zero-area or inverted
    pub fn is_degenerate(&self) -> bool {
        !(self.right > self.left && self.bottom > self.top)
    }

    /// Interiors intersect (sharing an edge or a corner does not count)
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Whether `other` lies entirely within these bounds
    pub fn encloses(&self, other: &Bounds) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            left: self.left.min(other.left),
            right: self.right.max(other.right),
            top: self.top.min(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Half-open containment, closed on whichever far edges coincide with `domain`'s
    ///
    /// Every point of the closed domain is contained by exactly one cell of a tiling.
    pub fn contains_within(&self, point: DVec2, domain: &Bounds) -> bool {
        let in_x = self.left <= point.x
            && (point.x < self.right || (point.x == self.right && self.right == domain.right));
        let in_y = self.top <= point.y
            && (point.y < self.bottom || (point.y == self.bottom && self.bottom == domain.bottom));
        in_x && in_y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Identity of a cell inside a partition
///
/// Ids are handed out in increasing order, so comparing ids compares creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) u64);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A rectangle of one material
///
/// Never mutated once built; a change of state is a new cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    bounds: Bounds,
    material: MaterialId,
    birth: u64,
}

impl Cell {
    pub fn new(bounds: Bounds, material: MaterialId) -> Self {
        Self {
            bounds,
            material,
            birth: 0,
        }
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Tick at which the cell entered the partition
    pub fn birth(&self) -> u64 {
        self.birth
    }

    /// Top-left corner
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.bounds.left, self.bounds.top)
    }

    /// Width and height
    pub fn dimensions(&self) -> DVec2 {
        DVec2::new(self.bounds.width(), self.bounds.height())
    }

    pub fn area(&self) -> f64 {
        self.bounds.area()
    }

    pub(crate) fn born_at(mut self, tick: u64) -> Self {
        self.birth = tick;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_position_and_dimensions() {
        let cell = Cell::new(Bounds::new(0.25, 0.75, 0.5, 1.0), MaterialId::Sand);
        assert_eq!(cell.position(), DVec2::new(0.25, 0.5));
        assert_eq!(cell.dimensions(), DVec2::new(0.5, 0.5));
        assert_eq!(cell.area(), 0.25);
        assert_eq!(cell.birth(), 0);
    }

    #[test]
    fn test_edge_accessors() {
        let mut bounds = Bounds::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(bounds.get(Edge::Left), 0.1);
        assert_eq!(bounds.get(Edge::Bottom), 0.4);
        assert_eq!(bounds.min(Axis::Y), 0.3);
        assert_eq!(bounds.max(Axis::X), 0.2);

        bounds.set(Edge::Right, 0.9);
        assert_eq!(bounds.right, 0.9);
    }

    #[test]
    fn test_degenerate_detection() {
        assert!(!Bounds::UNIT.is_degenerate());
        assert!(Bounds::new(0.5, 0.5, 0.0, 1.0).is_degenerate());
        assert!(Bounds::new(0.0, 1.0, 0.7, 0.2).is_degenerate());
    }

    #[test]
    fn test_overlap_excludes_touching() {
        let a = Bounds::new(0.0, 0.5, 0.0, 0.5);
        let right = Bounds::new(0.5, 1.0, 0.0, 0.5);
        let corner = Bounds::new(0.5, 1.0, 0.5, 1.0);
        let inside = Bounds::new(0.25, 0.75, 0.25, 0.75);

        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&corner));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_contains_within_is_half_open() {
        let domain = Bounds::UNIT;
        let left = Bounds::new(0.0, 0.5, 0.0, 1.0);
        let right = Bounds::new(0.5, 1.0, 0.0, 1.0);

        // Shared edge belongs to the right-hand cell only
        let seam = DVec2::new(0.5, 0.5);
        assert!(!left.contains_within(seam, &domain));
        assert!(right.contains_within(seam, &domain));

        // Far domain edges are closed
        assert!(right.contains_within(DVec2::new(1.0, 1.0), &domain));
        assert!(!right.contains_within(DVec2::new(1.01, 0.5), &domain));
    }
}
