//! The four axis-aligned edges of a cell
//!
//! Everything that walks a cell's boundary goes through this fixed table, so
//! rules can be written once for "the edge I'm moving towards" instead of four
//! times for left/right/top/bottom.

use serde::{Deserialize, Serialize};

/// Axis of the world (y grows downward, top = 0)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Edge holding the low coordinate along this axis
    pub fn min_edge(self) -> Edge {
        match self {
            Axis::X => Edge::Left,
            Axis::Y => Edge::Top,
        }
    }

    /// Edge holding the high coordinate along this axis
    pub fn max_edge(self) -> Edge {
        match self {
            Axis::X => Edge::Right,
            Axis::Y => Edge::Bottom,
        }
    }

    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// One side of a rectangle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Edge {
    Left = 0,
    Right = 1,
    Top = 2,
    Bottom = 3,
}

/// Static description of an edge
#[derive(Clone, Copy, Debug)]
pub struct Direction {
    pub opposite: Edge,
    /// Perpendicular extent edges, low then high
    pub min: Edge,
    pub max: Edge,
    /// Axis the edge faces along
    pub axis: Axis,
    /// Movement sign along `axis` when travelling through this edge
    pub sign: f64,
}

const DIRECTIONS: [Direction; 4] = [
    // Left
    Direction {
        opposite: Edge::Right,
        min: Edge::Top,
        max: Edge::Bottom,
        axis: Axis::X,
        sign: -1.0,
    },
    // Right
    Direction {
        opposite: Edge::Left,
        min: Edge::Top,
        max: Edge::Bottom,
        axis: Axis::X,
        sign: 1.0,
    },
    // Top
    Direction {
        opposite: Edge::Bottom,
        min: Edge::Left,
        max: Edge::Right,
        axis: Axis::Y,
        sign: -1.0,
    },
    // Bottom
    Direction {
        opposite: Edge::Top,
        min: Edge::Left,
        max: Edge::Right,
        axis: Axis::Y,
        sign: 1.0,
    },
];

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    pub fn direction(self) -> &'static Direction {
        &DIRECTIONS[self as usize]
    }

    pub fn opposite(self) -> Edge {
        self.direction().opposite
    }

    pub fn axis(self) -> Axis {
        self.direction().axis
    }

    pub fn sign(self) -> f64 {
        self.direction().sign
    }

    /// Low perpendicular extent edge
    pub fn min(self) -> Edge {
        self.direction().min
    }

    /// High perpendicular extent edge
    pub fn max(self) -> Edge {
        self.direction().max
    }

    pub fn name(self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        }
    }
}
