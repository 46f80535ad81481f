//! Tiling invariant checks for a `World`

use thiserror::Error;

use super::cell::{Bounds, Cell, CellId};
use super::direction::Edge;
use super::world::World;

/// Relative slack allowed between the summed cell area and the domain area
const AREA_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TilingError {
    #[error("cell {id} has no area: {bounds:?}")]
    Degenerate { id: CellId, bounds: Bounds },

    #[error("cell {id} lies outside the world: {bounds:?}")]
    OutOfDomain { id: CellId, bounds: Bounds },

    #[error("cells {first} and {second} overlap")]
    Overlap { first: CellId, second: CellId },

    #[error("cells cover an area of {covered}, expected {expected}")]
    Coverage { covered: f64, expected: f64 },

    #[error("{edge} edge index is out of sync at cell {id}")]
    StaleIndex { edge: &'static str, id: CellId },

    #[error("{edge} edge index holds {indexed} entries for {live} cells")]
    IndexSize {
        edge: &'static str,
        indexed: usize,
        live: usize,
    },
}

/// Check that the live cells tile the domain and the edge indices match them
///
/// Non-degenerate cells inside the domain with disjoint interiors whose areas
/// sum to the domain's area cover it completely.
pub fn validate(world: &World) -> Result<(), TilingError> {
    let domain = world.domain();
    let cells: Vec<(CellId, &Cell)> = world.iter().collect();

    for &(id, cell) in &cells {
        let bounds = *cell.bounds();
        if bounds.is_degenerate() {
            return Err(TilingError::Degenerate { id, bounds });
        }
        if !domain.encloses(&bounds) {
            return Err(TilingError::OutOfDomain { id, bounds });
        }
    }

    check_overlaps(&cells)?;

    let covered: f64 = cells.iter().map(|(_, cell)| cell.area()).sum();
    let expected = domain.area();
    if (covered - expected).abs() > AREA_TOLERANCE * expected.max(1.0) {
        return Err(TilingError::Coverage { covered, expected });
    }

    check_indices(world, &cells)
}

/// Sweep over cells sorted by left edge; only cells starting before the current
/// one ends can overlap it
fn check_overlaps(cells: &[(CellId, &Cell)]) -> Result<(), TilingError> {
    let mut sorted: Vec<&(CellId, &Cell)> = cells.iter().collect();
    sorted.sort_by(|a, b| a.1.bounds().left.total_cmp(&b.1.bounds().left));

    for (i, (first, a)) in sorted.iter().enumerate() {
        for (second, b) in &sorted[i + 1..] {
            if b.bounds().left >= a.bounds().right {
                break;
            }
            if a.bounds().overlaps(b.bounds()) {
                return Err(TilingError::Overlap {
                    first: *first,
                    second: *second,
                });
            }
        }
    }

    Ok(())
}

fn check_indices(world: &World, cells: &[(CellId, &Cell)]) -> Result<(), TilingError> {
    for edge in Edge::ALL {
        for &(id, cell) in cells {
            if !world.edge_bucket(edge, cell.bounds().get(edge)).any(|other| other == id) {
                return Err(TilingError::StaleIndex {
                    edge: edge.name(),
                    id,
                });
            }
        }

        let indexed: usize = world.edge_index(edge).values().map(|bucket| bucket.len()).sum();
        if indexed != cells.len() {
            return Err(TilingError::IndexSize {
                edge: edge.name(),
                indexed,
                live: cells.len(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MaterialId;

    #[test]
    fn test_single_cell_is_valid() {
        assert!(validate(&World::new()).is_ok());
    }

    #[test]
    fn test_gap_is_reported() {
        let err = World::from_cells(vec![Cell::new(
            Bounds::new(0.0, 0.5, 0.0, 1.0),
            MaterialId::Sand,
        )])
        .err()
        .unwrap();
        assert!(matches!(err, TilingError::Coverage { .. }));
    }

    #[test]
    fn test_overlap_is_reported() {
        // Areas add up but the middle is covered twice and the edges not at all
        let err = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.6, 0.0, 1.0), MaterialId::Sand),
            Cell::new(Bounds::new(0.4, 0.8, 0.0, 1.0), MaterialId::Sand),
            Cell::new(Bounds::new(0.8, 1.0, 0.0, 0.0), MaterialId::Sand),
        ])
        .err()
        .unwrap();
        assert!(matches!(err, TilingError::Degenerate { .. }));

        let err = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.6, 0.0, 1.0), MaterialId::Sand),
            Cell::new(Bounds::new(0.4, 1.0, 0.0, 0.6666666666666666), MaterialId::Sand),
        ])
        .err()
        .unwrap();
        assert!(matches!(err, TilingError::Overlap { .. }));
    }

    #[test]
    fn test_out_of_domain_is_reported() {
        let err = World::from_cells(vec![Cell::new(
            Bounds::new(-0.5, 0.5, 0.0, 1.0),
            MaterialId::Sand,
        )])
        .err()
        .unwrap();
        assert!(matches!(err, TilingError::OutOfDomain { .. }));
    }

    #[test]
    fn test_error_messages() {
        let err = TilingError::Coverage {
            covered: 0.5,
            expected: 1.0,
        };
        assert_eq!(err.to_string(), "cells cover an area of 0.5, expected 1");
    }
}
