//! Pure geometry operations on cells
//!
//! None of these touch a partition; they build new cells from old ones and the
//! caller routes the result through `World::replace`.

use thiserror::Error;

use super::cell::{Bounds, Cell};
use super::direction::{Axis, Edge};
use crate::simulation::MaterialId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("cannot merge zero cells")]
    EmptyMerge,

    #[error("cannot split a cell into {rows}x{columns} pieces")]
    InvalidSplit { rows: usize, columns: usize },
}

/// Cut coordinates for `count` equal pieces between `start` and `end`
///
/// Inner cuts are measured back from `end` so the last piece lands exactly on
/// the far edge, and each cut is computed once so adjacent pieces share it bit
/// for bit.
fn cuts(start: f64, end: f64, count: usize) -> Vec<f64> {
    let step = (end - start) / count as f64;
    let mut cuts = Vec::with_capacity(count + 1);
    cuts.push(start);
    for k in 1..count {
        cuts.push((end - (count - k) as f64 * step).max(start));
    }
    cuts.push(end);
    cuts
}

/// Split a cell into `rows * columns` equal pieces, row-major from the top-left
pub fn split(cell: &Cell, rows: usize, columns: usize) -> Result<Vec<Cell>, GeometryError> {
    if rows == 0 || columns == 0 {
        return Err(GeometryError::InvalidSplit { rows, columns });
    }

    let b = cell.bounds();
    let xs = cuts(b.left, b.right, columns);
    let ys = cuts(b.top, b.bottom, rows);

    let mut cells = Vec::with_capacity(rows * columns);
    for i in 0..rows {
        for j in 0..columns {
            let bounds = Bounds::new(xs[j], xs[j + 1], ys[i], ys[i + 1]);
            // Pieces below float resolution carry no area; dropping them keeps the tiling
            if bounds.is_degenerate() {
                continue;
            }
            cells.push(Cell::new(bounds, cell.material()));
        }
    }

    Ok(cells)
}

/// Chop a cell into pieces along `axis` at ascending `targets`
///
/// Targets outside the cell's span and zero-width pieces are skipped.
pub fn chop(cell: &Cell, axis: Axis, targets: &[f64]) -> Vec<Cell> {
    if targets.is_empty() {
        return vec![*cell];
    }

    let min_edge = axis.min_edge();
    let max_edge = axis.max_edge();
    let end = cell.bounds().get(max_edge);

    let mut cells = Vec::with_capacity(targets.len() + 1);
    let mut cursor = cell.bounds().get(min_edge);
    for &target in targets.iter().chain(std::iter::once(&end)) {
        let target = target.min(end);
        if target <= cursor {
            continue;
        }

        let mut bounds = *cell.bounds();
        bounds.set(min_edge, cursor);
        bounds.set(max_edge, target);
        cells.push(Cell::new(bounds, cell.material()));
        cursor = target;
    }

    cells
}

/// Single cell covering the bounding box of `cells`
///
/// The inputs must tile that box exactly; nothing here checks it, and merging a
/// set with holes invents material over the holes.
pub fn merge(cells: &[Cell], material: Option<MaterialId>) -> Result<Cell, GeometryError> {
    let (first, rest) = cells.split_first().ok_or(GeometryError::EmptyMerge)?;

    let bounds = rest
        .iter()
        .fold(*first.bounds(), |acc, cell| acc.union(cell.bounds()));

    Ok(Cell::new(bounds, material.unwrap_or(first.material())))
}

/// Copy of `cell` with some bounds replaced; `None` if the result has no area
pub fn reposition(cell: &Cell, overrides: &[(Edge, f64)]) -> Option<Cell> {
    let mut bounds = *cell.bounds();
    for &(edge, value) in overrides {
        bounds.set(edge, value);
    }

    if bounds.is_degenerate() {
        return None;
    }

    Some(Cell::new(bounds, cell.material()))
}

/// Copy of `cell` holding a different material
pub fn recolour(cell: &Cell, material: MaterialId) -> Cell {
    Cell::new(*cell.bounds(), material)
}
