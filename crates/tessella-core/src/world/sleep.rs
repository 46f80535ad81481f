//! Sleep - coalescing a cell with same-material contacts
//!
//! A cell that has nothing better to do tries to merge with a neighbour so the
//! partition does not fragment without bound. Candidates are scored with a
//! pluggable strategy and only the single best replacement is applied.

use super::cell::{Cell, CellId};
use super::direction::Edge;
use super::geometry;
use super::rng_trait::{shuffle, WorldRng};
use super::stats::SimStats;
use super::world::World;

/// Scores a set of cells
pub type Judge = fn(&[Cell]) -> f64;

/// Whether the first score beats the second
pub type Better = fn(f64, f64) -> bool;

/// Largest area among the cells
pub fn max_area(cells: &[Cell]) -> f64 {
    cells.iter().map(Cell::area).fold(0.0, f64::max)
}

pub fn strictly_greater(a: f64, b: f64) -> bool {
    a > b
}

#[derive(Clone, Copy, Debug)]
pub struct SleepStrategy {
    pub judge: Judge,
    pub better: Better,
    /// Merged cells larger than this on either axis are rejected
    pub max_extent: Option<f64>,
}

impl Default for SleepStrategy {
    fn default() -> Self {
        Self {
            judge: max_area,
            better: strictly_greater,
            max_extent: None,
        }
    }
}

impl SleepStrategy {
    /// Default scoring, never growing a cell beyond `max_extent`
    pub fn capped(max_extent: f64) -> Self {
        Self {
            max_extent: Some(max_extent),
            ..Self::default()
        }
    }

    fn fits(&self, cell: &Cell) -> bool {
        match self.max_extent {
            Some(max) => cell.bounds().width() <= max && cell.bounds().height() <= max,
            None => true,
        }
    }
}

/// A proposed edit: cells to remove and their replacement
struct Candidate {
    old: Vec<CellId>,
    new: Vec<Cell>,
}

/// Build the merge of `cell` with the contact `other` across `edge`, if legal
///
/// Exact merge when the spans match. Otherwise the contact must cover the
/// cell's whole span; it is chopped at the overhangs and only the aligned
/// piece is merged, the rest stays as separate cells.
fn propose(
    cell: &Cell,
    id: CellId,
    other: &Cell,
    other_id: CellId,
    edge: Edge,
) -> Option<Candidate> {
    if other.material() != cell.material() {
        return None;
    }

    let min = cell.bounds().get(edge.min());
    let max = cell.bounds().get(edge.max());
    let other_min = other.bounds().get(edge.min());
    let other_max = other.bounds().get(edge.max());

    if other_min == min && other_max == max {
        let merged = geometry::merge(&[*cell, *other], None).ok()?;
        return Some(Candidate {
            old: vec![id, other_id],
            new: vec![merged],
        });
    }

    if other_min > min || other_max < max {
        return None;
    }

    let pieces = geometry::chop(other, edge.axis().perpendicular(), &[min, max]);
    let (aligned, rest): (Vec<Cell>, Vec<Cell>) = pieces
        .into_iter()
        .partition(|piece| piece.bounds().get(edge.min()) == min);
    let aligned = aligned.first()?;

    let merged = geometry::merge(&[*cell, *aligned], None).ok()?;
    let mut new = vec![merged];
    new.extend(rest);
    Some(Candidate {
        old: vec![id, other_id],
        new,
    })
}

/// Try to coalesce `id` with a same-material contact on one of `edges`
///
/// Edges and contacts are visited in random order. Returns the ids of the new
/// cells, or nothing if no replacement beats the current state.
pub fn try_to_sleep(
    world: &mut World,
    id: CellId,
    edges: &[Edge],
    strategy: &SleepStrategy,
    rng: &mut dyn WorldRng,
    stats: &mut dyn SimStats,
) -> Vec<CellId> {
    let Some(cell) = world.get(id).copied() else {
        return Vec::new();
    };

    let mut edges = edges.to_vec();
    shuffle(rng, &mut edges);

    let mut best: Option<(f64, Candidate)> = None;
    for edge in edges {
        let mut contacts = world.contacts(id, edge);
        shuffle(rng, &mut contacts);

        for other_id in contacts {
            let Some(other) = world.get(other_id) else {
                continue;
            };
            let Some(candidate) = propose(&cell, id, other, other_id, edge) else {
                continue;
            };
            if !strategy.fits(&candidate.new[0]) {
                continue;
            }

            let before = (strategy.judge)(&[cell, *other]);
            let after = (strategy.judge)(&candidate.new);
            let beats_best = best
                .as_ref()
                .map_or(true, |(score, _)| (strategy.better)(after, *score));
            if (strategy.better)(after, before) && beats_best {
                best = Some((after, candidate));
            }
        }
    }

    match best {
        Some((_, candidate)) => {
            log::debug!(
                "Sleep: {} merged {} cells into {}",
                id,
                candidate.old.len(),
                candidate.new.len()
            );
            let ids = world.replace(&candidate.old, candidate.new);
            if !ids.is_empty() {
                stats.record_merge();
            }
            ids
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MaterialId;
    use crate::world::{Bounds, TickStats};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn sleep_all(
        world: &mut World,
        id: CellId,
        strategy: &SleepStrategy,
    ) -> (Vec<CellId>, TickStats) {
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let mut stats = TickStats::default();
        let ids = try_to_sleep(world, id, &Edge::ALL, strategy, &mut rng, &mut stats);
        (ids, stats)
    }

    #[test]
    fn test_aligned_cells_merge_into_bounding_box() {
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.5, 0.0, 1.0), MaterialId::Sand),
            Cell::new(Bounds::new(0.5, 1.0, 0.0, 1.0), MaterialId::Sand),
        ])
        .unwrap();
        let id = world.ids()[0];

        let (new_ids, stats) = sleep_all(&mut world, id, &SleepStrategy::default());

        assert_eq!(new_ids.len(), 1);
        assert_eq!(world.len(), 1);
        assert_eq!(world.get(new_ids[0]).unwrap().bounds(), &Bounds::UNIT);
        assert_eq!(world.get(new_ids[0]).unwrap().material(), MaterialId::Sand);
        assert_eq!(stats.merges, 1);
        assert!(world.validate().is_ok());
    }

    #[test]
    fn test_split_then_merge_with_larger_contact() {
        // Small cell on the top half of the left column, tall narrow contact on its right
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.5, 0.0, 0.5), MaterialId::Water),
            Cell::new(Bounds::new(0.0, 0.5, 0.5, 1.0), MaterialId::Air),
            Cell::new(Bounds::new(0.5, 0.75, 0.0, 1.0), MaterialId::Water),
            Cell::new(Bounds::new(0.75, 1.0, 0.0, 1.0), MaterialId::Air),
        ])
        .unwrap();
        let id = world.ids()[0];

        let (new_ids, _) = sleep_all(&mut world, id, &SleepStrategy::default());

        assert_eq!(new_ids.len(), 2);
        let merged = world.get(new_ids[0]).unwrap();
        assert_eq!(merged.bounds(), &Bounds::new(0.0, 0.75, 0.0, 0.5));
        let rest = world.get(new_ids[1]).unwrap();
        assert_eq!(rest.bounds(), &Bounds::new(0.5, 0.75, 0.5, 1.0));
        assert_eq!(rest.material(), MaterialId::Water);
        assert!(world.validate().is_ok());
    }

    #[test]
    fn test_split_then_merge_needs_a_better_score() {
        // Merging with the wide contact would not beat the contact's own area
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.5, 0.0, 0.5), MaterialId::Water),
            Cell::new(Bounds::new(0.0, 0.5, 0.5, 1.0), MaterialId::Air),
            Cell::new(Bounds::new(0.5, 1.0, 0.0, 1.0), MaterialId::Water),
        ])
        .unwrap();
        let id = world.ids()[0];

        let (new_ids, _) = sleep_all(&mut world, id, &SleepStrategy::default());
        assert!(new_ids.is_empty());
        assert_eq!(world.len(), 3);
    }

    #[test]
    fn test_other_material_is_rejected() {
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.5, 0.0, 1.0), MaterialId::Sand),
            Cell::new(Bounds::new(0.5, 1.0, 0.0, 1.0), MaterialId::Water),
        ])
        .unwrap();
        let id = world.ids()[0];

        let (new_ids, stats) = sleep_all(&mut world, id, &SleepStrategy::default());

        assert!(new_ids.is_empty());
        assert_eq!(world.len(), 2);
        assert_eq!(stats.merges, 0);
    }

    #[test]
    fn test_smaller_contact_is_rejected() {
        // The tall cell only sees two half-height contacts
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.5, 0.0, 1.0), MaterialId::Wood),
            Cell::new(Bounds::new(0.5, 1.0, 0.0, 0.5), MaterialId::Wood),
            Cell::new(Bounds::new(0.5, 1.0, 0.5, 1.0), MaterialId::Stone),
        ])
        .unwrap();
        let id = world.ids()[0];

        let (new_ids, _) = sleep_all(&mut world, id, &SleepStrategy::default());
        assert!(new_ids.is_empty());
        assert_eq!(world.len(), 3);
    }

    #[test]
    fn test_max_extent_blocks_growth() {
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.5, 0.0, 1.0), MaterialId::Air),
            Cell::new(Bounds::new(0.5, 1.0, 0.0, 1.0), MaterialId::Air),
        ])
        .unwrap();
        let id = world.ids()[0];

        let (new_ids, _) = sleep_all(&mut world, id, &SleepStrategy::capped(0.75));
        assert!(new_ids.is_empty());
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_custom_strategy_can_refuse_everything() {
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.5, 0.0, 1.0), MaterialId::Sand),
            Cell::new(Bounds::new(0.5, 1.0, 0.0, 1.0), MaterialId::Sand),
        ])
        .unwrap();
        let id = world.ids()[0];
        let never = SleepStrategy {
            better: |_, _| false,
            ..SleepStrategy::default()
        };

        let (new_ids, _) = sleep_all(&mut world, id, &never);
        assert!(new_ids.is_empty());
    }

    #[test]
    fn test_skipped_merge_is_not_counted() {
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.5, 0.0, 0.5), MaterialId::Sand),
            Cell::new(Bounds::new(0.5, 1.0, 0.0, 0.5), MaterialId::Sand),
            Cell::new(Bounds::new(0.0, 1.0, 0.5, 1.0), MaterialId::Air),
        ])
        .unwrap();
        world.set_verify_tiling(true);
        let ids = world.ids();
        // Leave a hole so the world refuses further edits
        world.delete(ids[2]);

        let (new_ids, stats) = sleep_all(&mut world, ids[0], &SleepStrategy::default());

        assert!(new_ids.is_empty());
        assert_eq!(stats.merges, 0);
        assert_eq!(world.len(), 2);
        assert!(world.contains(ids[0]));
    }

    #[test]
    fn test_unknown_cell_is_ignored() {
        let mut world = World::new();
        let (new_ids, _) = sleep_all(&mut world, CellId(77), &SleepStrategy::default());
        assert!(new_ids.is_empty());
    }
}
