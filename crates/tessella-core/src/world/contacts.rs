//! Contact queries - which cells touch a cell across one of its edges

use super::cell::{Bounds, CellId};
use super::direction::Edge;
use super::world::World;

/// Contact query utilities - stateless methods over a world's edge indices
pub struct ContactQueries;

impl ContactQueries {
    /// Cells touching `id` across `edge`
    ///
    /// Candidates come from the opposite edge's index at this cell's coordinate
    /// for `edge`; of those, only cells whose perpendicular span overlaps this
    /// cell's with positive length are kept. Touching at a corner is not contact.
    /// Returns nothing for an unknown id.
    pub fn contacts(world: &World, id: CellId, edge: Edge) -> Vec<CellId> {
        match world.get(id) {
            Some(cell) => Self::contacts_of(world, cell.bounds(), edge),
            None => Vec::new(),
        }
    }

    /// Contacts of an arbitrary rectangle, which need not be in the world
    pub fn contacts_of(world: &World, bounds: &Bounds, edge: Edge) -> Vec<CellId> {
        let min = bounds.get(edge.min());
        let max = bounds.get(edge.max());

        world
            .edge_bucket(edge.opposite(), bounds.get(edge))
            .filter(|&other| {
                world.get(other).is_some_and(|cell| {
                    let other_min = cell.bounds().get(edge.min());
                    let other_max = cell.bounds().get(edge.max());
                    other_min < max && other_max > min
                })
            })
            .collect()
    }

    /// The contact across `edge` whose perpendicular span equals this cell's exactly
    pub fn neighbour(world: &World, id: CellId, edge: Edge) -> Option<CellId> {
        let bounds = *world.get(id)?.bounds();
        let min = bounds.get(edge.min());
        let max = bounds.get(edge.max());

        Self::contacts_of(world, &bounds, edge).into_iter().find(|&other| {
            world.get(other).is_some_and(|cell| {
                cell.bounds().get(edge.min()) == min && cell.bounds().get(edge.max()) == max
            })
        })
    }
}
