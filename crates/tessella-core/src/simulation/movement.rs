//! Cell movement - snip-and-swap through an edge
//!
//! A mover never slides over its contacts. Instead a strip as deep as the move
//! is cut from every contact on the leading edge, the mover shifts forward by
//! that depth and the strips are laid down behind it. Old and new cells cover
//! the same region, so the whole move is one `replace`.

use crate::simulation::Materials;
use crate::world::geometry;
use crate::world::{Axis, Cell, CellId, Edge, SimStats, World, WorldRng};

/// Slack when checking that contacts cover the mover's whole edge
const COVERAGE_EPSILON: f64 = 1e-12;

/// Cellular movement - stateless methods for moving cells through the partition
pub struct CellMovement;

impl CellMovement {
    /// Move `id` up to `max_depth` through `edge`
    ///
    /// Blocked (returns `None`) when the edge lies on the domain boundary, when
    /// any contact cannot be displaced by the mover, or when the move would be
    /// too small to represent.
    pub fn try_move(
        world: &mut World,
        id: CellId,
        edge: Edge,
        max_depth: f64,
        materials: &Materials,
        stats: &mut dyn SimStats,
    ) -> Option<Vec<CellId>> {
        let mover = *world.get(id)?;
        let density = materials.get(mover.material()).density;
        let axis = edge.axis();
        let sign = edge.sign();

        let min = mover.bounds().get(edge.min());
        let max = mover.bounds().get(edge.max());
        let front = mover.bounds().get(edge);
        let back = mover.bounds().get(edge.opposite());

        let contact_ids = world.contacts(id, edge);
        if contact_ids.is_empty() {
            return None;
        }

        let mut contacts = Vec::with_capacity(contact_ids.len());
        let mut covered = 0.0;
        for &contact_id in &contact_ids {
            let contact = *world.get(contact_id)?;
            if !materials.get(contact.material()).is_displaceable_by(density) {
                return None;
            }
            let lo = contact.bounds().get(edge.min()).max(min);
            let hi = contact.bounds().get(edge.max()).min(max);
            covered += hi - lo;
            contacts.push(contact);
        }
        if (covered - (max - min)).abs() > COVERAGE_EPSILON {
            return None;
        }

        // The new leading coordinate. When the shallowest contact is no deeper
        // than the step, land exactly on its far edge so the coordinate matches
        // whatever lies beyond it.
        let shallowest = contacts
            .iter()
            .min_by(|a, b| a.bounds().extent(axis).total_cmp(&b.bounds().extent(axis)))?;
        let new_front = if max_depth < shallowest.bounds().extent(axis) {
            front + sign * max_depth
        } else {
            shallowest.bounds().get(edge)
        };
        let shift = new_front - front;
        let new_back = back + shift;
        if shift == 0.0 || new_back == back {
            return None;
        }

        let moved =
            geometry::reposition(&mover, &[(edge, new_front), (edge.opposite(), new_back)])?;

        let mut strips = Vec::with_capacity(contacts.len());
        let mut leftovers = Vec::new();
        for contact in &contacts {
            let (strip, rest) = Self::snip(contact, edge, min, max, new_front);
            let strip =
                geometry::reposition(&strip?, &[(edge.opposite(), back), (edge, new_back)])?;
            strips.push(strip);
            leftovers.extend(rest);
        }

        let mut old = Vec::with_capacity(contact_ids.len() + 1);
        old.push(id);
        old.extend(contact_ids);

        let mut new = Vec::with_capacity(1 + strips.len() + leftovers.len());
        new.push(moved);
        new.extend(strips);
        new.extend(leftovers);

        log::debug!(
            "Move {} {} by {:.5} displacing {} cells",
            id,
            edge.name(),
            shift.abs(),
            old.len() - 1
        );
        stats.record_move();
        Some(world.replace(&old, new))
    }

    /// Cut the strip between the mover's front and `new_front` out of `contact`
    ///
    /// Returns the strip (still in place) and every other piece of the contact.
    fn snip(
        contact: &Cell,
        edge: Edge,
        min: f64,
        max: f64,
        new_front: f64,
    ) -> (Option<Cell>, Vec<Cell>) {
        let perpendicular: Axis = edge.axis().perpendicular();
        let mut rest = Vec::new();
        let mut middle = None;

        for piece in geometry::chop(contact, perpendicular, &[min, max]) {
            let inside =
                piece.bounds().get(edge.min()) >= min && piece.bounds().get(edge.max()) <= max;
            if inside && middle.is_none() {
                middle = Some(piece);
            } else {
                rest.push(piece);
            }
        }

        let Some(middle) = middle else {
            return (None, rest);
        };

        let mut pieces = geometry::chop(&middle, edge.axis(), &[new_front]);
        // Pieces run low to high along the axis; the strip touches the mover
        let strip = if edge.sign() > 0.0 {
            Some(pieces.remove(0))
        } else {
            pieces.pop()
        };
        rest.extend(pieces);

        (strip, rest)
    }

    /// Gravity: move down through the bottom edge
    pub fn update_fall(
        world: &mut World,
        id: CellId,
        fall_speed: f64,
        materials: &Materials,
        stats: &mut dyn SimStats,
    ) -> Option<Vec<CellId>> {
        Self::try_move(world, id, Edge::Bottom, fall_speed, materials, stats)
    }

    /// Liquid: fall, else slide to a random side, else the other side
    pub fn update_liquid(
        world: &mut World,
        id: CellId,
        fall_speed: f64,
        materials: &Materials,
        stats: &mut dyn SimStats,
        rng: &mut dyn WorldRng,
    ) -> Option<Vec<CellId>> {
        if let Some(ids) = Self::update_fall(world, id, fall_speed, materials, stats) {
            return Some(ids);
        }

        let (first, second) = if rng.gen_bool() {
            (Edge::Left, Edge::Right)
        } else {
            (Edge::Right, Edge::Left)
        };

        Self::try_move(world, id, first, fall_speed, materials, stats)
            .or_else(|| Self::try_move(world, id, second, fall_speed, materials, stats))
    }
}
