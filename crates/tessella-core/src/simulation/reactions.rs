//! Material reactions - contact propagation and burn-out

use crate::simulation::MaterialId;
use crate::world::{CellId, Edge, SimStats, World, WorldRng};

/// Recolour contacts of `id` holding one of `triggers` into `into`
///
/// Each matching contact converts independently with probability `chance`.
/// Returns the ids of the converted cells.
pub fn propagate(
    world: &mut World,
    id: CellId,
    triggers: &[MaterialId],
    into: MaterialId,
    chance: f32,
    rng: &mut dyn WorldRng,
    stats: &mut dyn SimStats,
) -> Vec<CellId> {
    let mut converted = Vec::new();

    for edge in Edge::ALL {
        for contact in world.contacts(id, edge) {
            let Some(cell) = world.get(contact) else {
                continue;
            };
            if !triggers.contains(&cell.material()) || !rng.check_probability(chance) {
                continue;
            }

            if let Ok(new_id) = world.recolour(contact, into) {
                log::debug!("{} turned {} into {:?}", id, contact, into);
                stats.record_recolour();
                converted.push(new_id);
            }
        }
    }

    converted
}

/// Turn `id` into air with probability `chance`
pub fn burn_out(
    world: &mut World,
    id: CellId,
    chance: f32,
    rng: &mut dyn WorldRng,
    stats: &mut dyn SimStats,
) -> Option<CellId> {
    if !rng.check_probability(chance) {
        return None;
    }

    let new_id = world.recolour(id, MaterialId::Air).ok()?;
    stats.record_recolour();
    Some(new_id)
}
