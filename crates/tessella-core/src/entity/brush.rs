//! Paint brush - recolouring the cell under a point

use glam::DVec2;

use crate::simulation::MaterialId;
use crate::world::{CellId, SimStats, World};

/// Recolour the cell containing `point` to `material`
///
/// Returns the id of the repainted cell. Painting outside the world or with
/// the material the cell already holds changes nothing and returns `None`.
pub fn paint(
    world: &mut World,
    point: DVec2,
    material: MaterialId,
    stats: &mut dyn SimStats,
) -> Option<CellId> {
    let Some(id) = world.pick(point) else {
        log::warn!("Paint at ({:.3}, {:.3}) is outside the world", point.x, point.y);
        return None;
    };

    if world.get(id)?.material() == material {
        return None;
    }

    let new_id = world.recolour(id, material).ok()?;
    stats.record_recolour();
    Some(new_id)
}

/// Paint `steps + 1` evenly spaced points from `from` to `to`
pub fn stroke(
    world: &mut World,
    from: DVec2,
    to: DVec2,
    steps: u32,
    material: MaterialId,
    stats: &mut dyn SimStats,
) -> Vec<CellId> {
    let steps = steps.max(1);
    (0..=steps)
        .filter_map(|i| {
            let point = from.lerp(to, f64::from(i) / f64::from(steps));
            paint(world, point, material, stats)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Bounds, Cell, TickStats};

    fn quadrants() -> World {
        let mut world = World::with_material(MaterialId::Air);
        let id = world.ids()[0];
        world.split(id, 2, 2).unwrap();
        world
    }

    #[test]
    fn test_paint_replaces_only_containing_cell() {
        let mut world = quadrants();
        let before: Vec<(CellId, Cell)> = world.iter().map(|(id, cell)| (id, *cell)).collect();
        let mut stats = TickStats::default();

        let painted =
            paint(&mut world, DVec2::new(0.5, 0.5), MaterialId::Water, &mut stats).unwrap();

        // (0.5, 0.5) belongs to the bottom-right quadrant
        let cell = world.get(painted).unwrap();
        assert_eq!(cell.material(), MaterialId::Water);
        assert_eq!(cell.bounds(), &Bounds::new(0.5, 1.0, 0.5, 1.0));

        let untouched = before
            .iter()
            .filter(|(id, cell)| world.get(*id) == Some(cell))
            .count();
        assert_eq!(untouched, 3);
        assert_eq!(stats.recolours, 1);
        assert!(world.validate().is_ok());
    }

    #[test]
    fn test_paint_same_material_is_noop() {
        let mut world = quadrants();
        let ids = world.ids();
        let mut stats = TickStats::default();

        assert!(paint(&mut world, DVec2::new(0.1, 0.1), MaterialId::Air, &mut stats).is_none());
        assert_eq!(world.ids(), ids);
        assert_eq!(stats.recolours, 0);
    }

    #[test]
    fn test_paint_outside_world_is_ignored() {
        let mut world = quadrants();
        let mut stats = TickStats::default();
        assert!(paint(&mut world, DVec2::new(1.5, 0.5), MaterialId::Sand, &mut stats).is_none());
        assert_eq!(world.len(), 4);
    }

    #[test]
    fn test_stroke_paints_along_line() {
        let mut world = quadrants();
        let mut stats = TickStats::default();

        let painted = stroke(
            &mut world,
            DVec2::new(0.1, 0.25),
            DVec2::new(0.9, 0.25),
            4,
            MaterialId::Wood,
            &mut stats,
        );

        // Both top quadrants, each painted once
        assert_eq!(painted.len(), 2);
        assert_eq!(world.material_area(MaterialId::Wood), 0.5);
    }
}
