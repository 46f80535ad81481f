//! Material rule table - what each material does on its update

use crate::simulation::movement::CellMovement;
use crate::simulation::reactions;
use crate::simulation::{MaterialId, Materials, SimConfig};
use crate::world::geometry;
use crate::world::{CellId, Edge, SimStats, SleepStrategy, World, WorldRng, try_to_sleep};

/// Everything a rule may touch while updating one cell
pub struct UpdateContext<'a> {
    pub world: &'a mut World,
    pub config: &'a SimConfig,
    pub materials: &'a Materials,
    pub rng: &'a mut dyn WorldRng,
    pub stats: &'a mut dyn SimStats,
}

impl UpdateContext<'_> {
    fn sleep(&mut self, id: CellId, strategy: &SleepStrategy) -> Vec<CellId> {
        try_to_sleep(self.world, id, &Edge::ALL, strategy, self.rng, self.stats)
    }
}

/// Per-material update behaviour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Break the initial whole-world cell into air
    Bootstrap,
    /// Split while larger than `air_max`, otherwise settle without growing past it
    SizeBound,
    /// Fall through lighter fluids; `staggered` skips some updates at random and
    /// lets a stack of the same material topple sideways into air
    Fall { staggered: bool },
    /// Fall, else slide sideways
    Flow,
    /// Convert touching water into plant
    Grow,
    /// Spread into touching wood and plant, then maybe burn out
    Burn,
    /// Only sleep
    Static,
}

impl Behavior {
    /// Run one update of `id`; returns the ids of cells created
    pub fn update(self, id: CellId, ctx: &mut UpdateContext) -> Vec<CellId> {
        match self {
            Behavior::Bootstrap => Self::bootstrap(id, ctx),

            Behavior::SizeBound => Self::size_bound(id, ctx),

            Behavior::Fall { staggered } => {
                if staggered {
                    if ctx.rng.check_probability(ctx.config.sand_idle_chance) {
                        return Vec::new();
                    }
                    if let Some(ids) = Self::topple(id, ctx) {
                        return ids;
                    }
                }
                CellMovement::update_fall(
                    ctx.world,
                    id,
                    ctx.config.fall_speed,
                    ctx.materials,
                    ctx.stats,
                )
                .unwrap_or_else(|| ctx.sleep(id, &SleepStrategy::default()))
            }

            Behavior::Flow => CellMovement::update_liquid(
                ctx.world,
                id,
                ctx.config.fall_speed,
                ctx.materials,
                ctx.stats,
                ctx.rng,
            )
            .unwrap_or_else(|| ctx.sleep(id, &SleepStrategy::default())),

            Behavior::Grow => {
                let grown = reactions::propagate(
                    ctx.world,
                    id,
                    &[MaterialId::Water],
                    MaterialId::Plant,
                    ctx.config.plant_growth_chance,
                    ctx.rng,
                    ctx.stats,
                );
                if grown.is_empty() {
                    ctx.sleep(id, &SleepStrategy::default())
                } else {
                    grown
                }
            }

            Behavior::Burn => {
                let mut changed = reactions::propagate(
                    ctx.world,
                    id,
                    &[MaterialId::Wood, MaterialId::Plant],
                    MaterialId::Fire,
                    ctx.config.fire_spread_chance,
                    ctx.rng,
                    ctx.stats,
                );
                match reactions::burn_out(
                    ctx.world,
                    id,
                    ctx.config.fire_burnout_chance,
                    ctx.rng,
                    ctx.stats,
                ) {
                    Some(air) => changed.push(air),
                    None if changed.is_empty() => {
                        changed = ctx.sleep(id, &SleepStrategy::default());
                    }
                    None => {}
                }
                changed
            }

            Behavior::Static => ctx.sleep(id, &SleepStrategy::default()),
        }
    }

    fn bootstrap(id: CellId, ctx: &mut UpdateContext) -> Vec<CellId> {
        let Some(cell) = ctx.world.get(id).copied() else {
            return Vec::new();
        };
        let pieces = match geometry::split(&cell, 2, 2) {
            Ok(pieces) => pieces,
            Err(err) => {
                log::warn!("Bootstrap split of {} failed: {}", id, err);
                return Vec::new();
            }
        };

        let air = pieces
            .iter()
            .map(|piece| geometry::recolour(piece, MaterialId::Air))
            .collect();
        ctx.stats.record_split();
        ctx.world.replace(&[id], air)
    }

    /// Sand resting on sand tips the upper cell into air at one random side
    ///
    /// The side cell becomes sand and the upper cell becomes air. Both must be
    /// exact neighbours of `id`, so the two recolours keep the tiling.
    fn topple(id: CellId, ctx: &mut UpdateContext) -> Option<Vec<CellId>> {
        let material = ctx.world.get(id)?.material();
        let above_id = ctx.world.neighbour(id, Edge::Top)?;
        let above = *ctx.world.get(above_id)?;
        if above.material() != material {
            return None;
        }

        let side = if ctx.rng.gen_bool() { Edge::Left } else { Edge::Right };
        let beside_id = ctx.world.neighbour(id, side)?;
        let beside = *ctx.world.get(beside_id)?;
        if beside.material() != MaterialId::Air {
            return None;
        }

        let ids = ctx.world.replace(
            &[beside_id, above_id],
            vec![
                geometry::recolour(&beside, material),
                geometry::recolour(&above, MaterialId::Air),
            ],
        );
        if ids.is_empty() {
            return None;
        }
        log::debug!("Topple: {} slid off {} towards {:?}", above_id, id, side);
        ctx.stats.record_recolour();
        ctx.stats.record_recolour();
        Some(ids)
    }

    fn size_bound(id: CellId, ctx: &mut UpdateContext) -> Vec<CellId> {
        let Some(cell) = ctx.world.get(id) else {
            return Vec::new();
        };
        let max = ctx.config.air_max;
        let wide = cell.bounds().width() > max;
        let tall = cell.bounds().height() > max;

        let (rows, columns) = match (wide, tall) {
            (true, true) => (2, 2),
            (true, false) => (1, 2),
            (false, true) => (2, 1),
            (false, false) => return ctx.sleep(id, &SleepStrategy::capped(max)),
        };

        match ctx.world.split(id, rows, columns) {
            Ok(ids) => {
                ctx.stats.record_split();
                ids
            }
            Err(err) => {
                log::warn!("Size bound split of {} failed: {}", id, err);
                Vec::new()
            }
        }
    }
}

/// Descriptor of one material's rule
#[derive(Clone, Debug)]
pub struct MaterialRule {
    pub material: MaterialId,
    pub name: String,
    /// Paint key selecting this material as the brush
    pub key: Option<char>,
    pub behavior: Behavior,
}

/// Behaviour for each built-in material
pub fn default_behavior(material: MaterialId) -> Behavior {
    match material {
        MaterialId::World => Behavior::Bootstrap,
        MaterialId::Air => Behavior::SizeBound,
        MaterialId::Sand => Behavior::Fall { staggered: true },
        MaterialId::Stone => Behavior::Fall { staggered: false },
        MaterialId::Water => Behavior::Flow,
        MaterialId::Plant => Behavior::Grow,
        MaterialId::Fire => Behavior::Burn,
        MaterialId::Wood => Behavior::Static,
    }
}

/// Fixed registry of material rules, indexed by material id
pub struct RuleTable {
    rules: Vec<MaterialRule>,
}

impl RuleTable {
    pub fn new(materials: &Materials) -> Self {
        let rules = MaterialId::ALL
            .iter()
            .map(|&material| {
                let def = materials.get(material);
                MaterialRule {
                    material,
                    name: def.name.clone(),
                    key: def.key,
                    behavior: default_behavior(material),
                }
            })
            .collect();
        Self { rules }
    }

    pub fn get(&self, material: MaterialId) -> &MaterialRule {
        &self.rules[material.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialRule> {
        self.rules.iter()
    }

    /// Material selected by a paint key
    pub fn by_key(&self, key: char) -> Option<MaterialId> {
        self.rules
            .iter()
            .find(|rule| rule.key == Some(key))
            .map(|rule| rule.material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Bounds, Cell, TickStats};
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn run(world: &mut World, id: CellId, behavior: Behavior, config: &SimConfig) -> Vec<CellId> {
        let materials = Materials::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        let mut stats = TickStats::default();
        let mut ctx = UpdateContext {
            world,
            config,
            materials: &materials,
            rng: &mut rng,
            stats: &mut stats,
        };
        behavior.update(id, &mut ctx)
    }

    #[test]
    fn test_table_covers_every_material() {
        let table = RuleTable::new(&Materials::new());
        for material in MaterialId::ALL {
            assert_eq!(table.get(material).material, material);
        }
        assert_eq!(table.get(MaterialId::World).behavior, Behavior::Bootstrap);
        assert_eq!(table.get(MaterialId::Wood).behavior, Behavior::Static);
        assert_eq!(table.by_key('6'), Some(MaterialId::Water));
        assert_eq!(table.by_key('z'), None);
    }

    #[test]
    fn test_bootstrap_splits_into_air_quadrants() {
        let mut world = World::new();
        let id = world.ids()[0];

        let ids = run(&mut world, id, Behavior::Bootstrap, &SimConfig::default());

        assert_eq!(ids.len(), 4);
        assert_eq!(world.len(), 4);
        assert!(world.iter().all(|(_, cell)| cell.material() == MaterialId::Air));
        assert!(world.validate().is_ok());
    }

    #[test]
    fn test_size_bound_splits_only_the_long_axis() {
        let config = SimConfig {
            air_max: 0.6,
            ..SimConfig::default()
        };
        // 1.0 wide, 0.5 tall
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 1.0, 0.0, 0.5), MaterialId::Air),
            Cell::new(Bounds::new(0.0, 1.0, 0.5, 1.0), MaterialId::Wood),
        ])
        .unwrap();
        let air = world.ids()[0];

        let ids = run(&mut world, air, Behavior::SizeBound, &config);

        assert_eq!(ids.len(), 2);
        for id in ids {
            let bounds = *world.get(id).unwrap().bounds();
            assert_eq!(bounds.width(), 0.5);
            assert_eq!(bounds.height(), 0.5);
        }
    }

    #[test]
    fn test_size_bound_splits_tall_cells_into_rows() {
        let config = SimConfig {
            air_max: 0.6,
            ..SimConfig::default()
        };
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.5, 0.0, 1.0), MaterialId::Air),
            Cell::new(Bounds::new(0.5, 1.0, 0.0, 1.0), MaterialId::Wood),
        ])
        .unwrap();
        let air = world.ids()[0];

        let ids = run(&mut world, air, Behavior::SizeBound, &config);

        assert_eq!(ids.len(), 2);
        assert_eq!(world.get(ids[0]).unwrap().bounds(), &Bounds::new(0.0, 0.5, 0.0, 0.5));
        assert_eq!(world.get(ids[1]).unwrap().bounds(), &Bounds::new(0.0, 0.5, 0.5, 1.0));
    }

    #[test]
    fn test_small_air_does_not_regrow() {
        let config = SimConfig {
            air_max: 0.5,
            ..SimConfig::default()
        };
        let mut world = World::with_material(MaterialId::Air);
        let id = world.ids()[0];
        world.split(id, 2, 2).unwrap();
        let first = world.ids()[0];

        let ids = run(&mut world, first, Behavior::SizeBound, &config);

        assert!(ids.is_empty());
        assert_eq!(world.len(), 4);
    }

    #[test]
    fn test_fall_without_room_sleeps() {
        let config = SimConfig {
            sand_idle_chance: 0.0,
            ..SimConfig::default()
        };
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.5, 0.0, 1.0), MaterialId::Sand),
            Cell::new(Bounds::new(0.5, 1.0, 0.0, 1.0), MaterialId::Sand),
        ])
        .unwrap();
        let id = world.ids()[0];

        let ids = run(&mut world, id, Behavior::Fall { staggered: true }, &config);

        assert_eq!(ids.len(), 1);
        assert_eq!(world.get(ids[0]).unwrap().bounds(), &Bounds::UNIT);
    }

    #[test]
    fn test_staggered_fall_can_idle() {
        let config = SimConfig {
            sand_idle_chance: 1.0,
            ..SimConfig::default()
        };
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 1.0, 0.0, 0.5), MaterialId::Sand),
            Cell::new(Bounds::new(0.0, 1.0, 0.5, 1.0), MaterialId::Air),
        ])
        .unwrap();
        let id = world.ids()[0];

        assert!(run(&mut world, id, Behavior::Fall { staggered: true }, &config).is_empty());
        assert!(world.contains(id));

        let ids = run(&mut world, id, Behavior::Fall { staggered: false }, &config);
        assert!(!ids.is_empty());
        assert!(!world.contains(id));
    }

    fn material_at(world: &World, x: f64, y: f64) -> MaterialId {
        let id = world.pick(DVec2::new(x, y)).unwrap();
        world.get(id).unwrap().material()
    }

    /// Four columns by two rows of air with sand in both rows of column 1
    fn sand_stack(side: MaterialId) -> (World, CellId, CellId) {
        let mut cells = Vec::new();
        for row in 0..2 {
            for column in 0..4 {
                let left = column as f64 * 0.25;
                let top = row as f64 * 0.5;
                let material = match column {
                    1 => MaterialId::Sand,
                    0 | 2 => side,
                    _ => MaterialId::Air,
                };
                cells.push(Cell::new(
                    Bounds::new(left, left + 0.25, top, top + 0.5),
                    material,
                ));
            }
        }
        let world = World::from_cells(cells).unwrap();
        let ids = world.ids();
        (world, ids[1], ids[5])
    }

    #[test]
    fn test_sand_stack_topples_into_air() {
        let config = SimConfig {
            sand_idle_chance: 0.0,
            ..SimConfig::default()
        };
        let (mut world, top, bottom) = sand_stack(MaterialId::Air);

        let ids = run(&mut world, bottom, Behavior::Fall { staggered: true }, &config);

        assert_eq!(ids.len(), 2);
        assert!(world.contains(bottom));
        assert!(!world.contains(top));
        assert_eq!(material_at(&world, 0.375, 0.25), MaterialId::Air);
        let left = material_at(&world, 0.125, 0.75);
        let right = material_at(&world, 0.625, 0.75);
        assert!((left == MaterialId::Sand) ^ (right == MaterialId::Sand));
        assert_eq!(world.material_area(MaterialId::Sand), 0.25);
        assert!(world.validate().is_ok());
    }

    #[test]
    fn test_sand_stack_between_walls_stays() {
        let config = SimConfig {
            sand_idle_chance: 0.0,
            ..SimConfig::default()
        };
        let (mut world, _, bottom) = sand_stack(MaterialId::Stone);

        run(&mut world, bottom, Behavior::Fall { staggered: true }, &config);

        // Nothing to slide into, so the stack only sleeps
        assert_eq!(material_at(&world, 0.375, 0.25), MaterialId::Sand);
        assert_eq!(material_at(&world, 0.375, 0.75), MaterialId::Sand);
        assert_eq!(world.material_area(MaterialId::Sand), 0.25);
        assert_eq!(world.material_area(MaterialId::Stone), 0.5);
    }

    #[test]
    fn test_unstaggered_fall_does_not_topple() {
        let config = SimConfig::default();
        let (mut world, _, bottom) = sand_stack(MaterialId::Air);

        run(&mut world, bottom, Behavior::Fall { staggered: false }, &config);

        assert_eq!(material_at(&world, 0.375, 0.25), MaterialId::Sand);
        assert_eq!(material_at(&world, 0.125, 0.75), MaterialId::Air);
        assert_eq!(material_at(&world, 0.625, 0.75), MaterialId::Air);
    }

    #[test]
    fn test_grow_converts_water() {
        let config = SimConfig {
            plant_growth_chance: 1.0,
            ..SimConfig::default()
        };
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.5, 0.0, 1.0), MaterialId::Plant),
            Cell::new(Bounds::new(0.5, 1.0, 0.0, 1.0), MaterialId::Water),
        ])
        .unwrap();
        let plant = world.ids()[0];

        let ids = run(&mut world, plant, Behavior::Grow, &config);

        assert_eq!(ids.len(), 1);
        assert_eq!(world.material_area(MaterialId::Plant), 1.0);
    }

    #[test]
    fn test_burn_spreads_then_burns_out() {
        let config = SimConfig {
            fire_spread_chance: 1.0,
            fire_burnout_chance: 1.0,
            ..SimConfig::default()
        };
        let mut world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 0.5, 0.0, 1.0), MaterialId::Fire),
            Cell::new(Bounds::new(0.5, 1.0, 0.0, 1.0), MaterialId::Wood),
        ])
        .unwrap();
        let fire = world.ids()[0];

        let ids = run(&mut world, fire, Behavior::Burn, &config);

        assert_eq!(ids.len(), 2);
        assert_eq!(world.material_area(MaterialId::Air), 0.5);
        assert_eq!(world.material_area(MaterialId::Fire), 0.5);
        assert!(world.validate().is_ok());
    }
}
