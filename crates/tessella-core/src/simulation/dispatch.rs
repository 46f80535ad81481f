//! Tick dispatch - the simulation context and its update loop

use glam::DVec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::entity::brush;
use crate::simulation::rules::{RuleTable, UpdateContext};
use crate::simulation::{MaterialId, Materials, SimConfig};
use crate::world::{CellId, TickStats, World};

/// Owns everything one running simulation needs
///
/// There is no global state: the driver creates a `Simulation` and calls
/// [`Simulation::step`] once per tick.
pub struct Simulation {
    world: World,
    config: SimConfig,
    materials: Materials,
    rules: RuleTable,
    rng: Xoshiro256StarStar,
    stats: TickStats,
}

impl Simulation {
    /// A simulation starting from the single bootstrap cell
    pub fn new(config: SimConfig) -> Self {
        Self::with_world(World::new(), config)
    }

    /// A simulation over an existing world
    pub fn with_world(mut world: World, config: SimConfig) -> Self {
        world.set_verify_tiling(config.verify_tiling);
        let materials = Materials::new();
        let rules = RuleTable::new(&materials);
        let rng = Xoshiro256StarStar::seed_from_u64(config.seed);

        log::info!(
            "Simulation created: seed {}, {} cells, air_max {}, fall_speed {}",
            config.seed,
            world.len(),
            config.air_max,
            config.fall_speed
        );

        Self {
            world,
            config,
            materials,
            rules,
            rng,
            stats: TickStats::default(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn materials(&self) -> &Materials {
        &self.materials
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Counters accumulated since the last [`Simulation::take_stats`]
    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    pub fn take_stats(&mut self) -> TickStats {
        std::mem::take(&mut self.stats)
    }

    pub fn tick(&self) -> u64 {
        self.world.tick()
    }

    /// Advance one tick
    ///
    /// Visits live cells in creation order, including cells created during this
    /// pass. Cells born this tick are skipped, but remain visible to contact
    /// queries of the cells updated after them. Returns the ids of every cell
    /// created this tick; some may already be gone again by the time it returns.
    pub fn step(&mut self) -> Vec<CellId> {
        let tick = self.world.begin_tick();
        let mut delta = Vec::new();
        let mut cursor = None;

        while let Some(id) = self.world.next_after(cursor) {
            cursor = Some(id);
            let Some(cell) = self.world.get(id) else {
                continue;
            };
            if cell.birth() == tick {
                continue;
            }
            delta.extend(self.update_cell(id));
        }

        log::debug!(
            "Tick {}: {} cells, {} created",
            tick,
            self.world.len(),
            delta.len()
        );
        delta
    }

    /// Run the rule of one cell's material
    pub fn update_cell(&mut self, id: CellId) -> Vec<CellId> {
        let Some(cell) = self.world.get(id) else {
            return Vec::new();
        };
        let behavior = self.rules.get(cell.material()).behavior;

        let mut ctx = UpdateContext {
            world: &mut self.world,
            config: &self.config,
            materials: &self.materials,
            rng: &mut self.rng,
            stats: &mut self.stats,
        };
        behavior.update(id, &mut ctx)
    }

    /// Paint `material` at a normalized world point
    pub fn paint(&mut self, point: DVec2, material: MaterialId) -> Option<CellId> {
        brush::paint(&mut self.world, point, material, &mut self.stats)
    }

    /// Paint `steps + 1` evenly spaced points between two normalized world points
    pub fn stroke(
        &mut self,
        from: DVec2,
        to: DVec2,
        steps: u32,
        material: MaterialId,
    ) -> Vec<CellId> {
        brush::stroke(&mut self.world, from, to, steps, material, &mut self.stats)
    }
}
