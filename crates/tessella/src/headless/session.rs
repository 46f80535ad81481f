//! A running simulation wired to a pixel buffer, a view and pointer input

use anyhow::{Context, Result};
use glam::DVec2;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tessella_core::entity::InputState;
use tessella_core::simulation::MaterialId;
use tessella_core::world::{CellId, TickStats};
use tessella_core::Simulation;

use super::PixelRenderer;
use crate::config::AppConfig;
use crate::render::View;

/// Drives a [`Simulation`] without a window
///
/// Each tick's new cells are drawn into the buffer as they appear. Pointer
/// input arrives in device pixels and goes through the [`View`] before it
/// reaches the world.
pub struct HeadlessSession {
    sim: Simulation,
    renderer: PixelRenderer,
    view: View,
    input: InputState,

    output_dir: PathBuf,
    snapshot_every: u64,
    snapshots: Vec<PathBuf>,

    // Totals over the whole session
    stats: TickStats,
    tick_times: Vec<f64>,
}

impl HeadlessSession {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_simulation(Simulation::new(config.simulation.clone()), config)
    }

    pub fn with_simulation(sim: Simulation, config: &AppConfig) -> Self {
        let resolution = config.render.resolution as usize;
        let mut renderer =
            PixelRenderer::new(resolution, resolution).with_border(config.render.border);
        renderer.render_world(sim.world(), sim.materials());

        Self {
            sim,
            renderer,
            view: View::square(config.render.resolution),
            input: InputState::new(),
            output_dir: PathBuf::from(&config.output.directory),
            snapshot_every: config.output.snapshot_every,
            snapshots: Vec::new(),
            stats: TickStats::default(),
            tick_times: Vec::new(),
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn renderer(&self) -> &PixelRenderer {
        &self.renderer
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Edit counts summed over every tick and paint so far
    pub fn stats(&self) -> TickStats {
        let mut total = self.stats;
        accumulate(&mut total, self.sim.stats());
        total
    }

    /// Wall-clock time of each tick in milliseconds
    pub fn tick_times(&self) -> &[f64] {
        &self.tick_times
    }

    pub fn snapshots(&self) -> &[PathBuf] {
        &self.snapshots
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Advance one tick and draw what changed
    ///
    /// Writes a periodic snapshot when the tick is a multiple of
    /// `snapshot_every`. Returns the number of cells created.
    pub fn step(&mut self) -> Result<usize> {
        let start = Instant::now();
        let delta = self.sim.step();
        let drawn = self
            .renderer
            .draw_cells(self.sim.world(), &delta, self.sim.materials());
        self.tick_times.push(start.elapsed().as_secs_f64() * 1000.0);

        let tick = self.sim.tick();
        let stats = self.sim.take_stats();
        accumulate(&mut self.stats, &stats);
        log::debug!(
            "Tick {}: {} cells, {} created, {} drawn, {:?}",
            tick,
            self.sim.world().len(),
            delta.len(),
            drawn,
            stats
        );

        if self.snapshot_every > 0 && tick % self.snapshot_every == 0 {
            self.snapshot(&format!("tick_{:06}", tick))?;
        }

        Ok(delta.len())
    }

    /// Advance `ticks` ticks
    pub fn run(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.step()?;
        }

        let stats = self.stats();
        log::info!(
            "Tick {}: {} cells | splits {} merges {} moves {} recolours {}",
            self.sim.tick(),
            self.sim.world().len(),
            stats.splits,
            stats.merges,
            stats.moves,
            stats.recolours
        );
        Ok(())
    }

    /// Move the pointer to a device point, pressed or not
    ///
    /// Outside the view the pointer has no world position.
    pub fn move_pointer(&mut self, device: DVec2, pressed: bool) {
        self.input.pointer.position = if self.view.contains(device) {
            Some(self.view.cast(device))
        } else {
            log::warn!(
                "Pointer at ({:.1}, {:.1}) is outside the view",
                device.x,
                device.y
            );
            None
        };
        self.input.pointer.pressed = pressed;
    }

    pub fn release_pointer(&mut self) {
        self.input.pointer.pressed = false;
    }

    /// Paint with the current brush if the pointer is pressed inside the view
    pub fn apply_brush(&mut self) -> Option<CellId> {
        let (point, material) = self.input.brush()?;
        let id = self.sim.paint(point, material)?;
        self.renderer
            .draw_cells(self.sim.world(), &[id], self.sim.materials());
        Some(id)
    }

    /// Click at a device point, optionally switching the brush first
    pub fn click(&mut self, device: DVec2, material: Option<MaterialId>) -> Option<CellId> {
        if let Some(material) = material {
            self.input.selected_material = material;
        }
        self.move_pointer(device, true);
        let painted = self.apply_brush();
        self.release_pointer();
        painted
    }

    /// Drag the brush between two device points
    pub fn drag(
        &mut self,
        from: DVec2,
        to: DVec2,
        steps: u32,
        material: Option<MaterialId>,
    ) -> Vec<CellId> {
        if let Some(material) = material {
            self.input.selected_material = material;
        }
        let from = self.view.cast(from);
        let to = self.view.cast(to);
        let material = self.input.selected_material;

        let painted = self.sim.stroke(from, to, steps, material);
        self.renderer
            .draw_cells(self.sim.world(), &painted, self.sim.materials());
        painted
    }

    /// Select the brush bound to a key
    pub fn press_key(&mut self, key: char) -> bool {
        self.input.press_key(key, self.sim.rules())
    }

    /// Write the current buffer to `<output>/<name>.png`
    pub fn snapshot(&mut self, name: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.output_dir.display()
            )
        })?;

        let path = self.output_dir.join(format!("{}.png", name));
        self.renderer.save_png(&path)?;
        log::info!("Snapshot written: {}", path.display());

        self.snapshots.push(path.clone());
        Ok(path)
    }
}

fn accumulate(total: &mut TickStats, stats: &TickStats) {
    total.splits += stats.splits;
    total.merges += stats.merges;
    total.moves += stats.moves;
    total.recolours += stats.recolours;
}
