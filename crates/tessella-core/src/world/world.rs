//! World - the live partition of the domain into cells

use ahash::AHashMap;
use glam::DVec2;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound::{Excluded, Unbounded};
use thiserror::Error;

use super::cell::{Bounds, Cell, CellId};
use super::contacts::ContactQueries;
use super::direction::{Axis, Edge};
use super::geometry::{self, GeometryError};
use super::tiling::{self, TilingError};
use crate::simulation::MaterialId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorldError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("cell {0} is not in the world")]
    UnknownCell(CellId),

    #[error("edit rejected by tiling verification")]
    Rejected,
}

/// Key for an edge coordinate; folds -0.0 into 0.0
fn edge_key(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

/// Gapless, non-overlapping set of cells covering the domain
///
/// Besides the cells themselves the world keeps one index per edge, mapping
/// a coordinate to the cells whose bound on that edge sits at it. Contact
/// queries read those indices instead of scanning.
pub struct World {
    /// Live cells in creation order
    cells: BTreeMap<CellId, Cell>,

    /// Per-edge index: coordinate -> cells with that bound
    edges: [AHashMap<u64, BTreeSet<CellId>>; 4],

    /// Area the cells tile
    domain: Bounds,

    next_id: u64,

    /// Current tick, stamped on every added cell
    tick: u64,

    /// Validate the tiling around every replace
    verify_tiling: bool,
}

impl World {
    /// A world holding the single bootstrap cell
    pub fn new() -> Self {
        Self::with_material(MaterialId::World)
    }

    /// A world holding one cell of `material` covering everything
    pub fn with_material(material: MaterialId) -> Self {
        let mut world = Self::empty(Bounds::UNIT);
        world.add(Cell::new(Bounds::UNIT, material));
        world
    }

    /// Build a world from an explicit tiling of the unit domain
    pub fn from_cells(cells: Vec<Cell>) -> Result<Self, TilingError> {
        let mut world = Self::empty(Bounds::UNIT);
        for cell in cells {
            world.add(cell);
        }
        world.validate()?;
        Ok(world)
    }

    fn empty(domain: Bounds) -> Self {
        Self {
            cells: BTreeMap::new(),
            edges: Default::default(),
            domain,
            next_id: 0,
            tick: 0,
            verify_tiling: false,
        }
    }

    /// Enable full tiling validation before and after every replace
    pub fn set_verify_tiling(&mut self, verify: bool) {
        self.verify_tiling = verify;
    }

    pub fn domain(&self) -> &Bounds {
        &self.domain
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance the tick counter; cells added from now on carry the new tick
    pub fn begin_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(&id)
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.cells.contains_key(&id)
    }

    /// Iterator over live cells in creation order
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().map(|(id, cell)| (*id, cell))
    }

    pub fn ids(&self) -> Vec<CellId> {
        self.cells.keys().copied().collect()
    }

    /// First live cell created after `after` (or the oldest one)
    ///
    /// Walking the world with this sees cells added mid-walk, unlike a snapshot.
    pub fn next_after(&self, after: Option<CellId>) -> Option<CellId> {
        match after {
            Some(id) => self.cells.range((Excluded(id), Unbounded)).next(),
            None => self.cells.iter().next(),
        }
        .map(|(id, _)| *id)
    }

    /// Insert a cell and register it in all four edge indices
    pub fn add(&mut self, cell: Cell) -> CellId {
        let id = CellId(self.next_id);
        self.next_id += 1;

        let cell = cell.born_at(self.tick);
        for edge in Edge::ALL {
            self.edges[edge as usize]
                .entry(edge_key(cell.bounds().get(edge)))
                .or_default()
                .insert(id);
        }
        self.cells.insert(id, cell);
        id
    }

    /// Remove a cell and unregister it; empty index buckets are dropped
    pub fn delete(&mut self, id: CellId) -> Option<Cell> {
        let cell = self.cells.remove(&id)?;
        for edge in Edge::ALL {
            let index = &mut self.edges[edge as usize];
            let key = edge_key(cell.bounds().get(edge));
            if let Some(bucket) = index.get_mut(&key) {
                bucket.remove(&id);
                if bucket.is_empty() {
                    index.remove(&key);
                }
            }
        }
        Some(cell)
    }

    /// Delete `old` then add `new` as one edit; returns the new cells' ids
    ///
    /// The old and new cells must cover the same area. That is the caller's
    /// contract; it is only checked here when tiling verification is enabled,
    /// in which case a violation is logged.
    pub fn replace(&mut self, old: &[CellId], new: Vec<Cell>) -> Vec<CellId> {
        if !self.verify_tiling {
            return self.apply(old, new);
        }

        if let Err(err) = self.validate() {
            log::error!("Tiling violated before replace, edit skipped: {}", err);
            return Vec::new();
        }
        let ids = self.apply(old, new);
        if let Err(err) = self.validate() {
            log::error!("Tiling violated after replace: {}", err);
        }
        ids
    }

    /// `replace` that validates the tiling before and after the edit
    ///
    /// A violation found before the edit leaves the world untouched. One found
    /// after is returned with the edit already applied.
    pub fn try_replace(
        &mut self,
        old: &[CellId],
        new: Vec<Cell>,
    ) -> Result<Vec<CellId>, TilingError> {
        self.validate()?;
        let ids = self.apply(old, new);
        self.validate()?;
        Ok(ids)
    }

    fn apply(&mut self, old: &[CellId], new: Vec<Cell>) -> Vec<CellId> {
        for &id in old {
            if self.delete(id).is_none() {
                log::warn!("replace: cell {} was already gone", id);
            }
        }
        new.into_iter().map(|cell| self.add(cell)).collect()
    }

    /// Cell containing `point`, if it lies inside the domain
    ///
    /// Linear scan. Shared edges belong to the cell on their high side.
    pub fn pick(&self, point: DVec2) -> Option<CellId> {
        self.cells
            .iter()
            .find(|(_, cell)| cell.bounds().contains_within(point, &self.domain))
            .map(|(id, _)| *id)
    }

    /// Cells whose bound on `edge` sits exactly at `coordinate`
    pub fn edge_bucket(&self, edge: Edge, coordinate: f64) -> impl Iterator<Item = CellId> + '_ {
        self.edges[edge as usize]
            .get(&edge_key(coordinate))
            .into_iter()
            .flat_map(|bucket| bucket.iter().copied())
    }

    pub(crate) fn edge_index(&self, edge: Edge) -> &AHashMap<u64, BTreeSet<CellId>> {
        &self.edges[edge as usize]
    }

    /// Cells touching `id` across `edge`
    pub fn contacts(&self, id: CellId, edge: Edge) -> Vec<CellId> {
        ContactQueries::contacts(self, id, edge)
    }

    /// The contact across `edge` aligned exactly with `id`, if any
    pub fn neighbour(&self, id: CellId, edge: Edge) -> Option<CellId> {
        ContactQueries::neighbour(self, id, edge)
    }

    fn cell(&self, id: CellId) -> Result<Cell, WorldError> {
        self.get(id).copied().ok_or(WorldError::UnknownCell(id))
    }

    /// Split a live cell into `rows * columns` equal cells
    pub fn split(
        &mut self,
        id: CellId,
        rows: usize,
        columns: usize,
    ) -> Result<Vec<CellId>, WorldError> {
        let cell = self.cell(id)?;
        let pieces = geometry::split(&cell, rows, columns)?;
        log::debug!("Split {} into {}x{}", id, rows, columns);
        Ok(self.replace(&[id], pieces))
    }

    /// Chop a live cell along `axis` at `targets`
    pub fn chop(
        &mut self,
        id: CellId,
        axis: Axis,
        targets: &[f64],
    ) -> Result<Vec<CellId>, WorldError> {
        let cell = self.cell(id)?;
        if targets.is_empty() {
            return Ok(vec![id]);
        }
        let pieces = geometry::chop(&cell, axis, targets);
        Ok(self.replace(&[id], pieces))
    }

    /// Merge live cells into their bounding box
    pub fn merge(
        &mut self,
        ids: &[CellId],
        material: Option<MaterialId>,
    ) -> Result<CellId, WorldError> {
        let cells = ids
            .iter()
            .map(|&id| self.cell(id))
            .collect::<Result<Vec<_>, _>>()?;
        let merged = geometry::merge(&cells, material)?;
        let new_ids = self.replace(ids, vec![merged]);
        new_ids.first().copied().ok_or(WorldError::Rejected)
    }

    /// Replace a live cell with one of another material
    pub fn recolour(&mut self, id: CellId, material: MaterialId) -> Result<CellId, WorldError> {
        let cell = self.cell(id)?;
        let new_ids = self.replace(&[id], vec![geometry::recolour(&cell, material)]);
        new_ids.first().copied().ok_or(WorldError::Rejected)
    }

    /// Check the full tiling invariant and the edge indices
    pub fn validate(&self) -> Result<(), TilingError> {
        tiling::validate(self)
    }

    /// Number of live cells of each material
    pub fn census(&self) -> BTreeMap<MaterialId, usize> {
        let mut counts = BTreeMap::new();
        for cell in self.cells.values() {
            *counts.entry(cell.material()).or_insert(0) += 1;
        }
        counts
    }

    /// Area covered by `material`
    pub fn material_area(&self, material: MaterialId) -> f64 {
        self.cells
            .values()
            .filter(|cell| cell.material() == material)
            .map(Cell::area)
            .sum()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
