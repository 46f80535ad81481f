//! Pointer and key input state

use glam::DVec2;

use crate::simulation::{MaterialId, RuleTable};

/// Pointer position in normalized world coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// `None` while the pointer is outside the view
    pub position: Option<DVec2>,
    pub pressed: bool,
}

/// Tracks the current brush and pointer
#[derive(Debug, Clone)]
pub struct InputState {
    pub pointer: PointerState,

    // Material painted while the pointer is pressed
    pub selected_material: MaterialId,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pointer: PointerState::default(),
            selected_material: MaterialId::Sand, // Start with sand
        }
    }

    /// Select the brush bound to `key`; unknown keys leave it unchanged
    pub fn press_key(&mut self, key: char, rules: &RuleTable) -> bool {
        match rules.by_key(key) {
            Some(material) => {
                log::debug!("Brush set to {:?}", material);
                self.selected_material = material;
                true
            }
            None => {
                log::warn!("No material bound to key {:?}", key);
                false
            }
        }
    }

    /// Point to paint at and the material to paint, while the pointer is pressed
    pub fn brush(&self) -> Option<(DVec2, MaterialId)> {
        match self.pointer {
            PointerState {
                position: Some(position),
                pressed: true,
            } => Some((position, self.selected_material)),
            _ => None,
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
