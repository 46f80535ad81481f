//! Actions a scenario script can perform

use serde::{Deserialize, Serialize};
use tessella_core::simulation::MaterialId;

/// One step of a scenario script
///
/// Pointer coordinates are device pixels and pass through the session's view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScenarioAction {
    /// Click at a device point, painting the cell under it
    Paint {
        x: f64,
        y: f64,
        /// Brush to use; the current brush when omitted
        #[serde(default)]
        material: Option<MaterialId>,
    },

    /// Drag the brush from one device point to another
    Stroke {
        from: (f64, f64),
        to: (f64, f64),
        steps: u32,
        #[serde(default)]
        material: Option<MaterialId>,
    },

    /// Press a brush key
    PressKey { key: char },

    /// Advance the simulation
    Wait { ticks: u64 },

    /// Move the view by a device offset
    Pan { dx: f64, dy: f64 },

    /// Scale the view about a device point (the view centre when omitted)
    Zoom {
        scale: f64,
        #[serde(default)]
        center: Option<(f64, f64)>,
    },

    /// Write the pixel buffer to `<output>/<name>.png`
    Snapshot { name: String },

    /// Add a line to the execution log
    Log { message: String },
}
