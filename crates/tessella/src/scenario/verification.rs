//! Verification conditions and state checks for scenarios

use glam::DVec2;
use serde::{Deserialize, Serialize};
use tessella_core::simulation::MaterialId;
use tessella_core::Simulation;

/// Conditions that can be verified against a simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VerificationCondition {
    /// Assert the cells still tile the world exactly
    TilingValid,

    /// Assert the number of live cells is within range
    CellCountRange { min: usize, max: usize },

    /// Assert the area held by a material is within range
    MaterialAreaRange {
        material: MaterialId,
        min: f64,
        max: f64,
    },

    /// Assert the material at a normalized world point
    MaterialAt {
        x: f64,
        y: f64,
        expected: MaterialId,
    },

    /// Assert a material covers no area at all
    MaterialAbsent { material: MaterialId },
}

/// Result of verifying a condition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub passed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,
}

impl VerificationCondition {
    /// Evaluate condition against the current simulation state
    pub fn evaluate(&self, sim: &Simulation) -> VerificationResult {
        let world = sim.world();
        match self {
            VerificationCondition::TilingValid => match world.validate() {
                Ok(()) => VerificationResult {
                    passed: true,
                    message: format!("Tiling valid ({} cells)", world.len()),
                    actual_value: None,
                },
                Err(err) => VerificationResult {
                    passed: false,
                    message: format!("Tiling broken: {}", err),
                    actual_value: Some(err.to_string()),
                },
            },

            VerificationCondition::CellCountRange { min, max } => {
                let actual = world.len();
                VerificationResult {
                    passed: actual >= *min && actual <= *max,
                    message: format!("Cell count: expected {}-{}, got {}", min, max, actual),
                    actual_value: Some(actual.to_string()),
                }
            }

            VerificationCondition::MaterialAreaRange { material, min, max } => {
                let actual = world.material_area(*material);
                VerificationResult {
                    passed: actual >= *min && actual <= *max,
                    message: format!(
                        "{:?} area: expected {}-{}, got {:.6}",
                        material, min, max, actual
                    ),
                    actual_value: Some(actual.to_string()),
                }
            }

            VerificationCondition::MaterialAt { x, y, expected } => {
                let actual = world
                    .pick(DVec2::new(*x, *y))
                    .and_then(|id| world.get(id))
                    .map(|cell| cell.material());
                VerificationResult {
                    passed: actual == Some(*expected),
                    message: format!(
                        "Material at ({}, {}): expected {:?}, got {:?}",
                        x, y, expected, actual
                    ),
                    actual_value: Some(format!("{:?}", actual)),
                }
            }

            VerificationCondition::MaterialAbsent { material } => {
                let actual = world.material_area(*material);
                VerificationResult {
                    passed: actual == 0.0,
                    message: format!("{:?} absent: covers {:.6}", material, actual),
                    actual_value: Some(actual.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessella_core::world::{Bounds, Cell, World};
    use tessella_core::SimConfig;

    fn sand_over_air() -> Simulation {
        let world = World::from_cells(vec![
            Cell::new(Bounds::new(0.0, 1.0, 0.0, 0.25), MaterialId::Air),
            Cell::new(Bounds::new(0.0, 1.0, 0.25, 1.0), MaterialId::Sand),
        ])
        .unwrap();
        Simulation::with_world(world, SimConfig::default())
    }

    #[test]
    fn test_tiling_and_count() {
        let sim = sand_over_air();

        assert!(VerificationCondition::TilingValid.evaluate(&sim).passed);
        assert!(VerificationCondition::CellCountRange { min: 1, max: 2 }
            .evaluate(&sim)
            .passed);
        assert!(!VerificationCondition::CellCountRange { min: 3, max: 10 }
            .evaluate(&sim)
            .passed);
    }

    #[test]
    fn test_material_checks() {
        let sim = sand_over_air();

        let area = VerificationCondition::MaterialAreaRange {
            material: MaterialId::Sand,
            min: 0.7,
            max: 0.8,
        };
        assert!(area.evaluate(&sim).passed);

        let at = VerificationCondition::MaterialAt {
            x: 0.5,
            y: 0.1,
            expected: MaterialId::Air,
        };
        assert!(at.evaluate(&sim).passed);

        let outside = VerificationCondition::MaterialAt {
            x: 2.0,
            y: 0.1,
            expected: MaterialId::Air,
        };
        let result = outside.evaluate(&sim);
        assert!(!result.passed);
        assert_eq!(result.actual_value.as_deref(), Some("None"));

        assert!(VerificationCondition::MaterialAbsent {
            material: MaterialId::Water
        }
        .evaluate(&sim)
        .passed);
        assert!(!VerificationCondition::MaterialAbsent {
            material: MaterialId::Sand
        }
        .evaluate(&sim)
        .passed);
    }

    #[test]
    fn test_parse_tagged_conditions() {
        let conditions: Vec<VerificationCondition> = ron::from_str(
            r#"[
                (type: "TilingValid"),
                (type: "MaterialAt", x: 0.5, y: 0.5, expected: "Sand"),
            ]"#,
        )
        .unwrap();
        assert_eq!(conditions.len(), 2);
        assert!(matches!(
            conditions[1],
            VerificationCondition::MaterialAt {
                expected: MaterialId::Sand,
                ..
            }
        ));
    }
}
