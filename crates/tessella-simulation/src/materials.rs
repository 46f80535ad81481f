//! Material definitions and registry

use serde::{Deserialize, Serialize};

/// Built-in materials
///
/// The set is closed: every cell in the partition holds exactly one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
pub enum MaterialId {
    /// Background state of the initial whole-world cell, replaced on the first tick
    World = 0,
    Air = 1,
    Sand = 2,
    Wood = 3,
    Fire = 4,
    Plant = 5,
    Water = 6,
    Stone = 7,
}

impl MaterialId {
    /// Every material, in id order
    pub const ALL: [MaterialId; 8] = [
        MaterialId::World,
        MaterialId::Air,
        MaterialId::Sand,
        MaterialId::Wood,
        MaterialId::Fire,
        MaterialId::Plant,
        MaterialId::Water,
        MaterialId::Stone,
    ];

    /// Index into the registry table
    pub fn index(self) -> usize {
        self as usize
    }
}

/// How a material behaves physically
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialType {
    /// Doesn't move (wood, plant)
    Solid,
    /// Falls, piles up (sand, stone)
    Powder,
    /// Falls and flows sideways (water)
    Liquid,
    /// Empty space that others fall through (air, fire)
    Gas,
}

/// Definition of a material's properties
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialDef {
    pub id: MaterialId,
    pub name: String,
    pub material_type: MaterialType,

    /// Base color (RGBA)
    pub color: [u8; 4],

    /// Density - heavier movers displace lighter non-solid cells
    pub density: f32,

    /// Paint key that selects this material as the brush
    pub key: Option<char>,
}

impl Default for MaterialDef {
    fn default() -> Self {
        Self {
            id: MaterialId::World,
            name: "unknown".to_string(),
            material_type: MaterialType::Solid,
            color: [255, 0, 255, 255], // Magenta for missing materials
            density: 1.0,
            key: None,
        }
    }
}

impl MaterialDef {
    /// Whether a mover of density `density` may swap places with this material
    pub fn is_displaceable_by(&self, density: f32) -> bool {
        matches!(self.material_type, MaterialType::Gas | MaterialType::Liquid)
            && self.density < density
    }
}

/// Registry of all materials
pub struct Materials {
    materials: Vec<MaterialDef>,
}

impl Materials {
    pub fn new() -> Self {
        let mut materials = Self {
            materials: vec![MaterialDef::default(); MaterialId::ALL.len()],
        };
        materials.register_defaults();
        materials
    }

    fn register_defaults(&mut self) {
        // World (bootstrap background, never painted)
        self.register(MaterialDef {
            id: MaterialId::World,
            name: "world".to_string(),
            material_type: MaterialType::Solid,
            color: [0, 0, 0, 255],
            density: 0.0,
            key: None,
        });

        // Air (empty space)
        self.register(MaterialDef {
            id: MaterialId::Air,
            name: "air".to_string(),
            material_type: MaterialType::Gas,
            color: [10, 10, 14, 255],
            density: 0.001,
            key: Some('1'),
        });

        // Sand
        self.register(MaterialDef {
            id: MaterialId::Sand,
            name: "sand".to_string(),
            material_type: MaterialType::Powder,
            color: [255, 204, 70, 255],
            density: 1.5,
            key: Some('2'),
        });

        // Wood
        self.register(MaterialDef {
            id: MaterialId::Wood,
            name: "wood".to_string(),
            material_type: MaterialType::Solid,
            color: [255, 128, 32, 255],
            density: 0.7,
            key: Some('3'),
        });

        // Fire
        self.register(MaterialDef {
            id: MaterialId::Fire,
            name: "fire".to_string(),
            material_type: MaterialType::Gas,
            color: [255, 64, 48, 255],
            density: 0.0005,
            key: Some('4'),
        });

        // Plant
        self.register(MaterialDef {
            id: MaterialId::Plant,
            name: "plant".to_string(),
            material_type: MaterialType::Solid,
            color: [70, 255, 128, 255],
            density: 0.9,
            key: Some('5'),
        });

        // Water
        self.register(MaterialDef {
            id: MaterialId::Water,
            name: "water".to_string(),
            material_type: MaterialType::Liquid,
            color: [64, 160, 255, 255],
            density: 1.0,
            key: Some('6'),
        });

        // Stone
        self.register(MaterialDef {
            id: MaterialId::Stone,
            name: "stone".to_string(),
            material_type: MaterialType::Powder,
            color: [192, 192, 200, 255],
            density: 2.5,
            key: Some('7'),
        });
    }

    fn register(&mut self, material: MaterialDef) {
        let index = material.id.index();
        self.materials[index] = material;
    }

    /// Get material definition by ID
    pub fn get(&self, id: MaterialId) -> &MaterialDef {
        &self.materials[id.index()]
    }

    /// Get color for a material
    pub fn get_color(&self, id: MaterialId) -> [u8; 4] {
        self.get(id).color
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialDef> {
        self.materials.iter()
    }
}

impl Default for Materials {
    fn default() -> Self {
        Self::new()
    }
}
