use serde::Deserialize;

/// A solid (or liquid) block kind. Empty space is not a block kind; it is
/// represented by the absence of a value (`Option<BlockType>::None`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BlockType {
    Dirt = 0,
    Grass = 1,
    Stone = 2,
    Wood = 3,
    Sand = 4,
    Water = 5,
    Snow = 6,
    DarkGrass = 7,
}

impl BlockType {
    pub const COUNT: usize = 8;

    pub const ALL: [BlockType; Self::COUNT] = [
        BlockType::Dirt,
        BlockType::Grass,
        BlockType::Stone,
        BlockType::Wood,
        BlockType::Sand,
        BlockType::Water,
        BlockType::Snow,
        BlockType::DarkGrass,
    ];

    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn from_id(id: u8) -> Option<BlockType> {
        Self::ALL.get(id as usize).copied()
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockType::Dirt => "Dirt",
            BlockType::Grass => "Grass",
            BlockType::Stone => "Stone",
            BlockType::Wood => "Wood",
            BlockType::Sand => "Sand",
            BlockType::Water => "Water",
            BlockType::Snow => "Snow",
            BlockType::DarkGrass => "Dark Grass",
        }
    }

    /// Lowercase config key, e.g. `dark_grass`.
    pub fn key(self) -> &'static str {
        match self {
            BlockType::Dirt => "dirt",
            BlockType::Grass => "grass",
            BlockType::Stone => "stone",
            BlockType::Wood => "wood",
            BlockType::Sand => "sand",
            BlockType::Water => "water",
            BlockType::Snow => "snow",
            BlockType::DarkGrass => "dark_grass",
        }
    }

    /// The single liquid kind. Faces of any block bordering it stay visible.
    #[inline]
    pub fn is_liquid(self) -> bool {
        matches!(self, BlockType::Water)
    }

    /// Which material variant a face of this block uses. Only grass varies by face.
    #[inline]
    pub fn material_for(self, role: FaceRole) -> MaterialSelector {
        match (self, role) {
            (BlockType::Grass, FaceRole::Top) => MaterialSelector::Top,
            (BlockType::Grass, FaceRole::Bottom) => MaterialSelector::Bottom,
            (BlockType::Grass, FaceRole::Side) => MaterialSelector::Side,
            _ => MaterialSelector::Uniform,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FaceRole {
    Top,
    Bottom,
    Side,
}

/// Material variant handed to the renderer alongside a batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MaterialSelector {
    Uniform,
    Top,
    Bottom,
    Side,
}
