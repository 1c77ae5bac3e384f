//! Resource tiles: the hexagons that produce resources on a dice roll.

use serde::{Deserialize, Serialize};

/// Index of a tile in the board layout (0-18 on the standard board)
pub type TileId = usize;

/// The five production resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    Brick,
    Lumber,
    Wool,
    Grain,
    Ore,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Lumber,
        Resource::Wool,
        Resource::Grain,
        Resource::Ore,
    ];
}

/// Harbor on a coastal path, for maritime trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Harbor {
    /// 3:1 trade of any resource
    Generic,
    /// 2:1 trade of one resource
    Specific(Resource),
}

impl Harbor {
    /// Resources given per resource received
    pub fn rate(&self) -> u32 {
        match self {
            Harbor::Generic => 3,
            Harbor::Specific(_) => 2,
        }
    }
}

/// Type of hex tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Produces a resource when its number is rolled
    Resource(Resource),
    /// Produces nothing; the burglar starts here
    Desert,
}

/// A single hex tile on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTile {
    /// What the tile produces
    pub tile_type: TileType,
    /// Dice number that triggers production (2-12, 0 for the desert)
    pub dice_number: u8,
    /// Whether the burglar currently sits on this tile
    pub has_burglar: bool,
}

impl ResourceTile {
    /// Create a producing tile
    pub fn new(resource: Resource, dice_number: u8) -> Self {
        Self {
            tile_type: TileType::Resource(resource),
            dice_number,
            has_burglar: false,
        }
    }

    /// Create the desert tile, with the burglar on it
    pub fn desert() -> Self {
        Self {
            tile_type: TileType::Desert,
            dice_number: 0,
            has_burglar: true,
        }
    }

    pub fn is_desert(&self) -> bool {
        matches!(self.tile_type, TileType::Desert)
    }

    /// Get the resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self.tile_type {
            TileType::Resource(r) => Some(r),
            TileType::Desert => None,
        }
    }

    /// Check if this tile produces on a roll of `roll`
    pub fn produces_on(&self, roll: u8) -> bool {
        !self.has_burglar && self.resource().is_some() && self.dice_number == roll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desert_starts_with_burglar() {
        let desert = ResourceTile::desert();
        assert!(desert.is_desert());
        assert!(desert.has_burglar);
        assert_eq!(desert.dice_number, 0);
        assert_eq!(desert.resource(), None);
    }

    #[test]
    fn test_burglar_blocks_production() {
        let mut tile = ResourceTile::new(Resource::Ore, 8);
        assert!(tile.produces_on(8));
        assert!(!tile.produces_on(6));

        tile.has_burglar = true;
        assert!(!tile.produces_on(8));
    }

    #[test]
    fn test_harbor_rates() {
        assert_eq!(Harbor::Generic.rate(), 3);
        assert_eq!(Harbor::Specific(Resource::Grain).rate(), 2);
    }

    #[test]
    fn test_desert_never_produces() {
        let mut desert = ResourceTile::desert();
        desert.has_burglar = false;
        assert!(!desert.produces_on(0));
    }
}
