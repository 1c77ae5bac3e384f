//! Game board: tiles, settlements and roads on top of the fixed topology.
//!
//! This module contains:
//! - Ownership types for locations (colonies) and paths (roads)
//! - Board construction from a seed or an injected RNG
//! - Legality queries used by the game-state machine and search code
//! - The mutation methods that apply accepted moves
//!
//! The graph itself lives in a shared [`Topology`]; cloning a board copies
//! only tiles and ownership, which keeps speculative search cheap.

use crate::error::{ConfigurationError, IllegalMoveError};
use crate::layout::{generate_layout, place_harbors, standard_harbors};
use crate::tile::{Harbor, Resource, ResourceTile, TileId};
use crate::topology::{LocationId, Path, Topology};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, warn};

/// Player identifier. The board only compares it, never interprets it.
pub type PlayerId = u8;

/// What's built on a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Colony {
    /// Nothing built
    #[default]
    Unsettled,
    /// Settlement (1 resource per adjacent tile)
    Settlement(PlayerId),
    /// City (2 resources per adjacent tile)
    City(PlayerId),
}

impl Colony {
    /// Get the owner of this colony, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            Colony::Unsettled => None,
            Colony::Settlement(p) | Colony::City(p) => Some(*p),
        }
    }

    /// Resources collected per producing adjacent tile
    pub fn resource_multiplier(&self) -> u32 {
        match self {
            Colony::Unsettled => 0,
            Colony::Settlement(_) => 1,
            Colony::City(_) => 2,
        }
    }
}

/// What to build with [`Board::settle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColonyKind {
    /// A new settlement on an empty location
    Settlement,
    /// Upgrade of the player's own settlement
    City,
}

/// What's built on a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Road {
    #[default]
    Unpaved,
    Paved(PlayerId),
}

impl Road {
    /// Get the owner of this road, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            Road::Unpaved => None,
            Road::Paved(p) => Some(*p),
        }
    }
}

/// A harbor docked on a coastal path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HarborPlacement {
    /// Path whose two endpoints reach the harbor
    pub path: Path,
    pub harbor: Harbor,
}

/// The complete game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Shared, immutable graph
    topology: Arc<Topology>,
    /// Tiles in layout order
    tiles: Vec<ResourceTile>,
    /// Colony on each location, indexed by location id
    colonies: Vec<Colony>,
    /// Road on each path, indexed like `topology.paths()`
    roads: Vec<Road>,
    /// Tile currently holding the burglar
    burglar: TileId,
    /// Harbors, sorted by path
    harbors: Vec<HarborPlacement>,
}

impl Board {
    /// Create the standard board with tiles shuffled from `seed`
    pub fn new(seed: u64) -> Result<Self, ConfigurationError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::with_rng(&mut rng)
    }

    /// Create the standard board with a provided RNG.
    ///
    /// Tiles are shuffled first, then the standard harbors are docked.
    pub fn with_rng<R: Rng>(rng: &mut R) -> Result<Self, ConfigurationError> {
        let tiles = generate_layout(rng)?;
        let board = Self::build(tiles)?;
        let harbors = place_harbors(&board.topology, standard_harbors(), rng)?;
        board.with_harbors(harbors)
    }

    /// Build the standard board graph around an ordered tile layout
    pub fn build(tiles: Vec<ResourceTile>) -> Result<Self, ConfigurationError> {
        let topology = Arc::new(Topology::standard()?);
        Self::from_topology(topology, tiles)
    }

    /// Build a board on an existing topology.
    ///
    /// Boards built this way share the graph with every other board using the
    /// same `Arc`. The burglar is placed on the desert. No harbors are
    /// docked; see [`Board::with_harbors`].
    pub fn from_topology(
        topology: Arc<Topology>,
        mut tiles: Vec<ResourceTile>,
    ) -> Result<Self, ConfigurationError> {
        let desert = check_tiles(&topology, &tiles)?;
        for (id, tile) in tiles.iter_mut().enumerate() {
            tile.has_burglar = id == desert;
        }

        let board = Self::assemble(topology, tiles, desert);
        debug!(desert, "Board built");
        Ok(board)
    }

    fn assemble(topology: Arc<Topology>, tiles: Vec<ResourceTile>, burglar: TileId) -> Self {
        Self {
            colonies: vec![Colony::Unsettled; topology.location_count()],
            roads: vec![Road::Unpaved; topology.path_count()],
            topology,
            tiles,
            burglar,
            harbors: Vec::new(),
        }
    }

    /// Replace the board's harbors.
    ///
    /// Every harbor must sit on its own coastal path of this board.
    pub fn with_harbors(
        mut self,
        mut harbors: Vec<HarborPlacement>,
    ) -> Result<Self, ConfigurationError> {
        harbors.sort_by_key(|placement| placement.path);
        for (i, placement) in harbors.iter().enumerate() {
            let coastal = self.topology.path_tiles(&placement.path).len() == 1;
            let repeated = i > 0 && harbors[i - 1].path == placement.path;
            if !coastal || repeated {
                return Err(ConfigurationError::HarborPath(placement.path));
            }
        }

        debug!(count = harbors.len(), "Harbors docked");
        self.harbors = harbors;
        Ok(self)
    }

    // ==================== Query Methods ====================

    /// The shared graph this board is built on
    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    /// All tiles in layout order
    pub fn tiles(&self) -> &[ResourceTile] {
        &self.tiles
    }

    pub fn tile(&self, tile: TileId) -> Option<&ResourceTile> {
        self.tiles.get(tile)
    }

    /// All location ids
    pub fn locations(&self) -> Range<LocationId> {
        self.topology.locations()
    }

    /// All paths, sorted
    pub fn paths(&self) -> &[Path] {
        self.topology.paths()
    }

    /// Locations one path away from `location`
    pub fn neighbors(&self, location: LocationId) -> &[LocationId] {
        self.topology.neighbors(location)
    }

    /// Colony at a location, `None` if the location does not exist
    pub fn colony_at(&self, location: LocationId) -> Option<Colony> {
        self.colonies.get(location).copied()
    }

    /// Road on a path, `None` if the path does not exist
    pub fn road_at(&self, path: &Path) -> Option<Road> {
        self.topology.path_index(path).map(|i| self.roads[i])
    }

    fn owner_at(&self, location: LocationId) -> Option<PlayerId> {
        self.colony_at(location).and_then(|c| c.owner())
    }

    pub fn is_settled(&self, location: LocationId) -> bool {
        self.owner_at(location).is_some()
    }

    pub fn is_paved(&self, path: &Path) -> bool {
        self.road_at(path).is_some_and(|r| r != Road::Unpaved)
    }

    pub fn is_paved_by(&self, player: PlayerId, path: &Path) -> bool {
        self.road_at(path) == Some(Road::Paved(player))
    }

    /// Check if a location satisfies the distance rule (no adjacent colonies)
    pub fn satisfies_distance_rule(&self, location: LocationId) -> bool {
        self.neighbors(location)
            .iter()
            .all(|&neighbor| !self.is_settled(neighbor))
    }

    /// All unoccupied locations
    pub fn settleable_locations(&self) -> BTreeSet<LocationId> {
        self.locations()
            .filter(|&location| !self.is_settled(location))
            .collect()
    }

    /// Unoccupied locations satisfying the distance rule, with no road
    /// requirement (initial placement)
    pub fn setup_locations(&self) -> BTreeSet<LocationId> {
        self.locations()
            .filter(|&location| !self.is_settled(location) && self.satisfies_distance_rule(location))
            .collect()
    }

    /// Locations where `player` may build a settlement during normal play.
    ///
    /// A location qualifies when it is unoccupied, satisfies the distance rule,
    /// and one of the player's roads ends there while being connected to
    /// another of the player's roads or colonies.
    pub fn settleable_locations_for(&self, player: PlayerId) -> BTreeSet<LocationId> {
        self.locations()
            .filter(|&location| {
                !self.is_settled(location)
                    && self.satisfies_distance_rule(location)
                    && self.is_reached_by_network(player, location)
            })
            .collect()
    }

    /// Check if one of `player`'s roads ends at `location` and continues into
    /// the rest of the player's network
    fn is_reached_by_network(&self, player: PlayerId, location: LocationId) -> bool {
        self.topology
            .incident_paths(location)
            .filter(|road| self.is_paved_by(player, road))
            .any(|road| {
                road.endpoints().into_iter().any(|end| {
                    self.owner_at(end) == Some(player)
                        || self
                            .topology
                            .incident_paths(end)
                            .any(|other| other != road && self.is_paved_by(player, &other))
                })
            })
    }

    /// Unpaved paths `player` may build a road on.
    ///
    /// A path qualifies when one endpoint holds the player's colony, or is
    /// unoccupied and already touched by one of the player's roads. Another
    /// player's colony blocks extension through its location.
    pub fn pavable_paths_for(&self, player: PlayerId) -> BTreeSet<Path> {
        self.topology
            .paths()
            .iter()
            .zip(&self.roads)
            .filter(|(_, road)| **road == Road::Unpaved)
            .map(|(path, _)| *path)
            .filter(|path| {
                path.endpoints()
                    .into_iter()
                    .any(|end| self.is_network_end(player, end))
            })
            .collect()
    }

    /// Check if `player`'s network can be extended from `location`
    fn is_network_end(&self, player: PlayerId, location: LocationId) -> bool {
        match self.owner_at(location) {
            Some(owner) => owner == player,
            None => self
                .topology
                .incident_paths(location)
                .any(|path| self.is_paved_by(player, &path)),
        }
    }

    /// Locations holding a settlement or city of `player`
    pub fn settled_locations_for(&self, player: PlayerId) -> BTreeSet<LocationId> {
        self.colonies
            .iter()
            .enumerate()
            .filter(|(_, colony)| colony.owner() == Some(player))
            .map(|(location, _)| location)
            .collect()
    }

    /// Paths holding a road of `player`
    pub fn paved_paths_for(&self, player: PlayerId) -> BTreeSet<Path> {
        self.topology
            .paths()
            .iter()
            .zip(&self.roads)
            .filter(|(_, road)| **road == Road::Paved(player))
            .map(|(path, _)| *path)
            .collect()
    }

    /// Tiles having `location` as a corner
    pub fn surrounding_tiles(&self, location: LocationId) -> Vec<&ResourceTile> {
        self.topology
            .location_tiles(location)
            .iter()
            .map(|&tile| &self.tiles[tile])
            .collect()
    }

    /// Dice numbers of the producing tiles around `location`
    pub fn surrounding_dice_values(&self, location: LocationId) -> Vec<u8> {
        dice_values(self.surrounding_tiles(location))
    }

    /// Tiles having `path` as a side
    pub fn path_tiles(&self, path: &Path) -> Vec<&ResourceTile> {
        self.topology
            .path_tiles(path)
            .iter()
            .map(|&tile| &self.tiles[tile])
            .collect()
    }

    /// Dice numbers of the producing tiles along `path`
    pub fn path_dice_values(&self, path: &Path) -> Vec<u8> {
        dice_values(self.path_tiles(path))
    }

    /// Get the burglar's current tile
    pub fn burglar_tile(&self) -> TileId {
        self.burglar
    }

    /// Players with a colony on a corner of `tile` (burglar victims)
    pub fn players_on_tile(&self, tile: TileId) -> BTreeSet<PlayerId> {
        self.topology
            .tile_corners(tile)
            .into_iter()
            .flatten()
            .filter_map(|&corner| self.owner_at(corner))
            .collect()
    }

    /// Calculate resources produced for a dice roll
    pub fn resources_for_roll(&self, roll: u8) -> HashMap<PlayerId, HashMap<Resource, u32>> {
        let mut distribution: HashMap<PlayerId, HashMap<Resource, u32>> = HashMap::new();

        for (id, tile) in self.tiles.iter().enumerate() {
            if !tile.produces_on(roll) {
                continue;
            }
            let Some(resource) = tile.resource() else {
                continue;
            };
            let Some(corners) = self.topology.tile_corners(id) else {
                continue;
            };

            for &corner in corners {
                let colony = self.colonies[corner];
                if let Some(owner) = colony.owner() {
                    *distribution
                        .entry(owner)
                        .or_default()
                        .entry(resource)
                        .or_insert(0) += colony.resource_multiplier();
                }
            }
        }

        distribution
    }

    /// Harbors on this board, sorted by path
    pub fn harbors(&self) -> &[HarborPlacement] {
        &self.harbors
    }

    /// Harbor docked on `path`, if any
    pub fn harbor_at(&self, path: &Path) -> Option<Harbor> {
        self.harbors
            .iter()
            .find(|placement| placement.path == *path)
            .map(|placement| placement.harbor)
    }

    /// Harbors reached by one of the player's colonies
    pub fn player_harbors(&self, player: PlayerId) -> Vec<Harbor> {
        self.harbors
            .iter()
            .filter(|placement| {
                placement
                    .path
                    .endpoints()
                    .into_iter()
                    .any(|location| self.owner_at(location) == Some(player))
            })
            .map(|placement| placement.harbor)
            .collect()
    }

    pub fn is_player_on_harbor(&self, player: PlayerId, harbor: Harbor) -> bool {
        self.player_harbors(player).contains(&harbor)
    }

    // ==================== Mutation Methods ====================

    /// Build a settlement, or upgrade the player's settlement to a city.
    ///
    /// Distance and road rules are not checked here; callers validate with
    /// [`Board::settleable_locations_for`] or [`Board::setup_locations`].
    pub fn settle(
        &mut self,
        player: PlayerId,
        location: LocationId,
        kind: ColonyKind,
    ) -> Result<(), IllegalMoveError> {
        let current = self
            .colony_at(location)
            .ok_or_else(|| rejected(IllegalMoveError::UnknownLocation(location)))?;

        let next = match (kind, current) {
            (ColonyKind::Settlement, Colony::Unsettled) => Colony::Settlement(player),
            (ColonyKind::Settlement, _) => {
                return Err(rejected(IllegalMoveError::LocationOccupied(location)))
            }
            (ColonyKind::City, Colony::Settlement(owner)) if owner == player => Colony::City(player),
            (ColonyKind::City, _) => {
                return Err(rejected(IllegalMoveError::NotOwnSettlement { player, location }))
            }
        };

        self.colonies[location] = next;
        debug!(player, location, ?kind, "Location settled");
        Ok(())
    }

    /// Build a road. Connectivity is the caller's responsibility
    /// (see [`Board::pavable_paths_for`]).
    pub fn pave(&mut self, player: PlayerId, path: Path) -> Result<(), IllegalMoveError> {
        let index = self
            .topology
            .path_index(&path)
            .ok_or_else(|| rejected(IllegalMoveError::UnknownPath(path)))?;
        if self.roads[index] != Road::Unpaved {
            return Err(rejected(IllegalMoveError::PathPaved(path)));
        }

        self.roads[index] = Road::Paved(player);
        debug!(player, %path, "Path paved");
        Ok(())
    }

    /// Move the burglar to a new tile
    pub fn move_burglar(&mut self, tile: TileId) -> Result<(), IllegalMoveError> {
        if tile >= self.tiles.len() {
            return Err(rejected(IllegalMoveError::UnknownTile(tile)));
        }
        if tile == self.burglar {
            return Err(rejected(IllegalMoveError::BurglarAlreadyThere(tile)));
        }

        self.tiles[self.burglar].has_burglar = false;
        self.tiles[tile].has_burglar = true;
        self.burglar = tile;
        debug!(tile, "Burglar moved");
        Ok(())
    }

    // ==================== Snapshots ====================

    /// Capture tiles and ownership in a serializable form
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tiles: self.tiles.clone(),
            colonies: self
                .colonies
                .iter()
                .enumerate()
                .filter(|(_, colony)| **colony != Colony::Unsettled)
                .map(|(location, colony)| (location, *colony))
                .collect(),
            roads: self
                .topology
                .paths()
                .iter()
                .zip(&self.roads)
                .filter_map(|(path, road)| road.owner().map(|player| (*path, player)))
                .collect(),
            harbors: self.harbors.clone(),
        }
    }

    /// Rebuild a standard board from a snapshot
    pub fn restore(snapshot: &BoardSnapshot) -> Result<Self, ConfigurationError> {
        let topology = Arc::new(Topology::standard()?);
        check_tiles(&topology, &snapshot.tiles)?;

        let burglars: Vec<TileId> = snapshot
            .tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.has_burglar)
            .map(|(id, _)| id)
            .collect();
        let [burglar] = burglars[..] else {
            return Err(ConfigurationError::SnapshotMismatch);
        };

        let mut board = Self::assemble(topology, snapshot.tiles.clone(), burglar);
        for &(location, colony) in &snapshot.colonies {
            let slot = board
                .colonies
                .get_mut(location)
                .ok_or(ConfigurationError::SnapshotMismatch)?;
            *slot = colony;
        }
        for &(path, player) in &snapshot.roads {
            let index = board
                .topology
                .path_index(&path)
                .ok_or(ConfigurationError::SnapshotMismatch)?;
            board.roads[index] = Road::Paved(player);
        }
        board.with_harbors(snapshot.harbors.clone())
    }
}

/// Serializable board state: tiles plus every occupied location and path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub tiles: Vec<ResourceTile>,
    pub colonies: Vec<(LocationId, Colony)>,
    pub roads: Vec<(Path, PlayerId)>,
    #[serde(default)]
    pub harbors: Vec<HarborPlacement>,
}

impl BoardSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Check the layout fits `topology` and return the desert's tile id
fn check_tiles(
    topology: &Topology,
    tiles: &[ResourceTile],
) -> Result<TileId, ConfigurationError> {
    if tiles.len() != topology.tile_count() {
        return Err(ConfigurationError::TileCount {
            expected: topology.tile_count(),
            found: tiles.len(),
        });
    }
    let deserts: Vec<TileId> = tiles
        .iter()
        .enumerate()
        .filter(|(_, tile)| tile.is_desert())
        .map(|(id, _)| id)
        .collect();
    match deserts[..] {
        [desert] => Ok(desert),
        _ => Err(ConfigurationError::DesertCount {
            found: deserts.len(),
        }),
    }
}

fn dice_values(tiles: Vec<&ResourceTile>) -> Vec<u8> {
    tiles
        .into_iter()
        .filter(|tile| !tile.is_desert())
        .map(|tile| tile.dice_number)
        .collect()
}

fn rejected(err: IllegalMoveError) -> IllegalMoveError {
    warn!(%err, "Rejected board mutation");
    err
}
