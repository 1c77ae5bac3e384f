//! Error types for board construction and board mutation.

use crate::board::PlayerId;
use crate::tile::TileId;
use crate::topology::{LocationId, Path};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural errors raised while building a board.
///
/// These are always fatal to the construction attempt: no partial board is
/// ever returned alongside one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ConfigurationError {
    #[error("Expected {expected} tiles, got {found}")]
    TileCount { expected: usize, found: usize },

    #[error("Expected exactly one desert tile, got {found}")]
    DesertCount { found: usize },

    #[error("Expected {expected} resources to shuffle, got {found}")]
    ResourceCount { expected: usize, found: usize },

    #[error("Expected {expected} dice numbers to shuffle, got {found}")]
    NumberCount { expected: usize, found: usize },

    #[error("Board template has an empty location row")]
    EmptyTemplate,

    #[error("Board template has {rows} location rows but {links} row links")]
    LinkCount { rows: usize, links: usize },

    #[error("Row link {link} cannot join rows of size {upper} and {lower}")]
    LinkMismatch {
        link: usize,
        upper: usize,
        lower: usize,
    },

    #[error("{tile_rows} tile rows do not fit {location_rows} location rows")]
    TileRowCount {
        tile_rows: usize,
        location_rows: usize,
    },

    #[error("Tile row {tile_row} has {tiles} tiles but location row {row} has {size} locations")]
    TileRowMismatch {
        tile_row: usize,
        tiles: usize,
        row: usize,
        size: usize,
    },

    #[error("Found room for {found} of {expected} harbors on the coast")]
    HarborSpace { expected: usize, found: usize },

    #[error("Harbor path {0} is not a free coastal path")]
    HarborPath(Path),

    #[error("Snapshot does not match the board template")]
    SnapshotMismatch,
}

/// Mutation requested against a target that does not allow it.
///
/// Callers are expected to validate moves through the query methods first;
/// seeing one of these means the caller skipped that step.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IllegalMoveError {
    #[error("No location {0} on this board")]
    UnknownLocation(LocationId),

    #[error("No path {0} on this board")]
    UnknownPath(Path),

    #[error("No tile {0} on this board")]
    UnknownTile(TileId),

    #[error("Location {0} is already occupied")]
    LocationOccupied(LocationId),

    #[error("Player {player} has no settlement at location {location} to upgrade")]
    NotOwnSettlement {
        player: PlayerId,
        location: LocationId,
    },

    #[error("Path {0} is already paved")]
    PathPaved(Path),

    #[error("The burglar is already on tile {0}")]
    BurglarAlreadyThere(TileId),
}
