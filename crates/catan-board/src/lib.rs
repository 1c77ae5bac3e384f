//! Board engine for a hex-grid settlement game.
//!
//! This crate turns a hexagonal layout of resource tiles into a graph of
//! settlement locations (vertices) and road paths (edges), and answers the
//! legality questions a game-state machine or a search algorithm asks about
//! it on every turn.
//!
//! # Architecture
//!
//! The graph is built once from a fixed row template and never changes. It is
//! held behind an `Arc`, so a [`Board`] clone only copies tiles and ownership.
//! Search code explores hypothetical moves on clones and leaves the
//! authoritative board untouched.
//!
//! # Modules
//!
//! - [`tile`]: Resource tiles and harbors
//! - [`layout`]: Seeded shuffling of the standard tiles and harbors
//! - [`topology`]: Location/path graph built from the row template
//! - [`board`]: Legality queries and move application
//! - [`error`]: Construction and mutation errors

pub mod board;
pub mod error;
pub mod layout;
pub mod tile;
pub mod topology;

// Re-export commonly used types
pub use board::{Board, BoardSnapshot, Colony, ColonyKind, HarborPlacement, PlayerId, Road};
pub use error::{ConfigurationError, IllegalMoveError};
pub use layout::{
    generate_layout, place_harbors, shuffle_tiles, standard_harbors, PRODUCING_TILE_COUNT,
    TILE_COUNT,
};
pub use tile::{Harbor, Resource, ResourceTile, TileId, TileType};
pub use topology::{BoardTemplate, LocationId, Path, RowLink, Topology};
