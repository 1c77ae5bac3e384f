//! Fixed board graph: settlement locations, road paths and their tiles.
//!
//! The hexagonal layout is flattened into horizontal rows of locations
//! (hexagon corners). Consecutive rows are joined in one of two patterns:
//!
//! ```text
//!   Fan:      O     O           ZigZag:   O      O      O
//!           /   \ /   \                   |      |      |
//!          O     O     O                  O      O      O
//! ```
//!
//! Each tile row spans four location rows: its top corners, its upper side
//! corners, its lower side corners and its bottom corners. Location ids are
//! assigned row by row, left to right, starting at 0 in the top row.

use crate::error::ConfigurationError;
use crate::tile::TileId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use tracing::debug;

/// Settlement location (graph vertex) identifier
pub type LocationId = usize;

/// Road location (graph edge): an unordered pair of locations.
///
/// Always stored with the smaller id first, so `Path::new(11, 10)` and
/// `Path::new(10, 11)` are the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path {
    low: LocationId,
    high: LocationId,
}

impl Path {
    pub fn new(a: LocationId, b: LocationId) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// Both endpoints, smaller id first
    pub fn endpoints(&self) -> [LocationId; 2] {
        [self.low, self.high]
    }

    pub fn touches(&self, location: LocationId) -> bool {
        self.low == location || self.high == location
    }

    /// The endpoint opposite `location`, if `location` is an endpoint
    pub fn other(&self, location: LocationId) -> Option<LocationId> {
        if self.low == location {
            Some(self.high)
        } else if self.high == location {
            Some(self.low)
        } else {
            None
        }
    }
}

impl From<(LocationId, LocationId)> for Path {
    fn from((a, b): (LocationId, LocationId)) -> Self {
        Path::new(a, b)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// How two consecutive location rows are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowLink {
    /// Equal-length rows; each location joins the one directly below it
    /// (the vertical sides of a row of hexagons).
    ZigZag,
    /// Rows differing in length by one; each location of the shorter row
    /// joins the two locations at the same and next offset in the longer row
    /// (the slanted sides of a row of hexagons).
    Fan,
}

/// Row-by-row description of a board's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardTemplate {
    /// Number of locations in each row, top to bottom
    pub location_rows: &'static [usize],
    /// Link between row `i` and row `i + 1`
    pub row_links: &'static [RowLink],
    /// Number of tiles in each tile row, top to bottom.
    /// Tile row `t` has its corners on location rows `2t..=2t + 3`.
    pub tile_rows: &'static [usize],
}

impl BoardTemplate {
    /// The standard 19-tile board: 54 locations, 72 paths.
    pub const STANDARD: BoardTemplate = BoardTemplate {
        location_rows: &[3, 4, 4, 5, 5, 6, 6, 5, 5, 4, 4, 3],
        row_links: &[
            RowLink::Fan,
            RowLink::ZigZag,
            RowLink::Fan,
            RowLink::ZigZag,
            RowLink::Fan,
            RowLink::ZigZag,
            RowLink::Fan,
            RowLink::ZigZag,
            RowLink::Fan,
            RowLink::ZigZag,
            RowLink::Fan,
        ],
        tile_rows: &[3, 4, 5, 4, 3],
    };

    /// Check the template is internally consistent.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let rows = self.location_rows;
        if rows.is_empty() || rows.contains(&0) {
            return Err(ConfigurationError::EmptyTemplate);
        }
        if self.row_links.len() + 1 != rows.len() {
            return Err(ConfigurationError::LinkCount {
                rows: rows.len(),
                links: self.row_links.len(),
            });
        }

        for (link, kind) in self.row_links.iter().enumerate() {
            let (upper, lower) = (rows[link], rows[link + 1]);
            let fits = match kind {
                RowLink::ZigZag => upper == lower,
                RowLink::Fan => upper.abs_diff(lower) == 1,
            };
            if !fits {
                return Err(ConfigurationError::LinkMismatch { link, upper, lower });
            }
        }

        if self.tile_rows.len() * 2 + 2 != rows.len() {
            return Err(ConfigurationError::TileRowCount {
                tile_rows: self.tile_rows.len(),
                location_rows: rows.len(),
            });
        }

        for (tile_row, &tiles) in self.tile_rows.iter().enumerate() {
            let first = tile_row * 2;
            for (row, allowed) in [
                (first, [tiles, tiles + 2]),
                (first + 1, [tiles + 1, tiles + 1]),
                (first + 2, [tiles + 1, tiles + 1]),
                (first + 3, [tiles, tiles + 2]),
            ] {
                if tiles == 0 || !allowed.contains(&rows[row]) {
                    return Err(ConfigurationError::TileRowMismatch {
                        tile_row,
                        tiles,
                        row,
                        size: rows[row],
                    });
                }
            }
        }

        Ok(())
    }
}

/// The immutable graph shared by every board built from the same template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    rows: Vec<Range<LocationId>>,
    neighbors: Vec<Vec<LocationId>>,
    location_tiles: Vec<Vec<TileId>>,
    paths: Vec<Path>,
    path_index: HashMap<Path, usize>,
    path_tiles: Vec<Vec<TileId>>,
    tile_corners: Vec<[LocationId; 6]>,
}

impl Topology {
    /// Build the standard board graph
    pub fn standard() -> Result<Self, ConfigurationError> {
        Self::from_template(&BoardTemplate::STANDARD)
    }

    /// Build the graph for a template.
    ///
    /// The template is validated before anything is allocated.
    pub fn from_template(template: &BoardTemplate) -> Result<Self, ConfigurationError> {
        template.validate()?;

        let rows = row_ranges(template.location_rows);
        let location_count = rows.last().map_or(0, |r| r.end);

        let mut paths = Vec::new();
        for (link, kind) in template.row_links.iter().enumerate() {
            let upper = rows[link].clone();
            let lower = rows[link + 1].clone();
            match kind {
                RowLink::ZigZag => link_zigzag(&mut paths, upper, lower),
                RowLink::Fan => link_fan(&mut paths, upper, lower),
            }
        }
        paths.sort();
        paths.dedup();

        let mut neighbors = vec![Vec::new(); location_count];
        for path in &paths {
            let [a, b] = path.endpoints();
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
        for list in &mut neighbors {
            list.sort_unstable();
        }

        let tile_corners = corner_table(template.tile_rows, &rows);
        let mut location_tiles = vec![Vec::new(); location_count];
        for (tile, corners) in tile_corners.iter().enumerate() {
            for &corner in corners {
                location_tiles[corner].push(tile);
            }
        }

        // A path borders exactly the tiles both of its endpoints touch
        let path_tiles: Vec<Vec<TileId>> = paths
            .iter()
            .map(|path| {
                let [a, b] = path.endpoints();
                location_tiles[a]
                    .iter()
                    .filter(|tile| location_tiles[b].contains(*tile))
                    .copied()
                    .collect::<Vec<TileId>>()
            })
            .collect();

        let path_index = paths.iter().enumerate().map(|(i, p)| (*p, i)).collect();

        debug!(
            locations = location_count,
            paths = paths.len(),
            tiles = tile_corners.len(),
            "Built board topology"
        );

        Ok(Self {
            rows,
            neighbors,
            location_tiles,
            paths,
            path_index,
            path_tiles,
            tile_corners,
        })
    }

    pub fn location_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn tile_count(&self) -> usize {
        self.tile_corners.len()
    }

    /// Location id ranges of each row, top to bottom
    pub fn rows(&self) -> &[Range<LocationId>] {
        &self.rows
    }

    pub fn locations(&self) -> Range<LocationId> {
        0..self.location_count()
    }

    /// All paths, sorted
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Index of a path in [`Topology::paths`], if it exists
    pub fn path_index(&self, path: &Path) -> Option<usize> {
        self.path_index.get(path).copied()
    }

    /// Locations one path away from `location`
    pub fn neighbors(&self, location: LocationId) -> &[LocationId] {
        self.neighbors
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Paths having `location` as an endpoint
    pub fn incident_paths(&self, location: LocationId) -> impl Iterator<Item = Path> + '_ {
        self.neighbors(location)
            .iter()
            .map(move |&other| Path::new(location, other))
    }

    /// Tiles having `location` as one of their corners
    pub fn location_tiles(&self, location: LocationId) -> &[TileId] {
        self.location_tiles
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Tiles having `path` as one of their sides
    pub fn path_tiles(&self, path: &Path) -> &[TileId] {
        self.path_index(path)
            .map(|i| self.path_tiles[i].as_slice())
            .unwrap_or(&[])
    }

    /// Paths on the board's outline, bordering exactly one tile
    pub fn coastal_paths(&self) -> Vec<Path> {
        self.paths
            .iter()
            .zip(&self.path_tiles)
            .filter(|(_, tiles)| tiles.len() == 1)
            .map(|(path, _)| *path)
            .collect()
    }

    /// Corners of a tile, clockwise from the top
    pub fn tile_corners(&self, tile: TileId) -> Option<&[LocationId; 6]> {
        self.tile_corners.get(tile)
    }

    /// Sides of a tile, clockwise from the top-right side
    pub fn tile_sides(&self, tile: TileId) -> Vec<Path> {
        self.tile_corners(tile)
            .map(|corners| {
                (0..6)
                    .map(|i| Path::new(corners[i], corners[(i + 1) % 6]))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn row_ranges(sizes: &[usize]) -> Vec<Range<LocationId>> {
    let mut start = 0;
    sizes
        .iter()
        .map(|&size| {
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

fn link_zigzag(paths: &mut Vec<Path>, upper: Range<LocationId>, lower: Range<LocationId>) {
    paths.extend(upper.zip(lower).map(Path::from));
}

fn link_fan(paths: &mut Vec<Path>, upper: Range<LocationId>, lower: Range<LocationId>) {
    let (short, long) = if upper.len() < lower.len() {
        (upper, lower)
    } else {
        (lower, upper)
    };
    for (offset, location) in short.enumerate() {
        paths.push(Path::new(location, long.start + offset));
        paths.push(Path::new(location, long.start + offset + 1));
    }
}

/// Corners of every tile, clockwise from the top:
/// top, upper-right, lower-right, bottom, lower-left, upper-left.
fn corner_table(tile_rows: &[usize], rows: &[Range<LocationId>]) -> Vec<[LocationId; 6]> {
    let mut corners = Vec::with_capacity(tile_rows.iter().sum());
    for (tile_row, &count) in tile_rows.iter().enumerate() {
        let top = &rows[tile_row * 2];
        let upper = &rows[tile_row * 2 + 1];
        let lower = &rows[tile_row * 2 + 2];
        let bottom = &rows[tile_row * 2 + 3];
        // Top and bottom rows are either exactly as wide as the tile row or
        // overhang it by one location on each side
        let top_start = top.start + (top.len() - count) / 2;
        let bottom_start = bottom.start + (bottom.len() - count) / 2;

        for j in 0..count {
            corners.push([
                top_start + j,
                upper.start + j + 1,
                lower.start + j + 1,
                bottom_start + j,
                lower.start + j,
                upper.start + j,
            ]);
        }
    }
    corners
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn standard() -> Topology {
        Topology::standard().unwrap()
    }

    #[test]
    fn test_standard_counts() {
        let topology = standard();
        assert_eq!(topology.location_count(), 54);
        assert_eq!(topology.path_count(), 72);
        assert_eq!(topology.tile_count(), 19);
    }

    #[test]
    fn test_rows_cover_all_locations() {
        let topology = standard();
        let sizes: Vec<usize> = topology.rows().iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![3, 4, 4, 5, 5, 6, 6, 5, 5, 4, 4, 3]);
        assert_eq!(topology.rows()[5], 21..27);
        assert_eq!(topology.rows()[11], 51..54);
    }

    #[test]
    fn test_path_is_unordered() {
        assert_eq!(Path::new(11, 10), Path::new(10, 11));
        assert_eq!(Path::new(3, 8).other(8), Some(3));
        assert_eq!(Path::new(3, 8).other(4), None);
        assert_eq!(Path::new(9, 4).to_string(), "(4, 9)");
    }

    #[test]
    fn test_known_adjacency() {
        let topology = standard();
        // Top-left corner of the map
        assert_eq!(topology.neighbors(0), &[3, 4]);
        // Row 2 ends at 10: one vertical link up, a fan down
        assert_eq!(topology.neighbors(10), &[6, 14, 15]);
        // Middle rows are joined vertically
        assert_eq!(topology.neighbors(21), &[16, 27]);
        assert_eq!(topology.neighbors(53), &[49, 50]);
        assert!(topology.path_index(&Path::new(10, 11)).is_none());
    }

    #[test]
    fn test_location_degrees_and_tiles() {
        let topology = standard();
        for location in topology.locations() {
            let degree = topology.neighbors(location).len();
            assert!(
                (2..=3).contains(&degree),
                "Location {} has degree {}",
                location,
                degree
            );

            let tiles = topology.location_tiles(location).len();
            assert!(
                (1..=3).contains(&tiles),
                "Location {} touches {} tiles",
                location,
                tiles
            );
        }
        assert_eq!(topology.location_tiles(10), &[2, 6]);
        assert_eq!(topology.location_tiles(14), &[2, 5, 6]);
    }

    #[test]
    fn test_every_tile_has_six_corners_and_sides() {
        let topology = standard();
        for tile in 0..topology.tile_count() {
            let corners: HashSet<_> = topology.tile_corners(tile).unwrap().iter().collect();
            assert_eq!(corners.len(), 6);

            let sides = topology.tile_sides(tile);
            for side in &sides {
                assert!(
                    topology.path_index(side).is_some(),
                    "Side {} of tile {} is not a path",
                    side,
                    tile
                );
                assert!(topology.path_tiles(side).contains(&tile));
            }
        }
    }

    #[test]
    fn test_path_tiles_are_endpoint_intersection() {
        let topology = standard();
        for path in topology.paths() {
            let [a, b] = path.endpoints();
            let expected: Vec<TileId> = topology
                .location_tiles(a)
                .iter()
                .filter(|t| topology.location_tiles(b).contains(*t))
                .copied()
                .collect();
            assert_eq!(topology.path_tiles(path), expected.as_slice());
            assert!(topology.path_tiles(path).len() <= 2);
        }
        assert_eq!(topology.path_tiles(&Path::new(10, 14)), &[2, 6]);
        assert_eq!(topology.path_tiles(&Path::new(0, 3)), &[0]);
    }

    #[test]
    fn test_every_path_borders_a_tile_on_standard_board() {
        let topology = standard();
        let sides: HashSet<Path> = (0..topology.tile_count())
            .flat_map(|t| topology.tile_sides(t))
            .collect();
        assert_eq!(sides.len(), topology.path_count());
    }

    #[test]
    fn test_coastal_paths_form_a_ring() {
        let topology = standard();
        let coastal = topology.coastal_paths();
        assert_eq!(coastal.len(), 30);
        assert!(coastal.contains(&Path::new(0, 3)));
        assert!(!coastal.contains(&Path::new(10, 14)));

        // Every location on the outline touches exactly two coastal paths
        let mut degree: HashMap<LocationId, usize> = HashMap::new();
        for path in &coastal {
            for end in path.endpoints() {
                *degree.entry(end).or_insert(0) += 1;
            }
        }
        assert_eq!(degree.len(), 30);
        assert!(degree.values().all(|&d| d == 2));
    }

    #[test]
    fn test_out_of_range_queries_are_empty() {
        let topology = standard();
        assert!(topology.neighbors(54).is_empty());
        assert!(topology.location_tiles(100).is_empty());
        assert!(topology.tile_corners(19).is_none());
        assert!(topology.tile_sides(19).is_empty());
    }

    #[test]
    fn test_link_count_mismatch() {
        let template = BoardTemplate {
            location_rows: &[3, 4, 4, 3],
            row_links: &[RowLink::Fan, RowLink::ZigZag],
            tile_rows: &[3],
        };
        assert_eq!(
            Topology::from_template(&template),
            Err(ConfigurationError::LinkCount { rows: 4, links: 2 })
        );
    }

    #[test]
    fn test_link_size_mismatch() {
        let template = BoardTemplate {
            location_rows: &[3, 4, 4, 3],
            row_links: &[RowLink::ZigZag, RowLink::ZigZag, RowLink::Fan],
            tile_rows: &[3],
        };
        assert_eq!(
            Topology::from_template(&template),
            Err(ConfigurationError::LinkMismatch {
                link: 0,
                upper: 3,
                lower: 4
            })
        );
    }

    #[test]
    fn test_tile_row_mismatch() {
        let template = BoardTemplate {
            location_rows: &[3, 4, 4, 3],
            row_links: &[RowLink::Fan, RowLink::ZigZag, RowLink::Fan],
            tile_rows: &[2],
        };
        assert!(matches!(
            Topology::from_template(&template),
            Err(ConfigurationError::TileRowMismatch { tile_row: 0, .. })
        ));
    }

    #[test]
    fn test_empty_template() {
        let template = BoardTemplate {
            location_rows: &[],
            row_links: &[],
            tile_rows: &[],
        };
        assert_eq!(
            Topology::from_template(&template),
            Err(ConfigurationError::EmptyTemplate)
        );
    }

    #[test]
    fn test_single_tile_row_template() {
        // One row of three hexagons
        let template = BoardTemplate {
            location_rows: &[3, 4, 4, 3],
            row_links: &[RowLink::Fan, RowLink::ZigZag, RowLink::Fan],
            tile_rows: &[3],
        };
        let topology = Topology::from_template(&template).unwrap();
        assert_eq!(topology.location_count(), 14);
        assert_eq!(topology.path_count(), 16);
        assert_eq!(topology.tile_count(), 3);
        assert_eq!(topology.tile_corners(0), Some(&[0, 4, 8, 11, 7, 3]));
    }
}
