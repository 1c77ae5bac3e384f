//! Random tile layout for the standard board.
//!
//! Resources and dice numbers are shuffled independently and zipped into 18
//! producing tiles. The desert is always appended last, so it occupies the
//! final tile slot of the template.
//!
//! Harbors are placed afterwards on the coast, no two sharing a location.

use crate::board::HarborPlacement;
use crate::error::ConfigurationError;
use crate::tile::{Harbor, Resource, ResourceTile};
use crate::topology::{Path, Topology};
use rand::seq::SliceRandom;
use rand::Rng;

/// Number of producing (non-desert) tiles on the standard board
pub const PRODUCING_TILE_COUNT: usize = 18;

/// Total tiles on the standard board, desert included
pub const TILE_COUNT: usize = PRODUCING_TILE_COUNT + 1;

/// Standard resource distribution: 4 Lumber, 4 Wool, 4 Grain, 3 Brick, 3 Ore
pub fn standard_resources() -> Vec<Resource> {
    let mut resources = Vec::with_capacity(PRODUCING_TILE_COUNT);
    for _ in 0..4 {
        resources.extend([Resource::Lumber, Resource::Wool, Resource::Grain]);
    }
    for _ in 0..3 {
        resources.extend([Resource::Brick, Resource::Ore]);
    }
    resources
}

/// Standard dice numbers: one 2 and one 12, two of each of 3-6 and 8-11
pub fn standard_numbers() -> Vec<u8> {
    let mut numbers = vec![2, 12];
    for _ in 0..2 {
        numbers.extend((3..=11).filter(|n| *n != 7));
    }
    numbers
}

/// Shuffle the standard distribution into a full 19-tile layout.
pub fn generate_layout<R: Rng>(rng: &mut R) -> Result<Vec<ResourceTile>, ConfigurationError> {
    shuffle_tiles(standard_resources(), standard_numbers(), rng)
}

/// Shuffle the given resources and numbers into a layout, desert last.
///
/// Both multisets must hold exactly [`PRODUCING_TILE_COUNT`] entries.
pub fn shuffle_tiles<R: Rng>(
    mut resources: Vec<Resource>,
    mut numbers: Vec<u8>,
    rng: &mut R,
) -> Result<Vec<ResourceTile>, ConfigurationError> {
    if resources.len() != PRODUCING_TILE_COUNT {
        return Err(ConfigurationError::ResourceCount {
            expected: PRODUCING_TILE_COUNT,
            found: resources.len(),
        });
    }
    if numbers.len() != PRODUCING_TILE_COUNT {
        return Err(ConfigurationError::NumberCount {
            expected: PRODUCING_TILE_COUNT,
            found: numbers.len(),
        });
    }

    resources.shuffle(rng);
    numbers.shuffle(rng);

    let mut tiles: Vec<ResourceTile> = resources
        .into_iter()
        .zip(numbers)
        .map(|(resource, number)| ResourceTile::new(resource, number))
        .collect();
    tiles.push(ResourceTile::desert());

    Ok(tiles)
}

/// Standard harbors: 4 generic (3:1) and one 2:1 harbor per resource
pub fn standard_harbors() -> Vec<Harbor> {
    let mut harbors = vec![Harbor::Generic; 4];
    harbors.extend(Resource::ALL.map(Harbor::Specific));
    harbors
}

/// Dock `harbors` on randomly chosen coastal paths of `topology`.
///
/// Coastal paths are taken in shuffled order and skipped when they touch a
/// path already chosen, so every harbor location belongs to one harbor only.
pub fn place_harbors<R: Rng>(
    topology: &Topology,
    mut harbors: Vec<Harbor>,
    rng: &mut R,
) -> Result<Vec<HarborPlacement>, ConfigurationError> {
    let mut coast = topology.coastal_paths();
    coast.shuffle(rng);

    let mut docks: Vec<Path> = Vec::with_capacity(harbors.len());
    for path in coast {
        if docks.len() == harbors.len() {
            break;
        }
        let [a, b] = path.endpoints();
        if !docks.iter().any(|dock| dock.touches(a) || dock.touches(b)) {
            docks.push(path);
        }
    }
    if docks.len() < harbors.len() {
        return Err(ConfigurationError::HarborSpace {
            expected: harbors.len(),
            found: docks.len(),
        });
    }

    harbors.shuffle(rng);
    docks.sort();
    Ok(docks
        .into_iter()
        .zip(harbors)
        .map(|(path, harbor)| HarborPlacement { path, harbor })
        .collect())
}
