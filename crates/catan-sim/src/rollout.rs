//! Random-placement rollouts.
//!
//! Every rollout works on its own clone of the board, the way a tree search
//! explores hypothetical futures without touching the real game.

use anyhow::{Context, Result};
use catan_board::{Board, Colony, ColonyKind, PlayerId};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use tracing::debug;

/// Rolls of two dice that land on `number`, out of 36
fn dice_weight(number: u8) -> f64 {
    match number {
        2..=12 => (6 - (7 - number as i32).abs()) as f64 / 36.0,
        _ => 0.0,
    }
}

/// Expected resources per roll from a player's colonies
pub fn expected_yield(board: &Board, player: PlayerId) -> f64 {
    board
        .settled_locations_for(player)
        .into_iter()
        .map(|location| {
            let multiplier = board
                .colony_at(location)
                .map_or(0, |c| c.resource_multiplier()) as f64;
            let weight: f64 = board
                .surrounding_dice_values(location)
                .into_iter()
                .map(dice_weight)
                .sum();
            multiplier * weight
        })
        .sum()
}

/// Place two settlements and two roads per player, in snake order
pub fn setup(board: &mut Board, players: u8, rng: &mut StdRng) -> Result<()> {
    let order: Vec<PlayerId> = (0..players).chain((0..players).rev()).collect();
    for player in order {
        let location = board
            .setup_locations()
            .into_iter()
            .choose(rng)
            .context("No room left for a setup settlement")?;
        board.settle(player, location, ColonyKind::Settlement)?;

        let road = board
            .pavable_paths_for(player)
            .into_iter()
            .filter(|path| path.touches(location))
            .choose(rng)
            .context("Setup settlement has no free path")?;
        board.pave(player, road)?;
        debug!(player, location, %road, "Setup placement");
    }
    Ok(())
}

/// Per-player result of one rollout
#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    pub player: PlayerId,
    pub settlements: usize,
    pub cities: usize,
    pub roads: usize,
    pub expected_yield: f64,
}

/// Play `rounds` rounds of random building on a clone of `board`
pub fn run(board: &Board, players: u8, rounds: usize, rng: &mut StdRng) -> Result<Vec<Tally>> {
    let mut board = board.clone();

    for round in 1..=rounds {
        for player in 0..players {
            if let Some(path) = board.pavable_paths_for(player).into_iter().choose(rng) {
                board.pave(player, path)?;
            }
            if let Some(location) = board.settleable_locations_for(player).into_iter().choose(rng) {
                board.settle(player, location, ColonyKind::Settlement)?;
            }
            if round % 3 == 0 {
                let upgrade = board
                    .settled_locations_for(player)
                    .into_iter()
                    .filter(|&l| board.colony_at(l) == Some(Colony::Settlement(player)))
                    .choose(rng);
                if let Some(location) = upgrade {
                    board.settle(player, location, ColonyKind::City)?;
                }
            }
        }
    }

    Ok((0..players).map(|player| tally(&board, player)).collect())
}

fn tally(board: &Board, player: PlayerId) -> Tally {
    let colonies: Vec<Colony> = board
        .settled_locations_for(player)
        .into_iter()
        .filter_map(|location| board.colony_at(location))
        .collect();

    Tally {
        player,
        settlements: colonies
            .iter()
            .filter(|c| matches!(c, Colony::Settlement(_)))
            .count(),
        cities: colonies
            .iter()
            .filter(|c| matches!(c, Colony::City(_)))
            .count(),
        roads: board.paved_paths_for(player).len(),
        expected_yield: expected_yield(board, player),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_dice_weights() {
        assert_eq!(dice_weight(7), 6.0 / 36.0);
        assert_eq!(dice_weight(2), 1.0 / 36.0);
        assert_eq!(dice_weight(12), 1.0 / 36.0);
        assert_eq!(dice_weight(0), 0.0);
    }

    #[test]
    fn test_setup_places_two_of_each() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut board = Board::with_rng(&mut rng).unwrap();
        setup(&mut board, 4, &mut rng).unwrap();

        for player in 0..4 {
            assert_eq!(board.settled_locations_for(player).len(), 2);
            assert_eq!(board.paved_paths_for(player).len(), 2);
            assert!(expected_yield(&board, player) > 0.0);
        }
    }

    #[test]
    fn test_rollout_leaves_board_untouched() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut board = Board::with_rng(&mut rng).unwrap();
        setup(&mut board, 3, &mut rng).unwrap();
        let before = board.snapshot();

        let tallies = run(&board, 3, 12, &mut rng).unwrap();
        assert_eq!(board.snapshot(), before);
        assert_eq!(tallies.len(), 3);
        for tally in &tallies {
            assert!(tally.roads >= 2);
            assert!(tally.settlements + tally.cities >= 2);
        }
    }

    #[test]
    fn test_rollouts_are_reproducible() {
        let play = || {
            let mut rng = StdRng::seed_from_u64(9);
            let mut board = Board::with_rng(&mut rng).unwrap();
            setup(&mut board, 2, &mut rng).unwrap();
            run(&board, 2, 8, &mut rng).unwrap()
        };
        assert_eq!(play(), play());
    }
}
