// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Random completion of a fleet.

use rand::Rng;
use thiserror::Error;

use crate::board::{Axis, Board, PlacementError};

/// Number of positions tried for each ship before giving up.
pub const MAX_ATTEMPTS: usize = 100;

/// Reason a board could not be filled.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum FillError {
    /// A deck has been hit, so nothing can be placed.
    #[error("placement is locked")]
    Locked,
    /// The groups already on the board leave no slot for a ship of this size, wherever it
    /// goes.
    #[error("no slot left for a ship of size {size}")]
    Exhausted { size: usize },
    /// No free position was found for a ship.
    #[error("no room for a ship of size {size} after {attempts} attempts")]
    NoRoom { size: usize, attempts: usize },
}

/// Place every missing ship of `board` at a random position, largest first.
///
/// Decks already on the board are kept. If a ship cannot be placed the ships placed so
/// far stay on the board.
pub fn fill<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Result<(), FillError> {
    while let Some(size) = board.tracker().largest_missing() {
        if board.locked() {
            return Err(FillError::Locked);
        }
        place_random(board, size, rng)?;
    }
    Ok(())
}

/// Try random straight positions for a ship of `size` until one is accepted.
fn place_random<R: Rng + ?Sized>(
    board: &mut Board,
    size: usize,
    rng: &mut R,
) -> Result<(), FillError> {
    let width = board.dimensions().size();
    let span = match width.checked_sub(size) {
        Some(slack) => slack + 1,
        None => return Err(FillError::NoRoom { size, attempts: 0 }),
    };
    for attempt in 1..=MAX_ATTEMPTS {
        let axis = if rng.gen() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        let (row, col, step) = match axis {
            Axis::Horizontal => (rng.gen_range(0, width), rng.gen_range(0, span), 1),
            Axis::Vertical => (rng.gen_range(0, span), rng.gen_range(0, width), width),
        };
        let start = row * width + col;
        let cells: Vec<usize> = (0..size).map(|offset| start + offset * step).collect();
        match board.place_ship(&cells) {
            Ok(()) => {
                tracing::debug!(size, attempt, ?cells, "placed random ship");
                return Ok(());
            }
            Err(PlacementError::Locked) => return Err(FillError::Locked),
            Err(PlacementError::ShipsExhausted { .. }) => {
                return Err(FillError::Exhausted { size })
            }
            Err(err) => tracing::trace!(size, attempt, %err, "random position rejected"),
        }
    }
    Err(FillError::NoRoom {
        size,
        attempts: MAX_ATTEMPTS,
    })
}
