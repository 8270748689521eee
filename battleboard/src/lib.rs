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
//! Placement and validation engine for a square-grid game of Battleship.
//!
//! A [`Board`] owns one [`Tile`] per cell and lets a player assemble their fleet one
//! deck at a time. Every placement is checked against the ship geometry (ships are
//! straight, contiguous runs that never branch) and against the [`ShipTracker`], which
//! matches every ship group to a slot of at least its size in the [`BoardConfig`] fleet.
//! Rejected placements leave the board exactly as it was.
//!
//! ```
//! use battleboard::{Board, BoardConfig, BoardState, HitOutcome};
//!
//! let mut board = Board::new(&BoardConfig::default()).unwrap();
//! assert_eq!(board.state(), BoardState::Empty);
//!
//! board.add(0).unwrap();
//! board.add(5).unwrap();
//! assert_eq!(board.state(), BoardState::Partial);
//! assert_eq!(board.group_of(0), vec![0, 5]);
//!
//! assert_eq!(board.fire(5).unwrap(), HitOutcome::Hit);
//! assert_eq!(board.fire(5).unwrap(), HitOutcome::AlreadyResolved);
//! ```
//!
//! With the `rng_gen` feature, `random::fill` completes a fleet at
//! random.

pub use crate::{
    board::{
        Axis, Board, BoardEvent, BoardState, Coordinate, Dimensions, HitOutcome, OutOfBounds,
        PlacementError, ShipStatus,
    },
    config::{BoardConfig, InvalidConfig, ShipSpec},
    effects::{Effect, EffectError, EffectSink, Trigger},
    ships::ShipTracker,
    tile::{Tile, TileError, TileEvent, TileState, Transition},
};

#[cfg(feature = "rng_gen")]
pub use crate::random::FillError;

pub mod board;
pub mod config;
pub mod effects;
#[cfg(feature = "rng_gen")]
pub mod random;
pub mod ships;
pub mod tile;
