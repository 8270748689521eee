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
//! Board configuration: dimension and the fleet that must be placed.

use std::collections::HashSet;

use thiserror::Error;

/// A ship size together with how many ships of that size must be placed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShipSpec {
    /// Number of decks in each ship.
    pub size: usize,
    /// Number of ships of this size.
    pub quantity: usize,
}

impl ShipSpec {
    /// Construct a [`ShipSpec`] for `quantity` ships of `size` decks.
    pub fn new(size: usize, quantity: usize) -> Self {
        Self { size, quantity }
    }

    /// Total number of decks needed for this entry.
    pub fn decks(&self) -> usize {
        self.size * self.quantity
    }
}

impl From<(usize, usize)> for ShipSpec {
    /// Construct a [`ShipSpec`] from a `(size, quantity)` pair.
    fn from((size, quantity): (usize, usize)) -> Self {
        Self::new(size, quantity)
    }
}

/// Reason a configuration cannot be used to build a board.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum InvalidConfig {
    /// The board dimension was zero.
    #[error("board dimension must be nonzero")]
    EmptyBoard,
    /// No ships were specified.
    #[error("at least one ship must be specified")]
    NoShips,
    /// The same ship size appeared more than once.
    #[error("ship size {0} specified more than once")]
    DuplicateSize(usize),
    /// A ship size of zero was specified.
    #[error("ship size must be nonzero")]
    ZeroSize,
    /// A quantity of zero was specified for the given size.
    #[error("quantity for ship size {0} must be nonzero")]
    ZeroQuantity(usize),
    /// A ship is longer than the board is wide.
    #[error("ship size {size} does not fit on a {board}x{board} board")]
    ShipTooLong { size: usize, board: usize },
    /// The fleet would cover the whole board or more.
    #[error("{decks} decks do not leave open water on a board of {cells} cells")]
    TooManyDecks { decks: usize, cells: usize },
}

/// Dimension of the board and the fleet that has to be placed on it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BoardConfig {
    /// The board is `size` x `size` cells.
    pub size: usize,
    /// Fleet specification. Sizes must be unique.
    pub ships: Vec<ShipSpec>,
}

impl BoardConfig {
    /// Construct a config from a dimension and a list of `(size, quantity)` entries.
    pub fn new<I, S>(size: usize, ships: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ShipSpec>,
    {
        Self {
            size,
            ships: ships.into_iter().map(Into::into).collect(),
        }
    }

    /// Total number of cells on the board.
    pub fn cells(&self) -> usize {
        self.size * self.size
    }

    /// Total number of decks the fleet occupies.
    pub fn total_decks(&self) -> usize {
        self.ships.iter().map(ShipSpec::decks).sum()
    }

    /// Check that a board can be built from this config.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.size == 0 {
            return Err(InvalidConfig::EmptyBoard);
        }
        if self.ships.is_empty() {
            return Err(InvalidConfig::NoShips);
        }
        let mut seen = HashSet::with_capacity(self.ships.len());
        for ship in &self.ships {
            if ship.size == 0 {
                return Err(InvalidConfig::ZeroSize);
            }
            if ship.quantity == 0 {
                return Err(InvalidConfig::ZeroQuantity(ship.size));
            }
            if !seen.insert(ship.size) {
                return Err(InvalidConfig::DuplicateSize(ship.size));
            }
            if ship.size > self.size {
                return Err(InvalidConfig::ShipTooLong {
                    size: ship.size,
                    board: self.size,
                });
            }
        }
        let cells = self.size.checked_mul(self.size);
        let decks = self
            .ships
            .iter()
            .try_fold(0usize, |acc, ship| {
                ship.size
                    .checked_mul(ship.quantity)
                    .and_then(|d| acc.checked_add(d))
            });
        match (decks, cells) {
            (Some(decks), Some(cells)) if decks < cells => Ok(()),
            (decks, cells) => Err(InvalidConfig::TooManyDecks {
                decks: decks.unwrap_or(usize::max_value()),
                cells: cells.unwrap_or(usize::max_value()),
            }),
        }
    }
}

impl Default for BoardConfig {
    /// A 5x5 board with two single-deck ships and one each of two, three and four decks.
    fn default() -> Self {
        Self::new(5, vec![(1, 2), (2, 1), (3, 1), (4, 1)])
    }
}
