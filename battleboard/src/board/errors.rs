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
//! Errors used by the [`Board`][crate::Board].

use thiserror::Error;

/// Error returned when an index does not address a cell of the board.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("cell {index} is out of bounds for a board of {cells} cells")]
pub struct OutOfBounds {
    /// The index that was requested.
    index: usize,
    /// Number of cells on the board.
    cells: usize,
}

impl OutOfBounds {
    /// Construct an [`OutOfBounds`] for the given index and board size.
    pub(crate) fn new(index: usize, cells: usize) -> Self {
        Self { index, cells }
    }

    /// The index that was requested.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of cells on the board.
    pub fn cells(&self) -> usize {
        self.cells
    }
}

/// Reason why a deck could not be added to or removed from the board.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum PlacementError {
    /// The cell is not on the board.
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),
    /// A deck on this board has been hit, so the fleet can no longer change.
    #[error("the board is locked once a ship has been hit")]
    Locked,
    /// The cell already holds a deck.
    #[error("the cell is already occupied")]
    AlreadyOccupied,
    /// The cell holds no deck.
    #[error("the cell is already empty")]
    AlreadyEmpty,
    /// The resulting ship would not be a straight, unbranched run of decks.
    #[error("ships must be straight lines of decks")]
    IllegalShape,
    /// The resulting groups cannot each be given a slot in the fleet at least as long as
    /// the group.
    #[error("no free slot for a ship of size {size}")]
    ShipsExhausted {
        /// Size of the first group, largest first, left without a slot.
        size: usize,
    },
}
