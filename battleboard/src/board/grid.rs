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
//! Storage for the tiles of a board.

use std::ops::{Index, IndexMut};

use crate::{
    board::Dimensions,
    effects::Trigger,
    tile::{Tile, TileState},
};

/// Tiles of a board, addressed by linear index.
#[derive(Debug, Clone)]
pub(super) struct Grid {
    /// Dimensions of this board.
    pub(super) dim: Dimensions,
    /// Tiles that make up this board.
    pub(super) tiles: Box<[Tile]>,
}

impl Grid {
    /// Build a grid of sea tiles, binding each one to the trigger returned by `bind`.
    pub(super) fn new<F>(dim: Dimensions, mut bind: F) -> Self
    where
        F: FnMut(usize) -> Option<Trigger>,
    {
        let tiles = (0..dim.total_size()).map(|i| Tile::new(bind(i))).collect();
        Self { dim, tiles }
    }

    /// Get a reference to the tile at the given index.
    pub(super) fn get(&self, idx: usize) -> Option<&Tile> {
        self.tiles.get(idx)
    }

    /// State of every tile, in index order.
    pub(super) fn states(&self) -> Vec<TileState> {
        self.tiles.iter().map(Tile::state).collect()
    }

    /// Iterate `(index, tile)` pairs.
    pub(super) fn iter(&self) -> impl Iterator<Item = (usize, &Tile)> {
        self.tiles.iter().enumerate()
    }
}

impl Index<usize> for Grid {
    type Output = Tile;

    fn index(&self, idx: usize) -> &Self::Output {
        self.tiles.get(idx).expect("cell out of bounds")
    }
}

impl IndexMut<usize> for Grid {
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        self.tiles.get_mut(idx).expect("cell out of bounds")
    }
}
