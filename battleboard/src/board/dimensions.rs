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
//! Square grid arithmetic.
//!
//! Cells are addressed by their linear index `row * size + col`. Neighbors are the four
//! orthogonal cells; the grid never wraps, so the last cell of a row and the first cell
//! of the next row are not neighbors even though their indexes are consecutive.

use enumflags2::BitFlags;

use crate::board::{Coordinate, OutOfBounds};

/// Direction along which two neighboring cells are adjacent.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Axis {
    /// Same row, adjacent columns.
    Horizontal = 0b01,
    /// Same column, adjacent rows.
    Vertical = 0b10,
}

/// Dimensions of a square `size` x `size` board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Dimensions {
    /// Number of rows and of columns.
    size: usize,
}

impl Dimensions {
    /// Create [`Dimensions`] for a `size` x `size` board.
    /// Panics if `size` is 0 or `size * size` exceeds `usize::max_value()`.
    pub fn new(size: usize) -> Self {
        match Self::try_new(size) {
            Some(dim) => dim,
            None if size == 0 => panic!("Dimensions must be nonzero"),
            None => panic!(
                "Dimensions too large: {} * {} > {}",
                size,
                size,
                usize::max_value()
            ),
        }
    }

    /// Create [`Dimensions`] for a `size` x `size` board. Returns `None` if `size` is 0 or
    /// `size * size` exceeds `usize::max_value()`.
    pub fn try_new(size: usize) -> Option<Self> {
        if size == 0 {
            None
        } else {
            size.checked_mul(size).map(|_| Self { size })
        }
    }

    /// Number of rows, which is also the number of columns.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    pub fn total_size(&self) -> usize {
        self.size * self.size
    }

    /// Check that `idx` addresses a cell of this board.
    pub fn check(&self, idx: usize) -> Result<usize, OutOfBounds> {
        if idx < self.total_size() {
            Ok(idx)
        } else {
            Err(OutOfBounds::new(idx, self.total_size()))
        }
    }

    /// Convert a coordinate to a linear index. Returns `None` if the coordinate is out of
    /// bounds.
    pub fn try_linearize(&self, coord: &Coordinate) -> Option<usize> {
        if coord.row < self.size && coord.col < self.size {
            Some(coord.row * self.size + coord.col)
        } else {
            None
        }
    }

    /// Convert a linear index back into a [`Coordinate`].
    pub fn un_linearize(&self, idx: usize) -> Coordinate {
        Coordinate::new(idx / self.size, idx % self.size)
    }

    /// Iterate the in-bounds orthogonal neighbors of `idx` together with the axis each
    /// one lies on.
    pub fn neighbors(&self, idx: usize) -> Neighbors {
        Neighbors {
            size: self.size,
            coord: self.un_linearize(idx),
            // Out of bounds cells have no neighbors, skip straight to the end.
            step: if idx < self.total_size() {
                NeighborStep::Up
            } else {
                NeighborStep::End
            },
        }
    }

    /// Return true if the two coordinates are orthogonal neighbors.
    pub fn is_neighbor(&self, c1: &Coordinate, c2: &Coordinate) -> bool {
        self.axis_between(c1, c2).is_some()
    }

    /// Axis along which `c1` and `c2` are adjacent, or `None` if they aren't neighbors.
    pub fn axis_between(&self, c1: &Coordinate, c2: &Coordinate) -> Option<Axis> {
        let drow = diff(c1.row, c2.row);
        let dcol = diff(c1.col, c2.col);
        match (drow, dcol) {
            (0, 1) => Some(Axis::Horizontal),
            (1, 0) => Some(Axis::Vertical),
            _ => None,
        }
    }

    /// Returns true if the 3 coordinates lie on one row or one column.
    pub fn is_colinear(&self, c1: &Coordinate, c2: &Coordinate, c3: &Coordinate) -> bool {
        let difrow = c1.row != c2.row || c2.row != c3.row;
        let difcol = c1.col != c2.col || c2.col != c3.col;
        // Allowed to differ in only one direction.
        !(difrow && difcol)
    }

    /// Get an iterator over rows of this grid. Each row is an iterator over the linear
    /// indexes of that row.
    pub fn iter_rows(&self) -> impl Iterator<Item = impl Iterator<Item = usize>> {
        let size = self.size;
        (0..size).map(move |row| (row * size..(row + 1) * size))
    }
}

fn diff(a: usize, b: usize) -> usize {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Iterator over the neighbors of a cell, yielding `(index, axis)` pairs.
#[derive(Debug, Clone)]
pub struct Neighbors {
    size: usize,
    coord: Coordinate,
    step: NeighborStep,
}

#[derive(Debug, Copy, Clone)]
enum NeighborStep {
    Up,
    Down,
    Left,
    Right,
    End,
}

impl Iterator for Neighbors {
    type Item = (usize, Axis);

    fn next(&mut self) -> Option<Self::Item> {
        let Coordinate { row, col } = self.coord;
        loop {
            match self.step {
                NeighborStep::Up => {
                    self.step = NeighborStep::Down;
                    if let Some(row) = row.checked_sub(1) {
                        return Some((row * self.size + col, Axis::Vertical));
                    }
                }
                NeighborStep::Down => {
                    self.step = NeighborStep::Left;
                    if row + 1 < self.size {
                        return Some(((row + 1) * self.size + col, Axis::Vertical));
                    }
                }
                NeighborStep::Left => {
                    self.step = NeighborStep::Right;
                    if let Some(col) = col.checked_sub(1) {
                        return Some((row * self.size + col, Axis::Horizontal));
                    }
                }
                NeighborStep::Right => {
                    self.step = NeighborStep::End;
                    if col + 1 < self.size {
                        return Some((row * self.size + col + 1, Axis::Horizontal));
                    }
                }
                NeighborStep::End => return None,
            }
        }
    }
}
