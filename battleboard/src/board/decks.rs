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
//! The set of occupied cells and the ship groups it forms.
//!
//! Edges between decks are never stored: two decks are connected exactly when they are
//! orthogonal neighbors on the grid, so groups are found by walking neighbors.

use std::collections::BTreeSet;

use crate::board::{Axis, Dimensions};

/// Occupied cells of a board.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub(super) struct Decks {
    cells: BTreeSet<usize>,
}

impl Decks {
    pub(super) fn contains(&self, idx: usize) -> bool {
        self.cells.contains(&idx)
    }

    pub(super) fn insert(&mut self, idx: usize) -> bool {
        self.cells.insert(idx)
    }

    pub(super) fn remove(&mut self, idx: usize) -> bool {
        self.cells.remove(&idx)
    }

    pub(super) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(super) fn iter(&self) -> impl '_ + Iterator<Item = usize> {
        self.cells.iter().copied()
    }

    /// Occupied neighbors of `idx` and the axis each lies on.
    pub(super) fn adjacent<'a>(
        &'a self,
        idx: usize,
        dim: &Dimensions,
    ) -> impl 'a + Iterator<Item = (usize, Axis)> {
        dim.neighbors(idx)
            .filter(move |&(neighbor, _)| self.contains(neighbor))
    }

    /// Sorted group containing `start`, walking only occupied cells other than `skip`.
    fn component(&self, start: usize, dim: &Dimensions, skip: Option<usize>) -> Vec<usize> {
        let mut visited = BTreeSet::new();
        let mut frontier = vec![start];
        visited.insert(start);
        while let Some(idx) = frontier.pop() {
            for (neighbor, _) in self.adjacent(idx, dim) {
                if Some(neighbor) != skip && visited.insert(neighbor) {
                    frontier.push(neighbor);
                }
            }
        }
        visited.into_iter().collect()
    }

    /// Sorted group containing `idx`, or an empty vec if `idx` is not occupied.
    pub(super) fn group(&self, idx: usize, dim: &Dimensions) -> Vec<usize> {
        if self.contains(idx) {
            self.component(idx, dim, None)
        } else {
            Vec::new()
        }
    }

    /// Distinct groups reachable from the occupied neighbors of `idx`, ignoring `idx`
    /// itself. For an empty `idx` these are the groups a new deck there would join; for
    /// an occupied one they are the fragments left if it were removed.
    pub(super) fn groups_around(&self, idx: usize, dim: &Dimensions) -> Vec<Vec<usize>> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (neighbor, _) in self.adjacent(idx, dim) {
            if groups.iter().any(|group| group.binary_search(&neighbor).is_ok()) {
                continue;
            }
            groups.push(self.component(neighbor, dim, Some(idx)));
        }
        groups
    }

    /// All groups on the board, ordered by their lowest cell.
    pub(super) fn groups(&self, dim: &Dimensions) -> Vec<Vec<usize>> {
        let mut seen = BTreeSet::new();
        let mut groups = Vec::new();
        for idx in self.iter() {
            if seen.contains(&idx) {
                continue;
            }
            let group = self.component(idx, dim, None);
            seen.extend(group.iter().copied());
            groups.push(group);
        }
        groups
    }
}
