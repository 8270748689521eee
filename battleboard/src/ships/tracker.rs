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
use std::collections::{btree_map::Entry, BTreeMap};

use crate::{
    board::PlacementError,
    config::{InvalidConfig, ShipSpec},
};

/// Inventory of the ship sizes in the fleet and the ship groups currently on the board.
///
/// A set of groups is legal as long as every group can be given its own slot in the
/// fleet that is at least as long as the group. A group shorter than any free slot of its
/// own size may therefore sit in a larger slot while it is still being built. Growing,
/// merging and splitting groups is refused if the resulting set could not be matched,
/// and a refused change leaves the inventory untouched.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShipTracker {
    /// Quantity of each ship size in the fleet.
    spec: BTreeMap<usize, usize>,

    /// Number of ship groups of each size on the board. Sizes with no group are absent.
    placed: BTreeMap<usize, usize>,

    /// Slots left free per size when each group, largest first, takes the smallest free
    /// slot that fits it.
    remaining: BTreeMap<usize, usize>,
}

impl ShipTracker {
    /// Build a tracker from `(size, quantity)` entries. Fails if a size repeats.
    pub fn new<I, S>(ships: I) -> Result<Self, InvalidConfig>
    where
        I: IntoIterator<Item = S>,
        S: Into<ShipSpec>,
    {
        let mut spec = BTreeMap::new();
        for ship in ships {
            let ship = ship.into();
            match spec.entry(ship.size) {
                Entry::Occupied(_) => return Err(InvalidConfig::DuplicateSize(ship.size)),
                Entry::Vacant(entry) => {
                    entry.insert(ship.quantity);
                }
            }
        }
        Ok(Self {
            remaining: spec.clone(),
            placed: BTreeMap::new(),
            spec,
        })
    }

    /// Number of ships of `size` in the fleet.
    pub fn quantity(&self, size: usize) -> usize {
        self.spec.get(&size).copied().unwrap_or(0)
    }

    /// Number of slots of `size` not taken by any group on the board.
    ///
    /// A slot counts as taken while a shorter group occupies it, so this can be zero even
    /// though fewer ships of exactly `size` are on the board than the fleet calls for.
    pub fn remaining(&self, size: usize) -> usize {
        self.remaining.get(&size).copied().unwrap_or(0)
    }

    /// Number of ship groups of exactly `size` currently on the board.
    pub fn placed(&self, size: usize) -> usize {
        self.placed.get(&size).copied().unwrap_or(0)
    }

    /// Number of ships of exactly `size` still needed to complete the fleet.
    pub fn missing(&self, size: usize) -> usize {
        self.quantity(size).saturating_sub(self.placed(size))
    }

    /// Total number of slots not taken by any group.
    pub fn outstanding(&self) -> usize {
        self.remaining.values().sum()
    }

    /// Total number of decks in the complete fleet.
    pub fn total_decks(&self) -> usize {
        self.spec.iter().map(|(size, qty)| size * qty).sum()
    }

    /// Returns true once the groups on the board match the fleet size for size.
    pub fn is_complete(&self) -> bool {
        self.placed
            .iter()
            .eq(self.spec.iter().filter(|&(_, &qty)| qty > 0))
    }

    /// The largest ship size with fewer groups on the board than the fleet calls for.
    pub fn largest_missing(&self) -> Option<usize> {
        self.spec
            .keys()
            .rev()
            .copied()
            .find(|&size| self.missing(size) > 0)
    }

    /// Iterate `(size, remaining)` pairs over the fleet in ascending size order.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (usize, usize)> {
        self.spec.keys().map(move |&size| (size, self.remaining(size)))
    }

    /// Replace the `consumed` groups with one group of `new_size`, as happens when a new
    /// deck joins those groups into one ship.
    ///
    /// Fails if the resulting groups cannot all be matched to slots. On failure nothing
    /// changes.
    pub fn reserve(&mut self, new_size: usize, consumed: &[usize]) -> Result<(), PlacementError> {
        let mut placed = self.placed.clone();
        for &size in consumed {
            Self::drop_group(&mut placed, size);
        }
        *placed.entry(new_size).or_insert(0) += 1;
        self.commit(placed)?;
        tracing::trace!(new_size, ?consumed, "reserved ship");
        Ok(())
    }

    /// Replace a group of `old_size` with the `fragments` left after it lost a deck.
    ///
    /// Every fragment must be matched to a slot of its own, the same as in
    /// [`reserve`](Self::reserve). On failure nothing changes.
    pub fn release(&mut self, old_size: usize, fragments: &[usize]) -> Result<(), PlacementError> {
        let mut placed = self.placed.clone();
        Self::drop_group(&mut placed, old_size);
        for &size in fragments {
            *placed.entry(size).or_insert(0) += 1;
        }
        self.commit(placed)?;
        tracing::trace!(old_size, ?fragments, "released ship");
        Ok(())
    }

    /// Take one group of `size` out of `placed`.
    fn drop_group(placed: &mut BTreeMap<usize, usize>, size: usize) {
        match placed.entry(size) {
            Entry::Occupied(mut entry) => {
                *entry.get_mut() -= 1;
                if *entry.get() == 0 {
                    entry.remove();
                }
            }
            Entry::Vacant(_) => tracing::warn!(size, "dropped a group that was never placed"),
        }
    }

    /// Match `placed` against the fleet and keep it if every group finds a slot.
    fn commit(&mut self, placed: BTreeMap<usize, usize>) -> Result<(), PlacementError> {
        self.remaining = self.assign(&placed)?;
        self.placed = placed;
        Ok(())
    }

    /// Give each group, largest first, the smallest free slot at least as long as it.
    /// Returns the slots left over, or the size of the first group that found none.
    fn assign(
        &self,
        placed: &BTreeMap<usize, usize>,
    ) -> Result<BTreeMap<usize, usize>, PlacementError> {
        let mut free = self.spec.clone();
        for (&size, &count) in placed.iter().rev() {
            for _ in 0..count {
                let slot = free
                    .range_mut(size..)
                    .map(|(_, qty)| qty)
                    .find(|qty| **qty > 0)
                    .ok_or(PlacementError::ShipsExhausted { size })?;
                *slot -= 1;
            }
        }
        Ok(free)
    }
}
