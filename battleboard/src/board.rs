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
//! Types that make up the game board.

use std::{collections::BTreeSet, fmt, iter};

use enumflags2::BitFlags;

use crate::{
    config::{BoardConfig, InvalidConfig},
    effects::{EffectSink, Trigger},
    ships::{is_straight_run, ShipTracker},
    tile::{Tile, TileError, TileState, Transition},
};

use self::{decks::Decks, grid::Grid};
pub use self::{
    coordinate::Coordinate,
    dimensions::{Axis, Dimensions, Neighbors},
    errors::{OutOfBounds, PlacementError},
};

mod coordinate;
mod decks;
mod dimensions;
mod errors;
mod grid;

/// Placement progress of a board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BoardState {
    /// No decks placed. Initial state.
    Empty,
    /// Some decks placed, but the fleet does not match the config yet.
    Partial,
    /// Every ship in the config has been placed.
    Complete,
}

impl BoardState {
    /// Name of the state, for display.
    pub fn name(self) -> &'static str {
        match self {
            BoardState::Empty => "empty",
            BoardState::Partial => "partial",
            BoardState::Complete => "complete",
        }
    }

    /// State reached from this one after `event`.
    pub fn next(self, event: BoardEvent) -> BoardState {
        match (self, event) {
            (BoardState::Empty, BoardEvent::Added { complete })
            | (BoardState::Partial, BoardEvent::Added { complete }) => {
                if complete {
                    BoardState::Complete
                } else {
                    BoardState::Partial
                }
            }
            // Every slot of a complete fleet holds a ship of its own size, so no group can
            // grow and no new one fits.
            (BoardState::Complete, BoardEvent::Added { .. }) => BoardState::Complete,
            (BoardState::Partial, BoardEvent::Removed { empty })
            | (BoardState::Complete, BoardEvent::Removed { empty }) => {
                if empty {
                    BoardState::Empty
                } else {
                    BoardState::Partial
                }
            }
            // Nothing to remove from an empty board.
            (BoardState::Empty, BoardEvent::Removed { .. }) => BoardState::Empty,
        }
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Events driving the [`BoardState`] machine. Both carry the result of the guard
/// evaluated after the placement was committed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BoardEvent {
    /// A deck was added; `complete` is whether the groups now match the fleet.
    Added { complete: bool },
    /// A deck was removed; `empty` is whether no decks remain.
    Removed { empty: bool },
}

/// Result of a shot on the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum HitOutcome {
    /// The shot found open water.
    Miss,
    /// The shot hit a deck.
    Hit,
    /// The tile had already been shot; nothing changed.
    AlreadyResolved,
}

/// Damage status of a ship group.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShipStatus {
    /// No deck of the ship has been hit.
    Intact,
    /// Some, but not all, decks have been hit.
    Damaged,
    /// Every deck has been hit.
    Sunk,
}

/// A single player's board: the tiles, the decks placed on them, and the inventory of
/// ships still to place.
pub struct Board {
    /// Tiles of the board.
    grid: Grid,

    /// Occupied cells. Matches the tiles in the deck state until the first hit, after
    /// which it also covers the hit tiles.
    decks: Decks,

    /// Fleet inventory and the groups placed against it.
    tracker: ShipTracker,

    /// Placement progress.
    state: BoardState,

    /// Cells whose deck has been hit.
    hits: BTreeSet<usize>,

    /// Receiver for presentation effects.
    effects: Option<Box<dyn EffectSink>>,
}

impl Board {
    /// Construct an empty board for the given config.
    pub fn new(config: &BoardConfig) -> Result<Self, InvalidConfig> {
        Self::build(config, None, |_| None)
    }

    /// Construct an empty board that reports tile transitions to `sink`. Every tile gets a
    /// trigger whose raw value is its index.
    pub fn with_effects<S>(config: &BoardConfig, sink: S) -> Result<Self, InvalidConfig>
    where
        S: EffectSink + 'static,
    {
        Self::build(config, Some(Box::new(sink)), |idx| Some(Trigger::new(idx)))
    }

    fn build<F>(
        config: &BoardConfig,
        effects: Option<Box<dyn EffectSink>>,
        bind: F,
    ) -> Result<Self, InvalidConfig>
    where
        F: FnMut(usize) -> Option<Trigger>,
    {
        config.validate()?;
        let dim = Dimensions::try_new(config.size).ok_or(InvalidConfig::EmptyBoard)?;
        let tracker = ShipTracker::new(config.ships.iter().copied())?;
        tracing::debug!(size = config.size, decks = tracker.total_decks(), "new board");
        Ok(Self {
            grid: Grid::new(dim, bind),
            decks: Decks::default(),
            tracker,
            state: BoardState::Empty,
            hits: BTreeSet::new(),
            effects,
        })
    }

    /// Get the [`Dimensions`] of this [`Board`].
    pub fn dimensions(&self) -> &Dimensions {
        &self.grid.dim
    }

    /// Current placement state.
    pub fn state(&self) -> BoardState {
        self.state
    }

    /// The fleet inventory.
    pub fn tracker(&self) -> &ShipTracker {
        &self.tracker
    }

    /// Get the tile at the given index. Returns `None` if out of bounds.
    pub fn tile(&self, idx: usize) -> Option<&Tile> {
        self.grid.get(idx)
    }

    /// State of the tile at the given index. Returns `None` if out of bounds.
    pub fn tile_state(&self, idx: usize) -> Option<TileState> {
        self.tile(idx).map(Tile::state)
    }

    /// State of every tile, in index order.
    pub fn snapshot(&self) -> Vec<TileState> {
        self.grid.states()
    }

    /// Occupied cells in ascending order.
    pub fn decks(&self) -> impl '_ + Iterator<Item = usize> {
        self.decks.iter()
    }

    /// Number of occupied cells.
    pub fn deck_count(&self) -> usize {
        self.decks.len()
    }

    /// Cells whose deck has been hit, in ascending order.
    pub fn hits(&self) -> impl '_ + Iterator<Item = usize> {
        self.hits.iter().copied()
    }

    /// Whether placement is closed because a deck has been hit.
    ///
    /// Misses do not lock the board. A deck may later be placed on a missed tile, which
    /// turns it back into a deck.
    pub fn locked(&self) -> bool {
        !self.hits.is_empty()
    }

    /// Sorted cells of the ship group containing `idx`. Empty if `idx` holds no deck.
    pub fn group_of(&self, idx: usize) -> Vec<usize> {
        self.decks.group(idx, &self.grid.dim)
    }

    /// Every ship group on the board, ordered by lowest cell.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        self.decks.groups(&self.grid.dim)
    }

    /// Place a deck on the tile at `idx`.
    ///
    /// The deck joins every group it touches. The joined group must be a straight run,
    /// and every group on the board must still fit its own slot in the fleet at least as
    /// long as itself; otherwise the board is left unchanged.
    pub fn add(&mut self, idx: usize) -> Result<(), PlacementError> {
        let result = self.try_add(idx);
        match result {
            Ok(()) => tracing::debug!(idx, state = %self.state, "added deck"),
            Err(ref err) => tracing::debug!(idx, %err, "rejected deck"),
        }
        result
    }

    fn try_add(&mut self, idx: usize) -> Result<(), PlacementError> {
        let idx = self.grid.dim.check(idx)?;
        self.check_unlocked()?;
        if self.decks.contains(idx) {
            return Err(PlacementError::AlreadyOccupied);
        }

        let mut axes = BitFlags::<Axis>::empty();
        for (_, axis) in self.decks.adjacent(idx, &self.grid.dim) {
            axes.insert(axis);
        }
        if axes == BitFlags::all() {
            return Err(PlacementError::IllegalShape);
        }

        let merged = self.decks.groups_around(idx, &self.grid.dim);
        let mut candidate: Vec<usize> = merged
            .iter()
            .flatten()
            .copied()
            .chain(iter::once(idx))
            .collect();
        candidate.sort_unstable();
        if !is_straight_run(&candidate, &self.grid.dim) {
            return Err(PlacementError::IllegalShape);
        }

        let consumed: Vec<usize> = merged.iter().map(Vec::len).collect();
        self.tracker.reserve(candidate.len(), &consumed)?;

        // Both checks passed; nothing below can fail.
        self.decks.insert(idx);
        let transition = self.grid[idx].on();
        self.notify(transition);
        self.state = self.state.next(BoardEvent::Added {
            complete: self.tracker.is_complete(),
        });
        Ok(())
    }

    /// Remove the deck from the tile at `idx`.
    ///
    /// Every fragment left behind must still fit a slot of its own in the fleet, the same
    /// as for [`add`](Self::add); otherwise the board is left unchanged.
    pub fn remove(&mut self, idx: usize) -> Result<(), PlacementError> {
        let result = self.try_remove(idx);
        match result {
            Ok(()) => tracing::debug!(idx, state = %self.state, "removed deck"),
            Err(ref err) => tracing::debug!(idx, %err, "rejected removal"),
        }
        result
    }

    fn try_remove(&mut self, idx: usize) -> Result<(), PlacementError> {
        let idx = self.grid.dim.check(idx)?;
        self.check_unlocked()?;
        if !self.decks.contains(idx) {
            return Err(PlacementError::AlreadyEmpty);
        }

        let old_size = self.decks.group(idx, &self.grid.dim).len();
        let fragments: Vec<usize> = self
            .decks
            .groups_around(idx, &self.grid.dim)
            .iter()
            .map(Vec::len)
            .collect();
        self.tracker.release(old_size, &fragments)?;

        self.decks.remove(idx);
        let transition = self.grid[idx].off();
        self.notify(transition);
        self.state = self.state.next(BoardEvent::Removed {
            empty: self.decks.is_empty(),
        });
        Ok(())
    }

    /// Shoot at the tile at `idx`. The first hit locks placement.
    pub fn fire(&mut self, idx: usize) -> Result<HitOutcome, OutOfBounds> {
        let idx = self.grid.dim.check(idx)?;
        let outcome = match self.grid[idx].fire() {
            Err(TileError::AlreadyResolved(_)) => HitOutcome::AlreadyResolved,
            Ok(transition) => {
                let outcome = if transition.to == TileState::Hit {
                    self.hits.insert(idx);
                    HitOutcome::Hit
                } else {
                    HitOutcome::Miss
                };
                self.notify(transition);
                outcome
            }
        };
        tracing::debug!(idx, ?outcome, "fired");
        Ok(outcome)
    }

    /// Damage status of the ship group containing `idx`, or `None` if `idx` holds no deck.
    pub fn ship_status(&self, idx: usize) -> Option<ShipStatus> {
        let group = self.group_of(idx);
        if group.is_empty() {
            return None;
        }
        let hit = group.iter().filter(|cell| self.hits.contains(cell)).count();
        Some(if hit == 0 {
            ShipStatus::Intact
        } else if hit == group.len() {
            ShipStatus::Sunk
        } else {
            ShipStatus::Damaged
        })
    }

    /// Returns true if the board has decks and every one of them has been hit.
    pub fn defeated(&self) -> bool {
        !self.decks.is_empty() && self.decks.iter().all(|idx| self.hits.contains(&idx))
    }

    /// Bring the board in line with a full on/off layout, as sent by a control surface
    /// that shows the whole grid. Cells missing from `layout` count as off.
    ///
    /// Decks that are off in `layout` are removed first, then decks that are on are added.
    /// A ship that disappears entirely is cleared in one step, and a new ship that does
    /// not touch any existing deck is placed in one step, largest first. Everything else
    /// goes one cell at a time, repeating while a pass makes progress.
    ///
    /// Returns the cells that could not be brought in line, with the reason.
    pub fn apply_layout(&mut self, layout: &[bool]) -> Vec<(usize, PlacementError)> {
        let wanted = |idx: usize| layout.get(idx).copied().unwrap_or(false);

        let mut groups = self.groups();
        groups.sort_by_key(Vec::len);
        let mut pending = Vec::new();
        for group in groups {
            let dropped: Vec<usize> = group.iter().copied().filter(|&idx| !wanted(idx)).collect();
            if dropped.is_empty()
                || (dropped.len() == group.len() && self.remove_ship(group[0]).is_ok())
            {
                continue;
            }
            // Shrink from the far end.
            pending.extend(dropped.into_iter().rev());
        }
        let mut rejected = self.settle(pending, Self::remove);

        let mut target = Decks::default();
        for (idx, _) in layout.iter().enumerate().filter(|&(_, &on)| on) {
            target.insert(idx);
        }
        let mut ships = target.groups(&self.grid.dim);
        ships.sort_by(|a, b| b.len().cmp(&a.len()));
        let mut pending = Vec::new();
        for ship in ships {
            let missing: Vec<usize> = ship
                .iter()
                .copied()
                .filter(|&idx| !self.decks.contains(idx))
                .collect();
            if missing.is_empty()
                || (missing.len() == ship.len() && self.place_ship(&ship).is_ok())
            {
                continue;
            }
            pending.extend(missing);
        }
        rejected.extend(self.settle(pending, Self::add));
        rejected
    }

    /// Apply `op` to every cell in `pending` until a full pass makes no progress.
    fn settle<F>(&mut self, mut pending: Vec<usize>, mut op: F) -> Vec<(usize, PlacementError)>
    where
        F: FnMut(&mut Self, usize) -> Result<(), PlacementError>,
    {
        loop {
            let mut rejected = Vec::new();
            for &idx in &pending {
                if let Err(err) = op(self, idx) {
                    rejected.push((idx, err));
                }
            }
            if rejected.len() == pending.len() {
                return rejected;
            }
            pending = rejected.into_iter().map(|(idx, _)| idx).collect();
        }
    }

    /// Place a whole ship on `cells` in one step.
    ///
    /// The cells must be empty, must form a straight run and must not touch any existing
    /// deck. The ship then needs a free slot of at least its size, like any group built
    /// with [`add`](Self::add).
    pub fn place_ship(&mut self, cells: &[usize]) -> Result<(), PlacementError> {
        let mut cells = cells.to_vec();
        cells.sort_unstable();
        let result = self.try_place_ship(&cells);
        match result {
            Ok(()) => tracing::debug!(?cells, state = %self.state, "placed ship"),
            Err(ref err) => tracing::debug!(?cells, %err, "rejected ship"),
        }
        result
    }

    fn try_place_ship(&mut self, cells: &[usize]) -> Result<(), PlacementError> {
        self.check_unlocked()?;
        for &idx in cells {
            self.grid.dim.check(idx)?;
            if self.decks.contains(idx) {
                return Err(PlacementError::AlreadyOccupied);
            }
            if self.decks.adjacent(idx, &self.grid.dim).next().is_some() {
                return Err(PlacementError::IllegalShape);
            }
        }
        if !is_straight_run(cells, &self.grid.dim) {
            return Err(PlacementError::IllegalShape);
        }
        self.tracker.reserve(cells.len(), &[])?;

        for &idx in cells {
            self.decks.insert(idx);
            let transition = self.grid[idx].on();
            self.notify(transition);
        }
        self.state = self.state.next(BoardEvent::Added {
            complete: self.tracker.is_complete(),
        });
        Ok(())
    }

    /// Remove the whole ship containing `idx` in one step, freeing its slot in the fleet.
    pub fn remove_ship(&mut self, idx: usize) -> Result<(), PlacementError> {
        let result = self.try_remove_ship(idx);
        match result {
            Ok(()) => tracing::debug!(idx, state = %self.state, "removed ship"),
            Err(ref err) => tracing::debug!(idx, %err, "rejected ship removal"),
        }
        result
    }

    fn try_remove_ship(&mut self, idx: usize) -> Result<(), PlacementError> {
        let idx = self.grid.dim.check(idx)?;
        self.check_unlocked()?;
        let cells = self.decks.group(idx, &self.grid.dim);
        if cells.is_empty() {
            return Err(PlacementError::AlreadyEmpty);
        }
        self.tracker.release(cells.len(), &[])?;

        for idx in cells {
            self.decks.remove(idx);
            let transition = self.grid[idx].off();
            self.notify(transition);
        }
        self.state = self.state.next(BoardEvent::Removed {
            empty: self.decks.is_empty(),
        });
        Ok(())
    }

    /// Rebind the trigger of the tile at `idx`, returning the previous one.
    pub fn bind_trigger(
        &mut self,
        idx: usize,
        trigger: Option<Trigger>,
    ) -> Result<Option<Trigger>, OutOfBounds> {
        let idx = self.grid.dim.check(idx)?;
        Ok(self.grid[idx].bind(trigger))
    }

    /// Stop the presentation of every deck and hit on the board, as at the end of a game.
    /// Tile states are left alone.
    pub fn silence(&mut self) {
        let sink = match self.effects.as_mut() {
            Some(sink) => sink,
            None => return,
        };
        for (idx, tile) in self.grid.iter() {
            match (tile.state(), tile.trigger()) {
                (TileState::Deck, Some(trigger)) | (TileState::Hit, Some(trigger)) => {
                    if let Err(err) = sink.deck_stop(trigger) {
                        tracing::warn!(idx, %trigger, %err, "dropped effect");
                    }
                }
                _ => {}
            }
        }
    }

    fn check_unlocked(&self) -> Result<(), PlacementError> {
        if self.locked() {
            Err(PlacementError::Locked)
        } else {
            Ok(())
        }
    }

    /// Hand the effect of a committed transition to the sink. Failures are only logged.
    fn notify(&mut self, transition: Transition) {
        if let (Some((effect, trigger)), Some(sink)) = (transition.effect, self.effects.as_mut())
        {
            if let Err(err) = sink.dispatch(effect, trigger) {
                tracing::warn!(?effect, %trigger, %err, "dropped effect");
            }
        }
    }
}

impl fmt::Display for Board {
    /// Render the board one row per line, framed, using the tile symbols.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let edge = format!("|{}|", "-".repeat(self.grid.dim.size() * 2 + 1));
        writeln!(f, "{}", edge)?;
        for row in self.grid.dim.iter_rows() {
            f.write_str("|")?;
            for idx in row {
                write!(f, " {}", self.grid[idx])?;
            }
            writeln!(f, " |")?;
        }
        f.write_str(&edge)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Board")
            .field("dim", &self.grid.dim)
            .field("state", &self.state)
            .field("decks", &self.decks)
            .field("tracker", &self.tracker)
            .field("hits", &self.hits)
            .field("effects", &self.effects.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{tests::Recorder, Effect};

    fn classic() -> Board {
        Board::new(&BoardConfig::default()).unwrap()
    }

    fn place(board: &mut Board, cells: &[usize]) {
        for &cell in cells {
            board.add(cell).unwrap();
        }
    }

    #[test]
    fn new_board_is_empty_sea() {
        let board = classic();
        assert_eq!(board.state(), BoardState::Empty);
        assert_eq!(board.snapshot(), vec![TileState::Sea; 25]);
        assert_eq!(board.tile_state(25), None);
        assert!(!board.locked());
    }

    #[test]
    fn invalid_config_fails_construction() {
        let config = BoardConfig::new(5, vec![(2, 1), (2, 1)]);
        assert_eq!(
            Board::new(&config).unwrap_err(),
            InvalidConfig::DuplicateSize(2)
        );
    }

    #[test]
    fn board_state_transitions() {
        use BoardEvent::*;
        use BoardState::*;
        assert_eq!(Empty.next(Added { complete: false }), Partial);
        assert_eq!(Partial.next(Added { complete: true }), Complete);
        assert_eq!(Complete.next(Removed { empty: false }), Partial);
        assert_eq!(Partial.next(Removed { empty: true }), Empty);
        assert_eq!(Empty.next(Removed { empty: true }), Empty);
    }

    #[test]
    fn guards_reject_without_change() {
        let mut board = classic();
        board.add(3).unwrap();
        assert_eq!(board.add(3), Err(PlacementError::AlreadyOccupied));
        assert_eq!(board.remove(4), Err(PlacementError::AlreadyEmpty));
        assert!(matches!(
            board.add(25),
            Err(PlacementError::OutOfBounds(_))
        ));
        assert_eq!(board.decks().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn branch_is_rejected() {
        let mut board = classic();
        place(&mut board, &[0, 1, 11]);
        assert_eq!(board.add(6), Err(PlacementError::IllegalShape));
        assert_eq!(board.tile_state(6), Some(TileState::Sea));
    }

    #[test]
    fn bend_is_rejected() {
        let mut board = classic();
        place(&mut board, &[6, 7]);
        assert_eq!(board.add(12), Err(PlacementError::IllegalShape));
        assert_eq!(board.add(1), Err(PlacementError::IllegalShape));
    }

    #[test]
    fn merge_into_one_ship() {
        let mut board = classic();
        place(&mut board, &[10, 11, 13]);
        board.add(12).unwrap();
        assert_eq!(board.group_of(10), vec![10, 11, 12, 13]);
        assert_eq!(board.tracker().placed(4), 1);
        assert_eq!(board.tracker().remaining(1), 2);
        assert_eq!(board.tracker().remaining(2), 1);
    }

    #[test]
    fn remove_splits_ship() {
        let mut board = classic();
        place(&mut board, &[0, 5, 10, 15]);
        board.remove(5).unwrap();
        assert_eq!(board.groups(), vec![vec![0], vec![10, 15]]);
        assert_eq!(board.tracker().remaining(4), 1);
        assert_eq!(board.state(), BoardState::Partial);
    }

    #[test]
    fn remove_is_rejected_when_fragment_has_no_room() {
        let mut board = classic();
        place(&mut board, &[0, 5, 10, 15, 21, 22, 23, 14, 19, 8, 2]);
        assert_eq!(board.state(), BoardState::Complete);
        let before = board.snapshot();
        // Splitting the three leaves six groups for five slots.
        assert_eq!(
            board.remove(22),
            Err(PlacementError::ShipsExhausted { size: 1 })
        );
        assert_eq!(board.snapshot(), before);
        assert_eq!(board.group_of(21), vec![21, 22, 23]);

        // Shortening the four leaves a three, which still has the four's slot.
        board.remove(15).unwrap();
        assert_eq!(board.tracker().placed(3), 2);
        assert_eq!(board.state(), BoardState::Partial);
    }

    #[test]
    fn last_removal_empties_board() {
        let mut board = classic();
        place(&mut board, &[7, 8]);
        board.remove(7).unwrap();
        board.remove(8).unwrap();
        assert_eq!(board.state(), BoardState::Empty);
        assert_eq!(board.tracker(), classic().tracker());
    }

    #[test]
    fn whole_ships_are_placed_and_removed_in_one_step() {
        let mut board = Board::new(&BoardConfig::new(6, vec![(3, 1), (2, 1)])).unwrap();
        board.place_ship(&[14, 2, 8]).unwrap();
        assert_eq!(board.group_of(8), vec![2, 8, 14]);
        assert_eq!(board.place_ship(&[15, 16]), Err(PlacementError::IllegalShape));
        assert_eq!(board.place_ship(&[30, 31]), Ok(()));
        assert_eq!(board.state(), BoardState::Complete);

        board.remove_ship(14).unwrap();
        assert_eq!(board.deck_count(), 2);
        assert_eq!(board.tracker().remaining(3), 1);
        assert_eq!(board.remove_ship(14), Err(PlacementError::AlreadyEmpty));
        assert_eq!(
            board.place_ship(&[0, 1, 2, 3]),
            Err(PlacementError::ShipsExhausted { size: 4 })
        );
        assert_eq!(board.snapshot()[0], TileState::Sea);
    }

    #[test]
    fn fire_locks_placement() {
        let mut board = classic();
        place(&mut board, &[0, 1]);
        assert_eq!(board.fire(1), Ok(HitOutcome::Hit));
        assert_eq!(board.fire(1), Ok(HitOutcome::AlreadyResolved));
        assert_eq!(board.fire(2), Ok(HitOutcome::Miss));
        assert_eq!(board.fire(2), Ok(HitOutcome::AlreadyResolved));
        assert!(board.locked());
        assert_eq!(board.add(10), Err(PlacementError::Locked));
        assert_eq!(board.remove(0), Err(PlacementError::Locked));
        assert_eq!(board.state(), BoardState::Partial);
        assert_eq!(board.hits().collect::<Vec<_>>(), vec![1]);
        assert!(board.fire(99).is_err());
    }

    #[test]
    fn miss_does_not_lock_placement() {
        let mut board = classic();
        place(&mut board, &[0]);
        assert_eq!(board.fire(12), Ok(HitOutcome::Miss));
        assert!(!board.locked());
        board.add(1).unwrap();
        board.add(12).unwrap();
        assert_eq!(board.tile_state(12), Some(TileState::Deck));
        assert_eq!(board.fire(12), Ok(HitOutcome::Hit));
        assert!(board.locked());
        assert_eq!(board.remove(1), Err(PlacementError::Locked));
    }

    #[test]
    fn ship_status_and_defeat() {
        let mut board = classic();
        place(&mut board, &[0, 1, 20]);
        assert_eq!(board.ship_status(0), Some(ShipStatus::Intact));
        assert_eq!(board.ship_status(2), None);
        board.fire(0).unwrap();
        assert_eq!(board.ship_status(1), Some(ShipStatus::Damaged));
        board.fire(1).unwrap();
        assert_eq!(board.ship_status(1), Some(ShipStatus::Sunk));
        assert!(!board.defeated());
        board.fire(20).unwrap();
        assert!(board.defeated());
        assert!(!classic().defeated());
    }

    #[test]
    fn effects_follow_transitions() {
        let sink = Recorder::default();
        let mut board = Board::with_effects(&BoardConfig::default(), sink.clone()).unwrap();
        board.add(4).unwrap();
        board.remove(4).unwrap();
        // Rejected placements emit nothing.
        board.add(4).unwrap();
        board.add(9).unwrap();
        board.add(14).unwrap();
        assert!(board.add(13).is_err());
        board.fire(4).unwrap();
        board.fire(0).unwrap();
        assert_eq!(
            sink.take(),
            vec![
                (Effect::DeckStart, Trigger::new(4)),
                (Effect::DeckStop, Trigger::new(4)),
                (Effect::DeckStart, Trigger::new(4)),
                (Effect::DeckStart, Trigger::new(9)),
                (Effect::DeckStart, Trigger::new(14)),
                (Effect::HitIntensify, Trigger::new(4)),
            ]
        );
    }

    #[test]
    fn failing_sink_does_not_affect_state() {
        let sink = Recorder::failing();
        let mut board = Board::with_effects(&BoardConfig::default(), sink.clone()).unwrap();
        board.add(12).unwrap();
        assert_eq!(board.tile_state(12), Some(TileState::Deck));
        assert_eq!(board.fire(12), Ok(HitOutcome::Hit));
        assert_eq!(sink.take().len(), 2);
    }

    #[test]
    fn unbound_tile_is_silent() {
        let sink = Recorder::default();
        let mut board = Board::with_effects(&BoardConfig::default(), sink.clone()).unwrap();
        assert_eq!(board.bind_trigger(3, None), Ok(Some(Trigger::new(3))));
        board.add(3).unwrap();
        assert!(sink.take().is_empty());
        assert!(board.bind_trigger(30, None).is_err());
    }

    #[test]
    fn silence_stops_decks_and_hits() {
        let sink = Recorder::default();
        let mut board = Board::with_effects(&BoardConfig::default(), sink.clone()).unwrap();
        place(&mut board, &[0, 1, 10]);
        board.fire(1).unwrap();
        board.fire(2).unwrap();
        sink.take();
        board.silence();
        assert_eq!(
            sink.take(),
            vec![
                (Effect::DeckStop, Trigger::new(0)),
                (Effect::DeckStop, Trigger::new(1)),
                (Effect::DeckStop, Trigger::new(10)),
            ]
        );
        assert_eq!(board.tile_state(1), Some(TileState::Hit));
    }

    #[test]
    fn layout_is_applied_regardless_of_order() {
        let mut board = classic();
        let mut layout = vec![false; 25];
        for &cell in &[0, 5, 10, 15, 21, 22, 23, 14, 19, 8, 2] {
            layout[cell] = true;
        }
        assert!(board.apply_layout(&layout).is_empty());
        assert_eq!(board.state(), BoardState::Complete);

        // The four goes in one step.
        for &cell in &[0, 5, 10, 15] {
            layout[cell] = false;
        }
        assert!(board.apply_layout(&layout).is_empty());
        assert_eq!(board.deck_count(), 7);
        assert_eq!(board.state(), BoardState::Partial);
    }

    #[test]
    fn layout_reports_rejections() {
        let mut board = classic();
        let mut layout = vec![false; 25];
        layout[0] = true;
        layout[1] = true;
        layout[6] = true;
        let rejected = board.apply_layout(&layout);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].1, PlacementError::IllegalShape);
        assert_eq!(board.deck_count(), 2);
    }

    #[test]
    fn renders_grid() {
        let mut board = classic();
        place(&mut board, &[1, 2]);
        board.fire(2).unwrap();
        board.fire(24).unwrap();
        assert_eq!(
            board.to_string(),
            "|-----------|\n\
             | ~ # x ~ ~ |\n\
             | ~ ~ ~ ~ ~ |\n\
             | ~ ~ ~ ~ ~ |\n\
             | ~ ~ ~ ~ ~ |\n\
             | ~ ~ ~ ~ o |\n\
             |-----------|"
        );
    }
}
