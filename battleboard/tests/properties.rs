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
use std::iter;

use battleboard::{ships::is_straight_run, Board, BoardConfig, BoardState};
use proptest::prelude::*;

#[derive(Debug, Copy, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..27usize).prop_map(Op::Add),
        1 => (0..27usize).prop_map(Op::Remove),
    ]
}

/// Fleets for a 5x5 board, with and without single-deck ships.
fn fleet() -> impl Strategy<Value = BoardConfig> {
    prop_oneof![
        Just(BoardConfig::default()),
        Just(BoardConfig::new(5, vec![(3, 1), (2, 2)])),
        Just(BoardConfig::new(5, vec![(5, 1), (2, 1)])),
    ]
}

fn apply(board: &mut Board, op: Op) -> bool {
    match op {
        Op::Add(idx) => board.add(idx).is_ok(),
        Op::Remove(idx) => board.remove(idx).is_ok(),
    }
}

/// Checks that the ship groups on the board agree with the inventory.
fn check_fleet(board: &Board) -> Result<(), TestCaseError> {
    let groups = board.groups();
    for group in &groups {
        prop_assert!(
            is_straight_run(group, board.dimensions()),
            "{:?} is not a straight run",
            group
        );
    }
    let tracker = board.tracker();
    let mut sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    for &size in &sizes {
        let count = sizes.iter().filter(|&&other| other == size).count();
        prop_assert_eq!(count, tracker.placed(size), "ships of size {}", size);
    }

    // Largest group against largest slot, and so on down, must always fit.
    let mut slots: Vec<usize> = tracker
        .iter()
        .flat_map(|(size, _)| iter::repeat(size).take(tracker.quantity(size)))
        .collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    slots.sort_unstable_by(|a, b| b.cmp(a));
    prop_assert!(
        sizes.len() <= slots.len(),
        "{} groups for {} slots",
        sizes.len(),
        slots.len()
    );
    for (group, slot) in sizes.iter().zip(&slots) {
        prop_assert!(group <= slot, "groups {:?} do not fit slots {:?}", sizes, slots);
    }
    prop_assert_eq!(tracker.outstanding(), slots.len() - sizes.len());

    prop_assert_eq!(
        board.state() == BoardState::Complete,
        board.tracker().is_complete()
    );
    prop_assert_eq!(board.state() == BoardState::Empty, board.deck_count() == 0);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Groups always match the inventory, whatever sequence of edits was made.
    #[test]
    fn groups_follow_inventory(
        config in fleet(),
        ops in prop::collection::vec(op(), 0..80),
    ) {
        let mut board = Board::new(&config).unwrap();
        for op in ops {
            apply(&mut board, op);
            check_fleet(&board)?;
        }
    }

    /// A rejected edit leaves no trace.
    #[test]
    fn rejected_edits_change_nothing(
        config in fleet(),
        ops in prop::collection::vec(op(), 0..80),
    ) {
        let mut board = Board::new(&config).unwrap();
        for op in ops {
            let snapshot = board.snapshot();
            let groups = board.groups();
            let tracker = board.tracker().clone();
            let state = board.state();
            if !apply(&mut board, op) {
                prop_assert_eq!(board.snapshot(), snapshot);
                prop_assert_eq!(board.groups(), groups);
                prop_assert_eq!(board.tracker(), &tracker);
                prop_assert_eq!(board.state(), state);
            }
        }
    }

    /// Removing a deck right after adding it restores the board.
    #[test]
    fn add_then_remove_restores(
        ops in prop::collection::vec(op(), 0..40),
        idx in 0..25usize,
    ) {
        let mut board = Board::new(&BoardConfig::default()).unwrap();
        for op in ops {
            apply(&mut board, op);
        }
        let snapshot = board.snapshot();
        let tracker = board.tracker().clone();
        let state = board.state();
        if board.add(idx).is_ok() {
            prop_assert_eq!(board.remove(idx), Ok(()));
            prop_assert_eq!(board.snapshot(), snapshot);
            prop_assert_eq!(board.tracker(), &tracker);
            prop_assert_eq!(board.state(), state);
        }
    }

    /// Applying a layout never breaks the fleet invariants, and a layout read back from
    /// a board is accepted as is.
    #[test]
    fn layouts_keep_fleet_consistent(
        ops in prop::collection::vec(op(), 0..40),
        layout in prop::collection::vec(any::<bool>(), 25),
    ) {
        let mut board = Board::new(&BoardConfig::default()).unwrap();
        board.apply_layout(&layout);
        check_fleet(&board)?;
        for op in ops {
            apply(&mut board, op);
        }
        let current: Vec<bool> = (0..25).map(|idx| board.decks().any(|d| d == idx)).collect();
        let snapshot = board.snapshot();
        prop_assert!(board.apply_layout(&current).is_empty());
        prop_assert_eq!(board.snapshot(), snapshot);
    }
}
