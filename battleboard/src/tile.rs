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
//! Per-cell state machine.

use std::fmt;

use thiserror::Error;

use crate::effects::{Effect, Trigger};

/// State of a single cell of the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TileState {
    /// Open water. Initial state of every tile.
    Sea,
    /// Occupied by part of a ship.
    Deck,
    /// Shot at, nothing there.
    Miss,
    /// Shot at, a deck was there.
    Hit,
}

impl TileState {
    /// Symbol used when rendering the board.
    pub fn symbol(self) -> char {
        match self {
            TileState::Sea => '~',
            TileState::Deck => '#',
            TileState::Miss => 'o',
            TileState::Hit => 'x',
        }
    }

    /// Whether the tile has already been shot at.
    pub fn resolved(self) -> bool {
        match self {
            TileState::Miss | TileState::Hit => true,
            TileState::Sea | TileState::Deck => false,
        }
    }

    /// Apply `event` to this state, returning the next state or `None` if the event is
    /// not allowed from here.
    pub fn next(self, event: TileEvent) -> Option<TileState> {
        match (event, self) {
            (TileEvent::On, _) => Some(TileState::Deck),
            (TileEvent::Off, _) => Some(TileState::Sea),
            (TileEvent::Fire, TileState::Sea) => Some(TileState::Miss),
            (TileEvent::Fire, TileState::Deck) => Some(TileState::Hit),
            (TileEvent::Fire, TileState::Miss) | (TileEvent::Fire, TileState::Hit) => None,
        }
    }

    /// Effect produced when entering this state from a different one.
    fn entry_effect(self) -> Option<Effect> {
        match self {
            TileState::Deck => Some(Effect::DeckStart),
            TileState::Sea => Some(Effect::DeckStop),
            TileState::Hit => Some(Effect::HitIntensify),
            TileState::Miss => None,
        }
    }
}

impl Default for TileState {
    fn default() -> Self {
        TileState::Sea
    }
}

impl fmt::Display for TileState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Events accepted by a [`Tile`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TileEvent {
    /// Put a deck on the tile. Only issued by the board during placement.
    On,
    /// Clear the tile back to sea. Only issued by the board during placement.
    Off,
    /// Shoot at the tile.
    Fire,
}

/// Error returned when an event is not allowed from the tile's current state.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum TileError {
    /// The tile was already shot at.
    #[error("tile already resolved as {0:?}")]
    AlreadyResolved(TileState),
}

/// Record of a committed tile transition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Transition {
    /// State before the event.
    pub from: TileState,
    /// State after the event.
    pub to: TileState,
    /// Effect to hand to the presentation layer, if the tile has a trigger bound and
    /// the state actually changed.
    pub effect: Option<(Effect, Trigger)>,
}

impl Transition {
    /// Whether the event changed the tile's state.
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// A single cell of the board.
#[derive(Debug, Clone, Default)]
pub struct Tile {
    /// Current state.
    state: TileState,

    /// Presentation handle for this tile, if any.
    trigger: Option<Trigger>,
}

impl Tile {
    /// Construct a tile in the sea state with the given trigger.
    pub fn new(trigger: Option<Trigger>) -> Self {
        Self {
            state: TileState::Sea,
            trigger,
        }
    }

    /// Current state of the tile.
    pub fn state(&self) -> TileState {
        self.state
    }

    /// Trigger bound to this tile.
    pub fn trigger(&self) -> Option<Trigger> {
        self.trigger
    }

    /// Replace the trigger bound to this tile, returning the previous one.
    pub fn bind(&mut self, trigger: Option<Trigger>) -> Option<Trigger> {
        std::mem::replace(&mut self.trigger, trigger)
    }

    /// Apply an event. On rejection the tile is unchanged.
    pub fn apply(&mut self, event: TileEvent) -> Result<Transition, TileError> {
        let to = self
            .state
            .next(event)
            .ok_or(TileError::AlreadyResolved(self.state))?;
        Ok(self.enter(event, to))
    }

    /// Put a deck on this tile. Accepted from every state.
    pub fn on(&mut self) -> Transition {
        self.enter(TileEvent::On, TileState::Deck)
    }

    /// Clear this tile back to sea. Accepted from every state.
    pub fn off(&mut self) -> Transition {
        self.enter(TileEvent::Off, TileState::Sea)
    }

    /// Shoot at this tile.
    pub fn fire(&mut self) -> Result<Transition, TileError> {
        self.apply(TileEvent::Fire)
    }

    /// Move to `to`, which `event` must allow from the current state.
    fn enter(&mut self, event: TileEvent, to: TileState) -> Transition {
        let from = self.state;
        self.state = to;
        let effect = if from != to {
            match (to.entry_effect(), self.trigger) {
                (Some(effect), Some(trigger)) => Some((effect, trigger)),
                _ => None,
            }
        } else {
            None
        };
        tracing::trace!(?event, ?from, ?to, "tile transition");
        Transition { from, to, effect }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.state, f)
    }
}
