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
//! Ship inventory and ship geometry.
//!
//! Ships are never stored on the board. A ship is whatever maximal group of orthogonally
//! connected decks the player has built, and the [`ShipTracker`] keeps count of how many
//! ships of each size those groups add up to.

pub use self::{linear::is_straight_run, tracker::ShipTracker};

mod linear;
mod tracker;
