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
use crate::board::Dimensions;

/// Returns true if `cells` form a single straight, contiguous run: all in one row with
/// consecutive columns, or all in one column with consecutive rows. `cells` must be
/// sorted in ascending index order. An empty slice is not a run.
pub fn is_straight_run(cells: &[usize], dim: &Dimensions) -> bool {
    let mut cells = cells.iter().map(|&idx| dim.un_linearize(idx));
    let start = match cells.next() {
        Some(start) => start,
        None => return false,
    };
    let mut previous = start;
    for coord in cells {
        // Sorted order means every step along a row or column lands on the direct
        // neighbor of the previous cell; anything else is a gap, a wrap or a bend.
        if dim.is_neighbor(&coord, &previous) && dim.is_colinear(&start, &previous, &coord) {
            previous = coord;
        } else {
            return false;
        }
    }
    true
}
