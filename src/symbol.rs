// This file is part of smc, a state machine compiler.
// Copyright 2022 Jeffrey Sharp
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// smc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// smc is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with smc.  If not, see <http://www.gnu.org/licenses/>.

//! Symbol tables.

use std::collections::HashMap;

/// Initial capacity of the internal collections of a [`SymbolTable`].
const INITIAL_CAPACITY: usize = 64;

// ----------------------------------------------------------------------------

/// Associative table mapping names to values.
///
/// Lookup is by name only.  Iteration visits entries in the order in which
/// they were first added, so output built from a table is deterministic.
#[derive(Clone, Debug)]
pub struct SymbolTable<V> {
    vec: Vec     <(Box<str>, V)>,
    map: HashMap <Box<str>, usize>,
}

impl<V> SymbolTable<V> {
    /// Creates a new, empty [`SymbolTable`].
    pub fn new() -> Self {
        Self {
            vec: Vec    ::with_capacity(INITIAL_CAPACITY),
            map: HashMap::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Returns `true` if the table has an entry for `name`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Returns a reference to the value stored for `name`, if any.
    pub fn find(&self, name: &str) -> Option<&V> {
        self.map.get(name).map(|&i| &self.vec[i].1)
    }

    /// Adds `value` for `name` if the table has no entry for `name`.
    ///
    /// Returns `true` if the entry was added and `false` if an entry already
    /// existed, in which case the existing value is kept.
    pub fn add(&mut self, name: &str, value: V) -> bool {
        if self.map.contains_key(name) {
            return false
        }
        self.map.insert(name.into(), self.vec.len());
        self.vec.push((name.into(), value));
        true
    }

    /// Returns an iterator over the names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vec.iter().map(|(k, _)| &**k)
    }
}

impl<V> Default for SymbolTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
