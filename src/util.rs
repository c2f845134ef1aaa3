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

//! Miscellaneous utilities.

use std::fmt::{self, Display, Formatter};

/// A source code location.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Location {
    /// The 1-based line number, or `0` to indicate an unknown line.
    pub line: u32,
}

impl Location {
    pub const UNKNOWN: Self = Self::at_line(0);

    /// Creates a `Location` at the given line.
    pub const fn at_line(line: u32) -> Self {
        Self { line }
    }

    /// Returns `true` if the location is [`Location::UNKNOWN`].
    pub fn is_unknown(&self) -> bool {
        self.line == 0
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.line {
            0 => Ok(()),
            l => write!(f, "{}", l),
        }
    }
}

// ----------------------------------------------------------------------------

/// Returns `text` without the two-byte `open` and `close` delimiters.
///
/// A delimiter that is absent is left alone, so a block cut short by the end
/// of input still yields its body.
pub fn strip_delimiters<'a>(text: &'a str, open: &str, close: &str) -> &'a str {
    let text = text.strip_prefix(open).unwrap_or(text);
    text.strip_suffix(close).unwrap_or(text)
}
