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

//! Quoted string scanners.
//!
//! Quoted strings extend to the next matching quote on the same line.  There
//! are no escape sequences.  The quotes are kept in the word.

use super::engine::{states, Action, Machine, Step};
use super::Char;

states! {
    /// Quoted string scanner states.
    enum Quoted {
        /// In a quoted string.
        Start,
    }
}

/// Scans the rest of a `'` string.
pub(super) static SQUOTE: Machine<Quoted, { Quoted::COUNT }> = Machine {
    name:  "squote",
    table: &quoted_table(Char::SQuote),
};

/// Scans the rest of a `"` string.
pub(super) static DQUOTE: Machine<Quoted, { Quoted::COUNT }> = Machine {
    name:  "dquote",
    table: &quoted_table(Char::DQuote),
};

const fn quoted_table(quote: Char) -> [[Step<Quoted>; Quoted::COUNT]; Char::COUNT] {
    use Action::*;
    use Quoted::*;

    let mut table = [[(Start, Copy)]; Char::COUNT];

    table[Char::Newline as usize] = [(Error, UnexpectedNewline)];
    table[Char::Eof     as usize] = [(Error, UnexpectedEof)];
    table[quote         as usize] = [(End,   Copy)];
    table
}
