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

//! Identifier scanner.

use super::engine::{states, Action, Machine, Step};
use super::Char;

states! {
    /// Identifier scanner states.
    enum Ident {
        /// In an identifier.
        Start,
    }
}

/// Scans the rest of an identifier: a run of letters, digits, and `_`.
pub(super) static WORD: Machine<Ident, { Ident::COUNT }> = Machine {
    name:  "word",
    table: &TABLE,
};

static TABLE: [[Step<Ident>; Ident::COUNT]; Char::COUNT] = {
    use Action::*;
    use Ident::*;
    const RET: Step<Ident> = (End, Push);
[
//                Start
//                ---------------
/* Invalid */   [ RET           ],
/* White   */   [ (End, Nop)    ],
/* AlpNum  */   [ (Start, Copy) ],
/* Newline */   [ (End, Nop)    ],
/* Punct   */   [ RET           ],
/* '       */   [ RET           ],
/* "       */   [ RET           ],
/* %       */   [ RET           ],
/* /       */   [ RET           ],
/* *       */   [ RET           ],
/* {       */   [ RET           ],
/* }       */   [ RET           ],
/* Eof     */   [ (End, Nop)    ],
]};
