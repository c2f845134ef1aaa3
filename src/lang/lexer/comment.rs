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

//! Comment scanners.  Comment text is discarded.

use super::engine::{states, Action, Machine, Step};
use super::Char;

states! {
    /// `//` comment scanner states.
    enum LineComment {
        /// In a comment.
        Start,
    }
}

states! {
    /// `/* */` comment scanner states.
    enum BlockComment {
        /// In a comment.
        Start,
        /// After a `*` in a comment.
        HaveStar,
    }
}

/// Skips the rest of a `//` comment, through the end of the line.
pub(super) static SLINE: Machine<LineComment, { LineComment::COUNT }> = Machine {
    name:  "sline",
    table: &SLINE_TABLE,
};

/// Skips the rest of a `/* */` comment.
pub(super) static MLINE: Machine<BlockComment, { BlockComment::COUNT }> = Machine {
    name:  "mline",
    table: &MLINE_TABLE,
};

static SLINE_TABLE: [[Step<LineComment>; LineComment::COUNT]; Char::COUNT] = {
    use Action::*;
    use LineComment::*;

    let mut table = [[(Start, Nop)]; Char::COUNT];

    table[Char::Newline as usize] = [(End, Nop)];
    table[Char::Eof     as usize] = [(End, Nop)];
    table
};

static MLINE_TABLE: [[Step<BlockComment>; BlockComment::COUNT]; Char::COUNT] = {
    use Action::*;
    use BlockComment::*;
    const __: Step<BlockComment> = (Start, Nop);
[
//                Start                   HaveStar
//                -----------------------------------------------
/* Invalid */   [ __,                     __                     ],
/* White   */   [ __,                     __                     ],
/* AlpNum  */   [ __,                     __                     ],
/* Newline */   [ __,                     __                     ],
/* Punct   */   [ __,                     __                     ],
/* '       */   [ __,                     __                     ],
/* "       */   [ __,                     __                     ],
/* %       */   [ __,                     __                     ],
/* /       */   [ __,                     (End, Nop)             ],
/* *       */   [ (HaveStar, Nop),        (HaveStar, Nop)        ],
/* {       */   [ __,                     __                     ],
/* }       */   [ __,                     __                     ],
/* Eof     */   [ (Error, UnexpectedEof), (Error, UnexpectedEof) ],
]};
