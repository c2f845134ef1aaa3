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

//! Code block scanners.
//!
//! A raw block `%{ ... %}` holds target-language text copied verbatim to the
//! output.  The scanner tracks C comments and character/string literals so
//! that a `%}` inside one of them does not end the block.
//!
//! An inline block `{{ ... }}` holds the body of a generated function.  It
//! ends at the first `}}`.
//!
//! The delimiters are kept in the word.

use super::engine::{states, Action, Machine, Step};
use super::Char;

states! {
    /// Raw block scanner states.
    enum Raw {
        /// In block text.
        Start,
        /// After `%`.
        HavePercent,
        /// After `/`.
        HaveSlash,
        /// In a `/* */` comment.
        Comment,
        /// In a `//` comment.
        LineComment,
        /// After `*` in a `/* */` comment.
        HaveStar,
        /// In a `'` literal.
        Single,
        /// In a `"` literal.
        Double,
    }
}

states! {
    /// Inline block scanner states.
    enum Inline {
        /// In block text.
        Start,
        /// After `}`.
        HaveCCurly,
    }
}

/// Scans the rest of a raw block, through the closing `%}`.
pub(super) static RAW_BLOCK: Machine<Raw, { Raw::COUNT }> = Machine {
    name:  "raw_block",
    table: &RAW_TABLE,
};

/// Scans the rest of an inline block, through the closing `}}`.
pub(super) static INLINE_BLOCK: Machine<Inline, { Inline::COUNT }> = Machine {
    name:  "inline_block",
    table: &INLINE_TABLE,
};

static RAW_TABLE: [[Step<Raw>; Raw::COUNT]; Char::COUNT] = {
    use Action::*;
    use Raw::*;
    const ST: Step<Raw> = (Start,       Copy);
    const PC: Step<Raw> = (HavePercent, Copy);
    const SL: Step<Raw> = (HaveSlash,   Copy);
    const CM: Step<Raw> = (Comment,     Copy);
    const LC: Step<Raw> = (LineComment, Copy);
    const AS: Step<Raw> = (HaveStar,    Copy);
    const SQ: Step<Raw> = (Single,      Copy);
    const DQ: Step<Raw> = (Double,      Copy);
    const EN: Step<Raw> = (End,         Copy);
    const __: Step<Raw> = (Error,       UnexpectedEof);
[
//                Start  HavePercent  HaveSlash  Comment  LineComment  HaveStar  Single  Double
//                ------------------------------------------------------------------------------
/* Invalid */   [ ST,    ST,          ST,        CM,      LC,          CM,       SQ,     DQ,   ],
/* White   */   [ ST,    ST,          ST,        CM,      LC,          CM,       SQ,     DQ,   ],
/* AlpNum  */   [ ST,    ST,          ST,        CM,      LC,          CM,       SQ,     DQ,   ],
/* Newline */   [ ST,    ST,          ST,        CM,      ST,          CM,       SQ,     DQ,   ],
/* Punct   */   [ ST,    ST,          ST,        CM,      LC,          CM,       SQ,     DQ,   ],
/* '       */   [ SQ,    SQ,          SQ,        CM,      LC,          CM,       ST,     DQ,   ],
/* "       */   [ DQ,    DQ,          DQ,        CM,      LC,          CM,       SQ,     ST,   ],
/* %       */   [ PC,    PC,          PC,        CM,      LC,          CM,       SQ,     DQ,   ],
/* /       */   [ SL,    SL,          LC,        CM,      LC,          ST,       SQ,     DQ,   ],
/* *       */   [ ST,    ST,          CM,        AS,      LC,          AS,       SQ,     DQ,   ],
/* {       */   [ ST,    ST,          ST,        CM,      LC,          CM,       SQ,     DQ,   ],
/* }       */   [ ST,    EN,          ST,        CM,      LC,          CM,       SQ,     DQ,   ],
/* Eof     */   [ __,    __,          __,        __,      __,          __,       __,     __,   ],
]};

static INLINE_TABLE: [[Step<Inline>; Inline::COUNT]; Char::COUNT] = {
    use Action::*;
    use Inline::*;

    let mut table = [[(Start, Copy), (Start, Copy)]; Char::COUNT];

    table[Char::CCurly as usize] = [(HaveCCurly, Copy), (End, Copy)];
    table[Char::Eof    as usize] = [(Error, UnexpectedEof); Inline::COUNT];
    table
};
