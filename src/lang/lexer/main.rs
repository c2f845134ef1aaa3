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

//! Main scanner: the top-level machine that yields one word per run.

use super::engine::{states, Action, Machine, Step};
use super::Char;

states! {
    /// Main scanner states.
    enum Main {
        /// Between words.
        Start,
        /// In a run of punctuation.
        Special,
        /// After a leading `%`.
        HavePercent,
        /// After a leading `/`.
        HaveSlash,
        /// After a leading `{`.
        HaveOCurly,
    }
}

/// Main scanner.
pub(super) static SCANNER: Machine<Main, { Main::COUNT }> = Machine {
    name:  "scanner",
    table: &TABLE,
};

static TABLE: [[Step<Main>; Main::COUNT]; Char::COUNT] = {
    use Action::*;
    use Main::*;
    const ERR: Step<Main> = (Error, InvalidChar);
    const FIN: Step<Main> = (End,   Nop);
    const RET: Step<Main> = (End,   Push);
    const SPC: Step<Main> = (Special, Copy);
[
//                Start                   Special  HavePercent            HaveSlash       HaveOCurly
//                -----------------------------------------------------------------------------------------
/* Invalid */   [ ERR,                    ERR,     ERR,                   ERR,            ERR,               ],
/* White   */   [ (Start, Nop),           FIN,     FIN,                   FIN,            FIN,               ],
/* AlpNum  */   [ (End, Word),            RET,     RET,                   RET,            RET,               ],
/* Newline */   [ (Start, Nop),           RET,     RET,                   RET,            RET,               ],
/* Punct   */   [ SPC,                    SPC,     SPC,                   SPC,            RET,               ],
/* '       */   [ (End, Squote),          RET,     RET,                   RET,            RET,               ],
/* "       */   [ (End, Dquote),          RET,     RET,                   RET,            RET,               ],
/* %       */   [ (HavePercent, Copy),    SPC,     SPC,                   SPC,            RET,               ],
/* /       */   [ (HaveSlash, Copy),      RET,     RET,                   (Start, Sline), RET,               ],
/* *       */   [ SPC,                    SPC,     SPC,                   (Start, Mline), RET,               ],
/* {       */   [ (HaveOCurly, Copy),     SPC,     (End, RawBlock),       RET,            (End, InlineBlock) ],
/* }       */   [ SPC,                    RET,     (End, UnexpectedCCurly), RET,          RET,               ],
/* Eof     */   [ FIN,                    FIN,     FIN,                   FIN,            FIN,               ],
]};
