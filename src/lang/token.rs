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

//! Lexical tokens.

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// Kinds of lexical tokens.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TokenKind {
    // === Punctuation ===

    /// `|` - transition name separator.
    Pipe,

    /// `{` - opens a machine or state body.
    OCurly,

    /// `}`
    CCurly,

    /// `};` - closes a machine or state body.
    CCurlySemi,

    /// `,` - list separator.
    Comma,

    /// `;` - statement terminator.
    Semi,

    /// `:` - rule field separator.
    Colon,

    // === Keywords ===

    /// `include`
    Include,

    /// `machine`
    Machine,

    /// `input`
    Input,

    /// `states`
    States,

    /// `transitions` or `trans`
    Transitions,

    /// `state`
    State,

    /// `pre_code`
    PreCode,

    /// `post_code`
    PostCode,

    // === Literals ===

    /// A quoted string.  The token text excludes the quotes.
    QString,

    /// An inline block `{{ ... }}`.  The token text includes the delimiters.
    InlineBlock,

    /// A raw block `%{ ... %}`.  The token text includes the delimiters.
    RawBlock,

    // === Sentinels ===

    /// Any other word, including every user-defined name.
    Unknown,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns a short name for the token kind, used in token listings.
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Pipe        => "pipe",
            OCurly      => "ocurly",
            CCurly      => "ccurly",
            CCurlySemi  => "ccurly_semi",
            Comma       => "comma",
            Semi        => "semi",
            Colon       => "colon",
            Include     => "include",
            Machine     => "machine",
            Input       => "input",
            States      => "states",
            Transitions => "transitions",
            State       => "state",
            PreCode     => "pre_code",
            PostCode    => "post_code",
            QString     => "qstring",
            InlineBlock => "inline_block",
            RawBlock    => "raw_block",
            Unknown     => "name",
            Eof         => "eof",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ----------------------------------------------------------------------------

/// A lexical token.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    /// Kind of the token.
    pub kind: TokenKind,

    /// Text of the token.
    pub text: String,

    /// Name of the file in which the token begins.
    pub file: Rc<str>,

    /// Line number at which the token begins.
    pub line: u32,
}

impl Token {
    /// Returns `true` if the token is of the given `kind`.
    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

// Display is used in syntax error messages.
impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end of file"),
            _              => f.write_str(&self.text),
        }
    }
}
