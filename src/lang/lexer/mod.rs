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

//! Lexical analyzer.
//!
//! The lexer turns characters into *words*: identifiers, punctuation runs,
//! quoted strings, raw blocks (`%{ ... %}`), and inline blocks (`{{ ... }}`).
//! Comments are discarded.  Scanning is performed by a set of small
//! table-driven state machines sharing one execution engine; see
//! [`engine`].

use std::borrow::Cow;
use std::rc::Rc;

use crate::lang::input::{CharacterSource, FileError, LogicalChar};
use crate::message::{Category, Message, Severity};
use crate::util::Location;

mod block;
mod comment;
mod engine;
mod main;
mod quoted;
mod word;


/// Maximum length in bytes of a single word.
pub const MAX_WORD_LEN: usize = 64 * 1024;

// ----------------------------------------------------------------------------

/// Logical characters recognized by every lexer state machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Char {
    Invalid, // control characters, `, DEL, and bytes above 0x7F
    White,   // \s \t \r
    AlpNum,  // A-Z a-z 0-9 _
    Newline, // \n
    Punct,   // ~ ! @ # $ ^ ( ) - = + | \ [ ] : ; < > , . ? &
    SQuote,  // '
    DQuote,  // "
    Percent, // %
    Slash,   // /
    Star,    // *
    OCurly,  // {
    CCurly,  // }
    Eof,     // end of input // <- COUNT references this
}

impl Char {
    /// Count of logical characters.
    pub const COUNT: usize = Self::Eof as usize + 1;
}

impl LogicalChar for Char {
    const NON_ASCII: Self = Self::Invalid;
    const EOF:       Self = Self::Eof;
}

/// Mapping of 7-bit ASCII to logical characters.
pub static CHARS: [Char; 128] = {
    use Char::*;
    const __: Char = Invalid;
[
//  x0       x1       x2       x3       x4       x5       x6       x7
//  x8       x9       xA       xB       xC       xD       xE       xF
    __,      __,      __,      __,      __,      __,      __,      __,      // 0x │········│
    __,      White,   Newline, __,      __,      White,   __,      __,      // 0x │·tnvfr··│
    __,      __,      __,      __,      __,      __,      __,      __,      // 1x │········│
    __,      __,      __,      __,      __,      __,      __,      __,      // 1x │········│
    White,   Punct,   DQuote,  Punct,   Punct,   Percent, Punct,   SQuote,  // 2x │ !"#$%&'│
    Punct,   Punct,   Star,    Punct,   Punct,   Punct,   Punct,   Slash,   // 2x │()*+,-./│
    AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  // 3x │01234567│
    AlpNum,  AlpNum,  Punct,   Punct,   Punct,   Punct,   Punct,   Punct,   // 3x │89:;<=>?│
    Punct,   AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  // 4x │@ABCDEFG│
    AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  // 4x │HIJKLMNO│
    AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  // 5x │PQRSTUVW│
    AlpNum,  AlpNum,  AlpNum,  Punct,   Punct,   Punct,   Punct,   AlpNum,  // 5x │XYZ[\]^_│
    __,      AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  // 6x │`abcdefg│
    AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  // 6x │hijklmno│
    AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  AlpNum,  // 7x │pqrstuvw│
    AlpNum,  AlpNum,  AlpNum,  OCurly,  Punct,   CCurly,  Punct,   __,      // 7x │xyz{|}~░│
]};

// ----------------------------------------------------------------------------

/// Lexical analyzer.  Reads a [`CharacterSource`] and yields a stream of
/// words.
#[derive(Debug)]
pub struct Lexer {
    input:  CharacterSource,
    word:   Vec<u8>,
    file:   Rc<str>,
    line:   u32,
    failed: bool,
    errors: Vec<Message>,
}

impl Lexer {
    /// Creates a new lexical analyzer reading from the given `input`.
    pub fn new(input: CharacterSource) -> Self {
        let file = input.current_file();
        let line = input.current_line_number();
        Self {
            input, file, line,
            word:   Vec::with_capacity(256),
            failed: false,
            errors: vec![],
        }
    }

    /// Scans the next word and returns its text.
    ///
    /// Returns an empty string at the end of input.  After a scan error, the
    /// partial word is discarded and every later call returns an empty string.
    pub fn next_word(&mut self) -> Cow<'_, str> {
        self.word.clear();
        self.mark();

        if !self.failed {
            self.run(&main::SCANNER);
        }

        if self.failed {
            self.word.clear();
        }

        String::from_utf8_lossy(&self.word)
    }

    /// Returns the name of the file in which the most recent word begins.
    #[inline]
    pub fn file(&self) -> &Rc<str> {
        &self.file
    }

    /// Returns the line number at which the most recent word begins.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Removes and returns the scan errors reported since the last call.
    pub fn take_errors(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.errors)
    }

    /// Opens the file at `path`, included by the file named `from`, and
    /// continues scanning from it until it is exhausted.
    pub fn include(&mut self, from: &str, path: &str) -> Result<(), FileError> {
        self.input.include(from, path)
    }

    /// Returns the character source.
    #[inline]
    pub fn input(&self) -> &CharacterSource {
        &self.input
    }

    /// Records the current input position as the start of the word.
    fn mark(&mut self) {
        self.file = self.input.current_file();
        self.line = self.input.current_line_number();
    }

    /// Appends `byte` to the word.
    fn push(&mut self, byte: u8) {
        if self.word.is_empty() {
            self.mark();
        }
        if self.word.len() >= MAX_WORD_LEN {
            return self.scan_error(format!(
                "Word exceeds {} bytes", MAX_WORD_LEN
            ))
        }
        self.word.push(byte);
    }

    /// Reports a scan error at the current input position and stops scanning.
    fn scan_error(&mut self, text: String) {
        if self.failed {
            return
        }
        self.failed = true;
        self.errors.push(Message::at(
            self.input.current_file_name(),
            Location::at_line(self.input.current_line_number()),
            Severity::Error,
            Category::Scan,
            text,
        ));
    }
}
