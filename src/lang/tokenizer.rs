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

//! Tokenizer: classifies lexer words as tokens.

use std::rc::Rc;

use crate::message::Message;
use crate::symbol::SymbolTable;

use super::input::{CharacterSource, FileError};
use super::lexer::Lexer;
use super::token::{Token, TokenKind};

/// Maximum count of tokens that can be pushed back at once.
pub const PUSHBACK_CAPACITY: usize = 1024;

// Declares the reserved words and punctuation with fixed token kinds.
macro_rules! keywords {
    ($($text:literal => $kind:ident,)*) => {
        /// Creates a table mapping each reserved word to its token kind.
        fn keywords() -> SymbolTable<TokenKind> {
            let mut table = SymbolTable::new();
            $( table.add($text, TokenKind::$kind); )*
            table
        }
    };
}

keywords! {
    "|"           => Pipe,
    "{"           => OCurly,
    "}"           => CCurly,
    "};"          => CCurlySemi,
    ","           => Comma,
    ";"           => Semi,
    ":"           => Colon,
    "include"     => Include,
    "machine"     => Machine,
    "input"       => Input,
    "states"      => States,
    "transitions" => Transitions,
    "trans"       => Transitions,
    "state"       => State,
    "pre_code"    => PreCode,
    "post_code"   => PostCode,
}

/// Removes quotes, spaces, and tabs from both ends of `text`.
pub fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c| matches!(c, '\'' | '"' | ' ' | '\t'))
}

// ----------------------------------------------------------------------------

/// Tokenizer.  Yields tokens from a [`Lexer`], with support for pushing
/// tokens back to be yielded again.
#[derive(Debug)]
pub struct Tokenizer {
    lexer:    Lexer,
    keywords: SymbolTable<TokenKind>,
    stack:    Vec<Token>,
}

impl Tokenizer {
    /// Creates a new tokenizer reading from the given `input`.
    pub fn new(input: CharacterSource) -> Self {
        Self {
            lexer:    Lexer::new(input),
            keywords: keywords(),
            stack:    Vec::new(),
        }
    }

    /// Creates a new tokenizer reading from the file at `path`.
    pub fn open_file(path: &str) -> Result<Self, FileError> {
        let mut input = CharacterSource::new();
        input.open(path)?;
        Ok(Self::new(input))
    }

    /// Creates a new tokenizer reading from in-memory `text` named `name`.
    pub fn from_text(name: &str, text: &str) -> Self {
        let mut input = CharacterSource::new();
        input.push_bytes(name, text);
        Self::new(input)
    }

    /// Returns the next token.  Tokens pushed back by [`unget_token`] are
    /// returned first, most recent first.
    ///
    /// [`unget_token`]: Self::unget_token
    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.stack.pop() {
            return token
        }

        let word = self.lexer.next_word().into_owned();
        let file = Rc::clone(self.lexer.file());
        let line = self.lexer.line();

        let (kind, text) = if word.is_empty() {
            (TokenKind::Eof, word)
        } else if word.starts_with(['\'', '"']) {
            (TokenKind::QString, strip_quotes(&word).to_string())
        } else if word.starts_with("%{") {
            (TokenKind::RawBlock, word)
        } else if word.starts_with("{{") {
            (TokenKind::InlineBlock, word)
        } else {
            let kind = self.keywords.find(&word).copied().unwrap_or(TokenKind::Unknown);
            (kind, word)
        };

        Token { kind, text, file, line }
    }

    /// Pushes `token` back, to be returned by a later call to
    /// [`next_token`](Self::next_token).
    ///
    /// # Panics
    ///
    /// Panics if more than [`PUSHBACK_CAPACITY`] tokens are pending.
    ///
    pub fn unget_token(&mut self, token: Token) {
        if self.stack.len() >= PUSHBACK_CAPACITY {
            panic!("Token pushback buffer overflow.")
        }
        self.stack.push(token);
    }

    /// Opens the file at `path`, included by the file named `from`.  Tokens
    /// are read from it until it is exhausted, then reading resumes where it
    /// left off.
    pub fn include(&mut self, from: &str, path: &str) -> Result<(), FileError> {
        self.lexer.include(from, path)
    }

    /// Removes and returns the scan errors reported since the last call.
    pub fn take_errors(&mut self) -> Vec<Message> {
        self.lexer.take_errors()
    }

    /// Returns the total count of lines read from all files.
    pub fn total_lines_read(&self) -> u32 {
        self.lexer.input().total_lines_read()
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(text: &str) -> Vec<(TokenKind, String)> {
        let mut tokens = Tokenizer::from_text("test.sm", text);
        let mut result = vec![];
        loop {
            let token = tokens.next_token();
            if token.is(Eof) { break }
            result.push((token.kind, token.text));
        }
        result
    }

    #[test]
    fn strip_quotes_both_ends() {
        assert_eq!( strip_quotes("'abc'"),        "abc"     );
        assert_eq!( strip_quotes("\" a b \""),    "a b"     );
        assert_eq!( strip_quotes("'\t\"x\"\t'"),  "x"       );
        assert_eq!( strip_quotes("''"),           ""        );
    }

    #[test]
    fn tokenizer_empty() {
        let mut tokens = Tokenizer::from_text("test.sm", "");

        let token = tokens.next_token();
        assert_eq!( token.kind,    Eof       );
        assert_eq!( token.text,    ""        );
        assert_eq!( &*token.file,  "test.sm" );
        assert_eq!( tokens.next_token().kind, Eof );
    }

    #[test]
    fn tokenizer_keywords() {
        assert_eq!(
            kinds("include machine input states transitions trans state pre_code post_code"),
            [
                (Include,     "include".to_string()),
                (Machine,     "machine".to_string()),
                (Input,       "input".to_string()),
                (States,      "states".to_string()),
                (Transitions, "transitions".to_string()),
                (Transitions, "trans".to_string()),
                (State,       "state".to_string()),
                (PreCode,     "pre_code".to_string()),
                (PostCode,    "post_code".to_string()),
            ]
        );
    }

    #[test]
    fn tokenizer_punctuation() {
        let kinds = kinds("| { } }; , ; : ::")
            .into_iter().map(|(k, _)| k).collect::<Vec<_>>();

        assert_eq!( kinds, [Pipe, OCurly, CCurly, CCurlySemi, Comma, Semi, Colon, Unknown] );
    }

    #[test]
    fn tokenizer_literals() {
        assert_eq!(
            kinds("'a.sm' %{ x %} {{ y(); }} States"),
            [
                (QString,     "a.sm".to_string()),
                (RawBlock,    "%{ x %}".to_string()),
                (InlineBlock, "{{ y(); }}".to_string()),
                (Unknown,     "States".to_string()),
            ]
        );
    }

    #[test]
    fn tokenizer_unget_lifo() {
        let mut tokens = Tokenizer::from_text("test.sm", "a b c");

        let a = tokens.next_token();
        let b = tokens.next_token();
        tokens.unget_token(a);
        tokens.unget_token(b);

        assert_eq!( tokens.next_token().text, "b" );
        assert_eq!( tokens.next_token().text, "a" );
        assert_eq!( tokens.next_token().text, "c" );
        assert_eq!( tokens.next_token().kind, Eof );
    }

    #[test]
    fn tokenizer_lines() {
        let mut tokens = Tokenizer::from_text("test.sm", "a\nb\n\nc");

        assert_eq!( tokens.next_token().line, 1 );
        assert_eq!( tokens.next_token().line, 2 );
        assert_eq!( tokens.next_token().line, 4 );
        assert_eq!( tokens.total_lines_read(), 3 );
    }

    #[test]
    #[should_panic]
    fn tokenizer_unget_overflow() {
        let mut tokens = Tokenizer::from_text("test.sm", "a");
        let token = tokens.next_token();

        for _ in 0..=PUSHBACK_CAPACITY {
            tokens.unget_token(token.clone());
        }
    }

    #[test]
    fn tokenizer_scan_error() {
        let mut tokens = Tokenizer::from_text("test.sm", "a 'b\nc");

        assert_eq!( tokens.next_token().kind, Unknown );
        assert_eq!( tokens.next_token().kind, Eof     );
        assert_eq!( tokens.take_errors().len(), 1     );
    }
}
