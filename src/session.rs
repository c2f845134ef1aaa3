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

//! Compilation session.

use std::fs;
use std::io::{self, Write};

use crate::emit::emit_to_vec;
use crate::lang::ast::Definition;
use crate::lang::parser::Parser;
use crate::lang::token::TokenKind;
use crate::lang::tokenizer::Tokenizer;
use crate::message::{file_error, Category, Log, Message, Severity};
use crate::validate::validate;

// ----------------------------------------------------------------------------

/// Compilation session.  Collects the messages reported while compiling.
#[derive(Debug)]
pub struct Session {
    messages:      Vec<Message>,
    warning_count: usize,
    error_count:   usize,
    echo:          bool,
}

/// Result of a successful compilation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Output {
    /// Generated code.
    pub code: Vec<u8>,

    /// Total count of lines read from all input files.
    pub lines_read: u32,
}

impl Session {
    /// Creates a new [`Session`] that echoes messages to standard error.
    pub fn new() -> Self {
        Self {
            messages:      vec![],
            warning_count: 0,
            error_count:   0,
            echo:          true,
        }
    }

    /// Creates a new [`Session`] that only collects messages.
    pub fn silent() -> Self {
        Self { echo: false, ..Self::new() }
    }

    /// Returns the messages reported so far.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the count of warnings reported so far.
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Returns the count of errors reported so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Compiles the definition file at `path`.
    pub fn compile_file(&mut self, path: &str) -> Result<Output, usize> {
        let tokens = self.open(path)?;
        self.compile(tokens)
    }

    /// Compiles in-memory definition `text`, named `name` in messages.
    pub fn compile_str(&mut self, name: &str, text: &str) -> Result<Output, usize> {
        self.compile(Tokenizer::from_text(name, text))
    }

    /// Compiles the definition file at `input` and writes the generated code
    /// to `output`.  Nothing is written unless compilation succeeds.
    pub fn compile_to_file(&mut self, input: &str, output: &str) -> Result<Output, usize> {
        let result = self.compile_file(input)?;

        if let Err(e) = fs::write(output, &result.code) {
            file_error(output, &e).tell(self);
            return Err(self.error_count)
        }

        log::debug!("wrote {} bytes to {}", result.code.len(), output);
        Ok(result)
    }

    /// Parses, validates, and emits the definition read by `tokens`.
    pub fn compile(&mut self, tokens: Tokenizer) -> Result<Output, usize> {
        let mut parser = Parser::new(tokens, self);
        let result     = parser.parse();
        let lines_read = parser.tokens().total_lines_read();

        let def = match result {
            Ok(def) => def,
            Err(_)  => return Err(self.error_count),
        };

        if validate(&def, self).is_err() {
            return Err(self.error_count)
        }

        match emit_to_vec(&def) {
            Ok(code) => Ok(Output { code, lines_read }),
            Err(e)   => {
                Message::new(Severity::Error, Category::Emit, e.to_string()).tell(self);
                Err(self.error_count)
            },
        }
    }

    /// Parses the definition file at `path` without validating it.
    pub fn parse_file(&mut self, path: &str) -> Result<Definition, usize> {
        let tokens = self.open(path)?;
        Parser::new(tokens, self).parse()
    }

    /// Writes a table of the tokens in the file at `path` to `out`.
    pub fn print_tokens<W: Write>(&mut self, path: &str, out: &mut W) -> io::Result<()> {
        let mut tokens = match self.open(path) {
            Ok(tokens) => tokens,
            Err(_)     => return Ok(()),
        };

        writeln!(out, "[{}:tokens]", path)?;

        //              0         1         2         3         4         5         6
        //              0 2 4 6 8 0 2 4 6 8 0 2 4 6 8 0 2 4 6 8 0 2 4 6 8 0 2 4 6 8 0
        writeln!(out, "╭──────┬──────────────┬──────────────────────────────────────╮")?;
        writeln!(out, "│ LINE │ TYPE         │ VALUE                                │")?;
        writeln!(out, "╞══════╪══════════════╪══════════════════════════════════════╡")?;

        loop {
            let token = tokens.next_token();
            for msg in tokens.take_errors() {
                msg.tell(self);
            }

            let value = token.text.split_whitespace().collect::<Vec<_>>().join(" ");
            writeln!(out,
                "│ {:4} │ {:12} │ {:<36.36} │",
                token.line, token.kind.name(), value
            )?;

            if token.is(TokenKind::Eof) { break }
        }

        writeln!(out, "╰──────┴──────────────┴──────────────────────────────────────╯")
    }

    /// Writes the parsed definition in the file at `path` to `out` as a tree.
    pub fn print_definition<W: Write>(&mut self, path: &str, out: &mut W) -> io::Result<()> {
        if let Ok(def) = self.parse_file(path) {
            writeln!(out, "[{}:definition]", path)?;
            write!(out, "{}", def.for_display())?;
        }
        Ok(())
    }

    fn open(&mut self, path: &str) -> Result<Tokenizer, usize> {
        Tokenizer::open_file(path).map_err(|e| {
            Message::new(Severity::Fatal, Category::File, e.to_string()).tell(self);
            self.error_count
        })
    }

    fn record(&mut self, msg: Message) {
        if self.echo {
            eprintln!("{}", msg.to_colored_string());
        }
        self.messages.push(msg);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for Session {
    fn log(&mut self, msg: Message) {
        self.record(msg);
    }

    fn log_warning(&mut self, msg: Message) {
        self.warning_count += 1;
        self.record(msg);
    }

    fn log_error(&mut self, msg: Message) {
        self.error_count += 1;
        self.record(msg);
    }
}

// ----------------------------------------------------------------------------
