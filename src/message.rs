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

//! Compiler messages.

use std::fmt::{self, Display, Formatter};

use colored::*;

use crate::util::Location;

// -----------------------------------------------------------------------------

/// A compiler message.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Severity of the message.
    pub severity: Severity,

    /// Compilation phase that produced the message.
    pub category: Category,

    /// Path of a source file related to the message, or the program name if no
    /// source file is related.
    pub source: String,

    /// Textual location within source file related to the message, or
    /// [`Location::UNKNOWN`] if no location is related.
    pub location: Location,

    /// Message content.
    pub content: String,
}

impl Message {
    /// Creates a `Message` with the given severity, category, and content,
    /// without a related source file path or textual location.
    #[inline]
    pub fn new(sev: Severity, cat: Category, content: impl Into<String>) -> Self {
        Self::at(crate::PROGRAM_NAME, Location::UNKNOWN, sev, cat, content)
    }

    /// Creates a `Message` with the given severity, category, and content,
    /// related to the given source file path and textual location.
    #[inline]
    pub fn at(
        path:    &str,
        loc:     Location,
        sev:     Severity,
        cat:     Category,
        content: impl Into<String>,
    ) -> Self {
        Self {
            severity: sev,
            category: cat,
            source:   path.to_string(),
            location: loc,
            content:  content.into(),
        }
    }

    /// Sends the message to `log` according to its severity.
    pub fn tell<L: Log + ?Sized>(self, log: &mut L) {
        match self.severity {
            Severity::Normal                   => log.log(self),
            Severity::Warning                  => log.log_warning(self),
            Severity::Error | Severity::Fatal  => log.log_error(self),
        }
    }

    /// Returns the message formatted for a terminal, with the category and
    /// severity highlighted.
    pub fn to_colored_string(&self) -> String {
        let kind = format!("{} {}", self.category, self.severity);
        let kind = match self.severity {
            Severity::Normal  => kind.normal(),
            Severity::Warning => kind.yellow().bold(),
            Severity::Error   => kind.red().bold(),
            Severity::Fatal   => kind.bright_red().bold(),
        };
        format!("{}: {}{}", self.prefix(), kind, self.content)
    }

    fn prefix(&self) -> String {
        if self.location.is_unknown() {
            self.source.clone()
        } else {
            format!("{}:{}", self.source, self.location)
        }
    }
}

// Display is used when a Message is printed as output.
impl Display for Message {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {} {}{}",
            self.prefix(),
            self.category,
            self.severity,
            self.content
        )
    }
}

// -----------------------------------------------------------------------------

/// Message severity levels.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Severity {
    /// For informational messages.
    Normal,

    /// For potential problems that do not prevent compilation.
    /// Compilation continues, and the compiler will produce output.
    Warning,

    /// For problems that prevent compilation.
    /// Compilation might continue, but the compiler will not produce output.
    Error,

    /// For severe, unrecoverable problems.
    /// The compiler stops immediately and does not produce output.
    Fatal,
}

// Display is used when a Severity is printed in a compiler message.
impl Display for Severity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            Severity::Normal  => "",
            Severity::Warning => "warning: ",
            Severity::Error   => "error: ",
            Severity::Fatal   => "error: ",
        })
    }
}

// -----------------------------------------------------------------------------

/// Compilation phases that produce messages.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Category {
    /// Internal failures that end the process.
    Fatal,

    /// Unexpected tokens and malformed constructs.
    Syntax,

    /// Files that cannot be opened, read, or written.
    File,

    /// Invalid characters and unterminated literals or blocks.
    Scan,

    /// Constructs that could not be read as a whole.
    Parse,

    /// Inconsistencies between declarations and definitions.
    Check,

    /// Failures while generating output.
    Emit,
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            Category::Fatal  => "fatal",
            Category::Syntax => "syntax",
            Category::File   => "file",
            Category::Scan   => "scan",
            Category::Parse  => "parse",
            Category::Check  => "check",
            Category::Emit   => "emit",
        })
    }
}

// -----------------------------------------------------------------------------

/// Trait for types that accept compiler messages.
pub trait Log {
    /// Records an informational message.
    fn log(&mut self, msg: Message);

    /// Records a warning message.
    fn log_warning(&mut self, msg: Message);

    /// Records an error message.
    fn log_error(&mut self, msg: Message);
}

// -----------------------------------------------------------------------------

/// Creates a 'cannot open file' message.
pub fn file_error(path: &str, reason: &dyn Display) -> Message {
    Message::new(Severity::Fatal, Category::File, format!(
        "Cannot open file \"{}\": {}", path, reason
    ))
}

// -----------------------------------------------------------------------------
