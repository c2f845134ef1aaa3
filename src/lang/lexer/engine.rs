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

//! State machine execution engine.
//!
//! Every lexer state machine is a table indexed by logical character and
//! state.  Each cell holds a [`Step`]: the next state and an [`Action`] to
//! perform.  The engine reads one character, looks up the step, performs the
//! action, and moves to the next state, repeating until the machine reaches
//! its `End` or `Error` state.  Actions have side effects only; some actions
//! run a nested machine to completion before the outer machine continues.

use std::fmt::Debug;

use super::*;

// ----------------------------------------------------------------------------

/// Trait for the states of a lexer state machine.
pub(super) trait State: Copy + Eq + Debug + 'static {
    /// Initial state.
    const START: Self;

    /// Final state reached on success.
    const END: Self;

    /// Final state reached on failure.
    const ERROR: Self;

    /// Returns the column of the state in a transition table.
    fn index(self) -> usize;

    /// Returns `true` if the machine stops in this state.
    #[inline]
    fn is_final(self) -> bool {
        self == Self::END || self == Self::ERROR
    }
}

/// Declares the states of a lexer state machine.  `End` and `Error` are
/// appended to the given states; the first given state must be `Start`.
macro_rules! states {
    ($(#[$attr:meta])* enum $name:ident { $($(#[$vattr:meta])* $variant:ident,)* }) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug)]
        #[repr(u8)]
        pub(super) enum $name {
            $($(#[$vattr])* $variant,)*
            /// Final state reached on success.
            End,
            /// Final state reached on failure.
            Error,
        }

        impl $name {
            /// Count of non-final states.
            pub(super) const COUNT: usize = Self::End as usize;
        }

        impl super::engine::State for $name {
            const START: Self = Self::Start;
            const END:   Self = Self::End;
            const ERROR: Self = Self::Error;

            #[inline]
            fn index(self) -> usize {
                self as usize
            }
        }
    };
}

pub(super) use states;

// ----------------------------------------------------------------------------

/// Actions performed by lexer state machines.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(super) enum Action {
    /// Do nothing.
    Nop,

    /// Append the character to the word.
    Copy,

    /// Push the character back onto the input, to be read again.
    Push,

    // === Errors ===

    /// Report an invalid character.
    InvalidChar,

    /// Report a newline within a quoted string.
    UnexpectedNewline,

    /// Report the end of input within a quoted string, block, or comment.
    UnexpectedEof,

    /// Report a `}` directly after a `%`.
    UnexpectedCCurly,

    // === Nested machines ===

    /// Start a word with the character and scan an identifier.
    Word,

    /// Start a word with the character and scan a `'` string.
    Squote,

    /// Start a word with the character and scan a `"` string.
    Dquote,

    /// Start a word with `%{` and scan a raw block.
    RawBlock,

    /// Start a word with `{{` and scan an inline block.
    InlineBlock,

    /// Discard a `//` comment, then empty the word.
    Sline,

    /// Discard a `/* */` comment, then empty the word.
    Mline,
}

/// Transition table cell: the next state and the action to perform.
pub(super) type Step<S> = (S, Action);

/// A lexer state machine.
#[derive(Debug)]
pub(super) struct Machine<S: 'static, const N: usize> {
    /// Name used in trace output.
    pub name: &'static str,

    /// Transition table, indexed by logical character, then by state.
    pub table: &'static [[Step<S>; N]; Char::COUNT],
}

// ----------------------------------------------------------------------------

impl Lexer {
    /// Runs `machine` until it reaches a final state.  Returns `true` if the
    /// final state is `End`.
    pub(super) fn run<S: State, const N: usize>(&mut self, machine: &Machine<S, N>) -> bool {
        log::trace!("{} enter", machine.name);

        let mut state = S::START;

        while !state.is_final() && !self.failed {
            let (c, byte)      = self.input.read_class(&CHARS);
            let (next, action) = machine.table[c as usize][state.index()];

            log::trace!(
                "{}: {:?} + {:?} {:?} => {:?} {:?}",
                machine.name, state, c, byte.map(char::from), next, action
            );

            self.perform(action, byte);
            state = next;
        }

        log::trace!("{} return {:?}", machine.name, state);
        state == S::END && !self.failed
    }

    /// Performs `action` for the input `byte` (`None` at the end of input).
    fn perform(&mut self, action: Action, byte: Option<u8>) {
        use Action::*;

        match action {
            Nop               => (),
            Copy              => if let Some(b) = byte { self.push(b) },
            Push              => if let Some(b) = byte { self.input.unread(b) },
            InvalidChar       => self.invalid_char(byte),
            UnexpectedNewline => self.scan_error("Unexpected newline encountered".into()),
            UnexpectedEof     => self.scan_error("Unexpected end of file encountered".into()),
            UnexpectedCCurly  => self.scan_error("Unexpected '}' encountered".into()),
            Word              => self.scan_nested(byte, &word::WORD),
            Squote            => self.scan_nested(byte, &quoted::SQUOTE),
            Dquote            => self.scan_nested(byte, &quoted::DQUOTE),
            RawBlock          => self.scan_block(b"%{", &block::RAW_BLOCK),
            InlineBlock       => self.scan_block(b"{{", &block::INLINE_BLOCK),
            Sline             => self.skip_comment(&comment::SLINE),
            Mline             => self.skip_comment(&comment::MLINE),
        }
    }

    /// Restarts the word with `byte`, then runs `machine`.
    fn scan_nested<S: State, const N: usize>(&mut self, byte: Option<u8>, machine: &Machine<S, N>) {
        self.word.clear();
        if let Some(b) = byte {
            self.push(b);
        }
        self.run(machine);
    }

    /// Restarts the word with the `open` delimiter, then runs `machine`.
    fn scan_block<S: State, const N: usize>(&mut self, open: &[u8], machine: &Machine<S, N>) {
        self.word.clear();
        for &b in open {
            self.push(b);
        }
        self.run(machine);
    }

    /// Runs `machine` to discard a comment, then empties the word.
    fn skip_comment<S: State, const N: usize>(&mut self, machine: &Machine<S, N>) {
        self.run(machine);
        self.word.clear();
    }

    fn invalid_char(&mut self, byte: Option<u8>) {
        let b = byte.unwrap_or(0);
        self.scan_error(format!(
            "Invalid character '{}' (0x{:02X}) encountered",
            char::from(b).escape_default(), b
        ));
    }
}
