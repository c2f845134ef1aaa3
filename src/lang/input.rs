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

//! Character source and logical character set trait.

use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

use thiserror::Error;

// ----------------------------------------------------------------------------

/// Trait for logical characters yielded by a [`CharacterSource`].
///
/// A 'logical character' in smc is effectively a character equivalence class:
/// a value that represents a set of input values which receive identical
/// treatment at some point during lexical analysis.  A 'logical character set'
/// is a set that contains sufficient logical characters to represent all byte
/// values plus an additional logical character to indicate the end of input.
///
pub trait LogicalChar: Copy + Eq {
    /// Logical character that represents a byte beyond the 7-bit ASCII range.
    const NON_ASCII: Self;

    /// Logical character that represents an end-of-input condition.
    const EOF: Self;
}

/// Classifies `byte` as some logical character of type `C` using the given
/// character `map`.  `None` classifies as [`LogicalChar::EOF`].
#[inline(always)]
pub fn classify<C: LogicalChar>(byte: Option<u8>, map: &[C; 128]) -> C {
    match byte {
        Some(b) if b < 128 => map[b as usize],
        Some(_)            => C::NON_ASCII,
        None               => C::EOF,
    }
}

// ----------------------------------------------------------------------------

/// Maximum count of bytes that can be pushed back onto one open file.
pub const PUSHBACK_CAPACITY: usize = 50;

/// Name reported when no file is open.
const NO_FILE: &str = "no file is open";

/// Maximum nesting depth of included files.
pub const MAX_INCLUDE_DEPTH: usize = 32;

/// Error returned when a file cannot be opened.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be read.
    #[error("Cannot open file \"{path}\": {source}")]
    Open { path: String, source: io::Error },

    /// The file would be included too deeply, as by an include cycle.
    #[error("Cannot include file \"{path}\": includes are nested more than {} deep", MAX_INCLUDE_DEPTH)]
    TooDeep { path: String },
}

impl FileError {
    /// Returns the path of the file.
    pub fn path(&self) -> &str {
        match self {
            Self::Open    { path, .. } => path,
            Self::TooDeep { path }     => path,
        }
    }
}

/// An open file on the [`CharacterSource`] stack.
#[derive(Debug)]
struct Frame {
    name:     Rc<str>,
    bytes:    Vec<u8>,
    pos:      usize,
    line:     u32,
    nesting:  usize,
    pushback: Vec<u8>,
}

/// The most recently closed file.
#[derive(Debug)]
struct Closed {
    name:    Rc<str>,
    line:    u32,
    nesting: usize,
}

/// Input source specialized for lexical analysis.
///
/// A `CharacterSource` holds a stack of open files.  Bytes are read from the
/// most recently opened file; when that file is exhausted, it is closed and
/// reading continues with the file beneath it.  The end of input is reached
/// only when every file has been closed.
///
#[derive(Debug, Default)]
pub struct CharacterSource {
    stack:       Vec<Frame>,
    last:        Option<Closed>,
    total_lines: u32,
}

impl CharacterSource {
    /// Creates a new [`CharacterSource`] with no open files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the file at `path` and reads from it until it is exhausted.
    pub fn open(&mut self, path: &str) -> Result<(), FileError> {
        let bytes = read_file(path)?;
        self.push_frame(path, bytes, 0);
        Ok(())
    }

    /// Opens the file at `path`, included by the file named `from`, and reads
    /// from it until it is exhausted.
    ///
    /// A relative `path` is resolved against the directory of `from`.  Fails
    /// if the included file would be nested more than [`MAX_INCLUDE_DEPTH`]
    /// files deep.
    pub fn include(&mut self, from: &str, path: &str) -> Result<(), FileError> {
        let path    = resolve(from, path);
        let nesting = self.nesting_of(from) + 1;

        if nesting > MAX_INCLUDE_DEPTH {
            return Err(FileError::TooDeep { path })
        }

        let bytes = read_file(&path)?;
        self.push_frame(&path, bytes, nesting);
        Ok(())
    }

    /// Pushes in-memory content named `name` onto the stack, as if it were an
    /// opened file.
    pub fn push_bytes(&mut self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.push_frame(name, bytes.into(), 0);
    }

    fn push_frame(&mut self, name: &str, bytes: Vec<u8>, nesting: usize) {
        log::debug!("opening {}", name);
        self.stack.push(Frame {
            name:     name.into(),
            bytes,
            pos:      0,
            line:     1,
            nesting,
            pushback: Vec::with_capacity(PUSHBACK_CAPACITY),
        });
    }

    // Include nesting of the file named `name`.  The file may have just been
    // closed, when its last token ended at the end of the file.
    fn nesting_of(&self, name: &str) -> usize {
        if let Some(frame) = self.stack.iter().rev().find(|f| &*f.name == name) {
            return frame.nesting
        }
        match &self.last {
            Some(closed) if &*closed.name == name => closed.nesting,
            _                                     => 0,
        }
    }

    /// Reads the next byte.  Returns `None` once every file is exhausted.
    pub fn read(&mut self) -> Option<u8> {
        loop {
            let frame = self.stack.last_mut()?;

            let byte = match frame.pushback.pop() {
                Some(b) => Some(b),
                None    => {
                    let b = frame.bytes.get(frame.pos).copied();
                    frame.pos += b.is_some() as usize;
                    b
                },
            };

            match byte {
                Some(b'\n') => {
                    frame.line       += 1;
                    self.total_lines += 1;
                    return Some(b'\n')
                },
                Some(b) => return Some(b),
                None    => self.close(),
            }
        }
    }

    /// Reads the next byte and classifies it as some logical character of type
    /// `C` using the given character `map`.
    #[inline]
    pub fn read_class<C: LogicalChar>(&mut self, map: &[C; 128]) -> (C, Option<u8>) {
        let byte = self.read();
        (classify(byte, map), byte)
    }

    /// Pushes `byte` back onto the current file, to be read again next.
    ///
    /// # Panics
    ///
    /// Panics if more than [`PUSHBACK_CAPACITY`] bytes are pending.
    ///
    pub fn unread(&mut self, byte: u8) {
        let frame = match self.stack.last_mut() {
            Some(f) => f,
            None    => return,
        };

        if frame.pushback.len() >= PUSHBACK_CAPACITY {
            panic!("Pushback buffer overflow in {}.", frame.name)
        }

        if byte == b'\n' {
            frame.line       -= 1;
            self.total_lines -= 1;
        }

        frame.pushback.push(byte);
    }

    /// Returns the name of the current file.
    pub fn current_file_name(&self) -> &str {
        match (self.stack.last(), &self.last) {
            (Some(f), _)            => &f.name,
            (None, Some(closed))    => &closed.name,
            (None, None)            => NO_FILE,
        }
    }

    /// Returns the shared name of the current file.
    pub fn current_file(&self) -> Rc<str> {
        match (self.stack.last(), &self.last) {
            (Some(f), _)            => f.name.clone(),
            (None, Some(closed))    => closed.name.clone(),
            (None, None)            => NO_FILE.into(),
        }
    }

    /// Returns the 1-based line number within the current file.
    pub fn current_line_number(&self) -> u32 {
        match (self.stack.last(), &self.last) {
            (Some(f), _)            => f.line,
            (None, Some(closed))    => closed.line,
            (None, None)            => 0,
        }
    }

    /// Returns the count of lines read from all files so far.
    #[inline]
    pub fn total_lines_read(&self) -> u32 {
        self.total_lines
    }

    fn close(&mut self) {
        if let Some(frame) = self.stack.pop() {
            log::debug!("closing {} after line {}", frame.name, frame.line);
            self.last = Some(Closed {
                name:    frame.name,
                line:    frame.line,
                nesting: frame.nesting,
            });
        }
    }
}

fn read_file(path: &str) -> Result<Vec<u8>, FileError> {
    fs::read(path).map_err(|source| FileError::Open { path: path.to_string(), source })
}

/// Resolves an include `path` written in the file named `from`.
///
/// A relative path is tried first relative to the directory of `from`.  If no
/// such file exists, `path` is returned as given.
fn resolve(from: &str, path: &str) -> String {
    match Path::new(from).parent() {
        Some(dir) if Path::new(path).is_relative() => {
            let joined = dir.join(path);
            if joined.is_file() {
                return joined.to_string_lossy().into_owned()
            }
            path.to_string()
        },
        _ => path.to_string(),
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
pub mod tests {
    use super::*;
    use Char::*;

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    enum Char { Lc, Uc, Etc, Non, Eof }

    impl LogicalChar for Char {
        const NON_ASCII: Self = Non;
        const EOF:       Self = Eof;
    }

    /// Mapping of 7-bit ASCII to logical characters.
    static CHARS: [Char; 128] = {
        const __: Char = Etc;
    [
    //  x0  x1  x2  x3  x4  x5  x6  x7
    //  x8  x9  xA  xB  xC  xD  xE  xF
        __, __, __, __, __, __, __, __, // 0x │········│
        __, __, __, __, __, __, __, __, // 0x │·tn··r··│
        __, __, __, __, __, __, __, __, // 1x │········│
        __, __, __, __, __, __, __, __, // 1x │········│
        __, __, __, __, __, __, __, __, // 2x │ !"#$%&'│
        __, __, __, __, __, __, __, __, // 2x │()*+,-./│
        __, __, __, __, __, __, __, __, // 3x │01234567│
        __, __, __, __, __, __, __, __, // 3x │89:;<=>?│
        __, Uc, Uc, Uc, Uc, Uc, Uc, Uc, // 4x │@ABCDEFG│
        Uc, Uc, Uc, Uc, Uc, Uc, Uc, Uc, // 4x │HIJKLMNO│
        Uc, Uc, Uc, Uc, Uc, Uc, Uc, Uc, // 5x │PQRSTUVW│
        Uc, Uc, Uc, __, __, __, __, __, // 5x │XYZ[\]^_│
        __, Lc, Lc, Lc, Lc, Lc, Lc, Lc, // 6x │`abcdefg│
        Lc, Lc, Lc, Lc, Lc, Lc, Lc, Lc, // 6x │hijklmno│
        Lc, Lc, Lc, Lc, Lc, Lc, Lc, Lc, // 7x │pqrstuvw│
        Lc, Lc, Lc, __, __, __, __, __, // 7x │xyz{|}~░│
    ]};

    #[test]
    fn source_empty() {
        let mut src = CharacterSource::new();

        assert_eq!( src.read(),                None      );
        assert_eq!( src.current_file_name(),   NO_FILE   );
        assert_eq!( src.current_line_number(), 0         );
    }

    #[test]
    fn source_classify() {
        let mut src = CharacterSource::new();
        src.push_bytes("a.sm", "Hi!\u{ED}");

        assert_eq!( src.read_class(&CHARS), (Uc,  Some(b'H'))  );
        assert_eq!( src.read_class(&CHARS), (Lc,  Some(b'i'))  );
        assert_eq!( src.read_class(&CHARS), (Etc, Some(b'!'))  );
        assert_eq!( src.read_class(&CHARS), (Non, Some(0xC3))  );
        assert_eq!( src.read_class(&CHARS), (Non, Some(0xAD))  );
        assert_eq!( src.read_class(&CHARS), (Eof, None)        );
        assert_eq!( src.read_class(&CHARS), (Eof, None)        );
    }

    #[test]
    fn source_lines() {
        let mut src = CharacterSource::new();
        src.push_bytes("a.sm", "a\nb\n");

        assert_eq!( src.current_line_number(), 1           );
        assert_eq!( src.read(),                Some(b'a')  );
        assert_eq!( src.read(),                Some(b'\n') );
        assert_eq!( src.current_line_number(), 2           );

        src.unread(b'\n');
        assert_eq!( src.current_line_number(), 1           );
        assert_eq!( src.total_lines_read(),    0           );

        assert_eq!( src.read(),                Some(b'\n') );
        assert_eq!( src.read(),                Some(b'b')  );
        assert_eq!( src.read(),                Some(b'\n') );
        assert_eq!( src.current_line_number(), 3           );
        assert_eq!( src.total_lines_read(),    2           );
    }

    #[test]
    fn source_unread_lifo() {
        let mut src = CharacterSource::new();
        src.push_bytes("a.sm", "z");

        src.unread(b'x');
        src.unread(b'y');

        assert_eq!( src.read(), Some(b'y') );
        assert_eq!( src.read(), Some(b'x') );
        assert_eq!( src.read(), Some(b'z') );
        assert_eq!( src.read(), None       );
    }

    #[test]
    fn source_nested() {
        let mut src = CharacterSource::new();
        src.push_bytes("outer.sm", "ab\nc");
        assert_eq!( src.read(), Some(b'a') );

        src.push_bytes("inner.sm", "x\ny");
        assert_eq!( src.stack.len(),           2          );
        assert_eq!( src.read(),                Some(b'x') );
        assert_eq!( src.read(),                Some(b'\n'));
        assert_eq!( src.read(),                Some(b'y') );
        assert_eq!( src.current_file_name(),   "inner.sm" );
        assert_eq!( src.current_line_number(), 2          );

        assert_eq!( src.read(),                Some(b'b') );
        assert_eq!( src.stack.len(),           1          );
        assert_eq!( src.current_file_name(),   "outer.sm" );
        assert_eq!( src.current_line_number(), 1          );

        assert_eq!( src.read(),                Some(b'\n'));
        assert_eq!( src.read(),                Some(b'c') );
        assert_eq!( src.read(),                None       );
        assert_eq!( src.current_file_name(),   "outer.sm" );
        assert_eq!( src.current_line_number(), 2          );
        assert_eq!( src.total_lines_read(),    2          );
    }

    #[test]
    #[should_panic]
    fn source_unread_overflow() {
        let mut src = CharacterSource::new();
        src.push_bytes("a.sm", "");

        for _ in 0..=PUSHBACK_CAPACITY {
            src.unread(b'x');
        }
    }

    #[test]
    fn source_open_missing() {
        let mut src = CharacterSource::new();

        let err = src.open("/nonexistent/dir/missing.sm").unwrap_err();

        assert_eq!( err.path(),      "/nonexistent/dir/missing.sm" );
        assert_eq!( src.stack.len(), 0                             );
        assert!( err.to_string().starts_with(
            "Cannot open file \"/nonexistent/dir/missing.sm\": "
        ));
    }

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("smc_input_{}", name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn source_include_after_close() {
        let dir  = temp_dir("include_after_close");
        let main = dir.join("main.sm");
        fs::write(&main,                 "a").unwrap();
        fs::write(dir.join("inner.sm"),  "b").unwrap();
        let main = main.to_str().unwrap();

        let mut src = CharacterSource::new();
        src.open(main).unwrap();
        assert_eq!( src.read(),       Some(b'a') );
        assert_eq!( src.read(),       None       );
        assert_eq!( src.stack.len(),  0          );

        src.include(main, "inner.sm").unwrap();
        assert_eq!( src.read(),       Some(b'b') );
        assert_eq!( src.current_file_name(), dir.join("inner.sm").to_str().unwrap() );
    }

    #[test]
    fn source_include_too_deep() {
        let dir  = temp_dir("include_too_deep");
        let path = dir.join("a.sm");
        fs::write(&path, "x").unwrap();
        let path = path.to_str().unwrap();

        let mut src = CharacterSource::new();
        src.open(path).unwrap();

        for _ in 0..MAX_INCLUDE_DEPTH {
            src.include(path, "a.sm").unwrap();
        }
        let err = src.include(path, "a.sm").unwrap_err();

        assert_eq!( err.path(),      path                  );
        assert_eq!( src.stack.len(), MAX_INCLUDE_DEPTH + 1 );
        assert!( matches!(err, FileError::TooDeep { .. }) );
    }

    #[test]
    fn source_include_sibling_depth() {
        let dir   = temp_dir("include_sibling_depth");
        let outer = dir.join("outer.sm");
        fs::write(&outer,              "x").unwrap();
        fs::write(dir.join("b.sm"),    "y").unwrap();
        let outer = outer.to_str().unwrap();

        let mut src = CharacterSource::new();
        src.open(outer).unwrap();

        // Includes that follow one another do not nest.
        for _ in 0..=MAX_INCLUDE_DEPTH {
            src.include(outer, "b.sm").unwrap();
            assert_eq!( src.read(), Some(b'y') );
        }
    }
}
