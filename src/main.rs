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

//! Program entry point.

use std::env::args;
use std::io::{stderr, stdout, IsTerminal};
use std::process::exit;

use log::{LevelFilter, Metadata, Record};

use smc::session::Session;
use smc::PROGRAM_NAME;

const USAGE: &str = "\
use: -i:inputfilename -o:outputfilename
     -t    print the token table
     -d    print the parsed definition
     -v    print debug trace (-vv for more)";

/// Command-line options.
#[derive(Clone, Default, Debug)]
struct Options {
    input:       Option<String>,
    output:      Option<String>,
    tokens:      bool,
    definition:  bool,
    verbosity:   u8,
}

impl Options {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Option<Self> {
        let mut opts = Self::default();

        for arg in args {
            if let Some(path) = arg.strip_prefix("-i:") {
                if opts.input.is_some() || path.is_empty() { return None }
                opts.input = Some(path.to_string());
            } else if let Some(path) = arg.strip_prefix("-o:") {
                if opts.output.is_some() || path.is_empty() { return None }
                opts.output = Some(path.to_string());
            } else {
                match arg.as_str() {
                    "-t"  => opts.tokens     = true,
                    "-d"  => opts.definition = true,
                    "-v"  => opts.verbosity  = opts.verbosity.max(1),
                    "-vv" => opts.verbosity  = 2,
                    _     => return None,
                }
            }
        }

        let dumping = opts.tokens || opts.definition;
        if opts.input.is_none() || (opts.output.is_none() && !dumping) {
            return None
        }

        Some(opts)
    }
}

// Minimal stderr logger for -v/-vv.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}: {}", PROGRAM_NAME, record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn main() {
    let opts = match Options::parse(args().skip(1)) {
        Some(opts) => opts,
        None       => {
            eprintln!("{}", USAGE);
            exit(2)
        },
    };

    colored::control::set_override(stderr().is_terminal());

    if opts.verbosity > 0 && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(match opts.verbosity {
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        });
    }

    exit(run(&opts))
}

fn run(opts: &Options) -> i32 {
    let mut session = Session::new();

    let input = match opts.input.as_deref() {
        Some(input) => input,
        None        => return 2,
    };

    if opts.tokens && session.print_tokens(input, &mut stdout()).is_err() {
        return 1
    }

    if opts.definition && session.print_definition(input, &mut stdout()).is_err() {
        return 1
    }

    let output = match opts.output.as_deref() {
        Some(output) => output,
        None         => return (session.error_count() > 0) as i32,
    };

    println!("input file: {}", input);
    println!("output file: {}", output);

    let result = session.compile_to_file(input, output);
    log::debug!("{} warning(s), {} error(s)", session.warning_count(), session.error_count());

    match result {
        Ok(result) => {
            println!("read {} lines, total", result.lines_read);
            0
        },
        Err(_) => 1,
    }
}
