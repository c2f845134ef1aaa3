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

//! Consistency checks between machine declarations and definitions.

use crate::lang::ast::{Definition, Machine, DEFAULT, END, ERROR};
use crate::message::{Category, Log, Message, Severity};
use crate::session::Session;
use crate::symbol::SymbolTable;
use crate::util::Location;

/// Checks every machine in `def`.
///
/// Problems that would produce an unusable dispatch table are reported as
/// errors; suspicious but harmless constructs are reported as warnings.
/// Returns `Err` with the count of errors if any error was reported.
pub fn validate(def: &Definition, session: &mut Session) -> Result<(), usize> {
    let mut checker = Checker { session, errors: 0 };

    for machine in &def.machines {
        checker.check_machine(machine);
    }

    log::debug!("validated {} machine(s), {} error(s)", def.machines.len(), checker.errors);

    match checker.errors {
        0 => Ok(()),
        n => Err(n),
    }
}

struct Checker<'a> {
    session: &'a mut Session,
    errors:  usize,
}

impl Checker<'_> {
    fn check_machine(&mut self, m: &Machine) {
        if m.input.is_none() {
            self.error(m, m.line, format!("Machine \"{}\" has no input directive", m.name));
        }
        if m.transition_names.is_empty() {
            self.error(m, m.line, format!("Machine \"{}\" has no transitions directive", m.name));
        }

        let transitions = self.declared(m, &m.transition_names, "Transition");
        let states      = self.declared(m, &m.state_names,      "State");

        for name in states.names() {
            if transitions.contains(name) {
                self.warning(m, m.line, format!(
                    "Name \"{}\" is used as both a state and a transition", name
                ));
            }
            if is_reserved(name) {
                self.error(m, m.line, format!("State \"{}\" is reserved", name));
            } else if m.state(name).is_none() {
                self.error(m, m.line, format!("State \"{}\" is declared but not defined", name));
            }
        }

        let mut defined = SymbolTable::new();

        for state in &m.states {
            if !defined.add(&state.name, ()) {
                self.error(m, state.line, format!(
                    "State \"{}\" is defined more than once", state.name
                ));
            } else if is_reserved(&state.name) {
                self.error(m, state.line, format!("State \"{}\" is reserved", state.name));
            } else if !states.contains(&state.name) {
                self.warning(m, state.line, format!(
                    "State \"{}\" is defined but not declared", state.name
                ));
            }

            let mut handled = SymbolTable::new();

            for rule in &state.rules {
                for name in &rule.names {
                    if !handled.add(name, ()) {
                        match name.as_str() {
                            DEFAULT => self.warning(m, rule.line, format!(
                                "State \"{}\" has more than one {} rule", state.name, DEFAULT
                            )),
                            _ => self.warning(m, rule.line, format!(
                                "Transition \"{}\" is handled by more than one rule in state \"{}\"",
                                name, state.name
                            )),
                        }
                    }
                    if name != DEFAULT && !transitions.contains(name) {
                        self.error(m, rule.line, format!(
                            "Transition \"{}\" is not declared", name
                        ));
                    }
                }

                if !is_reserved(&rule.next) && !states.contains(&rule.next) {
                    self.error(m, rule.line, format!(
                        "State \"{}\" is not declared", rule.next
                    ));
                }
            }
        }
    }

    // Builds a table of the names in a declaration list, reporting duplicates.
    fn declared(&mut self, m: &Machine, names: &[String], what: &str) -> SymbolTable<()> {
        let mut table = SymbolTable::new();
        for name in names {
            if !table.add(name, ()) {
                self.error(m, m.line, format!("{} \"{}\" is declared more than once", what, name));
            }
        }
        table
    }

    fn error(&mut self, m: &Machine, line: u32, text: String) {
        self.errors += 1;
        self.report(m, line, Severity::Error, text);
    }

    fn warning(&mut self, m: &Machine, line: u32, text: String) {
        self.report(m, line, Severity::Warning, text);
    }

    fn report(&mut self, m: &Machine, line: u32, sev: Severity, text: String) {
        Message::at(&m.file, Location::at_line(line), sev, Category::Check, text)
            .tell(&mut *self.session);
    }
}

fn is_reserved(name: &str) -> bool {
    name == END || name == ERROR
}

// ----------------------------------------------------------------------------
