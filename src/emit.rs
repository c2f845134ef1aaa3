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

//! C code generator.
//!
//! The output of a definition is, in order:
//!
//! - the preamble, without delimiters;
//! - fixed declarations: the `state_t` table cell type and a `PRINT` macro;
//! - one wrapper function per inline block, named `_0000`, `_0001`, ...;
//! - a `func_to_strg` macro mapping each action function to its name;
//! - a prototype per machine;
//! - a function per machine, holding a state enum, the dispatch table, and
//!   the driver loop;
//! - the postamble, without delimiters.

use std::collections::HashMap;
use std::io::{self, Write};

use thiserror::Error;

use crate::lang::ast::{Code, Definition, Hook, Machine, State};
use crate::symbol::SymbolTable;
use crate::util::strip_delimiters;

/// Error returned when output cannot be generated.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The output could not be written.
    #[error("Cannot write output: {0}")]
    Io(#[from] io::Error),

    /// A state has no rule for a transition, and no `DEFAULT` rule.
    #[error("Machine \"{machine}\": state \"{state}\" has no rule for transition \"{transition}\"")]
    Unresolved {
        machine:    String,
        state:      String,
        transition: String,
    },

    /// A machine has no input function.
    #[error("Machine \"{machine}\" has no input function")]
    MissingInput {
        machine: String,
    },

    /// A declared state has no definition.
    #[error("Machine \"{machine}\": state \"{state}\" is declared but not defined")]
    UndefinedState {
        machine: String,
        state:   String,
    },
}

const FIRST_PART: &str = "\
/*******************************************************************************
*  Generated code below this point
******************************************************************************/

typedef struct {
    int state;
    int (*func)(void);
} state_t;

//#define DEBUGGING

#ifdef DEBUGGING
#  define PRINT(fmt, ...) fprintf(stderr, fmt, ## __VA_ARGS__)
#else
#  define PRINT(fmt, ...)
#endif

// Function protos
";

const RUNNER_HEAD: &str = r#"
    int state = START;
    PRINT("\nSM %s() ENTER\n", __func__);
    do{
"#;

const RUNNER_TAIL: &str = r#"        PRINT("state = %d: trans = %d: char = '%c' (0x%02X) => func: %s state: %d\n",
                state, trans, (character == 0x0a)? ' ': character, character,
                func_to_strg(states[state][trans].func), states[state][trans].state);
        (*states[state][trans].func)();
        state = states[state][trans].state;
    }while(state != END && state != ERROR);
    PRINT("SM %s() RETURNING\n", __func__);

"#;

const LAST_PART: &str = "\n// End of generated code\n";

/// Place in a machine where code is referenced.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Site {
    /// Action of rule `.1` of state `.0`.
    Rule(usize, usize),

    /// Machine-level code slot.
    Hook(Hook),
}

/// Generates C code for a [`Definition`].
#[derive(Debug)]
pub struct Emitter<'a, W: Write> {
    out:     W,
    def:     &'a Definition,
    inlines: HashMap<(usize, Site), String>,
    funcs:   SymbolTable<()>,
}

/// Renders `def` as C code into memory.
pub fn emit_to_vec(def: &Definition) -> Result<Vec<u8>, EmitError> {
    let mut out = Vec::with_capacity(16 * 1024);
    Emitter::new(&mut out, def).emit()?;
    Ok(out)
}

impl<'a, W: Write> Emitter<'a, W> {
    /// Creates a new emitter writing `def` to `out`.
    pub fn new(out: W, def: &'a Definition) -> Self {
        Self { out, def, inlines: HashMap::new(), funcs: SymbolTable::new() }
    }

    /// Writes the complete output.
    pub fn emit(mut self) -> Result<W, EmitError> {
        let def = self.def;

        self.emit_amble(def.preamble.as_deref())?;
        self.out.write_all(FIRST_PART.as_bytes())?;
        self.emit_inline_code()?;
        self.emit_func_list()?;
        self.emit_machines()?;
        self.out.write_all(LAST_PART.as_bytes())?;
        self.emit_amble(def.postamble.as_deref())?;

        self.out.flush()?;
        Ok(self.out)
    }

    fn emit_amble(&mut self, amble: Option<&str>) -> io::Result<()> {
        match amble {
            Some(text) => self.out.write_all(strip_delimiters(text, "%{", "%}").as_bytes()),
            None       => Ok(()),
        }
    }

    // Emits a wrapper function for each inline block and registers the name
    // of every referenced function.
    fn emit_inline_code(&mut self) -> io::Result<()> {
        let def = self.def;

        writeln!(self.out, "// inline code definitions generated by software")?;

        for (m, machine) in def.machines.iter().enumerate() {
            for (s, state) in machine.states.iter().enumerate() {
                for (r, rule) in state.rules.iter().enumerate() {
                    self.visit(m, Site::Rule(s, r), &rule.action)?;
                }
            }
            for (hook, code) in machine.hooks() {
                if let Some(code) = code {
                    self.visit(m, Site::Hook(hook), code)?;
                }
            }
        }

        writeln!(self.out, "// end of inline code definitions")
    }

    fn visit(&mut self, machine: usize, site: Site, code: &Code) -> io::Result<()> {
        let name = match code {
            Code::Name(name) => name.clone(),
            Code::Inline(_)  => {
                let name = format!("_{:04X}", self.inlines.len());
                writeln!(self.out, "static int {}(void) {{", name)?;
                self.out.write_all(code.body().as_bytes())?;
                write!(self.out, "\n    return 0;\n}}\n\n")?;
                log::debug!("inline block in machine {} named {}", machine, name);
                self.inlines.insert((machine, site), name.clone());
                name
            },
        };
        self.funcs.add(&name, ());
        Ok(())
    }

    fn emit_func_list(&mut self) -> io::Result<()> {
        writeln!(self.out, "#define func_to_strg(func) ( \\")?;
        for name in self.funcs.names() {
            writeln!(self.out, "                   (func == {0})? \"{0}\": \\", name)?;
        }
        write!(self.out, " \"UNKNOWN\")\n\n")
    }

    fn emit_machines(&mut self) -> Result<(), EmitError> {
        let def = self.def;

        for machine in &def.machines {
            writeln!(self.out, "static int {}(void);", machine.name)?;
        }
        write!(self.out, "\n\n")?;

        for (m, machine) in def.machines.iter().enumerate() {
            log::debug!("emitting machine {}", machine.name);
            self.emit_machine(m, machine)?;
        }
        Ok(())
    }

    fn emit_machine(&mut self, m: usize, machine: &Machine) -> Result<(), EmitError> {
        write!(self.out, "static int {}(void) {{\n\n", machine.name)?;

        write!(self.out, "    enum {{ ")?;
        for name in &machine.state_names {
            write!(self.out, "{}, ", name)?;
        }
        write!(self.out, "END, ERROR, }};\n\n")?;

        self.emit_table(m, machine)?;

        if let Some(code) = &machine.precode {
            writeln!(self.out, "    {}();", code_name(&self.inlines, m, Site::Hook(Hook::PreCode), code))?;
        }

        let input = match &machine.input {
            Some(code) => code_name(&self.inlines, m, Site::Hook(Hook::Input), code),
            None       => return Err(EmitError::MissingInput { machine: machine.name.clone() }),
        };
        self.out.write_all(RUNNER_HEAD.as_bytes())?;
        writeln!(self.out, "        int trans = {}();", input)?;
        self.out.write_all(RUNNER_TAIL.as_bytes())?;

        if let Some(code) = &machine.postcode {
            writeln!(self.out, "    {}();", code_name(&self.inlines, m, Site::Hook(Hook::PostCode), code))?;
        }

        writeln!(self.out, "    return (state == END)? 0: -1;")?;
        write!(self.out, "}}\n\n\n")?;
        Ok(())
    }

    // Emits the dispatch table: a row per declared state, a column per
    // declared transition.
    fn emit_table(&mut self, m: usize, machine: &Machine) -> Result<(), EmitError> {
        writeln!(self.out,
            "    state_t states[{}][{}] = {{",
            machine.state_names.len(),
            machine.transition_names.len()
        )?;

        let rows = machine.state_names.len();

        for (i, name) in machine.state_names.iter().enumerate() {
            let (s, state) = find_state(machine, name)?;

            write!(self.out, "        {{")?;
            for (j, transition) in machine.transition_names.iter().enumerate() {
                let r = state.rule_index_for(transition).ok_or_else(|| EmitError::Unresolved {
                    machine:    machine.name.clone(),
                    state:      state.name.clone(),
                    transition: transition.to_string(),
                })?;
                let rule   = &state.rules[r];
                let action = code_name(&self.inlines, m, Site::Rule(s, r), &rule.action);
                if j > 0 {
                    write!(self.out, ", ")?;
                }
                write!(self.out, "{{{}, {}}}", rule.next, action)?;
            }
            write!(self.out, "}}")?;
            writeln!(self.out, "{}", if i + 1 < rows { "," } else { "" })?;
        }

        writeln!(self.out, "    }};")?;
        Ok(())
    }
}

fn find_state<'m>(machine: &'m Machine, name: &str) -> Result<(usize, &'m State), EmitError> {
    machine.states.iter().enumerate()
        .find(|(_, s)| s.name == name)
        .ok_or_else(|| EmitError::UndefinedState {
            machine: machine.name.clone(),
            state:   name.to_string(),
        })
}

// Returns the name of the function for the code at `site`.
fn code_name<'c>(
    inlines: &'c HashMap<(usize, Site), String>,
    m:       usize,
    site:    Site,
    code:    &'c Code,
) -> &'c str {
    match code {
        Code::Name(name) => name,
        Code::Inline(_)  => inlines.get(&(m, site)).map_or("", |s| s),
    }
}

// ----------------------------------------------------------------------------
