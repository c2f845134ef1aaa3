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

//! State machine definition model.

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use colored::*;

use crate::util::strip_delimiters;

/// Name of the wildcard rule key, matching any transition not otherwise
/// matched in a state.
pub const DEFAULT: &str = "DEFAULT";

/// Name of the initial state of every machine.
pub const START: &str = "START";

/// Name of the implicit final state reached on success.
pub const END: &str = "END";

/// Name of the implicit final state reached on failure.
pub const ERROR: &str = "ERROR";

/// Complete contents of a state machine definition file.
///
/// ```text
/// definition = ( raw_block | include | machine )*
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Definition {
    /// First raw block, with delimiters.
    pub preamble: Option<String>,

    /// Second raw block, with delimiters.
    pub postamble: Option<String>,

    /// Machines, in source order.
    pub machines: Vec<Machine>,
}

/// Machine definition.
///
/// ```text
/// machine = "machine" IDENT "{" ( input | pre_code | post_code
///                                | transitions | states | state )* "};"
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Machine {
    /// Name of the machine, also the name of the generated function.
    pub name: String,

    /// File in which the machine is defined.
    pub file: Rc<str>,

    /// Line at which the machine is defined.
    pub line: u32,

    /// Function returning the next transition code.
    pub input: Option<Code>,

    /// Function called before the machine runs.
    pub precode: Option<Code>,

    /// Function called after the machine stops.
    pub postcode: Option<Code>,

    /// Declared transition names, in declaration order.  These are the
    /// columns of the dispatch table.
    pub transition_names: Vec<String>,

    /// Declared state names, in declaration order, followed by [`START`].
    /// These are the rows of the dispatch table.
    pub state_names: Vec<String>,

    /// State definitions, in source order.
    pub states: Vec<State>,
}

/// State definition.
///
/// ```text
/// state = "state" IDENT "{" rule* "};"
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct State {
    /// Name of the state.
    pub name: String,

    /// Line at which the state is defined.
    pub line: u32,

    /// Rules, in source order.
    pub rules: Vec<Rule>,
}

/// Transition rule.
///
/// ```text
/// rule = IDENT ( "|" IDENT )* ":" IDENT ":" ( IDENT | inline_block ) ";"
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Rule {
    /// Transition names matched by the rule, possibly including [`DEFAULT`].
    pub names: Vec<String>,

    /// Name of the next state.
    pub next: String,

    /// Action performed when the rule is taken.
    pub action: Code,

    /// Line at which the rule begins.
    pub line: u32,
}

/// Reference to target-language code: a function name or an inline block.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Code {
    /// Name of a function defined elsewhere.
    Name(String),

    /// Inline block, with delimiters.
    Inline(String),
}

impl Machine {
    /// Creates a new, empty machine named `name`.
    pub fn new(name: impl Into<String>, file: Rc<str>, line: u32) -> Self {
        Self {
            name: name.into(),
            file,
            line,
            input:            None,
            precode:          None,
            postcode:         None,
            transition_names: vec![],
            state_names:      vec![],
            states:           vec![],
        }
    }

    /// Returns the first definition of the state named `name`, if any.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name == name)
    }

    /// Returns the code slots of the machine, in the order input, precode,
    /// postcode.
    pub fn hooks(&self) -> [(Hook, Option<&Code>); 3] {
        [
            (Hook::Input,    self.input   .as_ref()),
            (Hook::PreCode,  self.precode .as_ref()),
            (Hook::PostCode, self.postcode.as_ref()),
        ]
    }
}

/// Machine-level code slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Hook {
    Input,
    PreCode,
    PostCode,
}

impl State {
    /// Returns the index of the rule that handles `transition` in this state:
    /// the first rule naming it, else the first [`DEFAULT`] rule.
    pub fn rule_index_for(&self, transition: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.matches(transition))
            .or_else(|| self.rules.iter().position(|r| r.is_default()))
    }
}

impl Rule {
    /// Returns `true` if the rule names `transition` explicitly.
    pub fn matches(&self, transition: &str) -> bool {
        self.names.iter().any(|n| n == transition)
    }

    /// Returns `true` if the rule is a [`DEFAULT`] rule.
    pub fn is_default(&self) -> bool {
        self.matches(DEFAULT)
    }
}

impl Code {
    /// Creates a `Code` from token text, classifying it by its delimiters.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.starts_with("{{") {
            Self::Inline(text)
        } else {
            Self::Name(text)
        }
    }

    /// Returns the body of an inline block without delimiters, or the
    /// function name.
    pub fn body(&self) -> &str {
        match self {
            Self::Name  (s) => s,
            Self::Inline(s) => strip_delimiters(s, "{{", "}}"),
        }
    }
}

// Display is used in the definition dump.  Inline blocks are collapsed to a
// single line.
impl Display for Code {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Name(s) => f.write_str(s),
            Self::Inline(s) => {
                let mut words = s.split_whitespace();
                if let Some(w) = words.next() {
                    f.write_str(w)?;
                }
                for w in words {
                    write!(f, " {}", w)?;
                }
                Ok(())
            },
        }
    }
}

// ----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
struct ForDisplay<'a, T: ?Sized> {
    node:    &'a T,
    nesting: Nesting<'a>,
}

#[derive(Clone, Copy, Debug)]
struct DisplayNode0<'a> {
    kind:    &'a str,
    nesting: Nesting<'a>,
}

#[derive(Clone, Copy, Debug)]
struct DisplayNode1<'a, T0: Display> {
    kind:    &'a str,
    nesting: Nesting<'a>,
    data:    T0,
}

#[derive(Clone, Copy, Debug)]
enum Nesting<'a> {
    Root,
    Child { more: bool, parent: &'a Self }
}

#[derive(Clone, Copy, Debug)]
struct Indent<'a> (Nesting<'a>);

impl Definition {
    /// Returns a wrapper over the definition that implements [`Display`] as
    /// an indented tree.
    pub fn for_display(&self) -> impl Display + '_ {
        ForDisplay { node: self, nesting: Nesting::Root }
    }
}

impl<T: ?Sized> ForDisplay<'_, T> {
    fn drill<'a, U: ?Sized>(&'a self, node: &'a U) -> ForDisplay<'a, U> {
        ForDisplay { node, nesting: self.nesting }
    }

    fn child<'a, U: ?Sized>(&'a self, node: &'a U, more: bool) -> ForDisplay<'a, U> {
        let nesting = Nesting::Child { more, parent: &self.nesting };
        ForDisplay { node, nesting }
    }

    fn node0<'a>(&'a self, kind: &'a str) -> DisplayNode0 {
        DisplayNode0 { kind, nesting: self.nesting }
    }

    fn node1<'a, T0: Display>(&'a self, kind: &'a str, data: T0) -> DisplayNode1<T0> {
        DisplayNode1 { kind, nesting: self.nesting, data }
    }
}

impl Display for DisplayNode0<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f,
            "{}{}",
            Indent(self.nesting),
            self.kind.green()
        )
    }
}

impl<T0: Display> Display for DisplayNode1<'_, T0> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f,
            "{}{}({})",
            Indent(self.nesting),
            self.kind.green(),
            self.data
        )
    }
}

impl Display for Nesting<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Nesting::*;
        match *self {
            Root => Ok(()),
            Child { more, parent } => {
                let text = if more { "│ " } else { "  " };
                write!(f, "{}{}", parent, text.white().dimmed())
            },
        }
    }
}

impl Display for Indent<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Nesting::*;
        match self.0 {
            Root => Ok(()),
            Child { more, parent } => {
                let text = if more { "├─" } else { "╰─" };
                write!(f, "{}{}", parent, text.white().dimmed())
            },
        }
    }
}

/// Labeled leaf line in the tree.
#[derive(Debug)]
struct Field<'a> {
    kind: &'a str,
    data: String,
}

impl Display for ForDisplay<'_, Field<'_>> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.node1(self.node.kind, &self.node.data).fmt(f)
    }
}

impl Display for ForDisplay<'_, Definition> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let def    = self.node;
        let ambles = [("Preamble", &def.preamble), ("Postamble", &def.postamble)];
        let more   = !def.machines.is_empty();

        self.node0("Definition").fmt(f)?;

        for (i, (kind, amble)) in ambles.into_iter().enumerate() {
            let data = match amble {
                Some(text) => format!("{} lines", text.lines().count()),
                None       => "none".to_string(),
            };
            let field = Field { kind, data };
            self.child(&field, i == 0 || more).fmt(f)?;
        }

        self.drill(&def.machines[..]).fmt(f)
    }
}

impl Display for ForDisplay<'_, Machine> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mac = self.node;

        self.node1("Machine", &mac.name).fmt(f)?;

        let mut fields = vec![];
        for (hook, code) in mac.hooks() {
            if let Some(code) = code {
                fields.push(Field { kind: hook.label(), data: code.to_string() });
            }
        }
        fields.push(Field { kind: "Transitions", data: mac.transition_names.join(", ") });
        fields.push(Field { kind: "States",      data: mac.state_names     .join(", ") });

        let more = !mac.states.is_empty();
        if let [fields@.., last] = &fields[..] {
            for field in fields {
                self.child(field, true).fmt(f)?;
            }
            self.child(last, more).fmt(f)?;
        }

        self.drill(&mac.states[..]).fmt(f)
    }
}

impl Display for ForDisplay<'_, State> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.node1("State", &self.node.name).fmt(f)?;
        self.drill(&self.node.rules[..]).fmt(f)
    }
}

impl Display for ForDisplay<'_, Rule> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let rule = self.node;
        self.node1("Rule", format_args!(
            "{} : {} : {}", rule.names.join(" | "), rule.next, rule.action
        )).fmt(f)
    }
}

impl<'a, T> ForDisplay<'a, [T]> {
    // NOTE: This is a pseudo-Display implementation, permitting a constraint
    // on the `fmt` method.
    fn fmt<'b>(&'b self, f: &mut Formatter) -> fmt::Result
    where
        ForDisplay<'b, T>: Display
    {
        if let [nodes@.., last] = self.node {
            for node in nodes {
                self.child(node, true).fmt(f)?;
            }
            self.child(last, false).fmt(f)
        } else {
            Ok(())
        }
    }
}

impl Hook {
    /// Returns the label of the slot in the definition dump.
    pub fn label(self) -> &'static str {
        match self {
            Hook::Input    => "Input",
            Hook::PreCode  => "PreCode",
            Hook::PostCode => "PostCode",
        }
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(names: &[&str], next: &str, action: &str) -> Rule {
        Rule {
            names:  names.iter().map(|s| s.to_string()).collect(),
            next:   next.to_string(),
            action: Code::from_text(action),
            line:   1,
        }
    }

    #[test]
    fn code_from_text() {
        assert_eq!( Code::from_text("act"),        Code::Name("act".into())          );
        assert_eq!( Code::from_text("{{ x(); }}"), Code::Inline("{{ x(); }}".into()) );
    }

    #[test]
    fn code_body() {
        assert_eq!( Code::from_text("act")       .body(), "act"    );
        assert_eq!( Code::from_text("{{ x(); }}").body(), " x(); " );
    }

    #[test]
    fn code_display_collapses_inline() {
        let code = Code::from_text("{{\n    x();\n    y();\n}}");

        assert_eq!( code.to_string(), "{{ x(); y(); }}" );
    }

    #[test]
    fn state_rule_index_for() {
        let state = State {
            name:  "S1".into(),
            line:  1,
            rules: vec![
                rule(&["DEFAULT"],  "S1",  "nop"),
                rule(&["A", "B"],   "S2",  "act1"),
                rule(&["B"],        "END", "act2"),
            ],
        };

        assert_eq!( state.rule_index_for("A"), Some(1) );
        assert_eq!( state.rule_index_for("B"), Some(1) );
        assert_eq!( state.rule_index_for("C"), Some(0) );
    }

    #[test]
    fn state_rule_index_for_no_default() {
        let state = State {
            name:  "S1".into(),
            line:  1,
            rules: vec![rule(&["A"], "S2", "act1")],
        };

        assert_eq!( state.rule_index_for("B"), None );
    }

    #[test]
    fn definition_display() {
        colored::control::set_override(false);

        let mut mac = Machine::new("M", "test.sm".into(), 1);
        mac.input            = Some(Code::from_text("get"));
        mac.transition_names = vec!["A".into()];
        mac.state_names      = vec!["START".into()];
        mac.states           = vec![State {
            name:  "START".into(),
            line:  2,
            rules: vec![rule(&["A"], "END", "{{ done(); }}")],
        }];

        let def = Definition { preamble: None, postamble: None, machines: vec![mac] };

        assert_eq!(
            def.for_display().to_string(),
            concat!(
                "Definition\n",
                "├─Preamble(none)\n",
                "├─Postamble(none)\n",
                "╰─Machine(M)\n",
                "  ├─Input(get)\n",
                "  ├─Transitions(A)\n",
                "  ├─States(START)\n",
                "  ╰─State(START)\n",
                "    ╰─Rule(A : END : {{ done(); }})\n",
            )
        );
    }
}
