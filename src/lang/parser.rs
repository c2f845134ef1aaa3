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

//! Recursive-descent parser.

use crate::message::{Category, Log, Message, Severity};
use crate::session::Session;
use crate::util::Location;

use super::ast::{self, Code, Definition, Rule, START};
use super::token::{Token, TokenKind, TokenKind::*};
use super::tokenizer::Tokenizer;

/// Parser for state machine definitions.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens:  Tokenizer,
    session: &'a mut Session,
    errors:  usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser reading from `tokens` and reporting messages to
    /// `session`.
    pub fn new(tokens: Tokenizer, session: &'a mut Session) -> Self {
        Self { tokens, session, errors: 0 }
    }

    /// Returns the tokenizer.
    pub fn tokens(&self) -> &Tokenizer {
        &self.tokens
    }

    /// Parses a complete definition.
    ///
    /// Returns the definition if no error occurred, or the count of errors
    /// otherwise.
    pub fn parse(&mut self) -> Result<Definition, usize> {
        let mut def = Definition::default();

        loop {
            let token = self.next();
            match token.kind {
                RawBlock => if def.preamble.is_none() {
                    def.preamble = Some(token.text);
                } else if def.postamble.is_none() {
                    def.postamble = Some(token.text);
                } else {
                    self.syntax_error(&token, "Unexpected raw block found");
                    break
                },

                Include => if !self.parse_include() {
                    break
                },

                Machine => match self.parse_machine(&token) {
                    Some(machine) => def.machines.push(machine),
                    None          => break,
                },

                Eof => break,

                _ => self.unexpected(&token),
            }
        }

        log::debug!("parsed {} machine(s), {} error(s)", def.machines.len(), self.errors);

        match self.errors {
            0 => Ok(def),
            n => Err(n),
        }
    }

    // include = "include" QSTRING ";"
    fn parse_include(&mut self) -> bool {
        let token = self.next();
        if !token.is(QString) {
            self.syntax_error(&token, "Include directive requires a quoted string");
            return false
        }

        if !self.expect_semi() {
            return false
        }

        match self.tokens.include(&token.file, &token.text) {
            Ok(()) => true,
            Err(e) => {
                self.error(&token, Severity::Fatal, Category::File, e.to_string());
                false
            },
        }
    }

    // machine = "machine" IDENT "{" machine_item* "};"
    fn parse_machine(&mut self, keyword: &Token) -> Option<ast::Machine> {
        let token = self.next();
        if !token.is(Unknown) {
            self.syntax_error(&token, format!("Expected a name but got a \"{}\" token", token));
            return None
        }

        let mut machine = ast::Machine::new(token.text, keyword.file.clone(), keyword.line);

        if !self.expect_ocurly() {
            return None
        }

        loop {
            let token = self.next();
            match token.kind {
                Input       => self.parse_hook(&token, &mut machine.input,    "input")?,
                PreCode     => self.parse_hook(&token, &mut machine.precode,  "pre_code")?,
                PostCode    => self.parse_hook(&token, &mut machine.postcode, "post_code")?,

                Transitions => {
                    if !machine.transition_names.is_empty() {
                        return self.only_one(&token, "transitions")
                    }
                    match self.parse_list(Comma, Semi) {
                        Some(names) => machine.transition_names = names,
                        None => return self.parse_error(
                            &token, "Cannot read transition list specification"
                        ),
                    }
                },

                States => {
                    if !machine.state_names.is_empty() {
                        return self.only_one(&token, "states")
                    }
                    match self.parse_list(Comma, Semi) {
                        Some(names) => machine.state_names = names,
                        None => return self.parse_error(
                            &token, "Cannot read states list specification"
                        ),
                    }
                },

                State => match self.parse_state() {
                    Some(state) => machine.states.push(state),
                    None => return self.parse_error(
                        &token, "Cannot read state specification"
                    ),
                },

                Eof => return self.parse_error(
                    &token, "Unexpected end of file encountered"
                ),

                CCurlySemi => break,

                _ => {
                    self.unexpected(&token);
                    return None
                },
            }
        }

        if !machine.state_names.iter().any(|s| s == START) {
            machine.state_names.push(START.to_string());
        }

        log::debug!(
            "parsed machine {}: {} state(s), {} transition(s)",
            machine.name, machine.state_names.len(), machine.transition_names.len()
        );

        Some(machine)
    }

    // hook = ( "input" | "pre_code" | "post_code" ) ( IDENT | QSTRING | inline_block ) ";"
    fn parse_hook(&mut self, keyword: &Token, slot: &mut Option<Code>, what: &str) -> Option<()> {
        if slot.is_some() {
            return self.only_one(keyword, what)
        }

        match self.parse_single() {
            Some(code) => { *slot = Some(code); Some(()) },
            None => self.parse_error(
                keyword, format!("Cannot read {} specification", what)
            ),
        }
    }

    // single = ( IDENT | QSTRING | inline_block ) ";"
    fn parse_single(&mut self) -> Option<Code> {
        let token = self.next();
        let code = match token.kind {
            Unknown | QString => Code::Name(token.text),
            InlineBlock       => Code::Inline(token.text),
            _ => {
                self.unexpected(&token);
                return None
            },
        };

        self.expect_semi().then_some(code)
    }

    // list = IDENT ( sep IDENT )* term
    fn parse_list(&mut self, sep: TokenKind, term: TokenKind) -> Option<Vec<String>> {
        let mut names = vec![];

        loop {
            let token = self.next();
            if !token.is(Unknown) {
                self.syntax_error(&token, format!("Expected a name but got a \"{}\" token", token));
                return None
            }
            names.push(token.text);

            let token = self.next();
            if token.is(term) {
                return Some(names)
            }
            if !token.is(sep) {
                self.unexpected(&token);
                return None
            }
        }
    }

    // state = "state" IDENT "{" rule* "};"
    fn parse_state(&mut self) -> Option<ast::State> {
        let token = self.next();
        if !token.is(Unknown) {
            self.syntax_error(&token, format!("Expected a name but got a \"{}\" token", token));
            return None
        }

        let mut state = ast::State { name: token.text, line: token.line, rules: vec![] };

        if !self.expect_ocurly() {
            return None
        }

        loop {
            let token = self.next();
            match token.kind {
                CCurlySemi => break,
                Eof        => return self.parse_error(
                    &token, "Unexpected end of file encountered"
                ),
                _ => (),
            }
            self.tokens.unget_token(token.clone());

            let rule = self.parse_rule(&token)?;
            state.rules.push(rule);
        }

        Some(state)
    }

    // rule = IDENT ( "|" IDENT )* ":" IDENT ":"? ( IDENT | inline_block ) ";"
    fn parse_rule(&mut self, first: &Token) -> Option<Rule> {
        let names = match self.parse_list(Pipe, Colon) {
            Some(names) => names,
            None        => return self.parse_error(first, "Cannot read transition list"),
        };

        let token = self.next();
        if !token.is(Unknown) {
            self.syntax_error(&token, format!("Expected a name but got a \"{}\" token", token));
            return None
        }
        let next = token.text;

        let mut token = self.next();
        if token.is(Colon) {
            token = self.next();
        }
        let action = match token.kind {
            Unknown     => Code::Name(token.text),
            InlineBlock => Code::Inline(token.text),
            _ => {
                self.syntax_error(&token, format!(
                    "Expected a name or inline block but got a \"{}\" token", token
                ));
                return None
            },
        };

        if !self.expect_semi() {
            return None
        }

        Some(Rule { names, next, action, line: first.line })
    }

    fn expect_ocurly(&mut self) -> bool {
        let token = self.next();
        if token.is(OCurly) {
            return true
        }
        self.syntax_error(&token, format!("Expected a \"{{\" but got a \"{}\" token", token));
        false
    }

    fn expect_semi(&mut self) -> bool {
        let token = self.next();
        if token.is(Semi) {
            return true
        }
        self.syntax_error(&token, format!("Expected a \";\" but got a \"{}\" token", token));
        false
    }

    // Returns the next token, first reporting any scan errors.
    fn next(&mut self) -> Token {
        let token = self.tokens.next_token();
        for msg in self.tokens.take_errors() {
            self.errors += 1;
            msg.tell(&mut *self.session);
        }
        token
    }

    fn only_one<T>(&mut self, token: &Token, what: &str) -> Option<T> {
        self.syntax_error(token, format!(
            "Only one \"{}\" directive is allowed per machine", what
        ));
        None
    }

    fn unexpected(&mut self, token: &Token) {
        self.syntax_error(token, format!("Unexpected \"{}\" token", token));
    }

    fn syntax_error(&mut self, token: &Token, text: impl Into<String>) {
        self.error(token, Severity::Error, Category::Syntax, text);
    }

    fn parse_error<T>(&mut self, token: &Token, text: impl Into<String>) -> Option<T> {
        self.error(token, Severity::Error, Category::Parse, text);
        None
    }

    fn error(&mut self, token: &Token, sev: Severity, cat: Category, text: impl Into<String>) {
        self.errors += 1;
        Message::at(&token.file, Location::at_line(token.line), sev, cat, text)
            .tell(&mut *self.session);
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (Result<Definition, usize>, Session) {
        let mut session = Session::silent();
        let tokens      = Tokenizer::from_text("test.sm", text);
        let result      = Parser::new(tokens, &mut session).parse();
        (result, session)
    }

    fn contents(session: &Session) -> Vec<String> {
        session.messages().iter().map(|m| m.content.clone()).collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    const M: &str = "\
        machine M {
            input get_input;
            transitions A, B;
            states S1, S2;
            state S1 { A : S2 : act1; DEFAULT : S1 : nop; };
            state S2 { A | B : END : {{ done(); }}; };
            state START { DEFAULT : S1 : nop; };
        };
    ";

    #[test]
    fn parse_empty() {
        let (result, session) = parse("");

        assert_eq!( result,                Ok(Definition::default()) );
        assert_eq!( session.error_count(), 0 );
    }

    #[test]
    fn parse_machine() {
        let (result, _) = parse(M);
        let def = result.unwrap();

        assert_eq!( def.machines.len(), 1 );

        let m = &def.machines[0];
        assert_eq!( m.name,             "M" );
        assert_eq!( m.line,             1 );
        assert_eq!( m.input,            Some(Code::Name("get_input".into())) );
        assert_eq!( m.precode,          None );
        assert_eq!( m.postcode,         None );
        assert_eq!( m.transition_names, names(&["A", "B"]) );
        assert_eq!( m.state_names,      names(&["S1", "S2", "START"]) );
        assert_eq!( m.states.len(),     3 );

        let s1 = &m.states[0];
        assert_eq!( s1.name,            "S1" );
        assert_eq!( s1.line,            5 );
        assert_eq!( s1.rules.len(),     2 );
        assert_eq!( s1.rules[0].names,  names(&["A"]) );
        assert_eq!( s1.rules[0].next,   "S2" );
        assert_eq!( s1.rules[0].action, Code::Name("act1".into()) );
        assert_eq!( s1.rules[1].names,  names(&["DEFAULT"]) );

        let s2 = &m.states[1];
        assert_eq!( s2.rules[0].names,  names(&["A", "B"]) );
        assert_eq!( s2.rules[0].next,   "END" );
        assert_eq!( s2.rules[0].action, Code::Inline("{{ done(); }}".into()) );
    }

    #[test]
    fn parse_rule_without_second_colon() {
        let (result, _) = parse("machine M { state S { A : S act; }; };");
        let def = result.unwrap();

        assert_eq!( def.machines[0].states[0].rules[0].action, Code::Name("act".into()) );
    }

    #[test]
    fn parse_empty_state() {
        let (result, _) = parse("machine M { state S { }; };");
        let def = result.unwrap();

        assert_eq!( def.machines[0].states[0].rules.is_empty(), true );
    }

    #[test]
    fn parse_start_declared() {
        let (result, _) = parse("machine M { states START, S1; };");
        let def = result.unwrap();

        assert_eq!( def.machines[0].state_names, names(&["START", "S1"]) );
    }

    #[test]
    fn parse_hooks() {
        let (result, _) = parse(
            "machine M { input 'get'; pre_code {{ init(); }}; post_code done; };"
        );
        let m = &result.unwrap().machines[0];

        assert_eq!( m.input,    Some(Code::Name("get".into())) );
        assert_eq!( m.precode,  Some(Code::Inline("{{ init(); }}".into())) );
        assert_eq!( m.postcode, Some(Code::Name("done".into())) );
    }

    #[test]
    fn parse_trans_alias() {
        let (result, _) = parse("machine M { trans X, Y; };");

        assert_eq!( result.unwrap().machines[0].transition_names, names(&["X", "Y"]) );
    }

    #[test]
    fn parse_machines_in_order() {
        let (result, _) = parse("machine A { }; machine B { };");
        let def = result.unwrap();

        assert_eq!( def.machines[0].name, "A" );
        assert_eq!( def.machines[1].name, "B" );
    }

    #[test]
    fn parse_ambles() {
        let (result, _) = parse("%{ pre %} machine M { }; %{ post %}");
        let def = result.unwrap();

        assert_eq!( def.preamble,  Some("%{ pre %}".into())  );
        assert_eq!( def.postamble, Some("%{ post %}".into()) );
    }

    #[test]
    fn parse_third_amble() {
        let (result, session) = parse("%{ a %} %{ b %} %{ c %}");

        assert_eq!( result,            Err(1) );
        assert_eq!( contents(&session), ["Unexpected raw block found"] );
    }

    #[test]
    fn parse_stray_token() {
        let (result, session) = parse("foo machine M { };");

        assert_eq!( result,             Err(1) );
        assert_eq!( contents(&session), ["Unexpected \"foo\" token"] );

        let msg = &session.messages()[0];
        assert_eq!( msg.category, Category::Syntax );
        assert_eq!( msg.source,   "test.sm" );
        assert_eq!( msg.location, Location::at_line(1) );
    }

    #[test]
    fn parse_missing_ocurly() {
        let (result, session) = parse("machine M ;");

        assert_eq!( result,             Err(1) );
        assert_eq!( contents(&session), ["Expected a \"{\" but got a \";\" token"] );
    }

    #[test]
    fn parse_duplicate_input() {
        let (result, session) = parse("machine M { input a; input b; };");

        assert_eq!( result,             Err(1) );
        assert_eq!( contents(&session), ["Only one \"input\" directive is allowed per machine"] );
    }

    #[test]
    fn parse_bad_list() {
        let (result, session) = parse("machine M { transitions A B; };");

        assert_eq!( result, Err(2) );
        assert_eq!(
            contents(&session),
            [
                "Unexpected \"B\" token",
                "Cannot read transition list specification",
            ]
        );
    }

    #[test]
    fn parse_bad_rule() {
        let (result, session) = parse("machine M {\n state S {\n A : ; \n }; };");

        assert_eq!( result, Err(2) );
        assert_eq!(
            contents(&session),
            [
                "Expected a name but got a \";\" token",
                "Cannot read state specification",
            ]
        );
        assert_eq!( session.messages()[0].location, Location::at_line(3) );
    }

    #[test]
    fn parse_unexpected_eof() {
        let (result, session) = parse("machine M { input a;");

        assert_eq!( result,             Err(1) );
        assert_eq!( contents(&session), ["Unexpected end of file encountered"] );
        assert_eq!( session.messages()[0].category, Category::Parse );
    }

    #[test]
    fn parse_scan_error() {
        let (result, session) = parse("machine M {\n state X { 'abc\nDEF : Y : z; };\n};");

        assert_eq!( result, Err(3) );
        assert_eq!(
            contents(&session),
            [
                "Unexpected newline encountered",
                "Unexpected end of file encountered",
                "Cannot read state specification",
            ]
        );
        assert_eq!( session.messages()[0].category, Category::Scan );
    }

    #[test]
    fn parse_include_requires_string() {
        let (result, session) = parse("include foo;");

        assert_eq!( result,             Err(1) );
        assert_eq!( contents(&session), ["Include directive requires a quoted string"] );
    }

    #[test]
    fn parse_include_missing_file() {
        let (result, session) = parse("include \"no/such/file.sm\";");

        assert_eq!( result,                         Err(1) );
        assert_eq!( session.messages()[0].severity, Severity::Fatal );
        assert_eq!( session.messages()[0].category, Category::File );
    }
}
