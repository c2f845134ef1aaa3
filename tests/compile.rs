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

use std::fs;
use std::path::PathBuf;

use smc::message::{Category, Severity};
use smc::session::Session;

const EXAMPLE: &str = r#"
%{
#include <stdio.h>
static int ch;
static int get_char(void) { ch = getchar(); return ch == EOF ? EOI : ch == ' ' ? SPACE : OTHER; }
static int nop(void) { return 0; }
%}

machine words {
    input get_char;
    transitions SPACE, OTHER, EOI;
    states IN_WORD;

    state START {
        SPACE        : START   : nop;
        OTHER        : IN_WORD : {{ putchar(ch); }};
        EOI          : END     : nop;
    };

    state IN_WORD {
        OTHER        : IN_WORD : {{ putchar(ch); }};
        SPACE | EOI  : START   : {{ putchar('\n'); }};
    };
};

%{
int main(void) { return words(); }
%}
"#;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("smc_compile_{}", name));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn compile(text: &str) -> (Result<String, usize>, Session) {
    let mut session = Session::silent();
    let result = session
        .compile_str("test.sm", text)
        .map(|o| String::from_utf8(o.code).unwrap());
    (result, session)
}

#[test]
fn compile_example() {
    let (result, session) = compile(EXAMPLE);
    let out = result.unwrap();

    assert_eq!( session.error_count(),   0 );
    assert_eq!( session.warning_count(), 0 );

    assert!( out.starts_with("\n#include <stdio.h>\n") );
    assert!( out.ends_with("\nint main(void) { return words(); }\n") );
    assert!( out.contains("static int _0000(void) {\n putchar(ch); \n    return 0;\n}\n") );
    assert!( out.contains("static int _0001(void) {\n putchar(ch); \n    return 0;\n}\n") );
    assert!( out.contains("static int _0002(void) {\n putchar('\\n'); \n    return 0;\n}\n") );
    assert!( out.contains("    enum { IN_WORD, START, END, ERROR, };\n") );
    assert!( out.contains(concat!(
        "    state_t states[2][3] = {\n",
        "        {{START, _0002}, {IN_WORD, _0001}, {START, _0002}},\n",
        "        {{START, nop}, {IN_WORD, _0000}, {END, nop}}\n",
        "    };\n",
    )) );
    assert!( out.contains("        int trans = get_char();\n") );
}

#[test]
fn compile_is_deterministic() {
    let (a, _) = compile(EXAMPLE);
    let (b, _) = compile(EXAMPLE);

    assert_eq!( a.unwrap(), b.unwrap() );
}

#[test]
fn compile_undeclared_target_and_undefined_start() {
    let (result, session) = compile(concat!(
        "machine M {\n",
        "  input get_input;\n",
        "  transitions A, B;\n",
        "  states S1;\n",
        "  state S1 { A : S2 : act1; DEFAULT : S1 : nop; };\n",
        "  state S2 { B : END : act2; };\n",
        "};\n",
    ));

    let messages = session.messages().iter().map(|m| m.to_string()).collect::<Vec<_>>();

    assert_eq!( result, Err(2) );
    assert_eq!(
        messages,
        [
            "test.sm:1: check error: State \"START\" is declared but not defined",
            "test.sm:5: check error: State \"S2\" is not declared",
            "test.sm:6: check warning: State \"S2\" is defined but not declared",
        ]
    );
}

#[test]
fn compile_declared_target_and_defined_start() {
    let (result, _) = compile(concat!(
        "machine M {\n",
        "  input get_input;\n",
        "  transitions A, B;\n",
        "  states S1, S2;\n",
        "  state S1 { A : S2 : act1; DEFAULT : S1 : nop; };\n",
        "  state S2 { B : END : act2; DEFAULT : S1 : nop; };\n",
        "  state START { DEFAULT : S1 : nop; };\n",
        "};\n",
    ));
    let out = result.unwrap();

    assert!( out.contains("    enum { S1, S2, START, END, ERROR, };\n") );
    assert!( out.contains(concat!(
        "    state_t states[3][2] = {\n",
        "        {{S2, act1}, {S1, nop}},\n",
        "        {{S1, nop}, {END, act2}},\n",
        "        {{S1, nop}, {S1, nop}}\n",
        "    };\n",
    )) );
}

#[test]
fn compile_hooks() {
    let (result, _) = compile("
        machine M {
            pre_code  {{ setup(); }};
            input     'next';
            post_code done;
            trans     A;
            state START { DEFAULT : END : nop; };
        };
    ");
    let out = result.unwrap();

    assert!( out.contains("static int _0000(void) {\n setup(); \n") );
    assert!( out.contains("    _0000();\n\n    int state = START;\n") );
    assert!( out.contains("        int trans = next();\n") );
    assert!( out.contains("    done();\n    return (state == END)? 0: -1;\n") );
}

#[test]
fn compile_unterminated_quote() {
    let (result, session) = compile("machine M {\n input 'get\n; };");

    assert_eq!( result.is_err(), true );
    assert_eq!( session.messages()[0].category, Category::Scan );
    assert_eq!( session.messages()[0].to_string(), "test.sm:3: scan error: Unexpected newline encountered" );
}

#[test]
fn compile_undeclared_transition() {
    let (result, session) = compile("
        machine M {
            input get;
            transitions A;
            state START { A | B : END : nop; };
        };
    ");

    assert_eq!( result,                          Err(1) );
    assert_eq!( session.messages()[0].category,  Category::Check );
    assert_eq!( session.messages()[0].to_string(), "test.sm:5: check error: Transition \"B\" is not declared" );
}

#[test]
fn compile_unresolved_cell() {
    let (result, session) = compile("
        machine M {
            input get;
            transitions A, B;
            state START { A : END : nop; };
        };
    ");

    assert_eq!( result,                          Err(1) );
    assert_eq!( session.messages()[0].category,  Category::Emit );
}

#[test]
fn compile_syntax_error() {
    let (result, session) = compile("machine M { bogus; };");

    assert_eq!( result.is_err(),                 true );
    assert_eq!( session.messages()[0].category,  Category::Syntax );
}

#[test]
fn compile_file_with_include() {
    let dir = temp_dir("include");
    fs::write(dir.join("common.sm"), "%{\n#include \"common.h\"\n%}\n").unwrap();
    fs::write(dir.join("main.sm"), "include \"common.sm\";\nmachine M {\n input get;\n transitions A;\n state START { A : END : nop; };\n};\n").unwrap();

    let mut session = Session::silent();
    let output = session.compile_file(dir.join("main.sm").to_str().unwrap()).unwrap();
    let out    = String::from_utf8(output.code).unwrap();

    assert_eq!( output.lines_read, 9 );
    assert!( out.starts_with("\n#include \"common.h\"\n") );
}

#[test]
fn compile_file_include_at_end_of_file() {
    let dir = temp_dir("include_at_end");
    fs::write(dir.join("common.sm"), "machine M {\n input get;\n transitions A;\n state START { A : END : nop; };\n};\n").unwrap();
    fs::write(dir.join("main.sm"), "%{ /* x */ %}\ninclude \"common.sm\";").unwrap();

    let mut session = Session::silent();
    let output = session.compile_file(dir.join("main.sm").to_str().unwrap()).unwrap();
    let out    = String::from_utf8(output.code).unwrap();

    assert_eq!( session.error_count(), 0 );
    assert!( out.starts_with(" /* x */ ") );
    assert!( out.contains("static int M(void) {\n") );
}

#[test]
fn compile_file_self_include() {
    for (name, text) in [
        ("self_include",         "include \"a.sm\";\n"),
        ("self_include_at_end",  "include \"a.sm\";"),
    ] {
        let dir = temp_dir(name);
        fs::write(dir.join("a.sm"), text).unwrap();

        let mut session = Session::silent();
        let result = session.compile_file(dir.join("a.sm").to_str().unwrap());

        assert_eq!( result,                          Err(1) );
        assert_eq!( session.messages()[0].category,  Category::File );
        assert!( session.messages()[0].content.ends_with("includes are nested more than 32 deep") );
    }
}

#[test]
fn compile_file_missing_include() {
    let dir = temp_dir("missing_include");
    fs::write(dir.join("main.sm"), "include \"nothere.sm\";\n").unwrap();

    let mut session = Session::silent();
    let result = session.compile_file(dir.join("main.sm").to_str().unwrap());

    assert_eq!( result,                          Err(1) );
    assert_eq!( session.messages()[0].severity,  Severity::Fatal );
    assert_eq!( session.messages()[0].category,  Category::File );
}

#[test]
fn compile_to_file_writes_output() {
    let dir    = temp_dir("to_file");
    let input  = dir.join("in.sm");
    let output = dir.join("out.c");
    fs::write(&input, EXAMPLE).unwrap();
    let _ = fs::remove_file(&output);

    let mut session = Session::silent();
    let result = session.compile_to_file(input.to_str().unwrap(), output.to_str().unwrap()).unwrap();

    assert_eq!( fs::read(&output).unwrap(), result.code );
}

#[test]
fn compile_to_file_skips_output_on_error() {
    let dir    = temp_dir("to_file_error");
    let input  = dir.join("in.sm");
    let output = dir.join("out.c");
    fs::write(&input, "machine M { };").unwrap();
    let _ = fs::remove_file(&output);

    let mut session = Session::silent();
    let result = session.compile_to_file(input.to_str().unwrap(), output.to_str().unwrap());

    assert_eq!( result.is_err(),  true  );
    assert_eq!( output.exists(),  false );
}
