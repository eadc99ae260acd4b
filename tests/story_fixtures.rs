//! End-to-end fixtures driving the full `loads` pipeline (tokenize → parse → transform →
//! compile), grounded directly on `spec.md` §8's literal scenarios and
//! `examples/original_source/tests/integration/compiler/Compiler.py`'s operator table.

use pretty_assertions::assert_eq;
use storyscript::story::{loads, ErrorKind, Instruction, Operand, Value};

fn instruction<'a>(result: &'a storyscript::story::Script, ln: &str) -> &'a Instruction {
    result
        .script
        .get(ln)
        .unwrap_or_else(|| panic!("no instruction at line {ln}"))
}

fn path(segments: &[&str]) -> Operand {
    Operand::Path {
        paths: segments.iter().map(|s| s.to_string()).collect(),
    }
}

fn int(n: i64) -> Value {
    Value::Operand(Operand::Int { int: n })
}

#[test]
fn empty_program() {
    let result = loads("\n\n").expect("empty program should still compile");
    assert!(result.script.script.is_empty());
    assert_eq!(result.entrypoint, None);
}

#[test]
fn assignment_of_integer() {
    let result = loads("a = 0").unwrap();
    let set = instruction(&result.script, "1");
    assert_eq!(set.method, "set");
    assert_eq!(
        set.args,
        Some(vec![Value::Operand(path(&["a"])), int(0)])
    );
    assert_eq!(result.entrypoint.as_deref(), Some("1"));
}

#[test]
fn interpolated_string() {
    let result = loads(r#"a = "{{color}}""#).unwrap();
    let set = instruction(&result.script, "1");
    assert_eq!(set.method, "set");
    let args = set.args.as_ref().unwrap();
    assert_eq!(args[0], Value::Operand(path(&["a"])));
    assert_eq!(
        args[1],
        Value::Operand(Operand::String {
            string: "{}".to_string(),
            values: Some(vec![path(&["color"])]),
        })
    );
}

#[test]
fn chained_mutation() {
    let result = loads(r#"1 increment then format to:"string""#).unwrap();
    let line = instruction(&result.script, "1");
    assert_eq!(
        line.args,
        Some(vec![
            int(1),
            Value::Operand(Operand::Mutation {
                mutation: "increment".to_string(),
                arguments: vec![],
            }),
            Value::Operand(Operand::Mutation {
                mutation: "format".to_string(),
                arguments: vec![Operand::Argument {
                    name: "to".to_string(),
                    argument: Box::new(Value::Operand(Operand::String {
                        string: "string".to_string(),
                        values: None,
                    })),
                }],
            }),
        ])
    );
}

#[test]
fn arithmetic_whitespace_invariance() {
    let expected = Value::Operand(Operand::Expression {
        expression: "sum".to_string(),
        values: vec![int(1), int(2)],
    });
    for src in ["a=1+2", "a = 1 + 2", "a=1 +2"] {
        let result = loads(src).unwrap_or_else(|e| panic!("{src:?} failed to compile: {e}"));
        let set = instruction(&result.script, "1");
        let args = set.args.as_ref().unwrap();
        assert_eq!(args[1], expected, "source {src:?} produced a different expression");
    }
}

#[test]
fn if_else_block() {
    let src = "if a\n  b run\nelse\n  c run\n";
    let result = loads(src).unwrap();

    let if_instr = instruction(&result.script, "1");
    assert_eq!(if_instr.method, "if");
    assert_eq!(if_instr.args, Some(vec![Value::Operand(path(&["a"]))]));
    assert_eq!(if_instr.enter.as_deref(), Some("2"));
    assert_eq!(if_instr.exit.as_deref(), Some("3"));

    let run1 = instruction(&result.script, "2");
    assert_eq!(run1.method, "run");
    assert_eq!(run1.container.as_deref(), Some("b"));
    assert_eq!(run1.args, None);

    let else_instr = instruction(&result.script, "3");
    assert_eq!(else_instr.method, "else");
    assert_eq!(else_instr.enter.as_deref(), Some("4"));
    assert_eq!(else_instr.exit, None);

    let run2 = instruction(&result.script, "4");
    assert_eq!(run2.method, "run");
    assert_eq!(run2.container.as_deref(), Some("c"));

    assert_eq!(result.entrypoint.as_deref(), Some("1"));
}

#[test]
fn if_elseif_else_chain_exit_points_to_immediate_next_alternative() {
    let src = "if a\n  b run\nelseif c\n  d run\nelse\n  e run\n";
    let result = loads(src).unwrap();

    let if_instr = instruction(&result.script, "1");
    assert_eq!(if_instr.exit.as_deref(), Some("3"));

    let elif_instr = instruction(&result.script, "3");
    assert_eq!(elif_instr.method, "elif");
    assert_eq!(elif_instr.args, Some(vec![Value::Operand(path(&["c"]))]));
    assert_eq!(elif_instr.enter.as_deref(), Some("4"));
    assert_eq!(elif_instr.exit.as_deref(), Some("5"));

    let else_instr = instruction(&result.script, "5");
    assert_eq!(else_instr.method, "else");
    assert_eq!(else_instr.enter.as_deref(), Some("6"));
    assert_eq!(else_instr.exit, None);
}

#[test]
fn invalid_identifier_dash() {
    let err = loads("a-b = 1").expect_err("dashed variable name must be rejected");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.classifier, "variables-dash");
}

#[test]
fn invalid_identifier_backslash() {
    let err = loads("a/b = 1").expect_err("variable name with a slash must be rejected");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.classifier, "variables-backslash");
}

#[test]
fn next_statement() {
    let result = loads("next `other.story`").unwrap();
    let next_instr = instruction(&result.script, "1");
    assert_eq!(next_instr.method, "next");
    assert_eq!(
        next_instr.args,
        Some(vec![Value::Operand(Operand::File {
            string: "other.story".to_string(),
        })])
    );
}

#[test]
fn for_loop_links_nested_body() {
    let src = "for item in items\n  item run\n";
    let result = loads(src).unwrap();
    let for_instr = instruction(&result.script, "1");
    assert_eq!(for_instr.method, "for");
    assert_eq!(
        for_instr.args,
        Some(vec![
            Value::Raw("item".to_string()),
            Value::Operand(path(&["items"])),
        ])
    );
    assert_eq!(for_instr.enter.as_deref(), Some("2"));

    let body = instruction(&result.script, "2");
    assert_eq!(body.method, "run");
    assert_eq!(body.container.as_deref(), Some("item"));
}

#[test]
fn wait_links_nested_body() {
    let src = "wait ready\n  ok run\n";
    let result = loads(src).unwrap();
    let wait_instr = instruction(&result.script, "1");
    assert_eq!(wait_instr.method, "wait");
    assert_eq!(wait_instr.args, Some(vec![Value::Operand(path(&["ready"]))]));
    assert_eq!(wait_instr.enter.as_deref(), Some("2"));
}

#[test]
fn list_and_dict_literals() {
    let result = loads("a = [1, 2]").unwrap();
    let set = instruction(&result.script, "1");
    assert_eq!(
        set.args,
        Some(vec![
            Value::Operand(path(&["a"])),
            Value::Operand(Operand::List {
                items: vec![int(1), int(2)],
            }),
        ])
    );

    let result = loads(r#"a = {"k": 1}"#).unwrap();
    let set = instruction(&result.script, "1");
    let args = set.args.as_ref().unwrap();
    assert_eq!(
        args[1],
        Value::Operand(Operand::Dict {
            items: vec![(
                Value::Operand(Operand::String {
                    string: "k".to_string(),
                    values: None,
                }),
                int(1),
            )],
        })
    );
}

#[test]
fn boolean_assignment_is_a_native_value() {
    let result = loads("a = true").unwrap();
    let set = instruction(&result.script, "1");
    let args = set.args.as_ref().unwrap();
    assert_eq!(args[1], Value::Bool(true));
}

#[test]
fn bracketed_path_segment_strips_quotes() {
    let result = loads(r#"a = b["k"]"#).unwrap();
    let set = instruction(&result.script, "1");
    let args = set.args.as_ref().unwrap();
    assert_eq!(args[1], Value::Operand(path(&["b", "k"])));
}

#[test]
fn command_with_arguments_still_only_captures_container() {
    let result = loads("service_name data:1 run").unwrap();
    let run = instruction(&result.script, "1");
    assert_eq!(run.method, "run");
    assert_eq!(run.container.as_deref(), Some("service_name"));
    assert_eq!(run.args, None);
}

#[test]
fn same_source_up_to_expression_whitespace_compiles_identically() {
    let first = loads("a = 1==2").unwrap();
    let second = loads("a = 1 == 2").unwrap();
    assert_eq!(first.script, second.script);
}
