#![allow(clippy::unwrap_used, clippy::expect_used)]

use lam_ir::{LetBinding, Name, Node, NodeRef};
use pretty_assertions::assert_eq;

use crate::{parse, ParseErrorKind};

/// Parse a single-expression program and unwrap the root sequence.
fn parse_one(source: &str) -> NodeRef {
    let program = parse(source).unwrap();
    let Node::Sequence { seq } = &*program else {
        panic!("program root must be a sequence");
    };
    assert_eq!(seq.len(), 1, "expected a single expression");
    seq[0].clone()
}

fn error_kind(source: &str) -> ParseErrorKind {
    parse(source).unwrap_err().kind
}

#[test]
fn test_precedence_and_associativity() {
    assert_eq!(
        parse_one("1 + 2 * 3 - 4"),
        Node::binary(
            "-",
            Node::binary(
                "+",
                Node::int(1),
                Node::binary("*", Node::int(2), Node::int(3))
            ),
            Node::int(4)
        )
    );
}

#[test]
fn test_assignment_binds_loosest() {
    assert_eq!(
        parse_one("x = y || 1"),
        Node::assign(
            Node::var("x"),
            Node::binary("||", Node::var("y"), Node::int(1))
        )
    );
}

#[test]
fn test_program_is_a_sequence() {
    assert_eq!(
        parse("a; 1;").unwrap(),
        Node::seq(vec![Node::var("a"), Node::int(1)])
    );
    assert_eq!(parse("").unwrap(), Node::seq(vec![]));
}

#[test]
fn test_blocks() {
    assert_eq!(parse_one("{}"), Node::boolean(false));
    assert_eq!(parse_one("{ 7 }"), Node::int(7));
    assert_eq!(
        parse_one("{ a; b }"),
        Node::seq(vec![Node::var("a"), Node::var("b")])
    );
}

#[test]
fn test_conditional() {
    assert_eq!(
        parse_one("if a then 1 else 2"),
        Node::cond(Node::var("a"), Node::int(1), Some(Node::int(2)))
    );
    assert_eq!(
        parse_one("if a { 1 }"),
        Node::cond(Node::var("a"), Node::int(1), None)
    );
}

#[test]
fn test_lambda_and_calls() {
    assert_eq!(
        parse_one("λ fib (n) n"),
        Node::lambda(Some(Name::new("fib")), vec![Name::new("n")], Node::var("n"))
    );
    assert_eq!(
        parse_one("f(1, g(2))(3)"),
        Node::call(
            Node::call(
                Node::var("f"),
                vec![Node::int(1), Node::call(Node::var("g"), vec![Node::int(2)])]
            ),
            vec![Node::int(3)]
        )
    );
}

#[test]
fn test_let_declaration() {
    assert_eq!(
        parse_one("let (x = 1, y) x"),
        Node::declare(
            vec![
                LetBinding::new("x", Some(Node::int(1))),
                LetBinding::new("y", None)
            ],
            Node::var("x")
        )
    );
}

#[test]
fn test_named_let_desugars_to_call() {
    assert_eq!(
        parse_one("let loop (n = 3, acc) acc"),
        Node::call(
            Node::lambda(
                Some(Name::new("loop")),
                vec![Name::new("n"), Name::new("acc")],
                Node::var("acc")
            ),
            vec![Node::int(3), Node::boolean(false)]
        )
    );
}

#[test]
fn test_negation_takes_whole_expression() {
    assert_eq!(
        parse_one("!a && b"),
        Node::not(Node::binary("&&", Node::var("a"), Node::var("b")))
    );
}

#[test]
fn test_printed_tree_parses_back() {
    let tree = parse_one("let (f = lambda (x) if x > 1 then x - 1 else !x) f(f(5) % 3)");
    let printed = tree.to_string();
    assert_eq!(parse_one(&printed), tree);
}

#[test]
fn test_missing_semicolon() {
    let err = parse("a b").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::ExpectedPunctuation {
            expected: ';',
            found: "identifier `b`".to_string()
        }
    );
    assert_eq!((err.line, err.column), (1, 3));
}

#[test]
fn test_missing_then() {
    assert!(matches!(
        error_kind("if a 1"),
        ParseErrorKind::ExpectedKeyword { expected: "then", .. }
    ));
}

#[test]
fn test_bad_parameter() {
    assert!(matches!(
        error_kind("lambda (1) 2"),
        ParseErrorKind::ExpectedVariableName { .. }
    ));
}

#[test]
fn test_binding_with_wrong_operator() {
    assert!(matches!(
        error_kind("let (x + 1) x"),
        ParseErrorKind::ExpectedOperator { expected: "=", .. }
    ));
}

#[test]
fn test_unexpected_token() {
    assert_eq!(
        error_kind(")"),
        ParseErrorKind::UnexpectedToken {
            found: "`)`".to_string()
        }
    );
}

#[test]
fn test_unknown_character_surfaces_position() {
    let err = parse("1;\n$").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownCharacter("$".to_string()));
    assert_eq!((err.line, err.column), (2, 1));
}
