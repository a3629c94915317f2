#![allow(clippy::unwrap_used, clippy::expect_used)]

use lam_eval::{
    buffer_handler, CallConvention, Environment, EvalErrorKind, EvalResult, InterpreterBuilder,
    Machine, Value, DEFAULT_MAX_DEPTH,
};
use lam_ir::{LetBinding, Name, Node, NodeRef};

use crate::{transform, transform_program, SymbolGenerator, TransformError, Transformer};

fn name(text: &str) -> Name {
    Name::new(text)
}

fn parse(source: &str) -> NodeRef {
    lam_parse::parse(source).expect("test program parses")
}

/// Evaluate a direct-style tree.
fn eval_direct(node: &NodeRef) -> EvalResult {
    Machine::new(DEFAULT_MAX_DEPTH, CallConvention::Implicit).run(node.clone(), Environment::new())
}

/// Transform with the identity continuation, then evaluate.
fn eval_transformed(node: &NodeRef) -> EvalResult {
    let cps = transform_program(node).unwrap();
    Machine::new(DEFAULT_MAX_DEPTH, CallConvention::Explicit).run(cps, Environment::new())
}

/// Walk the output and check the shape a code generator relies on.
fn assert_cps_shape(node: &Node) {
    match node {
        Node::Declaration { .. } => panic!("declaration survived the transform: {node}"),
        Node::Function(lambda) => {
            assert!(
                lambda.vars.first().is_some_and(|v| v.as_str().starts_with("β_")),
                "function without a continuation parameter: {node}"
            );
            assert_cps_shape(&lambda.body);
        }
        Node::Assignment { left, right } => {
            assert_cps_shape(left);
            assert_cps_shape(right);
        }
        Node::Binary { left, right, .. } => {
            assert_cps_shape(left);
            assert_cps_shape(right);
        }
        Node::Negation { body } => assert_cps_shape(body),
        Node::Sequence { seq } => seq.iter().for_each(|n| assert_cps_shape(n)),
        Node::Call { func, args } => {
            assert_cps_shape(func);
            args.iter().for_each(|n| assert_cps_shape(n));
        }
        Node::Conditional {
            condition,
            consequent,
            alternative,
        } => {
            assert_cps_shape(condition);
            assert_cps_shape(consequent);
            if let Some(alt) = alternative {
                assert_cps_shape(alt);
            }
        }
        Node::Integer(_) | Node::Str(_) | Node::Boolean(_) | Node::Variable(_) => {}
    }
}

mod shapes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn atoms_go_straight_to_the_continuation() {
        let node = Node::var("x");
        let out = transform(&node, Node::not).unwrap();
        assert_eq!(out, Node::not(Node::var("x")));
    }

    #[test]
    fn negation_wraps_transformed_body() {
        let node = Node::not(Node::binary("<", Node::var("a"), Node::int(1)));
        assert_eq!(transform_program(&node).unwrap(), node);
    }

    #[test]
    fn function_gains_leading_continuation() {
        let node = Node::lambda(Some(name("f")), vec![name("x")], Node::var("x"));
        assert_eq!(
            transform_program(&node).unwrap(),
            Node::lambda(
                Some(name("f")),
                vec![name("β_K1"), name("x")],
                Node::call(Node::var("β_K1"), vec![Node::var("x")])
            )
        );
    }

    #[test]
    fn call_passes_reified_continuation_first() {
        let node = Node::binary(
            "+",
            Node::call(Node::var("f"), vec![Node::int(1)]),
            Node::int(2),
        );
        assert_eq!(
            transform_program(&node).unwrap(),
            Node::call(
                Node::var("f"),
                vec![
                    Node::lambda(
                        None,
                        vec![name("β_R1")],
                        Node::binary("+", Node::var("β_R1"), Node::int(2))
                    ),
                    Node::int(1),
                ]
            )
        );
    }

    #[test]
    fn let_becomes_applied_function() {
        let node = Node::declare(
            vec![LetBinding::new("x", Some(Node::int(1)))],
            Node::var("x"),
        );
        assert_eq!(
            transform_program(&node).unwrap(),
            Node::call(
                Node::lambda(
                    None,
                    vec![name("β_K1"), name("x")],
                    Node::call(Node::var("β_K1"), vec![Node::var("x")])
                ),
                vec![
                    Node::lambda(None, vec![name("β_R2")], Node::var("β_R2")),
                    Node::int(1),
                ]
            )
        );
    }

    #[test]
    fn let_without_bindings_is_its_body() {
        let node = Node::declare(vec![], Node::int(3));
        assert_eq!(transform_program(&node).unwrap(), Node::int(3));
    }

    #[test]
    fn conditional_joins_both_arms() {
        let node = Node::cond(Node::var("c"), Node::int(1), None);
        let join = || Node::var("β_I1");
        assert_eq!(
            transform_program(&node).unwrap(),
            Node::call(
                Node::lambda(
                    None,
                    vec![name("β_I1")],
                    Node::cond(
                        Node::var("c"),
                        Node::call(join(), vec![Node::int(1)]),
                        Some(Node::call(join(), vec![Node::boolean(false)]))
                    )
                ),
                vec![Node::lambda(None, vec![name("β_R2")], Node::var("β_R2"))]
            )
        );
    }

    #[test]
    fn conditional_emits_outer_continuation_once() {
        let node = Node::cond(Node::var("c"), Node::int(1), Some(Node::int(2)));
        let out = transform(&node, |value| {
            Node::call(Node::var("done"), vec![value])
        })
        .unwrap();
        assert_eq!(out.to_string().matches("done").count(), 1);
    }

    #[test]
    fn output_has_code_generator_shape() {
        let source = r#"
            let (x = 1, f = lambda loop (n) if n > 0 then loop(n - 1) else x) {
                x = f(3) + 1;
                println(x);
                { }
            }
        "#;
        assert_cps_shape(&transform_program(&parse(source)).unwrap());
    }
}

mod sequences {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pure_elements_are_dropped_impure_kept() {
        let node = Node::seq(vec![
            Node::int(1),
            Node::call(Node::var("f"), vec![]),
            Node::int(2),
        ]);
        assert_eq!(
            transform_program(&node).unwrap(),
            Node::call(
                Node::var("f"),
                vec![Node::lambda(None, vec![name("β_R1")], Node::int(2))]
            )
        );
    }

    #[test]
    fn assignments_are_kept_in_order() {
        let node = Node::seq(vec![
            Node::assign(Node::var("x"), Node::int(1)),
            Node::var("x"),
        ]);
        assert_eq!(
            transform_program(&node).unwrap(),
            Node::seq(vec![
                Node::assign(Node::var("x"), Node::int(1)),
                Node::var("x")
            ])
        );
    }

    #[test]
    fn empty_sequence_is_false() {
        assert_eq!(
            transform_program(&Node::seq(vec![])).unwrap(),
            Node::boolean(false)
        );
    }

    #[test]
    fn last_element_kept_even_when_pure() {
        let node = Node::seq(vec![Node::int(1), Node::int(2)]);
        assert_eq!(transform_program(&node).unwrap(), Node::int(2));
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn assignment_to_non_variable_is_unsupported() {
        let node = Node::assign(Node::int(1), Node::int(2));
        let err = transform_program(&node).unwrap_err();
        assert_eq!(err, TransformError::Unsupported { node: node.clone() });
        assert_eq!(
            err.to_string(),
            "cannot transform `(1 = 2)`: assignment target must be a variable"
        );
    }

    #[test]
    fn malformed_tree_is_rejected() {
        let node = Node::lambda(None, vec![name("")], Node::int(1));
        assert!(matches!(
            transform_program(&node),
            Err(TransformError::Malformed(_))
        ));
    }
}

mod symbols {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbering_continues_across_transforms() {
        let node = Node::lambda(None, vec![], Node::int(0));
        let mut transformer = Transformer::new();
        transformer.transform(&node, |v| v).unwrap();
        transformer.transform(&node, |v| v).unwrap();
        assert_eq!(transformer.symbols().issued(), 2);

        let resumed = Transformer::with_symbols(transformer.into_symbols());
        assert_eq!(resumed.symbols().issued(), 2);
    }

    /// Parameters introduced by the transform, in output order.
    fn synthetic_binders(node: &Node, out: &mut Vec<Name>) {
        match node {
            Node::Function(lambda) => {
                out.extend(
                    lambda
                        .vars
                        .iter()
                        .filter(|v| v.as_str().starts_with(crate::SYMBOL_PREFIX))
                        .cloned(),
                );
                synthetic_binders(&lambda.body, out);
            }
            Node::Assignment { left, right } | Node::Binary { left, right, .. } => {
                synthetic_binders(left, out);
                synthetic_binders(right, out);
            }
            Node::Negation { body } => synthetic_binders(body, out),
            Node::Sequence { seq } => seq.iter().for_each(|n| synthetic_binders(n, out)),
            Node::Call { func, args } => {
                synthetic_binders(func, out);
                args.iter().for_each(|n| synthetic_binders(n, out));
            }
            Node::Conditional {
                condition,
                consequent,
                alternative,
            } => {
                synthetic_binders(condition, out);
                synthetic_binders(consequent, out);
                if let Some(alt) = alternative {
                    synthetic_binders(alt, out);
                }
            }
            Node::Declaration { vars, body } => {
                for binding in vars.iter() {
                    if let Some(def) = &binding.def {
                        synthetic_binders(def, out);
                    }
                }
                synthetic_binders(body, out);
            }
            Node::Integer(_) | Node::Str(_) | Node::Boolean(_) | Node::Variable(_) => {}
        }
    }

    #[test]
    fn every_synthetic_binder_is_distinct() {
        let source = "let (a = 1, b = 2) if a then f(b, g(a)) else lambda (x) x(a)";
        let mut transformer = Transformer::with_symbols(SymbolGenerator::new());
        let out = transformer.transform(&parse(source), |v| v).unwrap();

        let mut binders = Vec::new();
        synthetic_binders(&out, &mut binders);
        let total = binders.len();
        binders.sort_unstable();
        binders.dedup();

        assert_eq!(binders.len(), total);
        assert_eq!(u64::try_from(total).unwrap(), transformer.symbols().issued());
    }
}

mod round_trip {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn same_outcome(node: &NodeRef) -> (Result<Value, EvalErrorKind>, Result<Value, EvalErrorKind>) {
        (
            eval_direct(node).map_err(|e| e.kind),
            eval_transformed(node).map_err(|e| e.kind),
        )
    }

    #[test]
    fn conditionals_run_the_rest_once() {
        let handler = buffer_handler();
        let source = r#"
            let (n = 0) {
                n = if n < 1 then { println("small"); 10 } else 20;
                println(n);
                n + if false then 1 else 2
            }
        "#;
        let node = parse(source);

        let mut direct = InterpreterBuilder::new()
            .print_handler(handler.clone())
            .max_depth(DEFAULT_MAX_DEPTH)
            .build();
        let expected = direct.run(&node).unwrap();
        let expected_output = handler.captured();
        handler.clear();

        let mut cps = InterpreterBuilder::new()
            .print_handler(handler.clone())
            .max_depth(DEFAULT_MAX_DEPTH)
            .convention(CallConvention::Explicit)
            .build();
        let actual = cps.run(&transform_program(&node).unwrap()).unwrap();

        assert_eq!(expected, Value::Int(12));
        assert_eq!(actual, expected);
        assert_eq!(handler.captured(), expected_output);
        assert_eq!(expected_output, "small\n10\n");
    }

    #[test]
    fn recursion_through_transformed_tree() {
        let source = "let (sum = lambda sum (n) if n == 0 then 0 else n + sum(n - 1)) sum(2000)";
        let node = parse(source);
        assert_eq!(eval_transformed(&node).unwrap(), Value::Int(2_001_000));
        assert_eq!(eval_direct(&node).unwrap(), Value::Int(2_001_000));
    }

    #[test]
    fn deep_recursion_through_transformed_tree() {
        let source = "let (sum = lambda sum (n) if n == 0 then 0 else n + sum(n - 1)) sum(100000)";
        let (direct, cps) = same_outcome(&parse(source));
        assert_eq!(direct, Ok(Value::Int(5_000_050_000)));
        assert_eq!(cps, direct);
    }

    #[test]
    fn deep_failure_through_transformed_tree() {
        let source = "let (f = lambda f (n) if n == 0 then boom else 1 + f(n - 1)) f(100000)";
        let (direct, cps) = same_outcome(&parse(source));
        assert_eq!(
            direct,
            Err(EvalErrorKind::UndefinedVariable {
                name: "boom".to_string()
            })
        );
        assert_eq!(cps, direct);
    }

    #[test]
    fn let_sequencing_survives() {
        let (direct, cps) = same_outcome(&parse("let (x = 1, y = x + 1) { x = y * 10; x + y }"));
        assert_eq!(direct, Ok(Value::Int(22)));
        assert_eq!(cps, direct);
    }

    #[test]
    fn errors_survive() {
        let (direct, cps) = same_outcome(&parse("1 + (lambda (d) 10 / d)(0)"));
        assert_eq!(direct, Err(EvalErrorKind::ZeroDivision));
        assert_eq!(cps, direct);
    }

    /// Arithmetic trees with calls of function literals.
    fn arb_expr() -> impl Strategy<Value = NodeRef> {
        let leaf = (-20i64..20).prop_map(Node::int);
        leaf.prop_recursive(4, 48, 3, |inner| {
            prop_oneof![
                (
                    prop::sample::select(vec!["+", "-", "*", "/", "%", "<", "==", "&&", "||"]),
                    inner.clone(),
                    inner.clone()
                )
                    .prop_map(|(op, l, r)| Node::binary(op, l, r)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| {
                    let body = Node::binary("-", Node::var("a"), Node::var("b"));
                    Node::call(Node::lambda(None, vec![name("a"), name("b")], body), vec![a, b])
                }),
                (inner.clone(), inner.clone()).prop_map(|(f_body, arg)| {
                    let body = Node::binary("+", Node::var("x"), f_body);
                    Node::call(Node::lambda(None, vec![name("x")], body), vec![arg])
                }),
                inner.prop_map(Node::not),
            ]
        })
    }

    proptest! {
        #[test]
        fn transformed_tree_evaluates_to_same_value(node in arb_expr()) {
            let (direct, cps) = same_outcome(&node);
            prop_assert_eq!(cps, direct, "tree: {}", node);
        }
    }
}
