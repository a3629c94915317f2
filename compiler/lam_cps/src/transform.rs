//! The CPS transform.
//!
//! `cps(node, k)` rewrites `node` so that its value is handed to `k`, a
//! function from "the node computing the value" to "the rest of the program".
//! `k` runs at transform time; it decides where the value lands in the output.
//!
//! In the output every function takes its return continuation as an extra
//! first parameter and every call passes one as an extra first argument. `let`
//! disappears: each binding becomes an immediately applied one-parameter
//! function.

use std::rc::Rc;

use lam_ir::{is_pure, validate, Name, Node, NodeRef};
use lam_stack::ensure_sufficient_stack;
use tracing::debug_span;

use crate::{SymbolGenerator, TransformError, TransformResult};

/// Transform-time continuation.
type MetaCont = Box<dyn FnOnce(&mut Transformer, NodeRef) -> TransformResult>;

#[inline]
fn meta(k: impl FnOnce(&mut Transformer, NodeRef) -> TransformResult + 'static) -> MetaCont {
    Box::new(k)
}

/// Continuation that passes the value to the function named `target`.
fn jump(target: &Name) -> MetaCont {
    let target = target.clone();
    meta(move |_, value| Ok(Node::call(Node::var(target), vec![value])))
}

/// Rewrites direct-style trees into continuation-passing style.
#[derive(Debug, Default)]
pub struct Transformer {
    symbols: SymbolGenerator,
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering from an existing generator.
    pub fn with_symbols(symbols: SymbolGenerator) -> Self {
        Transformer { symbols }
    }

    pub fn symbols(&self) -> &SymbolGenerator {
        &self.symbols
    }

    pub fn into_symbols(self) -> SymbolGenerator {
        self.symbols
    }

    /// Transform `node`, handing the node for its value to `k`.
    pub fn transform(
        &mut self,
        node: &NodeRef,
        k: impl FnOnce(NodeRef) -> NodeRef + 'static,
    ) -> TransformResult {
        validate(node)?;
        let _span = debug_span!("cps_transform", kind = node.kind_name()).entered();
        self.cps(node, meta(move |_, value| Ok(k(value))))
    }

    fn cps(&mut self, node: &NodeRef, k: MetaCont) -> TransformResult {
        ensure_sufficient_stack(|| self.cps_node(node, k))
    }

    fn cps_node(&mut self, node: &NodeRef, k: MetaCont) -> TransformResult {
        match &**node {
            Node::Integer(_) | Node::Str(_) | Node::Boolean(_) | Node::Variable(_) => {
                k(self, Rc::clone(node))
            }

            Node::Negation { body } => self.cps(body, meta(move |t, body| k(t, Node::not(body)))),

            Node::Binary {
                operator,
                left,
                right,
            } => {
                let operator = operator.clone();
                let right = Rc::clone(right);
                self.cps(
                    left,
                    meta(move |t, left| {
                        t.cps(
                            &right,
                            meta(move |t, right| k(t, Node::binary(operator, left, right))),
                        )
                    }),
                )
            }

            Node::Assignment { left, right } => {
                if left.as_variable().is_none() {
                    return Err(TransformError::Unsupported {
                        node: Rc::clone(node),
                    });
                }
                let right = Rc::clone(right);
                self.cps(
                    left,
                    meta(move |t, left| {
                        t.cps(&right, meta(move |t, right| k(t, Node::assign(left, right))))
                    }),
                )
            }

            Node::Declaration { vars, body } => {
                let Some((first, rest)) = vars.split_first() else {
                    return self.cps(body, k);
                };
                let def = first.def.clone().unwrap_or_else(|| Node::boolean(false));
                let scope = Node::lambda(
                    None,
                    vec![first.name.clone()],
                    Node::declare(rest.to_vec(), Rc::clone(body)),
                );
                self.cps(&Node::call(scope, vec![def]), k)
            }

            Node::Function(lambda) => {
                let ret = self.symbols.fresh("K");
                let body = self.cps(&lambda.body, jump(&ret))?;
                let mut vars = Vec::with_capacity(lambda.vars.len() + 1);
                vars.push(ret);
                vars.extend(lambda.vars.iter().cloned());
                // Building a function suspends nothing.
                k(self, Node::lambda(lambda.name.clone(), vars, body))
            }

            Node::Conditional {
                condition,
                consequent,
                alternative,
            } => {
                let consequent = Rc::clone(consequent);
                let alternative = alternative
                    .clone()
                    .unwrap_or_else(|| Node::boolean(false));
                self.cps(
                    condition,
                    meta(move |t, condition| t.cps_branches(condition, &consequent, &alternative, k)),
                )
            }

            Node::Sequence { seq } => self.cps_sequence(Rc::clone(seq), 0, k),

            Node::Call { func, args } => {
                let args = Rc::clone(args);
                self.cps(
                    func,
                    meta(move |t, func| {
                        let ret = t.reify(k)?;
                        t.cps_arguments(func, args, 0, vec![ret])
                    }),
                )
            }
        }
    }

    /// `(λ(I) if c then I(a) else I(b))(λ(R) k(R))`
    ///
    /// `k` is emitted once, inside the function bound to `I`, and both arms
    /// finish by calling `I`, so the rest of the program runs exactly once
    /// after exactly one arm.
    fn cps_branches(
        &mut self,
        condition: NodeRef,
        consequent: &NodeRef,
        alternative: &NodeRef,
        k: MetaCont,
    ) -> TransformResult {
        let join = self.symbols.fresh("I");
        let rest = self.reify(k)?;
        let consequent = self.cps(consequent, jump(&join))?;
        let alternative = self.cps(alternative, jump(&join))?;
        let branch = Node::cond(condition, consequent, Some(alternative));
        Ok(Node::call(Node::lambda(None, vec![join], branch), vec![rest]))
    }

    /// `λ(R) k(R)` for a fresh `R`.
    fn reify(&mut self, k: MetaCont) -> TransformResult {
        let param = self.symbols.fresh("R");
        let body = k(self, Node::var(param.clone()))?;
        Ok(Node::lambda(None, vec![param], body))
    }

    /// Pure elements other than the last are dropped: their value is
    /// discarded and evaluating them has no effect.
    fn cps_sequence(&mut self, seq: Rc<[NodeRef]>, index: usize, k: MetaCont) -> TransformResult {
        match seq.len() - index {
            0 => k(self, Node::boolean(false)),
            1 => self.cps(&seq[index], k),
            _ if is_pure(&seq[index]) => self.cps_sequence(seq, index + 1, k),
            _ => {
                let item = Rc::clone(&seq[index]);
                self.cps(
                    &item,
                    meta(move |t, value| {
                        let rest = t.cps_sequence(seq, index + 1, k)?;
                        Ok(if is_pure(&value) {
                            rest
                        } else {
                            Node::seq(vec![value, rest])
                        })
                    }),
                )
            }
        }
    }

    fn cps_arguments(
        &mut self,
        func: NodeRef,
        args: Rc<[NodeRef]>,
        index: usize,
        mut out: Vec<NodeRef>,
    ) -> TransformResult {
        let Some(arg) = args.get(index).cloned() else {
            return Ok(Node::call(func, out));
        };
        self.cps(
            &arg,
            meta(move |t, value| {
                out.push(value);
                t.cps_arguments(func, args, index + 1, out)
            }),
        )
    }
}

/// Transform `node` with a fresh [`Transformer`].
pub fn transform(node: &NodeRef, k: impl FnOnce(NodeRef) -> NodeRef + 'static) -> TransformResult {
    Transformer::new().transform(node, k)
}

/// Transform a whole program; its value is the program's value.
pub fn transform_program(node: &NodeRef) -> TransformResult {
    transform(node, |value| value)
}
