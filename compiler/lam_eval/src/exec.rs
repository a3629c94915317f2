//! Per-variant evaluation.
//!
//! Every method here ends in exactly one guarded call (`evaluate`, `resume`,
//! `guard`) or an error; nothing runs after it. See `machine` for why.

use std::rc::Rc;

use lam_ir::{LetBinding, Node, NodeRef};
use smallvec::{smallvec, SmallVec};

use crate::errors::{cannot_evaluate, expected_variable};
use crate::machine::{continuation, CallConvention, Continuation, Machine};
use crate::operators::apply_operator;
use crate::value::Closure;
use crate::{Environment, EvalResult, Value};

/// Evaluated call arguments.
pub type Arguments = SmallVec<[Value; 4]>;

impl Machine {
    /// Evaluate `node` in `env`, then continue with `k`.
    pub(crate) fn evaluate(
        &mut self,
        node: NodeRef,
        env: Environment,
        k: Continuation,
    ) -> EvalResult<()> {
        self.guard(move |m| m.eval_node(&node, env, k))
    }

    fn eval_node(&mut self, node: &NodeRef, env: Environment, k: Continuation) -> EvalResult<()> {
        match &**node {
            Node::Integer(n) => self.resume(k, Value::Int(*n)),
            Node::Str(s) => self.resume(k, Value::Str(Rc::clone(s))),
            Node::Boolean(b) => self.resume(k, Value::Bool(*b)),

            Node::Variable(name) => {
                let value = env.get(name.as_str())?;
                self.resume(k, value)
            }

            Node::Assignment { left, right } => {
                // Target shape is checked before `right` runs.
                let Some(name) = left.as_variable() else {
                    return Err(expected_variable(left));
                };
                let name = name.clone();
                let target = env.clone();
                self.evaluate(
                    Rc::clone(right),
                    env,
                    continuation(move |m, value| {
                        target.set(name.as_str(), value.clone())?;
                        m.resume(k, value)
                    }),
                )
            }

            Node::Binary {
                operator,
                left,
                right,
            } => {
                let operator = operator.clone();
                let right = Rc::clone(right);
                let scope = env.clone();
                self.evaluate(
                    Rc::clone(left),
                    env,
                    continuation(move |m, lhs| {
                        m.evaluate(
                            right,
                            scope,
                            continuation(move |m, rhs| {
                                let value = apply_operator(operator.as_str(), lhs, rhs)?;
                                m.resume(k, value)
                            }),
                        )
                    }),
                )
            }

            Node::Negation { body } => self.evaluate(
                Rc::clone(body),
                env,
                continuation(move |m, value| m.resume(k, Value::Bool(!value.is_truthy()))),
            ),

            Node::Conditional {
                condition,
                consequent,
                alternative,
            } => {
                let consequent = Rc::clone(consequent);
                let alternative = alternative.clone();
                let scope = env.clone();
                self.evaluate(
                    Rc::clone(condition),
                    env,
                    continuation(move |m, test| {
                        if test.is_truthy() {
                            m.evaluate(consequent, scope, k)
                        } else if let Some(alternative) = alternative {
                            m.evaluate(alternative, scope, k)
                        } else {
                            m.resume(k, Value::Bool(false))
                        }
                    }),
                )
            }

            Node::Sequence { seq } => {
                self.eval_sequence(Rc::clone(seq), 0, env, Value::Bool(false), k)
            }

            Node::Call { func, args } => {
                let args = Rc::clone(args);
                let scope = env.clone();
                self.evaluate(
                    Rc::clone(func),
                    env,
                    continuation(move |m, callee| {
                        m.eval_arguments(callee, args, 0, SmallVec::new(), scope, k)
                    }),
                )
            }

            Node::Declaration { vars, body } => {
                self.eval_bindings(Rc::clone(vars), 0, Rc::clone(body), env, k)
            }

            Node::Function(lambda) => {
                let env = if lambda.name.is_some() {
                    let frame = env.extend();
                    frame.define_recursive(lambda);
                    frame
                } else {
                    env
                };
                let closure = Closure {
                    lambda: Rc::clone(lambda),
                    env,
                };
                self.resume(k, Value::Closure(Rc::new(closure)))
            }
        }
    }

    /// Evaluate `seq[index..]`; `last` is the value of the element before.
    fn eval_sequence(
        &mut self,
        seq: Rc<[NodeRef]>,
        index: usize,
        env: Environment,
        last: Value,
        k: Continuation,
    ) -> EvalResult<()> {
        let Some(item) = seq.get(index).cloned() else {
            return self.resume(k, last);
        };
        // The last element is in tail position.
        if index + 1 == seq.len() {
            return self.evaluate(item, env, k);
        }
        let scope = env.clone();
        self.evaluate(
            item,
            env,
            continuation(move |m, value| m.eval_sequence(seq, index + 1, scope, value, k)),
        )
    }

    /// Evaluate `args[index..]` left to right, then apply `callee`.
    fn eval_arguments(
        &mut self,
        callee: Value,
        args: Rc<[NodeRef]>,
        index: usize,
        mut values: Arguments,
        env: Environment,
        k: Continuation,
    ) -> EvalResult<()> {
        let Some(arg) = args.get(index).cloned() else {
            return self.apply(callee, values, k);
        };
        let scope = env.clone();
        self.evaluate(
            arg,
            env,
            continuation(move |m, value| {
                values.push(value);
                m.eval_arguments(callee, args, index + 1, values, scope, k)
            }),
        )
    }

    /// Bind `vars[index..]` one frame at a time, then evaluate `body`.
    fn eval_bindings(
        &mut self,
        vars: Rc<[LetBinding]>,
        index: usize,
        body: NodeRef,
        env: Environment,
        k: Continuation,
    ) -> EvalResult<()> {
        let Some(binding) = vars.get(index) else {
            return self.evaluate(body, env, k);
        };
        let name = binding.name.clone();
        match binding.def.clone() {
            Some(def) => {
                let scope = env.clone();
                self.evaluate(
                    def,
                    env,
                    continuation(move |m, value| {
                        let frame = scope.extend();
                        frame.define(name, value);
                        m.eval_bindings(vars, index + 1, body, frame, k)
                    }),
                )
            }
            None => {
                let frame = env.extend();
                frame.define(name, Value::Bool(false));
                self.guard(move |m| m.eval_bindings(vars, index + 1, body, frame, k))
            }
        }
    }

    /// Call `callee` with already-evaluated arguments.
    ///
    /// Parameters without a matching argument are bound to `false`; surplus
    /// arguments are ignored.
    pub(crate) fn apply(
        &mut self,
        callee: Value,
        args: Arguments,
        k: Continuation,
    ) -> EvalResult<()> {
        match &callee {
            Value::Closure(closure) => {
                let frame = closure.env.extend();
                for (i, var) in closure.lambda.vars.iter().enumerate() {
                    let value = args.get(i).cloned().unwrap_or(Value::Bool(false));
                    frame.define(var.clone(), value);
                }
                self.evaluate(Rc::clone(&closure.lambda.body), frame, k)
            }
            Value::Host(host) => match self.convention {
                CallConvention::Implicit => {
                    let value = (host.func)(args.as_slice())?;
                    self.resume(k, value)
                }
                CallConvention::Explicit => {
                    let Some((continuation, rest)) = args.split_first() else {
                        let value = (host.func)(&[])?;
                        return self.resume(k, value);
                    };
                    let value = (host.func)(rest)?;
                    let continuation = continuation.clone();
                    self.guard(move |m| m.apply(continuation, smallvec![value], k))
                }
            },
            other => Err(cannot_evaluate(other)),
        }
    }
}
