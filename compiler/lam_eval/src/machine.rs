//! The trampoline.
//!
//! Evaluation is continuation-passing: every step ends by handing a value to
//! a [`Continuation`], so every call the evaluator makes is in tail position.
//! [`Machine::guard`] counts how many such calls are nested on the native
//! stack. At the threshold the next step is parked on a work list instead of
//! being run, the stack unwinds to [`Machine::drive`], and the driver picks the
//! step back up at depth zero.
//!
//! Native stack use is therefore bounded whatever the recursion depth of the
//! program. Because the threshold counts steps rather than bytes, the guard
//! also bounces as soon as the native stack is running low, so no threshold
//! can overflow it. The rest of the computation lives on the heap as a chain
//! of [`Continuation`]s.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use lam_ir::{validate, NodeRef};
use lam_stack::{ensure_sufficient_stack, stack_is_low};
use tracing::{debug, debug_span, trace};

use crate::{Environment, EvalResult, Value};

type ContinuationFn = Box<dyn FnOnce(&mut Machine, Value) -> EvalResult<()>>;

/// "What to do with the value": the rest of the computation.
///
/// Each continuation owns the one it resumes, so a deep non-tail computation
/// is a chain as long as the recursion. An unused chain, as left behind when a
/// step fails, is released one link at a time under
/// [`ensure_sufficient_stack`].
pub struct Continuation(Option<ContinuationFn>);

impl Continuation {
    pub fn new(k: impl FnOnce(&mut Machine, Value) -> EvalResult<()> + 'static) -> Self {
        Continuation(Some(Box::new(k)))
    }

    fn call(mut self, machine: &mut Machine, value: Value) -> EvalResult<()> {
        match self.0.take() {
            Some(k) => k(machine, value),
            None => Ok(()),
        }
    }
}

impl Drop for Continuation {
    fn drop(&mut self) {
        if let Some(k) = self.0.take() {
            ensure_sufficient_stack(move || drop(k));
        }
    }
}

/// Box a closure as a [`Continuation`].
#[inline]
pub fn continuation(
    k: impl FnOnce(&mut Machine, Value) -> EvalResult<()> + 'static,
) -> Continuation {
    Continuation::new(k)
}

/// A parked step.
type Task = Box<dyn FnOnce(&mut Machine) -> EvalResult<()>>;

/// Nesting depth at which the machine bounces by default.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// How host functions receive their continuation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CallConvention {
    /// The continuation is implicit: host functions see only the call's
    /// arguments and the machine delivers their result. Used for direct-style
    /// trees.
    #[default]
    Implicit,
    /// The first argument of every call is the continuation, as in
    /// CPS-transformed trees. Host functions receive the remaining arguments
    /// and the machine applies the first one to their result.
    Explicit,
}

/// Evaluator state for one or more runs.
pub struct Machine {
    depth: usize,
    max_depth: usize,
    pending: VecDeque<Task>,
    bounces: u64,
    pub(crate) convention: CallConvention,
}

impl Machine {
    /// `max_depth` is clamped to at least 1 so every bounce makes progress.
    pub fn new(max_depth: usize, convention: CallConvention) -> Self {
        Machine {
            depth: 0,
            max_depth: max_depth.max(1),
            pending: VecDeque::new(),
            bounces: 0,
            convention,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn convention(&self) -> CallConvention {
        self.convention
    }

    /// Total number of bounces since the machine was created.
    pub fn bounces(&self) -> u64 {
        self.bounces
    }

    /// Run `step` now, or park it if the native stack is already `max_depth`
    /// guarded calls deep or close to exhausted.
    ///
    /// Callers must return the result immediately: after a park, `Ok(())`
    /// only means "unwind".
    #[inline]
    pub(crate) fn guard(
        &mut self,
        step: impl FnOnce(&mut Machine) -> EvalResult<()> + 'static,
    ) -> EvalResult<()> {
        // At depth zero the step always runs, so every task makes progress.
        if self.depth >= self.max_depth || (self.depth > 0 && stack_is_low()) {
            self.bounces += 1;
            trace!(bounces = self.bounces, "bounce");
            self.pending.push_back(Box::new(step));
            return Ok(());
        }
        self.depth += 1;
        let result = step(self);
        self.depth = self.depth.saturating_sub(1);
        result
    }

    /// Hand `value` to `k` under the guard.
    #[inline]
    pub(crate) fn resume(&mut self, k: Continuation, value: Value) -> EvalResult<()> {
        self.guard(move |m| k.call(m, value))
    }

    /// Driver loop: run parked steps until none remain.
    ///
    /// The first error aborts the run; remaining work is discarded.
    fn drive(
        &mut self,
        first: impl FnOnce(&mut Machine) -> EvalResult<()> + 'static,
    ) -> EvalResult<()> {
        self.pending.push_back(Box::new(first));
        while let Some(task) = self.pending.pop_front() {
            self.depth = 0;
            if let Err(err) = task(self) {
                self.pending.clear();
                return Err(err);
            }
        }
        Ok(())
    }

    /// Evaluate `node` in `env`, handing its value to `k`.
    ///
    /// Returns once `k` has run and the work list is empty. The tree is
    /// validated first; a malformed tree fails before anything is evaluated.
    pub fn execute(&mut self, node: NodeRef, env: Environment, k: Continuation) -> EvalResult<()> {
        validate(&node)?;
        let _span = debug_span!("execute", max_depth = self.max_depth, convention = ?self.convention)
            .entered();
        let bounces_before = self.bounces;
        let result = self.drive(move |m| m.evaluate(node, env, k));
        debug!(
            bounces = self.bounces - bounces_before,
            ok = result.is_ok(),
            "execution finished"
        );
        result
    }

    /// [`execute`](Self::execute) with a continuation that keeps the value.
    pub fn run(&mut self, node: NodeRef, env: Environment) -> EvalResult {
        let slot: Rc<RefCell<Option<Value>>> = Rc::default();
        let sink = Rc::clone(&slot);
        self.execute(
            node,
            env,
            continuation(move |_, value| {
                *sink.borrow_mut() = Some(value);
                Ok(())
            }),
        )?;
        // On success the final continuation has run exactly once.
        let value = slot.borrow_mut().take();
        Ok(value.unwrap_or(Value::Bool(false)))
    }
}

impl Default for Machine {
    fn default() -> Self {
        Machine::new(DEFAULT_MAX_DEPTH, CallConvention::Implicit)
    }
}

/// Evaluate `node` in `env` with a fresh default machine and hand the result
/// to `k`.
///
/// `k` is called exactly once when evaluation succeeds and never when it fails.
pub fn evaluate(
    node: &NodeRef,
    env: &Environment,
    k: impl FnOnce(Value) + 'static,
) -> EvalResult<()> {
    Machine::default().execute(
        Rc::clone(node),
        env.clone(),
        continuation(move |_, value| {
            k(value);
            Ok(())
        }),
    )
}
