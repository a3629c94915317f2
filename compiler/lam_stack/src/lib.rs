//! Native stack growth for recursive tree walks.
//!
//! The parser, the purity and validation walks, the node printer and the CPS
//! transformer all recurse once per level of AST nesting. Programs written in
//! a language whose only loop is recursion nest deeply (long `let` chains,
//! long sequences turned into nested continuations), so each of those walks
//! wraps its recursive step in [`ensure_sufficient_stack`].
//!
//! The evaluator bounds its own depth with a trampoline instead of growing the
//! stack. Its bounce threshold counts evaluation steps, not bytes, so it also
//! bounces early when [`stack_is_low`]. Continuation and scope chains it
//! builds on the heap are released under [`ensure_sufficient_stack`], since
//! dropping them recurses once per link.
//!
//! - **Native targets**: `stacker::maybe_grow` switches to a fresh segment when
//!   fewer than [`RED_ZONE`] bytes remain.
//! - **WASM targets**: plain call.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first moving to a new stack segment if the current one is nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Whether fewer than [`RED_ZONE`] bytes of the current stack remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn stack_is_low() -> bool {
    stacker::remaining_stack().is_some_and(|left| left < RED_ZONE)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn stack_is_low() -> bool {
    false
}

#[cfg(test)]
mod tests;
