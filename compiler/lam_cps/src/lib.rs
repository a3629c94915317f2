//! Lam CPS - continuation-passing-style transform.
//!
//! Rewrites a direct-style tree into one where every return is an explicit
//! call to a continuation, ready for a code generator targeting a language
//! without proper tail calls. Evaluation order is kept: operands left to
//! right, arguments left to right, sequence elements in order.
//!
//! ```text
//! f(1) + 2   ==>   f(λ(β_R1) β_R1 + 2, 1)
//! ```

mod error;
mod symbol;
mod transform;

pub use error::{TransformError, TransformResult};
pub use symbol::{SymbolGenerator, SYMBOL_PREFIX};
pub use transform::{transform, transform_program, Transformer};

#[cfg(test)]
mod tests;
