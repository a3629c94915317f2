//! Synthetic names for the transformer.

use lam_ir::Name;
use tracing::trace;

/// Leading text of every generated name.
///
/// `β` cannot appear in a source identifier, so generated names never capture
/// or shadow a user's variable.
pub const SYMBOL_PREFIX: &str = "β_";

/// Hands out names that are unique for the generator's lifetime.
///
/// One generator is owned by each [`Transformer`](crate::Transformer); two
/// transforms sharing output must share a generator.
#[derive(Debug)]
pub struct SymbolGenerator {
    next: u64,
}

impl SymbolGenerator {
    pub fn new() -> Self {
        SymbolGenerator { next: 1 }
    }

    /// `β_` + `prefix` + counter, then advance the counter.
    ///
    /// `prefix` must not end in a digit, or two prefixes could produce the
    /// same text (`R1` + `1` and `R` + `11`).
    pub fn fresh(&mut self, prefix: &str) -> Name {
        debug_assert!(
            !prefix.ends_with(|c: char| c.is_ascii_digit()),
            "symbol prefix `{prefix}` ends in a digit"
        );
        let name = Name::from(format!("{SYMBOL_PREFIX}{prefix}{}", self.next));
        self.next += 1;
        trace!(%name, "fresh symbol");
        name
    }

    /// How many names have been handed out.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for SymbolGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn names_carry_prefix_and_counter() {
        let mut symbols = SymbolGenerator::new();
        assert_eq!(symbols.fresh("K").as_str(), "β_K1");
        assert_eq!(symbols.fresh("R").as_str(), "β_R2");
        assert_eq!(symbols.fresh("K").as_str(), "β_K3");
        assert_eq!(symbols.issued(), 3);
    }

    proptest! {
        #[test]
        fn names_never_repeat(prefixes in prop::collection::vec("[A-Za-z]{0,3}", 1..200)) {
            let mut symbols = SymbolGenerator::new();
            let mut seen = HashSet::new();
            for prefix in &prefixes {
                let name = symbols.fresh(prefix);
                prop_assert!(seen.insert(name.as_str().to_string()), "duplicate {}", name);
            }
        }
    }
}
