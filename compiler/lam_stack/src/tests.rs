use super::{ensure_sufficient_stack, stack_is_low};

enum Chain {
    Link(Box<Chain>),
    End(u32),
}

fn build(depth: u32) -> Chain {
    let mut chain = Chain::End(depth);
    for _ in 0..depth {
        chain = Chain::Link(Box::new(chain));
    }
    chain
}

fn measure(chain: &Chain) -> u32 {
    ensure_sufficient_stack(|| match chain {
        Chain::Link(next) => measure(next) + 1,
        Chain::End(_) => 0,
    })
}

fn unlink(chain: Chain) {
    let mut current = chain;
    while let Chain::Link(next) = current {
        current = *next;
    }
}

#[test]
fn test_shallow_walk() {
    let chain = build(16);
    assert_eq!(measure(&chain), 16);
    unlink(chain);
}

#[test]
fn test_deep_walk_does_not_overflow() {
    let chain = build(200_000);
    assert_eq!(measure(&chain), 200_000);
    unlink(chain);
}

#[test]
fn test_passes_result_through() {
    let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("nope"));
    assert_eq!(result, Err("nope"));
}

#[test]
fn test_fresh_thread_has_headroom() {
    assert!(!stack_is_low());
}
