//! Models of finite and pushdown machines, deterministic and
//! nondeterministic, built from a shared rule/rulebook vocabulary.
//!
//! Every machine comes in three layers: an immutable rulebook of
//! transition rules, a mutable automaton that owns the current position
//! of one run, and an immutable design (start, accept states, rulebook)
//! that stamps out a fresh automaton for every simulated run.

pub mod finite;
pub mod pushdown;

pub use self::finite::{Dfa, DfaDesign, DfaRulebook, FaRule, Nfa, NfaDesign, NfaRulebook};
pub use self::pushdown::{
    Dpda, DpdaDesign, DpdaRulebook, Npda, NpdaDesign, NpdaRulebook, PdaConfiguration, PdaRule,
    Stack,
};

/// An opaque machine state. Rulebooks only ever compare states for
/// equality, so a plain index is all the structure we need.
pub type State = usize;

/// Hands out states that are guaranteed not to collide within one
/// compilation pass. The regex compiler threads a single allocator
/// through all child compilations so that spliced sub-automata keep
/// disjoint state spaces.
#[derive(Debug, Default)]
pub struct StateAllocator {
    next: State,
}

impl StateAllocator {
    pub fn new() -> StateAllocator {
        StateAllocator { next: 0 }
    }

    pub fn fresh(&mut self) -> State {
        let state = self.next;
        self.next += 1;
        state
    }
}
