//! Pedagogical models of formal computation devices: deterministic and
//! nondeterministic finite automata, deterministic and nondeterministic
//! pushdown automata, and a five-operator regular-expression language
//! compiled into equivalent NFAs.
//!
//! The nondeterministic machines share one engine shape: the machine
//! position is a *set* of configurations, every step fans out over all
//! applicable rules, and the set is kept closed under free (epsilon)
//! moves by a fixpoint computation. See [`automaton::NfaRulebook`] and
//! [`automaton::NpdaRulebook`].

pub mod automaton;
pub mod machine;
pub mod regex;
