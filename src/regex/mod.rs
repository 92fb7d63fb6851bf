//! The five-operator regular-expression language: empty pattern, literal
//! symbol, concatenation, alternation and repetition, compiled into
//! equivalent nondeterministic finite automata by Thompson construction.

mod parse;

pub use self::parse::ParseError;

use std::fmt;

use super::automaton::{FaRule, NfaDesign, NfaRulebook, StateAllocator};

/// A pattern syntax tree. The node kinds form a closed set: both the
/// compiler and the renderer match exhaustively, so a new kind is a
/// compile-time obligation everywhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Matches only the empty string.
    Empty,
    /// Matches exactly the one-symbol string.
    Literal(char),
    /// Matches a word of the first language followed by a word of the
    /// second.
    Concatenate(Box<Pattern>, Box<Pattern>),
    /// Matches a word of either language.
    Choose(Box<Pattern>, Box<Pattern>),
    /// Matches zero or more repetitions of words of the language.
    Repeat(Box<Pattern>),
}

impl Pattern {
    pub fn literal(symbol: char) -> Pattern {
        Pattern::Literal(symbol)
    }

    pub fn concatenate(first: Pattern, second: Pattern) -> Pattern {
        Pattern::Concatenate(Box::new(first), Box::new(second))
    }

    pub fn choose(first: Pattern, second: Pattern) -> Pattern {
        Pattern::Choose(Box::new(first), Box::new(second))
    }

    pub fn repeat(pattern: Pattern) -> Pattern {
        Pattern::Repeat(Box::new(pattern))
    }

    /// Binding strength in the concrete syntax; a child whose precedence
    /// is lower than its context gets wrapped in parentheses.
    fn precedence(&self) -> u8 {
        match self {
            Pattern::Empty | Pattern::Literal(_) => 3,
            Pattern::Repeat(_) => 2,
            Pattern::Concatenate(..) => 1,
            Pattern::Choose(..) => 0,
        }
    }

    fn bracket(&self, outer_precedence: u8) -> String {
        if self.precedence() < outer_precedence {
            format!("({})", self)
        } else {
            self.to_string()
        }
    }

    pub fn matches(&self, input: &str) -> bool {
        self.to_nfa_design().accepts(input)
    }

    /// Compile the pattern into an NFA design. Each compilation pass owns
    /// its own allocator, so two compilations of one pattern produce
    /// automata with different state identities but identical behavior.
    pub fn to_nfa_design(&self) -> NfaDesign {
        let mut states = StateAllocator::new();
        self.compile(&mut states)
    }

    fn compile(&self, states: &mut StateAllocator) -> NfaDesign {
        match self {
            Pattern::Empty => {
                // One state, both start and accept, no rules.
                let start_state = states.fresh();
                NfaDesign::new(start_state, &[start_state], NfaRulebook::new(Vec::new()))
            }

            Pattern::Literal(symbol) => {
                let start_state = states.fresh();
                let accept_state = states.fresh();
                let rule = FaRule::new(start_state, Some(*symbol), accept_state);
                NfaDesign::new(start_state, &[accept_state], NfaRulebook::new(vec![rule]))
            }

            Pattern::Concatenate(first, second) => {
                let first_design = first.compile(states);
                let second_design = second.compile(states);

                let mut rules = first_design.rulebook().rules().to_vec();
                rules.extend_from_slice(second_design.rulebook().rules());
                // Free moves splice every accept state of the first
                // automaton onto the start of the second.
                for state in first_design.accept_states().iter() {
                    rules.push(FaRule::new(state, None, second_design.start_state()));
                }

                NfaDesign::with_accept_set(
                    first_design.start_state(),
                    second_design.accept_states().clone(),
                    NfaRulebook::new(rules),
                )
            }

            Pattern::Choose(first, second) => {
                let start_state = states.fresh();
                let first_design = first.compile(states);
                let second_design = second.compile(states);

                let mut accept_states = first_design.accept_states().clone();
                accept_states.union_with(second_design.accept_states());

                let mut rules = first_design.rulebook().rules().to_vec();
                rules.extend_from_slice(second_design.rulebook().rules());
                rules.push(FaRule::new(start_state, None, first_design.start_state()));
                rules.push(FaRule::new(start_state, None, second_design.start_state()));

                NfaDesign::with_accept_set(start_state, accept_states, NfaRulebook::new(rules))
            }

            Pattern::Repeat(pattern) => {
                let start_state = states.fresh();
                let pattern_design = pattern.compile(states);

                // The fresh start accepts so that zero repetitions match.
                let mut accept_states = pattern_design.accept_states().clone();
                accept_states.insert(start_state);

                let mut rules = pattern_design.rulebook().rules().to_vec();
                for state in pattern_design.accept_states().iter() {
                    rules.push(FaRule::new(state, None, pattern_design.start_state()));
                }
                rules.push(FaRule::new(start_state, None, pattern_design.start_state()));

                NfaDesign::with_accept_set(start_state, accept_states, NfaRulebook::new(rules))
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pattern::Empty => Ok(()),
            Pattern::Literal(symbol) => write!(f, "{}", symbol),
            Pattern::Concatenate(first, second) => {
                let precedence = self.precedence();
                write!(
                    f,
                    "{}{}",
                    first.bracket(precedence),
                    second.bracket(precedence)
                )
            }
            Pattern::Choose(first, second) => {
                let precedence = self.precedence();
                write!(
                    f,
                    "{}|{}",
                    first.bracket(precedence),
                    second.bracket(precedence)
                )
            }
            Pattern::Repeat(pattern) => write!(f, "{}*", pattern.bracket(self.precedence())),
        }
    }
}
