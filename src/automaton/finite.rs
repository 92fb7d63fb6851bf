//! Finite automata: the deterministic machine with its first-match
//! rulebook, and the nondeterministic machine whose position is a set of
//! states closed under free moves.

use std::fmt;
use std::io;
use std::io::Write;

use bit_set::BitSet;

use super::State;

/// A single labeled transition. A `symbol` of `None` is a free move: the
/// rule can be followed without consuming any input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaRule {
    state: State,
    symbol: Option<char>,
    next_state: State,
}

impl FaRule {
    pub fn new(state: State, symbol: Option<char>, next_state: State) -> FaRule {
        FaRule {
            state,
            symbol,
            next_state,
        }
    }

    pub fn applies_to(&self, state: State, symbol: Option<char>) -> bool {
        self.state == state && self.symbol == symbol
    }

    pub fn follow(&self) -> State {
        self.next_state
    }

    pub fn symbol(&self) -> Option<char> {
        self.symbol
    }
}

impl fmt::Display for FaRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.symbol {
            Some(symbol) => write!(f, "{} --{}--> {}", self.state, symbol, self.next_state),
            None => write!(f, "{} --ε--> {}", self.state, self.next_state),
        }
    }
}

/// Rulebook for a deterministic machine: at most one rule is expected to
/// apply to any (state, symbol), and when several do, the first declared
/// one wins. Declaration order is therefore significant here, unlike in
/// the nondeterministic rulebook.
#[derive(Clone, Debug, Default)]
pub struct DfaRulebook {
    rules: Vec<FaRule>,
}

impl DfaRulebook {
    pub fn new(rules: Vec<FaRule>) -> DfaRulebook {
        DfaRulebook { rules }
    }

    pub fn rule_for(&self, state: State, symbol: char) -> Option<&FaRule> {
        self.rules
            .iter()
            .find(|rule| rule.applies_to(state, Some(symbol)))
    }

    pub fn next_state(&self, state: State, symbol: char) -> Option<State> {
        self.rule_for(state, symbol).map(FaRule::follow)
    }
}

/// One run of a deterministic finite automaton. A missing rule parks the
/// machine in a stuck condition (`current_state` of `None`) that no
/// further input can leave.
pub struct Dfa<'d> {
    current_state: Option<State>,
    accept_states: &'d BitSet,
    rulebook: &'d DfaRulebook,
}

impl<'d> Dfa<'d> {
    pub fn accepting(&self) -> bool {
        match self.current_state {
            Some(state) => self.accept_states.contains(state),
            None => false,
        }
    }

    pub fn stuck(&self) -> bool {
        self.current_state.is_none()
    }

    pub fn read_symbol(&mut self, symbol: char) {
        self.current_state = self
            .current_state
            .and_then(|state| self.rulebook.next_state(state, symbol));
    }

    pub fn read_string(&mut self, input: &str) {
        for symbol in input.chars() {
            self.read_symbol(symbol);
        }
    }
}

/// Immutable blueprint of a deterministic finite automaton.
#[derive(Clone, Debug)]
pub struct DfaDesign {
    start_state: State,
    accept_states: BitSet,
    rulebook: DfaRulebook,
}

impl DfaDesign {
    pub fn new(start_state: State, accept_states: &[State], rulebook: DfaRulebook) -> DfaDesign {
        DfaDesign {
            start_state,
            accept_states: accept_states.iter().copied().collect(),
            rulebook,
        }
    }

    pub fn to_dfa(&self) -> Dfa {
        Dfa {
            current_state: Some(self.start_state),
            accept_states: &self.accept_states,
            rulebook: &self.rulebook,
        }
    }

    pub fn accepts(&self, input: &str) -> bool {
        let mut dfa = self.to_dfa();
        dfa.read_string(input);
        dfa.accepting()
    }
}

/// Rulebook for a nondeterministic machine. Queries fan out over every
/// applicable rule; the order of the rules is irrelevant because the
/// consumer only ever looks at the resulting set of states.
#[derive(Clone, Debug, Default)]
pub struct NfaRulebook {
    rules: Vec<FaRule>,
}

impl NfaRulebook {
    pub fn new(rules: Vec<FaRule>) -> NfaRulebook {
        NfaRulebook { rules }
    }

    pub fn rules(&self) -> &[FaRule] {
        &self.rules
    }

    /// Every rule applicable to (`state`, `symbol`). A symbol of `None`
    /// queries the free moves. Matching nothing yields an empty iterator,
    /// never an error.
    pub fn rules_for(
        &self,
        state: State,
        symbol: Option<char>,
    ) -> impl Iterator<Item = &FaRule> {
        self.rules
            .iter()
            .filter(move |rule| rule.applies_to(state, symbol))
    }

    /// The set of states reachable from `states` by following one rule
    /// labeled `symbol`. The set container deduplicates targets reached
    /// along several rules.
    pub fn next_states(&self, states: &BitSet, symbol: Option<char>) -> BitSet {
        let mut next = BitSet::new();
        for state in states.iter() {
            for rule in self.rules_for(state, symbol) {
                next.insert(rule.follow());
            }
        }
        next
    }

    /// The free-move closure: the smallest superset of `states` closed
    /// under epsilon rules. Reached as a fixpoint — once one more round
    /// of free moves produces nothing new, the set is closed. Closing an
    /// already-closed set returns it unchanged.
    pub fn follow_free_moves(&self, mut states: BitSet) -> BitSet {
        loop {
            let more_states = self.next_states(&states, None);
            if more_states.is_subset(&states) {
                return states;
            }
            states.union_with(&more_states);
        }
    }
}

/// One run of a nondeterministic finite automaton. The position is a set
/// of states, and every read of that set routes through the free-move
/// closure first, so callers never observe a non-closed set.
pub struct Nfa<'d> {
    current_states: BitSet,
    accept_states: &'d BitSet,
    rulebook: &'d NfaRulebook,
}

impl<'d> Nfa<'d> {
    pub fn current_states(&self) -> BitSet {
        self.rulebook.follow_free_moves(self.current_states.clone())
    }

    pub fn accepting(&self) -> bool {
        !self.current_states().is_disjoint(self.accept_states)
    }

    /// Reading a symbol no rule matches empties the current set; the run
    /// then stays empty and non-accepting for the rest of the input.
    pub fn read_symbol(&mut self, symbol: char) {
        self.current_states = self
            .rulebook
            .next_states(&self.current_states(), Some(symbol));
    }

    pub fn read_string(&mut self, input: &str) {
        for symbol in input.chars() {
            self.read_symbol(symbol);
        }
    }
}

/// Immutable blueprint of a nondeterministic finite automaton. Running a
/// design twice never shares mutable state: each run gets its own `Nfa`
/// borrowing the read-only rulebook.
#[derive(Clone, Debug)]
pub struct NfaDesign {
    start_state: State,
    accept_states: BitSet,
    rulebook: NfaRulebook,
}

impl NfaDesign {
    pub fn new(start_state: State, accept_states: &[State], rulebook: NfaRulebook) -> NfaDesign {
        NfaDesign::with_accept_set(
            start_state,
            accept_states.iter().copied().collect(),
            rulebook,
        )
    }

    pub fn with_accept_set(
        start_state: State,
        accept_states: BitSet,
        rulebook: NfaRulebook,
    ) -> NfaDesign {
        NfaDesign {
            start_state,
            accept_states,
            rulebook,
        }
    }

    pub fn start_state(&self) -> State {
        self.start_state
    }

    pub fn accept_states(&self) -> &BitSet {
        &self.accept_states
    }

    pub fn rulebook(&self) -> &NfaRulebook {
        &self.rulebook
    }

    pub fn to_nfa(&self) -> Nfa {
        let mut current_states = BitSet::new();
        current_states.insert(self.start_state);
        Nfa {
            current_states,
            accept_states: &self.accept_states,
            rulebook: &self.rulebook,
        }
    }

    pub fn accepts(&self, input: &str) -> bool {
        let mut nfa = self.to_nfa();
        nfa.read_string(input);
        nfa.accepting()
    }

    /// Emit a Graphviz DOT representation of the automaton.
    pub fn to_dot(&self, mut buffer: impl Write) -> io::Result<()> {
        writeln!(buffer, "digraph automaton {{")?;
        writeln!(buffer, "\trankdir=LR;")?;
        writeln!(buffer, "\t{} [shape=box];", self.start_state)?;
        for state in self.accept_states.iter() {
            writeln!(buffer, "\t{} [peripheries=2];", state)?;
        }
        for rule in self.rulebook.rules() {
            let label = match rule.symbol() {
                Some(symbol) => symbol.to_string(),
                None => "ε".to_string(),
            };
            writeln!(
                buffer,
                "\t{} -> {} [label=\"{}\"];",
                rule.state, rule.next_state, label
            )?;
        }
        writeln!(buffer, "}}")
    }
}
