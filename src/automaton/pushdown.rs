//! Pushdown automata: machine position pairs a state with a persistent
//! stack, and the nondeterministic variant runs over sets of such pairs.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use bit_set::BitSet;

use super::State;

/// An immutable last-in-first-out sequence of symbols. `push` and `pop`
/// return new values that share their tail with the original, so a
/// configuration can be duplicated across nondeterministic branches
/// without copying stack contents. Equality and hashing are structural
/// over the contents.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stack(Option<Rc<Node>>);

#[derive(Debug, PartialEq, Eq, Hash)]
struct Node {
    top: char,
    rest: Stack,
}

impl Stack {
    /// Build a stack from its contents, first element on top.
    pub fn new(contents: &[char]) -> Stack {
        let mut stack = Stack(None);
        for &symbol in contents.iter().rev() {
            stack = stack.push(symbol);
        }
        stack
    }

    pub fn push(&self, symbol: char) -> Stack {
        Stack(Some(Rc::new(Node {
            top: symbol,
            rest: self.clone(),
        })))
    }

    /// Popping an empty stack yields an empty stack.
    pub fn pop(&self) -> Stack {
        match &self.0 {
            Some(node) => node.rest.clone(),
            None => Stack(None),
        }
    }

    pub fn top(&self) -> Option<char> {
        self.0.as_ref().map(|node| node.top)
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut node = &self.0;
        let mut first = true;
        while let Some(current) = node {
            if first {
                write!(f, "({})", current.top)?;
                first = false;
            } else {
                write!(f, "{}", current.top)?;
            }
            node = &current.rest.0;
        }
        Ok(())
    }
}

/// The complete instantaneous position of a pushdown machine. Two
/// configurations with the same state but different stack contents are
/// distinct, which the derived structural `Eq`/`Hash` guarantee when
/// configurations live in a set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PdaConfiguration {
    pub state: State,
    pub stack: Stack,
}

impl PdaConfiguration {
    pub fn new(state: State, stack: Stack) -> PdaConfiguration {
        PdaConfiguration { state, stack }
    }
}

/// A pushdown transition rule. Beyond the finite-automaton triple it
/// carries the symbol that must be on top of the stack for the rule to
/// apply, and the sequence pushed after that symbol is popped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdaRule {
    state: State,
    symbol: Option<char>,
    next_state: State,
    pop_symbol: char,
    push_symbols: Vec<char>,
}

impl PdaRule {
    pub fn new(
        state: State,
        symbol: Option<char>,
        next_state: State,
        pop_symbol: char,
        push_symbols: Vec<char>,
    ) -> PdaRule {
        PdaRule {
            state,
            symbol,
            next_state,
            pop_symbol,
            push_symbols,
        }
    }

    pub fn applies_to(&self, configuration: &PdaConfiguration, symbol: Option<char>) -> bool {
        self.state == configuration.state
            && configuration.stack.top() == Some(self.pop_symbol)
            && self.symbol == symbol
    }

    pub fn follow(&self, configuration: &PdaConfiguration) -> PdaConfiguration {
        PdaConfiguration::new(self.next_state, self.next_stack(configuration))
    }

    // Pop first; the push list is applied in reverse so that its first
    // symbol ends up on top. An empty push list is a net pop.
    fn next_stack(&self, configuration: &PdaConfiguration) -> Stack {
        let mut stack = configuration.stack.pop();
        for &symbol in self.push_symbols.iter().rev() {
            stack = stack.push(symbol);
        }
        stack
    }
}

/// First-match rulebook for the deterministic pushdown machine.
#[derive(Clone, Debug, Default)]
pub struct DpdaRulebook {
    rules: Vec<PdaRule>,
}

impl DpdaRulebook {
    pub fn new(rules: Vec<PdaRule>) -> DpdaRulebook {
        DpdaRulebook { rules }
    }

    pub fn rule_for(
        &self,
        configuration: &PdaConfiguration,
        symbol: Option<char>,
    ) -> Option<&PdaRule> {
        self.rules
            .iter()
            .find(|rule| rule.applies_to(configuration, symbol))
    }

    pub fn applies_to(&self, configuration: &PdaConfiguration, symbol: Option<char>) -> bool {
        self.rule_for(configuration, symbol).is_some()
    }

    pub fn next_configuration(
        &self,
        configuration: &PdaConfiguration,
        symbol: Option<char>,
    ) -> Option<PdaConfiguration> {
        self.rule_for(configuration, symbol)
            .map(|rule| rule.follow(configuration))
    }

    /// Chase free moves one rule at a time until none applies. A cycle of
    /// free moves that keeps pushing never stops applying, so such a
    /// rulebook loops here forever; that is a caller error this layer
    /// does not detect.
    pub fn follow_free_moves(&self, mut configuration: PdaConfiguration) -> PdaConfiguration {
        while let Some(rule) = self.rule_for(&configuration, None) {
            configuration = rule.follow(&configuration);
        }
        configuration
    }
}

/// One run of a deterministic pushdown automaton. When no rule applies
/// to the current configuration and symbol, the machine is stuck and the
/// rest of the input is ignored.
pub struct Dpda<'d> {
    current_configuration: Option<PdaConfiguration>,
    accept_states: &'d BitSet,
    rulebook: &'d DpdaRulebook,
}

impl<'d> Dpda<'d> {
    pub fn current_configuration(&self) -> Option<PdaConfiguration> {
        self.current_configuration
            .clone()
            .map(|configuration| self.rulebook.follow_free_moves(configuration))
    }

    pub fn stuck(&self) -> bool {
        self.current_configuration.is_none()
    }

    pub fn accepting(&self) -> bool {
        match self.current_configuration() {
            Some(configuration) => self.accept_states.contains(configuration.state),
            None => false,
        }
    }

    pub fn read_symbol(&mut self, symbol: char) {
        self.current_configuration = self.current_configuration().and_then(|configuration| {
            self.rulebook
                .next_configuration(&configuration, Some(symbol))
        });
    }

    pub fn read_string(&mut self, input: &str) {
        for symbol in input.chars() {
            if self.stuck() {
                break;
            }
            self.read_symbol(symbol);
        }
    }
}

/// Immutable blueprint of a deterministic pushdown automaton. The bottom
/// symbol seeds the start configuration's stack.
#[derive(Clone, Debug)]
pub struct DpdaDesign {
    start_state: State,
    bottom_symbol: char,
    accept_states: BitSet,
    rulebook: DpdaRulebook,
}

impl DpdaDesign {
    pub fn new(
        start_state: State,
        bottom_symbol: char,
        accept_states: &[State],
        rulebook: DpdaRulebook,
    ) -> DpdaDesign {
        DpdaDesign {
            start_state,
            bottom_symbol,
            accept_states: accept_states.iter().copied().collect(),
            rulebook,
        }
    }

    pub fn to_dpda(&self) -> Dpda {
        let start_stack = Stack::new(&[self.bottom_symbol]);
        Dpda {
            current_configuration: Some(PdaConfiguration::new(self.start_state, start_stack)),
            accept_states: &self.accept_states,
            rulebook: &self.rulebook,
        }
    }

    pub fn accepts(&self, input: &str) -> bool {
        let mut dpda = self.to_dpda();
        dpda.read_string(input);
        dpda.accepting()
    }
}

/// Rulebook for the nondeterministic pushdown machine: queries fan out
/// over every applicable rule, and applicability checks the stack top in
/// addition to the state.
#[derive(Clone, Debug, Default)]
pub struct NpdaRulebook {
    rules: Vec<PdaRule>,
}

impl NpdaRulebook {
    pub fn new(rules: Vec<PdaRule>) -> NpdaRulebook {
        NpdaRulebook { rules }
    }

    pub fn rules_for<'r>(
        &'r self,
        configuration: &'r PdaConfiguration,
        symbol: Option<char>,
    ) -> impl Iterator<Item = &'r PdaRule> {
        self.rules
            .iter()
            .filter(move |rule| rule.applies_to(configuration, symbol))
    }

    /// The configurations reachable from `configurations` by one rule
    /// labeled `symbol`. The hash set collapses branches that reach the
    /// same (state, stack) pair; distinct stacks at the same state stay
    /// distinct.
    pub fn next_configurations(
        &self,
        configurations: &HashSet<PdaConfiguration>,
        symbol: Option<char>,
    ) -> HashSet<PdaConfiguration> {
        let mut next = HashSet::new();
        for configuration in configurations {
            for rule in self.rules_for(configuration, symbol) {
                next.insert(rule.follow(configuration));
            }
        }
        next
    }

    /// The free-move closure over configuration sets, as a subset-test
    /// fixpoint. A free-move cycle that nets a push grows the stack on
    /// every round and the fixpoint never arrives; that rulebook is a
    /// caller error and is not detected here.
    pub fn follow_free_moves(
        &self,
        mut configurations: HashSet<PdaConfiguration>,
    ) -> HashSet<PdaConfiguration> {
        loop {
            let more_configurations = self.next_configurations(&configurations, None);
            if more_configurations.is_subset(&configurations) {
                return configurations;
            }
            configurations.extend(more_configurations);
        }
    }
}

/// One run of a nondeterministic pushdown automaton. Mirrors the NFA:
/// the current set of configurations is always viewed through the
/// free-move closure.
pub struct Npda<'d> {
    current_configurations: HashSet<PdaConfiguration>,
    accept_states: &'d BitSet,
    rulebook: &'d NpdaRulebook,
}

impl<'d> Npda<'d> {
    pub fn current_configurations(&self) -> HashSet<PdaConfiguration> {
        self.rulebook
            .follow_free_moves(self.current_configurations.clone())
    }

    /// Accepting when any configuration's state is an accept state,
    /// whatever its stack contents.
    pub fn accepting(&self) -> bool {
        self.current_configurations()
            .iter()
            .any(|configuration| self.accept_states.contains(configuration.state))
    }

    pub fn read_symbol(&mut self, symbol: char) {
        self.current_configurations = self
            .rulebook
            .next_configurations(&self.current_configurations(), Some(symbol));
    }

    pub fn read_string(&mut self, input: &str) {
        for symbol in input.chars() {
            self.read_symbol(symbol);
        }
    }
}

/// Immutable blueprint of a nondeterministic pushdown automaton.
#[derive(Clone, Debug)]
pub struct NpdaDesign {
    start_state: State,
    bottom_symbol: char,
    accept_states: BitSet,
    rulebook: NpdaRulebook,
}

impl NpdaDesign {
    pub fn new(
        start_state: State,
        bottom_symbol: char,
        accept_states: &[State],
        rulebook: NpdaRulebook,
    ) -> NpdaDesign {
        NpdaDesign {
            start_state,
            bottom_symbol,
            accept_states: accept_states.iter().copied().collect(),
            rulebook,
        }
    }

    pub fn to_npda(&self) -> Npda {
        let start_stack = Stack::new(&[self.bottom_symbol]);
        let mut current_configurations = HashSet::new();
        current_configurations.insert(PdaConfiguration::new(self.start_state, start_stack));
        Npda {
            current_configurations,
            accept_states: &self.accept_states,
            rulebook: &self.rulebook,
        }
    }

    pub fn accepts(&self, input: &str) -> bool {
        let mut npda = self.to_npda();
        npda.read_string(input);
        npda.accepting()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_operations_return_new_values() {
        let stack = Stack::new(&['a', 'b', '$']);
        let pushed = stack.push('c');
        let popped = stack.pop();

        assert_eq!(stack.top(), Some('a'));
        assert_eq!(pushed.top(), Some('c'));
        assert_eq!(popped.top(), Some('b'));
        // The original is untouched by either operation.
        assert_eq!(stack, Stack::new(&['a', 'b', '$']));
    }

    #[test]
    fn stack_equality_is_structural() {
        let built = Stack::new(&['x', 'y']);
        let grown = Stack::new(&['y']).push('x');
        assert_eq!(built, grown);

        let mut set = HashSet::new();
        set.insert(PdaConfiguration::new(1, built));
        assert!(!set.insert(PdaConfiguration::new(1, grown)));
    }

    #[test]
    fn popping_an_empty_stack_stays_empty() {
        let empty = Stack::new(&[]);
        assert_eq!(empty.top(), None);
        assert_eq!(empty.pop().top(), None);
    }

    #[test]
    fn push_symbols_are_applied_first_on_top() {
        let rule = PdaRule::new(1, Some('('), 2, '$', vec!['b', '$']);
        let configuration = PdaConfiguration::new(1, Stack::new(&['$']));
        let next = rule.follow(&configuration);

        assert_eq!(next.state, 2);
        assert_eq!(next.stack.top(), Some('b'));
        assert_eq!(next.stack.pop().top(), Some('$'));
    }

    // Balanced strings of parentheses.
    fn dpda_design() -> DpdaDesign {
        let rulebook = DpdaRulebook::new(vec![
            PdaRule::new(1, Some('('), 2, '$', vec!['b', '$']),
            PdaRule::new(2, Some('('), 2, 'b', vec!['b', 'b']),
            PdaRule::new(2, Some(')'), 2, 'b', vec![]),
            PdaRule::new(2, None, 1, '$', vec!['$']),
        ]);
        DpdaDesign::new(1, '$', &[1], rulebook)
    }

    #[test]
    fn dpda_recognizes_balanced_parentheses() {
        let design = dpda_design();
        assert!(design.accepts("(((((((((())))))))))"));
        assert!(design.accepts("()(())((()))(()(()))"));
        assert!(!design.accepts("(()(()(()()(()()))()"));
    }

    #[test]
    fn dpda_sticks_when_no_rule_applies() {
        let design = dpda_design();
        let mut dpda = design.to_dpda();
        dpda.read_string(")");
        assert!(dpda.stuck());
        assert!(!dpda.accepting());
    }

    // Palindromes over {a, b}: push the first half, guess the middle
    // with a free move, match the second half against the stack.
    fn npda_design() -> NpdaDesign {
        let rulebook = NpdaRulebook::new(vec![
            PdaRule::new(1, Some('a'), 1, '$', vec!['a', '$']),
            PdaRule::new(1, Some('a'), 1, 'a', vec!['a', 'a']),
            PdaRule::new(1, Some('a'), 1, 'b', vec!['a', 'b']),
            PdaRule::new(1, Some('b'), 1, '$', vec!['b', '$']),
            PdaRule::new(1, Some('b'), 1, 'a', vec!['b', 'a']),
            PdaRule::new(1, Some('b'), 1, 'b', vec!['b', 'b']),
            PdaRule::new(1, None, 2, '$', vec!['$']),
            PdaRule::new(1, None, 2, 'a', vec!['a']),
            PdaRule::new(1, None, 2, 'b', vec!['b']),
            PdaRule::new(2, Some('a'), 2, 'a', vec![]),
            PdaRule::new(2, Some('b'), 2, 'b', vec![]),
            PdaRule::new(2, None, 3, '$', vec!['$']),
        ]);
        NpdaDesign::new(1, '$', &[3], rulebook)
    }

    #[test]
    fn npda_recognizes_even_length_palindromes() {
        let design = npda_design();
        assert!(design.accepts("abba"));
        assert!(design.accepts("babbaabbab"));
        assert!(!design.accepts("abb"));
        assert!(!design.accepts("baabaa"));
    }

    #[test]
    fn npda_accepts_the_empty_string() {
        // The free moves 1 -> 2 -> 3 reach the accept state without input.
        assert!(npda_design().accepts(""));
    }

    #[test]
    fn configuration_closure_is_idempotent() {
        let design = npda_design();
        let npda = design.to_npda();
        let closed = npda.current_configurations();
        let closed_again = design.rulebook.follow_free_moves(closed.clone());
        assert_eq!(closed, closed_again);
    }

    #[test]
    fn configuration_closure_keeps_distinct_stacks_distinct() {
        let rulebook = NpdaRulebook::new(vec![
            PdaRule::new(1, None, 2, '$', vec!['a', '$']),
            PdaRule::new(1, None, 2, '$', vec!['b', '$']),
        ]);
        let mut start = HashSet::new();
        start.insert(PdaConfiguration::new(1, Stack::new(&['$'])));
        let closed = rulebook.follow_free_moves(start);

        // Both targets are state 2 and would collapse under state-only
        // equality; the differing stacks must keep them apart.
        assert_eq!(closed.len(), 3);
    }
}
