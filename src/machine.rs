//! Machine description files: JSON-serializable definitions of finite
//! and pushdown machines together with the inputs to run them on, so a
//! whole batch of machines can be loaded from disk and exercised at
//! once.

use std::error::Error;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::automaton::{
    DfaDesign, DfaRulebook, DpdaDesign, DpdaRulebook, FaRule, NfaDesign, NfaRulebook, NpdaDesign,
    NpdaRulebook, PdaRule, State,
};

#[derive(Serialize, Deserialize, Clone)]
pub struct FiniteRuleDef {
    state: State,
    /// `null` is a free move.
    symbol: Option<char>,
    next_state: State,
}

impl FiniteRuleDef {
    fn to_rule(&self) -> FaRule {
        FaRule::new(self.state, self.symbol, self.next_state)
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct PushdownRuleDef {
    state: State,
    symbol: Option<char>,
    next_state: State,
    pop_symbol: char,
    push_symbols: Vec<char>,
}

impl PushdownRuleDef {
    fn to_rule(&self) -> PdaRule {
        PdaRule::new(
            self.state,
            self.symbol,
            self.next_state,
            self.pop_symbol,
            self.push_symbols.clone(),
        )
    }
}

/// One machine, in any of the four flavors. Deserialized from the
/// externally tagged JSON form, e.g. `{"Nfa": {"start_state": 1, ...}}`.
#[derive(Serialize, Deserialize, Clone)]
pub enum MachineDef {
    Dfa {
        start_state: State,
        accept_states: Vec<State>,
        rules: Vec<FiniteRuleDef>,
    },
    Nfa {
        start_state: State,
        accept_states: Vec<State>,
        rules: Vec<FiniteRuleDef>,
    },
    Dpda {
        start_state: State,
        bottom_symbol: char,
        accept_states: Vec<State>,
        rules: Vec<PushdownRuleDef>,
    },
    Npda {
        start_state: State,
        bottom_symbol: char,
        accept_states: Vec<State>,
        rules: Vec<PushdownRuleDef>,
    },
}

impl MachineDef {
    pub fn accepts(&self, input: &str) -> bool {
        match self {
            MachineDef::Dfa {
                start_state,
                accept_states,
                rules,
            } => {
                let rulebook = DfaRulebook::new(rules.iter().map(FiniteRuleDef::to_rule).collect());
                DfaDesign::new(*start_state, accept_states, rulebook).accepts(input)
            }
            MachineDef::Nfa {
                start_state,
                accept_states,
                rules,
            } => {
                let rulebook = NfaRulebook::new(rules.iter().map(FiniteRuleDef::to_rule).collect());
                NfaDesign::new(*start_state, accept_states, rulebook).accepts(input)
            }
            MachineDef::Dpda {
                start_state,
                bottom_symbol,
                accept_states,
                rules,
            } => {
                let rulebook =
                    DpdaRulebook::new(rules.iter().map(PushdownRuleDef::to_rule).collect());
                DpdaDesign::new(*start_state, *bottom_symbol, accept_states, rulebook)
                    .accepts(input)
            }
            MachineDef::Npda {
                start_state,
                bottom_symbol,
                accept_states,
                rules,
            } => {
                let rulebook =
                    NpdaRulebook::new(rules.iter().map(PushdownRuleDef::to_rule).collect());
                NpdaDesign::new(*start_state, *bottom_symbol, accept_states, rulebook)
                    .accepts(input)
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct MachineCase {
    name: String,
    comment: String,
    machine: MachineDef,
    inputs: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct MachineResult {
    name: String,
    results: Vec<InputResult>,
}

#[derive(Serialize, Deserialize)]
pub struct InputResult {
    input: String,
    accepted: bool,
}

impl MachineCase {
    pub fn new(
        name: String,
        comment: String,
        machine: MachineDef,
        inputs: Vec<String>,
    ) -> MachineCase {
        MachineCase {
            name,
            comment,
            machine,
            inputs,
        }
    }

    pub fn read_from_file(filename: &Path) -> Result<Vec<MachineCase>, Box<dyn Error>> {
        let mut input = String::new();
        File::open(&filename)?.read_to_string(&mut input)?;

        let cases: Vec<MachineCase> = serde_json::from_str(&input)?;
        Ok(cases)
    }

    pub fn run(&self) -> MachineResult {
        MachineResult {
            name: self.name.clone(),
            results: self
                .inputs
                .iter()
                .map(|input| InputResult {
                    input: input.clone(),
                    accepted: self.machine.accepts(input),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MachineCase;

    #[test]
    fn nfa_case_from_json() {
        let json = r#"[{
            "name": "third from last is b",
            "comment": "",
            "machine": {"Nfa": {
                "start_state": 1,
                "accept_states": [4],
                "rules": [
                    {"state": 1, "symbol": "a", "next_state": 1},
                    {"state": 1, "symbol": "b", "next_state": 1},
                    {"state": 1, "symbol": "b", "next_state": 2},
                    {"state": 2, "symbol": "a", "next_state": 3},
                    {"state": 2, "symbol": "b", "next_state": 3},
                    {"state": 3, "symbol": "a", "next_state": 4},
                    {"state": 3, "symbol": "b", "next_state": 4}
                ]
            }},
            "inputs": ["ba", "baa"]
        }]"#;

        let cases: Vec<MachineCase> = serde_json::from_str(json).unwrap();
        let result = cases[0].run();
        assert_eq!(result.results[0].accepted, false);
        assert_eq!(result.results[1].accepted, true);
    }

    #[test]
    fn npda_case_with_free_moves_from_json() {
        let json = r#"[{
            "name": "wwR palindromes",
            "comment": "free move guesses the middle",
            "machine": {"Npda": {
                "start_state": 1,
                "bottom_symbol": "$",
                "accept_states": [3],
                "rules": [
                    {"state": 1, "symbol": "a", "next_state": 1,
                     "pop_symbol": "$", "push_symbols": ["a", "$"]},
                    {"state": 1, "symbol": "a", "next_state": 1,
                     "pop_symbol": "a", "push_symbols": ["a", "a"]},
                    {"state": 1, "symbol": null, "next_state": 2,
                     "pop_symbol": "$", "push_symbols": ["$"]},
                    {"state": 1, "symbol": null, "next_state": 2,
                     "pop_symbol": "a", "push_symbols": ["a"]},
                    {"state": 2, "symbol": "a", "next_state": 2,
                     "pop_symbol": "a", "push_symbols": []},
                    {"state": 2, "symbol": null, "next_state": 3,
                     "pop_symbol": "$", "push_symbols": ["$"]}
                ]
            }},
            "inputs": ["aa", "aaa"]
        }]"#;

        let cases: Vec<MachineCase> = serde_json::from_str(json).unwrap();
        let result = cases[0].run();
        assert_eq!(result.results[0].accepted, true);
        assert_eq!(result.results[1].accepted, false);
    }

    #[test]
    fn cases_round_trip_through_json() {
        let json = r#"[{
            "name": "one rule dfa",
            "comment": "",
            "machine": {"Dfa": {
                "start_state": 1,
                "accept_states": [2],
                "rules": [{"state": 1, "symbol": "a", "next_state": 2}]
            }},
            "inputs": ["a", "b"]
        }]"#;

        let cases: Vec<MachineCase> = serde_json::from_str(json).unwrap();
        let reencoded = serde_json::to_string(&cases).unwrap();
        let again: Vec<MachineCase> = serde_json::from_str(&reencoded).unwrap();
        assert_eq!(again[0].run().results[0].accepted, true);
        assert_eq!(again[0].run().results[1].accepted, false);
    }
}
