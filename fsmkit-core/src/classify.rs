//! Type classification, completeness checking, and structural analysis.

use crate::automaton::{Automaton, AutomatonType, StateId, Symbol, Transition};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Classifies a transition list as deterministic or nondeterministic.
///
/// An epsilon transition or a `(from, symbol)` pair with two or more
/// distinct targets makes the machine an NFA; anything else, including
/// the empty list, is a DFA. Total over any transition list.
pub fn classify(transitions: &[Transition]) -> AutomatonType {
    if transitions.iter().any(|t| t.symbol.is_epsilon()) {
        return AutomatonType::Nfa;
    }
    if has_nondeterministic_transitions(transitions) {
        return AutomatonType::Nfa;
    }
    AutomatonType::Dfa
}

/// Returns true if some `(from, symbol)` pair with a non-epsilon symbol
/// has more than one distinct target.
pub fn has_nondeterministic_transitions(transitions: &[Transition]) -> bool {
    let mut targets: HashMap<(&StateId, Symbol), HashSet<&StateId>> = HashMap::new();

    for t in transitions.iter().filter(|t| !t.symbol.is_epsilon()) {
        let entry = targets.entry((&t.from, t.symbol)).or_default();
        entry.insert(&t.to);
        if entry.len() > 1 {
            return true;
        }
    }

    false
}

/// Decides whether a DFA has a total transition function: every state has
/// an outgoing transition for every alphabet symbol. NFAs, machines with
/// epsilon transitions, and nondeterministic relations (re-checked
/// defensively) are never complete. Zero transitions mean an empty
/// alphabet, which is trivially complete.
pub fn is_complete(automaton: &Automaton) -> bool {
    if automaton.automaton_type() == AutomatonType::Nfa {
        return false;
    }
    if automaton.transitions().iter().any(|t| t.symbol.is_epsilon()) {
        return false;
    }
    if has_nondeterministic_transitions(automaton.transitions()) {
        return false;
    }

    let alphabet = automaton.alphabet();
    automaton.states().iter().all(|state| {
        alphabet
            .iter()
            .all(|&symbol| automaton.moves(state, symbol).next().is_some())
    })
}

/// A `(from, symbol)` pair with more than one distinct destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NondeterministicGroup {
    pub from: StateId,
    pub symbol: Symbol,
    pub destinations: Vec<StateId>,
}

/// Read-only structural report for display collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub has_epsilon_transitions: bool,
    pub has_nondeterministic_transitions: bool,
    pub epsilon_transitions: Vec<Transition>,
    pub nondeterministic_transitions: Vec<NondeterministicGroup>,
}

/// Bundles the epsilon-transition list and the nondeterministic groups,
/// both in first-seen order with de-duplicated destinations. Display
/// only; nothing here feeds back into the algorithms.
pub fn analyze(automaton: &Automaton) -> Analysis {
    let epsilon_transitions: Vec<Transition> = automaton
        .transitions()
        .iter()
        .filter(|t| t.symbol.is_epsilon())
        .cloned()
        .collect();

    let mut order: Vec<(StateId, Symbol)> = Vec::new();
    let mut destinations: HashMap<(StateId, Symbol), Vec<StateId>> = HashMap::new();

    for t in automaton.transitions() {
        let key = (t.from.clone(), t.symbol);
        let entry = destinations.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Vec::new()
        });
        if !entry.contains(&t.to) {
            entry.push(t.to.clone());
        }
    }

    let nondeterministic_transitions: Vec<NondeterministicGroup> = order
        .into_iter()
        .filter(|key| destinations[key].len() > 1)
        .map(|(from, symbol)| NondeterministicGroup {
            destinations: destinations[&(from.clone(), symbol)].clone(),
            from,
            symbol,
        })
        .collect();

    Analysis {
        has_epsilon_transitions: !epsilon_transitions.is_empty(),
        has_nondeterministic_transitions: !nondeterministic_transitions.is_empty(),
        epsilon_transitions,
        nondeterministic_transitions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn t(from: &str, to: &str, symbol: char) -> Transition {
        Transition::new(from, to, Symbol::Char(symbol))
    }

    #[test]
    fn test_empty_transition_list_is_dfa() {
        assert_eq!(classify(&[]), AutomatonType::Dfa);
    }

    #[test]
    fn test_epsilon_makes_nfa() {
        let transitions = vec![t("A", "A", 'a'), Transition::new("A", "B", Symbol::Epsilon)];
        assert_eq!(classify(&transitions), AutomatonType::Nfa);
    }

    #[test]
    fn test_multiple_targets_make_nfa() {
        let transitions = vec![t("A", "A", 'a'), t("A", "B", 'a')];
        assert_eq!(classify(&transitions), AutomatonType::Nfa);
    }

    #[test]
    fn test_distinct_symbols_stay_dfa() {
        let transitions = vec![t("A", "A", 'a'), t("A", "B", 'b'), t("B", "A", 'a')];
        assert_eq!(classify(&transitions), AutomatonType::Dfa);
    }

    fn complete_dfa() -> Automaton {
        Automaton::from_json(&json!({
            "states": [{"id": "A"}, {"id": "B"}],
            "transitions": [
                {"from": "A", "to": "A", "symbol": "0"},
                {"from": "A", "to": "B", "symbol": "1"},
                {"from": "B", "to": "B", "symbol": "0"},
                {"from": "B", "to": "A", "symbol": "1"}
            ],
            "startState": "A",
            "finalStates": ["B"],
            "type": "DFA"
        }))
        .unwrap()
    }

    #[test]
    fn test_complete_dfa() {
        assert!(is_complete(&complete_dfa()));
    }

    #[test]
    fn test_partial_dfa_is_not_complete() {
        let automaton = Automaton::from_json(&json!({
            "states": [{"id": "A"}, {"id": "B"}],
            "transitions": [
                {"from": "A", "to": "B", "symbol": "0"},
                {"from": "B", "to": "A", "symbol": "1"}
            ],
            "startState": "A",
            "finalStates": [],
            "type": "DFA"
        }))
        .unwrap();

        // B has no transition on 0, A has none on 1.
        assert!(!is_complete(&automaton));
    }

    #[test]
    fn test_nfa_is_never_complete() {
        let automaton = Automaton::from_json(&json!({
            "states": [{"id": "A"}, {"id": "B"}],
            "transitions": [
                {"from": "A", "to": "A", "symbol": "a"},
                {"from": "A", "to": "B", "symbol": "a"}
            ],
            "startState": "A",
            "finalStates": [],
            "type": "NFA"
        }))
        .unwrap();

        assert!(!is_complete(&automaton));
    }

    #[test]
    fn test_no_transitions_is_trivially_complete() {
        let automaton = Automaton::from_json(&json!({
            "states": [{"id": "A"}, {"id": "B"}],
            "transitions": [],
            "startState": "A",
            "finalStates": [],
            "type": "DFA"
        }))
        .unwrap();

        assert!(is_complete(&automaton));
    }

    #[test]
    fn test_analyze_reports_structure() {
        let automaton = Automaton::from_json(&json!({
            "states": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
            "transitions": [
                {"from": "A", "to": "B", "symbol": "ε"},
                {"from": "A", "to": "B", "symbol": "a"},
                {"from": "A", "to": "C", "symbol": "a"},
                {"from": "B", "to": "C", "symbol": "b"}
            ],
            "startState": "A",
            "finalStates": ["C"],
            "type": "NFA"
        }))
        .unwrap();

        let analysis = analyze(&automaton);
        assert!(analysis.has_epsilon_transitions);
        assert!(analysis.has_nondeterministic_transitions);
        assert_eq!(analysis.epsilon_transitions.len(), 1);
        assert_eq!(analysis.nondeterministic_transitions.len(), 1);

        let group = &analysis.nondeterministic_transitions[0];
        assert_eq!(group.from, StateId::from("A"));
        assert_eq!(group.symbol, Symbol::Char('a'));
        assert_eq!(
            group.destinations,
            vec![StateId::from("B"), StateId::from("C")]
        );
    }

    #[test]
    fn test_analyze_deterministic_machine_is_quiet() {
        let analysis = analyze(&complete_dfa());
        assert!(!analysis.has_epsilon_transitions);
        assert!(!analysis.has_nondeterministic_transitions);
        assert!(analysis.epsilon_transitions.is_empty());
        assert!(analysis.nondeterministic_transitions.is_empty());
    }
}
