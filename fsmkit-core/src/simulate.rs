//! Acceptance simulation with execution traces.

use crate::automaton::{Automaton, AutomatonType, StateId, Symbol};
use std::collections::BTreeSet;

/// Result of a membership test.
///
/// `path` is the walk up to the point of failure or input exhaustion:
/// state ids for a DFA, canonical state-set labels (sorted, comma-joined
/// member ids) for an NFA. A missing start state yields no path at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
    pub accepted: bool,
    pub path: Option<Vec<String>>,
}

/// Decides whether the automaton accepts the input string.
///
/// Fails closed when there is no start state. A dead end (no transition
/// on the current symbol for a DFA, an empty move union for an NFA)
/// rejects immediately, returning the path accumulated so far as a
/// diagnostic.
pub fn accept(automaton: &Automaton, input: &str) -> Acceptance {
    let Some(start) = automaton.start_state() else {
        return Acceptance {
            accepted: false,
            path: None,
        };
    };

    match automaton.automaton_type() {
        AutomatonType::Dfa => accept_dfa(automaton, start, input),
        AutomatonType::Nfa => accept_nfa(automaton, start, input),
    }
}

fn accept_dfa(automaton: &Automaton, start: &StateId, input: &str) -> Acceptance {
    let mut current = start.clone();
    let mut path = vec![current.to_string()];

    for symbol in input.chars().map(Symbol::Char) {
        let next = automaton.moves(&current, symbol).next().map(|t| t.to.clone());

        match next {
            Some(next) => {
                path.push(next.to_string());
                current = next;
            }
            None => {
                return Acceptance {
                    accepted: false,
                    path: Some(path),
                }
            }
        }
    }

    Acceptance {
        accepted: automaton.is_final(&current),
        path: Some(path),
    }
}

fn accept_nfa(automaton: &Automaton, start: &StateId, input: &str) -> Acceptance {
    let mut current = automaton.epsilon_closure(&BTreeSet::from([start.clone()]));
    let mut path = vec![set_label(&current)];

    for symbol in input.chars().map(Symbol::Char) {
        let moved: BTreeSet<StateId> = current
            .iter()
            .flat_map(|state| automaton.moves(state, symbol))
            .map(|t| t.to.clone())
            .collect();

        if moved.is_empty() {
            return Acceptance {
                accepted: false,
                path: Some(path),
            };
        }

        current = automaton.epsilon_closure(&moved);
        path.push(set_label(&current));
    }

    let accepted = current.iter().any(|state| automaton.is_final(state));
    Acceptance {
        accepted,
        path: Some(path),
    }
}

/// Canonical, iteration-order-independent label for a state set.
pub(crate) fn set_label(states: &BTreeSet<StateId>) -> String {
    states
        .iter()
        .map(StateId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
