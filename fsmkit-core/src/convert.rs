//! NFA → DFA subset construction.

use crate::automaton::{Automaton, AutomatonType, StateId, Symbol, Transition};
use crate::names::alphabetic_name;
use crate::simulate::set_label;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Converts an automaton to an equivalent DFA via subset construction
/// with epsilon elimination.
///
/// Already-deterministic input is returned unchanged. Discovered
/// state-sets are processed breadth-first and named with the base-26
/// generator in discovery order. Undefined moves are routed to a single
/// synthesized dead state that loops to itself on the whole alphabet, so
/// the result is a complete DFA whenever the source had a reachable
/// missing transition. An automaton with no start state converts to the
/// empty DFA, matching the minimizer's no-reachable-states result.
pub fn to_dfa(nfa: &Automaton) -> Automaton {
    if nfa.automaton_type() == AutomatonType::Dfa {
        return nfa.clone();
    }

    let Some(start) = nfa.start_state() else {
        return Automaton::empty();
    };

    let alphabet = nfa.alphabet();

    let mut states: Vec<StateId> = Vec::new();
    let mut transitions: Vec<Transition> = Vec::new();
    // Canonical state-set -> generated name, plus the sets in discovery
    // order for the final-state pass.
    let mut names: HashMap<BTreeSet<StateId>, StateId> = HashMap::new();
    let mut discovered: Vec<BTreeSet<StateId>> = Vec::new();
    let mut queue: VecDeque<(BTreeSet<StateId>, StateId)> = VecDeque::new();
    let mut missing: Vec<(StateId, Symbol)> = Vec::new();

    let start_closure = nfa.epsilon_closure(&BTreeSet::from([start.clone()]));
    let start_name = StateId::new(alphabetic_name(0));
    states.push(start_name.clone());
    names.insert(start_closure.clone(), start_name.clone());
    discovered.push(start_closure.clone());
    queue.push_back((start_closure, start_name.clone()));

    while let Some((current, current_name)) = queue.pop_front() {
        for &symbol in &alphabet {
            let moved: BTreeSet<StateId> = current
                .iter()
                .flat_map(|state| nfa.moves(state, symbol))
                .map(|t| t.to.clone())
                .collect();

            if moved.is_empty() {
                missing.push((current_name.clone(), symbol));
                continue;
            }

            let closure = nfa.epsilon_closure(&moved);
            let target_name = match names.get(&closure) {
                Some(name) => name.clone(),
                None => {
                    let name = StateId::new(alphabetic_name(states.len()));
                    tracing::debug!(
                        state = %name,
                        set = %set_label(&closure),
                        "discovered subset state"
                    );
                    states.push(name.clone());
                    names.insert(closure.clone(), name.clone());
                    discovered.push(closure.clone());
                    queue.push_back((closure, name.clone()));
                    name
                }
            };

            transitions.push(Transition::new(
                current_name.clone(),
                target_name,
                symbol,
            ));
        }
    }

    // One sink absorbs every undefined move; it is never final and loops
    // to itself on the whole alphabet.
    if !missing.is_empty() {
        let dead = StateId::new(alphabetic_name(states.len()));
        tracing::debug!(state = %dead, missing = missing.len(), "synthesized dead state");
        states.push(dead.clone());

        for (from, symbol) in missing {
            transitions.push(Transition::new(from, dead.clone(), symbol));
        }
        for &symbol in &alphabet {
            transitions.push(Transition::new(dead.clone(), dead.clone(), symbol));
        }
    }

    // A subset state is final iff it contains an NFA final state; the
    // dead state corresponds to no subset and is skipped by construction.
    let final_states: Vec<StateId> = discovered
        .iter()
        .filter(|set| set.iter().any(|state| nfa.is_final(state)))
        .map(|set| names[set].clone())
        .collect();

    Automaton::from_parts(states, transitions, Some(start_name), final_states)
}
