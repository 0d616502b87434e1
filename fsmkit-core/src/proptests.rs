use crate::automaton::{Automaton, AutomatonType, StateId, Symbol, Transition};
use crate::classify::is_complete;
use crate::convert::to_dfa;
use crate::minimize::minimize;
use crate::simulate::accept;
use proptest::{collection, prelude::*};
use std::collections::BTreeSet;

const POOL: usize = 5;

fn pool_states() -> Vec<StateId> {
    (0..POOL).map(|i| StateId::new(format!("S{i}"))).collect()
}

fn arb_state() -> impl Strategy<Value = StateId> {
    (0..POOL).prop_map(|i| StateId::new(format!("S{i}")))
}

fn arb_symbol() -> impl Strategy<Value = Symbol> {
    prop_oneof![
        3 => prop_oneof![Just('a'), Just('b')].prop_map(Symbol::Char),
        1 => Just(Symbol::Epsilon),
    ]
}

/// Automata over states S0..S4 and alphabet {a, b} with optional epsilon
/// transitions; S0 is always the start state. Duplicate triples are
/// dropped so the generated parts always validate.
fn arb_automaton() -> impl Strategy<Value = Automaton> {
    (
        collection::vec((arb_state(), arb_state(), arb_symbol()), 0..=12),
        collection::vec(0..POOL, 0..=3),
    )
        .prop_map(|(triples, final_indices)| {
            let mut transitions: Vec<Transition> = Vec::new();
            for (from, to, symbol) in triples {
                let t = Transition { from, to, symbol };
                if !transitions.contains(&t) {
                    transitions.push(t);
                }
            }

            let mut final_states: Vec<StateId> = Vec::new();
            for i in final_indices {
                let state = StateId::new(format!("S{i}"));
                if !final_states.contains(&state) {
                    final_states.push(state);
                }
            }

            Automaton::new(
                pool_states(),
                transitions,
                Some(StateId::new("S0")),
                final_states,
            )
            .expect("generated parts are structurally valid")
        })
}

fn arb_input() -> impl Strategy<Value = String> {
    collection::vec(prop_oneof![Just('a'), Just('b')], 0..=6)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn epsilon_closure_is_idempotent(
        automaton in arb_automaton(),
        seed in collection::btree_set(arb_state(), 0..=POOL),
    ) {
        let once = automaton.epsilon_closure(&seed);
        let twice = automaton.epsilon_closure(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn closure_contains_its_seed(automaton in arb_automaton(), state in arb_state()) {
        let seed = BTreeSet::from([state.clone()]);
        prop_assert!(automaton.epsilon_closure(&seed).contains(&state));
    }

    #[test]
    fn conversion_preserves_language(automaton in arb_automaton(), input in arb_input()) {
        let dfa = to_dfa(&automaton);
        prop_assert_eq!(
            accept(&automaton, &input).accepted,
            accept(&dfa, &input).accepted
        );
    }

    #[test]
    fn conversion_of_nfa_is_complete(automaton in arb_automaton()) {
        if automaton.automaton_type() == AutomatonType::Nfa {
            prop_assert!(is_complete(&to_dfa(&automaton)));
        }
    }

    #[test]
    fn minimization_preserves_language(automaton in arb_automaton(), input in arb_input()) {
        let dfa = to_dfa(&automaton);
        let min = minimize(&dfa);
        prop_assert_eq!(
            accept(&dfa, &input).accepted,
            accept(&min, &input).accepted
        );
    }

    #[test]
    fn minimization_is_idempotent(automaton in arb_automaton()) {
        let min = minimize(&to_dfa(&automaton));
        prop_assert_eq!(minimize(&min).states().len(), min.states().len());
    }

    #[test]
    fn minimization_never_grows(automaton in arb_automaton()) {
        let dfa = to_dfa(&automaton);
        prop_assert!(minimize(&dfa).states().len() <= dfa.states().len());
    }
}
