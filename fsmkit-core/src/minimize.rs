//! DFA minimization by partition refinement.

use crate::automaton::{alphabet_of, Automaton, AutomatonType, StateId, Symbol, Transition};
use crate::names::alphabetic_name;
use std::collections::{HashMap, HashSet, VecDeque};

/// Reduces a DFA to its minimal equivalent form.
///
/// States unreachable from the start state are pruned first; the
/// survivors are split into behaviorally-equivalent blocks (Moore
/// refinement: blocks only ever split, so the loop reaches a fixed point
/// within a finite number of passes) and each block becomes one state of
/// the rebuilt machine, named with the base-26 generator in partition
/// order. Nondeterministic input is returned unchanged; an automaton
/// with no start state has no reachable states and minimizes to the
/// empty automaton.
pub fn minimize(dfa: &Automaton) -> Automaton {
    if dfa.automaton_type() != AutomatonType::Dfa {
        return dfa.clone();
    }

    let Some(start) = dfa.start_state() else {
        return Automaton::empty();
    };

    // Reachability pruning.
    let reachable = reachable_states(dfa, start);
    let states: Vec<StateId> = dfa
        .states()
        .iter()
        .filter(|s| reachable.contains(s))
        .cloned()
        .collect();
    let transitions: Vec<Transition> = dfa
        .transitions()
        .iter()
        .filter(|t| reachable.contains(&t.from) && reachable.contains(&t.to))
        .cloned()
        .collect();
    let final_states: Vec<StateId> = dfa
        .final_states()
        .iter()
        .filter(|s| reachable.contains(s))
        .cloned()
        .collect();

    let alphabet = alphabet_of(&transitions);

    // Initial partition: non-final states, then final states; an empty
    // block is omitted.
    let finals: HashSet<&StateId> = final_states.iter().collect();
    let non_final: Vec<StateId> = states
        .iter()
        .filter(|s| !finals.contains(s))
        .cloned()
        .collect();

    let mut partitions: Vec<Vec<StateId>> = Vec::new();
    if !non_final.is_empty() {
        partitions.push(non_final);
    }
    if !final_states.is_empty() {
        partitions.push(final_states.clone());
    }

    // Refine until a full pass splits nothing.
    loop {
        let mut changed = false;
        let mut next: Vec<Vec<StateId>> = Vec::new();

        for block in &partitions {
            let sub_blocks = split_block(&transitions, block, &partitions, &alphabet);
            if sub_blocks.len() > 1 {
                changed = true;
            }
            next.extend(sub_blocks);
        }

        partitions = next;
        if !changed {
            break;
        }
        tracing::trace!(blocks = partitions.len(), "refinement pass split a block");
    }

    // Rebuild: one state per block, named in partition order.
    let mut block_of: HashMap<StateId, StateId> = HashMap::new();
    let mut min_states: Vec<StateId> = Vec::new();
    for (index, block) in partitions.iter().enumerate() {
        let name = StateId::new(alphabetic_name(index));
        min_states.push(name.clone());
        for state in block {
            block_of.insert(state.clone(), name.clone());
        }
    }

    let mut min_transitions: Vec<Transition> = Vec::new();
    let mut seen: HashSet<(StateId, StateId, Symbol)> = HashSet::new();
    for t in &transitions {
        let from = block_of[&t.from].clone();
        let to = block_of[&t.to].clone();
        if seen.insert((from.clone(), to.clone(), t.symbol)) {
            min_transitions.push(Transition::new(from, to, t.symbol));
        }
    }

    let min_start = block_of.get(start).cloned();
    let mut min_finals: Vec<StateId> = Vec::new();
    for state in &final_states {
        let block = block_of[state].clone();
        if !min_finals.contains(&block) {
            min_finals.push(block);
        }
    }

    Automaton::from_parts(min_states, min_transitions, min_start, min_finals)
}

/// States reachable from the start by following transitions forward.
fn reachable_states(dfa: &Automaton, start: &StateId) -> HashSet<StateId> {
    let mut reachable = HashSet::from([start.clone()]);
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(current) = queue.pop_front() {
        for t in dfa.transitions_from(&current) {
            if reachable.insert(t.to.clone()) {
                queue.push_back(t.to.clone());
            }
        }
    }

    reachable
}

/// Splits a block into sub-blocks of states with identical signatures,
/// preserving first-seen order. A singleton block cannot split.
fn split_block(
    transitions: &[Transition],
    block: &[StateId],
    partitions: &[Vec<StateId>],
    alphabet: &[Symbol],
) -> Vec<Vec<StateId>> {
    if block.len() <= 1 {
        return vec![block.to_vec()];
    }

    let mut groups: Vec<(Vec<Option<usize>>, Vec<StateId>)> = Vec::new();
    for state in block {
        let signature = state_signature(transitions, state, partitions, alphabet);
        match groups.iter_mut().find(|(s, _)| *s == signature) {
            Some((_, members)) => members.push(state.clone()),
            None => groups.push((signature, vec![state.clone()])),
        }
    }

    groups.into_iter().map(|(_, members)| members).collect()
}

/// Which block each outgoing transition lands in, per alphabet symbol in
/// order; `None` marks a missing transition.
fn state_signature(
    transitions: &[Transition],
    state: &StateId,
    partitions: &[Vec<StateId>],
    alphabet: &[Symbol],
) -> Vec<Option<usize>> {
    alphabet
        .iter()
        .map(|&symbol| {
            transitions
                .iter()
                .find(|t| &t.from == state && t.symbol == symbol)
                .and_then(|t| partitions.iter().position(|block| block.contains(&t.to)))
        })
        .collect()
}
