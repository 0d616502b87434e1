//! Automaton data model and boundary validation.
//!
//! Automata are exchanged as a JSON document:
//!
//! ```json
//! {
//!   "states": [{"id": "A"}, {"id": "B"}],
//!   "transitions": [
//!     {"from": "A", "to": "B", "symbol": "0"},
//!     {"from": "B", "to": "A", "symbol": "ε"}
//!   ],
//!   "startState": "A",
//!   "finalStates": ["B"],
//!   "type": "NFA"
//! }
//! ```
//!
//! [`AutomatonDoc`] is that raw shape; [`Automaton`] is the validated
//! aggregate every algorithm operates on. Deserializing an `Automaton`
//! goes through the doc, so a value that exists has already passed
//! structural validation and carries a freshly derived type tag.

use crate::classify::classify;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// A state identifier, unique within an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub String);

impl StateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An input symbol: a single alphabet character or epsilon.
///
/// The surface forms `"e"`, `"E"`, `"ε"` and the empty string all
/// normalize to [`Symbol::Epsilon`] in [`Symbol::parse`]; algorithms only
/// ever match on the enum and never compare label strings. One
/// consequence of the normalization rule: `e` and `E` cannot be alphabet
/// characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Char(char),
    Epsilon,
}

impl Symbol {
    /// Parses a symbol label, collapsing the epsilon surface forms.
    pub fn parse(label: &str) -> Result<Self, CoreError> {
        match label {
            "" | "e" | "E" | "ε" => Ok(Symbol::Epsilon),
            _ => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Symbol::Char(c)),
                    _ => Err(CoreError::InvalidSymbol {
                        label: label.to_string(),
                    }),
                }
            }
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{c}"),
            Symbol::Epsilon => f.write_str("ε"),
        }
    }
}

impl Serialize for Symbol {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Symbol::parse(&label).map_err(serde::de::Error::custom)
    }
}

/// A transition between two states on a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    pub symbol: Symbol,
}

impl Transition {
    pub fn new(from: impl Into<StateId>, to: impl Into<StateId>, symbol: Symbol) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            symbol,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.from, self.symbol, self.to)
    }
}

/// Derived machine type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutomatonType {
    #[serde(rename = "DFA")]
    Dfa,
    #[serde(rename = "NFA")]
    Nfa,
}

impl fmt::Display for AutomatonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomatonType::Dfa => f.write_str("DFA"),
            AutomatonType::Nfa => f.write_str("NFA"),
        }
    }
}

/// A state entry in the exchange document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDoc {
    pub id: String,
}

/// Raw automaton document as stored/transmitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatonDoc {
    pub states: Vec<StateDoc>,

    pub transitions: Vec<Transition>,

    pub start_state: Option<String>,

    pub final_states: Vec<String>,

    #[serde(rename = "type")]
    pub automaton_type: AutomatonType,
}

/// Validated automaton aggregate.
///
/// Constructed only through [`Automaton::new`] or conversion from
/// [`AutomatonDoc`], which enforce the structural invariants: state ids
/// are unique, transition endpoints reference known states, final states
/// are a subset of the state set, the start state (when present) is a
/// known state, and no `(from, to, symbol)` triple occurs twice. The type
/// tag is always what the classifier computes for the current transition
/// list; the edit methods re-derive it after every structural change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AutomatonDoc", into = "AutomatonDoc")]
pub struct Automaton {
    states: Vec<StateId>,
    transitions: Vec<Transition>,
    start_state: Option<StateId>,
    final_states: Vec<StateId>,
    automaton_type: AutomatonType,
}

impl Automaton {
    /// Validates and builds an automaton from its parts.
    pub fn new(
        states: Vec<StateId>,
        transitions: Vec<Transition>,
        start_state: Option<StateId>,
        final_states: Vec<StateId>,
    ) -> Result<Self, CoreError> {
        let mut ids = HashSet::new();
        for state in &states {
            if !ids.insert(state) {
                return Err(CoreError::InvalidAutomaton {
                    reason: format!("duplicate state id '{state}'"),
                });
            }
        }

        let mut triples = HashSet::new();
        for t in &transitions {
            if !ids.contains(&t.from) {
                return Err(CoreError::InvalidAutomaton {
                    reason: format!("transition source '{}' is not a state", t.from),
                });
            }
            if !ids.contains(&t.to) {
                return Err(CoreError::InvalidAutomaton {
                    reason: format!("transition target '{}' is not a state", t.to),
                });
            }
            if !triples.insert(t) {
                return Err(CoreError::InvalidAutomaton {
                    reason: format!("duplicate transition {t}"),
                });
            }
        }

        // Final states are a set; drop repeats, reject unknowns.
        let mut finals: Vec<StateId> = Vec::new();
        for state in final_states {
            if !ids.contains(&state) {
                return Err(CoreError::InvalidAutomaton {
                    reason: format!("final state '{state}' is not a state"),
                });
            }
            if !finals.contains(&state) {
                finals.push(state);
            }
        }

        if let Some(start) = &start_state {
            if !ids.contains(start) {
                return Err(CoreError::InvalidAutomaton {
                    reason: format!("start state '{start}' is not a state"),
                });
            }
        }

        let automaton_type = classify(&transitions);

        Ok(Self {
            states,
            transitions,
            start_state,
            final_states: finals,
            automaton_type,
        })
    }

    /// Builds an automaton whose parts are known to be structurally
    /// consistent, deriving only the type tag. For the converter and the
    /// minimizer, whose outputs satisfy the invariants by construction.
    pub(crate) fn from_parts(
        states: Vec<StateId>,
        transitions: Vec<Transition>,
        start_state: Option<StateId>,
        final_states: Vec<StateId>,
    ) -> Self {
        let automaton_type = classify(&transitions);
        Self {
            states,
            transitions,
            start_state,
            final_states,
            automaton_type,
        }
    }

    /// The automaton with no states; what conversion and minimization
    /// return when nothing is reachable.
    pub fn empty() -> Self {
        Self::from_parts(Vec::new(), Vec::new(), None, Vec::new())
    }

    /// Parses and validates an automaton from a JSON value.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, CoreError> {
        Ok(serde_json::from_value(json.clone())?)
    }

    /// Returns the exchange document as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap()
    }

    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn start_state(&self) -> Option<&StateId> {
        self.start_state.as_ref()
    }

    pub fn final_states(&self) -> &[StateId] {
        &self.final_states
    }

    pub fn automaton_type(&self) -> AutomatonType {
        self.automaton_type
    }

    pub fn contains_state(&self, id: &StateId) -> bool {
        self.states.contains(id)
    }

    pub fn is_final(&self, id: &StateId) -> bool {
        self.final_states.contains(id)
    }

    /// Outgoing transitions of a state.
    pub fn transitions_from<'a>(
        &'a self,
        from: &'a StateId,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions.iter().filter(move |t| &t.from == from)
    }

    /// Direct (non-closure) moves from a state on a symbol.
    pub fn moves<'a>(
        &'a self,
        from: &'a StateId,
        symbol: Symbol,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions
            .iter()
            .filter(move |t| &t.from == from && t.symbol == symbol)
    }

    /// Distinct non-epsilon symbols across all transitions, in first-seen
    /// order.
    pub fn alphabet(&self) -> Vec<Symbol> {
        alphabet_of(&self.transitions)
    }

    /// The epsilon closure of a state set: the smallest superset closed
    /// under epsilon transitions. Terminates on cyclic epsilon chains via
    /// the visited check; idempotent.
    pub fn epsilon_closure(&self, seed: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        let mut closure = seed.clone();
        let mut stack: Vec<StateId> = seed.iter().cloned().collect();

        while let Some(state) = stack.pop() {
            for t in self
                .transitions_from(&state)
                .filter(|t| t.symbol.is_epsilon())
            {
                if closure.insert(t.to.clone()) {
                    stack.push(t.to.clone());
                }
            }
        }

        closure
    }

    // =========================================================================
    // Structural edits
    //
    // Each edit re-derives the type tag before returning, so the tag can
    // never go stale against the transition list.
    // =========================================================================

    /// Adds a state. Errors on a duplicate id.
    pub fn add_state(&mut self, id: StateId) -> Result<(), CoreError> {
        if self.states.contains(&id) {
            return Err(CoreError::InvalidAutomaton {
                reason: format!("duplicate state id '{id}'"),
            });
        }
        self.states.push(id);
        self.reclassify();
        Ok(())
    }

    /// Removes a state along with its transitions, its final-state entry,
    /// and the start-state designation if it pointed there.
    pub fn remove_state(&mut self, id: &StateId) {
        self.states.retain(|s| s != id);
        self.transitions.retain(|t| &t.from != id && &t.to != id);
        self.final_states.retain(|s| s != id);
        if self.start_state.as_ref() == Some(id) {
            self.start_state = None;
        }
        self.reclassify();
    }

    /// Adds a transition. Errors on unknown endpoints or a duplicate
    /// `(from, to, symbol)` triple.
    pub fn add_transition(&mut self, transition: Transition) -> Result<(), CoreError> {
        if !self.states.contains(&transition.from) {
            return Err(CoreError::InvalidAutomaton {
                reason: format!("transition source '{}' is not a state", transition.from),
            });
        }
        if !self.states.contains(&transition.to) {
            return Err(CoreError::InvalidAutomaton {
                reason: format!("transition target '{}' is not a state", transition.to),
            });
        }
        if self.transitions.contains(&transition) {
            return Err(CoreError::InvalidAutomaton {
                reason: format!("duplicate transition {transition}"),
            });
        }
        self.transitions.push(transition);
        self.reclassify();
        Ok(())
    }

    /// Removes a transition, if present.
    pub fn remove_transition(&mut self, transition: &Transition) {
        self.transitions.retain(|t| t != transition);
        self.reclassify();
    }

    /// Sets or clears the start state. Errors on an unknown state.
    pub fn set_start_state(&mut self, id: Option<StateId>) -> Result<(), CoreError> {
        if let Some(id) = &id {
            if !self.states.contains(id) {
                return Err(CoreError::InvalidAutomaton {
                    reason: format!("start state '{id}' is not a state"),
                });
            }
        }
        self.start_state = id;
        Ok(())
    }

    /// Marks or unmarks a state as final. Errors on an unknown state.
    pub fn set_final(&mut self, id: &StateId, fin: bool) -> Result<(), CoreError> {
        if !self.states.contains(id) {
            return Err(CoreError::InvalidAutomaton {
                reason: format!("final state '{id}' is not a state"),
            });
        }
        if fin {
            if !self.final_states.contains(id) {
                self.final_states.push(id.clone());
            }
        } else {
            self.final_states.retain(|s| s != id);
        }
        Ok(())
    }

    fn reclassify(&mut self) {
        self.automaton_type = classify(&self.transitions);
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<AutomatonDoc> for Automaton {
    type Error = CoreError;

    fn try_from(doc: AutomatonDoc) -> Result<Self, CoreError> {
        Automaton::new(
            doc.states.into_iter().map(|s| StateId(s.id)).collect(),
            doc.transitions,
            doc.start_state.map(StateId),
            doc.final_states.into_iter().map(StateId).collect(),
        )
    }
}

impl From<Automaton> for AutomatonDoc {
    fn from(automaton: Automaton) -> Self {
        AutomatonDoc {
            states: automaton
                .states
                .into_iter()
                .map(|s| StateDoc { id: s.0 })
                .collect(),
            transitions: automaton.transitions,
            start_state: automaton.start_state.map(|s| s.0),
            final_states: automaton.final_states.into_iter().map(|s| s.0).collect(),
            automaton_type: automaton.automaton_type,
        }
    }
}

/// Distinct non-epsilon symbols in first-seen order.
pub(crate) fn alphabet_of(transitions: &[Transition]) -> Vec<Symbol> {
    let mut alphabet = Vec::new();
    for t in transitions {
        if !t.symbol.is_epsilon() && !alphabet.contains(&t.symbol) {
            alphabet.push(t.symbol);
        }
    }
    alphabet
}
