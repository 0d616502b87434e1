//! # fsmkit-core
//!
//! Finite-automata engine for fsmkit.
//!
//! This crate provides:
//! - The automaton data model with boundary validation
//! - DFA/NFA classification and completeness checking
//! - Membership testing with execution traces
//! - NFA → DFA subset construction
//! - DFA minimization by partition refinement
//!
//! Every operation is a pure function over an immutable automaton value:
//! nothing here performs I/O, retains references across calls, or mutates
//! its input.

pub mod automaton;
pub mod classify;
pub mod convert;
pub mod error;
pub mod minimize;
pub mod names;
pub mod simulate;

#[cfg(test)]
mod proptests;

pub use automaton::{Automaton, AutomatonDoc, AutomatonType, StateDoc, StateId, Symbol, Transition};
pub use classify::{analyze, classify, is_complete, Analysis, NondeterministicGroup};
pub use convert::to_dfa;
pub use error::CoreError;
pub use minimize::minimize;
pub use names::alphabetic_name;
pub use simulate::{accept, Acceptance};
