mod alphabet;
mod any;
mod automaton;
mod definition;
mod dfa;
mod enfa;
pub mod grammar;
mod language;
mod nfa;
pub mod regex;
mod state;
mod table;
mod transition;

pub use alphabet::Alphabet;
pub use any::AnyAutomaton;
pub use automaton::{Automaton, AutomatonError, StateNaming};
pub use definition::{
	AutomatonDefinition, DeterministicDefinition, NonDeterministicDefinition, StateDefinition,
};
pub use dfa::{Minimization, DFA};
pub use enfa::{DEFAULT_EPSILON, ENFA};
pub use language::Language;
pub use nfa::NFA;
pub use state::{State, StateArena, StateId};
pub use table::EMPTY_SET;
pub use transition::{
	DeterministicTransitionFunction, NonDeterministicTransitionFunction, TransitionFunction,
};
