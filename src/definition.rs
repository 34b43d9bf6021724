use serde::Deserialize;
use std::collections::BTreeSet;

/// Declarative description of an automaton, e.g. read from YAML.
///
/// States are added in order, so transitions may name states declared further down.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(
	default,
	deny_unknown_fields,
	bound(deserialize = "T: Deserialize<'de> + Default")
)]
pub struct AutomatonDefinition<T> {
	pub symbols: Vec<String>,
	pub epsilon: Option<String>,
	pub states: Vec<StateDefinition<T>>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(
	default,
	deny_unknown_fields,
	bound(deserialize = "T: Deserialize<'de> + Default")
)]
pub struct StateDefinition<T> {
	pub name: String,
	/// One entry per symbol, in alphabet order. For automata with epsilon moves the epsilon
	/// targets come last.
	pub transitions: Vec<T>,
	pub starting: bool,
	pub accepting: bool,
}

/// Definition of a DFA, one target name per symbol.
pub type DeterministicDefinition = AutomatonDefinition<String>;

/// Definition of an NFA or ENFA, a set of target names per symbol.
pub type NonDeterministicDefinition = AutomatonDefinition<BTreeSet<String>>;
