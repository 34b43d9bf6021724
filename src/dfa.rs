use super::{
	table, Alphabet, Automaton, AutomatonError, DeterministicDefinition,
	DeterministicTransitionFunction, State, StateId,
};
use log::{debug, trace};
use std::collections::{BTreeSet, HashMap};

type Block = BTreeSet<StateId>;

/// Summary of a minimization run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Minimization {
	/// Number of states removed because the start state can't reach them.
	pub unreachable_removed: usize,

	/// Number of equivalence classes merged into a single state.
	pub merged_classes: usize,
}

/// A deterministic finite state automaton.
#[derive(Clone, Debug)]
pub struct DFA {
	transitions: DeterministicTransitionFunction,
}

impl DFA {
	/// Creates a new DFA without states.
	pub fn new(alphabet: Alphabet) -> Self {
		Self {
			transitions: DeterministicTransitionFunction::new(alphabet),
		}
	}

	/// Creates a new DFA over the given symbols.
	pub fn with_symbols<I, T>(symbols: I) -> Result<Self, AutomatonError>
	where
		I: IntoIterator<Item = T>,
		T: Into<String>,
	{
		Ok(Self::new(Alphabet::new(symbols)?))
	}

	/// Builds a DFA from a declarative definition.
	pub fn from_definition(definition: DeterministicDefinition) -> Result<Self, AutomatonError> {
		if let Some(epsilon) = definition.epsilon {
			return Err(AutomatonError::ReservedSymbol(epsilon));
		}
		let mut dfa = Self::with_symbols(definition.symbols)?;
		for state in &definition.states {
			let targets: Vec<&str> = state.transitions.iter().map(String::as_str).collect();
			dfa.add_state(&state.name, &targets, state.starting, state.accepting)?;
		}
		Ok(dfa)
	}

	pub fn transitions(&self) -> &DeterministicTransitionFunction {
		&self.transitions
	}

	/// Adds a state with one target per alphabet symbol.
	/// Targets may name states which are added later.
	pub fn add_state(
		&mut self,
		name: &str,
		targets: &[&str],
		is_starting: bool,
		is_accepting: bool,
	) -> Result<&State, AutomatonError> {
		if targets.len() != self.transitions.alphabet().len() {
			return Err(AutomatonError::InvalidTargetCount {
				state: name.to_owned(),
				expected: self.transitions.alphabet().len(),
				found: targets.len(),
			});
		}
		let id = self
			.transitions
			.add_state(State::new(name, is_starting, is_accepting))?;
		self.transitions.set_transitions_for_state(id, targets)?;
		self.transitions.states().get(id)
	}

	/// Removes a state. Transitions pointing at it are left dangling.
	pub fn remove_state(&mut self, name: &str) -> Result<State, AutomatonError> {
		self.transitions.remove_state(name)
	}

	/// Redefines the transition of a single state and symbol.
	pub fn set_transition(
		&mut self,
		state: &str,
		symbol: &str,
		target: &str,
	) -> Result<(), AutomatonError> {
		let id = self.id(state)?;
		self.transitions.set_transition(id, symbol, target)
	}

	/// Leaves the transition of a single state and symbol undefined.
	pub fn clear_transition(&mut self, state: &str, symbol: &str) -> Result<(), AutomatonError> {
		let id = self.id(state)?;
		self.transitions.clear_transition(id, symbol)
	}

	/// Checks whether the states of the automaton include a state.
	pub fn has_state(&self, name: &str) -> bool {
		self.transitions.states().id(name).is_some()
	}

	pub fn state(&self, name: &str) -> Option<&State> {
		self.transitions.states().find(name)
	}

	fn id(&self, name: &str) -> Result<StateId, AutomatonError> {
		self.transitions
			.states()
			.id(name)
			.ok_or_else(|| AutomatonError::InexistentState(name.to_owned()))
	}

	/// Returns the state reached from `state` by a single symbol.
	pub fn transition(&self, state: &str, symbol: &str) -> Result<&State, AutomatonError> {
		self.transitions.evaluate(self.id(state)?, symbol)
	}

	/// Runs a word starting from an arbitrary state and returns the state it ends in.
	pub fn walk<W>(&self, from: &str, word: W) -> Result<&State, AutomatonError>
	where
		W: IntoIterator,
		W::Item: AsRef<str>,
	{
		let mut current = self.id(from)?;
		for symbol in word {
			let position = self.transitions.position(symbol.as_ref())?;
			current = self.transitions.target_at(current, position)?;
		}
		self.transitions.states().get(current)
	}

	/// Returns the state the automaton ends in after reading a word.
	pub fn resulting_state<W>(&self, word: W) -> Result<&State, AutomatonError>
	where
		W: IntoIterator,
		W::Item: AsRef<str>,
	{
		let positions = self.verify_word(word)?;
		let states = self.transitions.states();
		let mut current = states.start().ok_or(AutomatonError::NoStartState)?;
		for position in positions {
			current = self.transitions.target_at(current, position)?;
		}
		states.get(current)
	}

	/// Collects the states reachable from the start state, the start state included.
	fn reachable(&self) -> Result<Block, AutomatonError> {
		let start = self
			.transitions
			.states()
			.start()
			.ok_or(AutomatonError::NoStartState)?;
		let mut reached = Block::new();
		reached.insert(start);
		let mut frontier = vec![start];
		while let Some(state) = frontier.pop() {
			for position in 0..self.transitions.alphabet().len() {
				if let Some(target) = self.transitions.defined_target_at(state, position)? {
					if reached.insert(target) {
						frontier.push(target);
					}
				}
			}
		}
		Ok(reached)
	}

	/// Removes every state the start state can't reach and returns how many were removed.
	pub fn remove_unreachable_states(&mut self) -> Result<usize, AutomatonError> {
		if self.transitions.states().is_empty() {
			return Err(AutomatonError::EmptyAutomaton);
		}
		let reached = self.reachable()?;
		let unreached: Vec<String> = self
			.transitions
			.states()
			.iter()
			.filter(|(id, _)| !reached.contains(id))
			.map(|(_, state)| state.name().to_owned())
			.collect();
		for name in &unreached {
			self.transitions.remove_state(name)?;
		}
		if !unreached.is_empty() {
			debug!("Removed unreachable states {:?}", unreached);
		}
		Ok(unreached.len())
	}

	/// Splits the states into classes of equivalent states using Hopcroft's partition refinement.
	/// Only classes with more than one state are returned.
	fn equivalence_classes(&self) -> Result<Vec<Block>, AutomatonError> {
		let states = self.transitions.states();
		let symbols = self.transitions.alphabet().len();

		// per symbol: target -> sources
		let mut inverse: Vec<HashMap<StateId, Block>> = vec![HashMap::new(); symbols];
		for (id, _) in states.iter() {
			for (position, sources) in inverse.iter_mut().enumerate() {
				let target = self.transitions.target_at(id, position)?;
				sources.entry(target).or_default().insert(id);
			}
		}

		let accepting: Block = states
			.iter()
			.filter(|(_, state)| state.is_accepting())
			.map(|(id, _)| id)
			.collect();
		let rejecting: Block = states
			.iter()
			.filter(|(_, state)| !state.is_accepting())
			.map(|(id, _)| id)
			.collect();
		let mut partition: Vec<Block> = vec![accepting, rejecting]
			.into_iter()
			.filter(|block| !block.is_empty())
			.collect();
		let mut work = partition.clone();

		while let Some(splitter) = work.pop() {
			for sources in &inverse {
				let predecessors: Block = splitter
					.iter()
					.filter_map(|target| sources.get(target))
					.flatten()
					.copied()
					.collect();
				if predecessors.is_empty() {
					continue;
				}

				let mut refined = Vec::with_capacity(partition.len());
				for block in partition.drain(..) {
					let inside: Block = block.intersection(&predecessors).copied().collect();
					if inside.is_empty() || inside.len() == block.len() {
						refined.push(block);
						continue;
					}
					let outside: Block = block.difference(&predecessors).copied().collect();
					trace!("Split {:?} into {:?} and {:?}", block, inside, outside);

					if let Some(index) = work.iter().position(|pending| *pending == block) {
						work.swap_remove(index);
						work.push(inside.clone());
						work.push(outside.clone());
					} else if outside.len() < inside.len() {
						work.push(outside.clone());
					} else {
						work.push(inside.clone());
					}
					refined.push(inside);
					refined.push(outside);
				}
				partition = refined;
			}
		}

		Ok(partition
			.into_iter()
			.filter(|block| block.len() > 1)
			.collect())
	}

	/// Replaces a class of equivalent states by a single state.
	fn merge(&mut self, class: &Block) -> Result<(), AutomatonError> {
		let states = self.transitions.states();
		let members = class
			.iter()
			.map(|id| states.get(*id).map(Clone::clone))
			.collect::<Result<Vec<_>, _>>()?;
		let representative = match class.iter().next() {
			Some(id) => *id,
			None => return Ok(()),
		};

		let mut names: Vec<&str> = members.iter().map(State::name).collect();
		names.sort_unstable();
		let mut name = format!("{{{}}}", names.join(", "));
		while states.is_known(&name) {
			name.push('\'');
		}

		let targets = (0..self.transitions.alphabet().len())
			.map(|position| -> Result<String, AutomatonError> {
				let target = self.transitions.target_at(representative, position)?;
				Ok(if class.contains(&target) {
					name.clone()
				} else {
					states.label(target)
				})
			})
			.collect::<Result<Vec<_>, _>>()?;
		let is_starting = members.iter().any(State::is_starting);
		let is_accepting = members.iter().any(State::is_accepting);

		for member in &members {
			self.transitions.remove_state(member.name())?;
		}
		let merged = self
			.transitions
			.add_state(State::new(name.as_str(), is_starting, is_accepting))?;
		let targets: Vec<&str> = targets.iter().map(String::as_str).collect();
		self.transitions.set_transitions_for_state(merged, &targets)?;
		self.transitions.redirect(class, merged);

		debug!("Merged {} equivalent states into \"{}\"", members.len(), name);
		Ok(())
	}

	fn minimize_in_place(&mut self) -> Result<Minimization, AutomatonError> {
		let unreachable_removed = self.remove_unreachable_states()?;
		let classes = self.equivalence_classes()?;
		for class in &classes {
			self.merge(class)?;
		}
		Ok(Minimization {
			unreachable_removed,
			merged_classes: classes.len(),
		})
	}

	/// Minimizes the automaton.
	///
	/// Unreachable states are removed and equivalent states merged. On failure the automaton is
	/// left exactly as it was.
	pub fn minimize(&mut self) -> Result<Minimization, AutomatonError> {
		let mut working = self.clone();
		let minimization = working.minimize_in_place()?;
		*self = working;
		debug!("Minimized DFA: {:?}", minimization);
		Ok(minimization)
	}

	/// Returns a minimized copy of the automaton.
	pub fn minimized(&self) -> Result<Self, AutomatonError> {
		let mut dfa = self.clone();
		dfa.minimize_in_place()?;
		Ok(dfa)
	}

	/// Renders the transition table.
	pub fn table(&self) -> Result<String, AutomatonError> {
		let symbols = self.transitions.alphabet().len();
		let rows = self
			.transitions
			.states()
			.iter()
			.map(|(id, state)| {
				let cells = (0..symbols)
					.map(|position| {
						self.transitions
							.target_name(id, position)
							.unwrap_or("-")
							.to_owned()
					})
					.collect();
				(state, cells)
			})
			.collect();
		table::render(
			"DF Automaton table",
			self.transitions.alphabet().symbols(),
			rows,
		)
	}
}

impl Automaton for DFA {
	fn alphabet(&self) -> &Alphabet {
		self.transitions.alphabet()
	}

	fn start_state(&self) -> Option<&State> {
		self.transitions.states().start_state()
	}

	fn states(&self) -> Vec<&State> {
		self.transitions
			.states()
			.iter()
			.map(|(_, state)| state)
			.collect()
	}

	fn accepts<W>(&self, word: W) -> Result<bool, AutomatonError>
	where
		W: IntoIterator,
		W::Item: AsRef<str>,
	{
		Ok(self.resulting_state(word)?.is_accepting())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use test_log::test;

	/// Words over {0, 1} where the third symbol from the end is 1.
	fn third_from_end() -> DFA {
		let mut dfa = DFA::with_symbols(vec!["0", "1"]).unwrap();
		dfa.add_state("q_000", &["q_000", "q_001"], true, false)
			.unwrap();
		dfa.add_state("q_001", &["q_010", "q_011"], false, false)
			.unwrap();
		dfa.add_state("q_010", &["q_100", "q_101"], false, false)
			.unwrap();
		dfa.add_state("q_011", &["q_110", "q_111"], false, false)
			.unwrap();
		dfa.add_state("q_100", &["q_000", "q_001"], false, true)
			.unwrap();
		dfa.add_state("q_101", &["q_010", "q_011"], false, true)
			.unwrap();
		dfa.add_state("q_110", &["q_100", "q_101"], false, true)
			.unwrap();
		dfa.add_state("q_111", &["q_110", "q_111"], false, true)
			.unwrap();
		dfa
	}

	fn two_state() -> DFA {
		let mut dfa = DFA::with_symbols(vec!["0", "1"]).unwrap();
		dfa.add_state("q0", &["q0", "q1"], true, false).unwrap();
		dfa.add_state("q1", &["q0", "q1"], false, true).unwrap();
		dfa
	}

	#[test]
	fn construct() {
		let dfa = two_state();
		assert!(dfa.has_state("q0"), "Initially added state missing");
		assert!(dfa.has_state("q1"), "Later added state missing");
		assert_eq!("q0", dfa.start_state().unwrap().name());
		assert_eq!(2, dfa.states().len());
	}

	#[test]
	fn duplicate_start() {
		let mut dfa = two_state();
		assert_eq!(
			Err(AutomatonError::DuplicateStartState("q2".into())),
			dfa.add_state("q2", &["q0", "q0"], true, false).map(|_| ())
		);
		assert!(!dfa.has_state("q2"), "Rejected state was added");
	}

	#[test]
	fn run() {
		let dfa = third_from_end();
		assert!(dfa.accepts_str("110111").unwrap());
		assert!(dfa.accepts_str("100").unwrap());
		assert!(!dfa.accepts_str("11011011").unwrap());
		assert!(!dfa.accepts(&["0", "1", "1"]).unwrap());
		assert_eq!("q_101", dfa.resulting_state(&["1", "0", "1"]).unwrap().name());
		assert_eq!(
			"q_011",
			dfa.walk("q_001", &["1"]).unwrap().name(),
			"Incorrect state after walk"
		);
	}

	#[test]
	fn errors() {
		let dfa = two_state();
		assert_eq!(
			Err(AutomatonError::InvalidSymbol("2".into())),
			dfa.accepts_str("012")
		);

		let mut empty = DFA::with_symbols(vec!["0", "1"]).unwrap();
		assert_eq!(Err(AutomatonError::NoStartState), empty.accepts_str("0"));
		assert_eq!(Err(AutomatonError::EmptyAutomaton), empty.minimize());

		empty.add_state("q0", &["q0", "q1"], false, false).unwrap();
		assert_eq!(Err(AutomatonError::NoStartState), empty.minimize());
	}

	#[test]
	fn partial() {
		let mut dfa = two_state();
		dfa.clear_transition("q1", "1").unwrap();
		assert!(dfa.accepts_str("01").unwrap());
		assert_eq!(
			Err(AutomatonError::UndefinedTransition {
				state: "q1".into(),
				symbol: "1".into()
			}),
			dfa.accepts_str("011")
		);

		dfa.set_transition("q1", "1", "q2").unwrap();
		assert_eq!(
			Err(AutomatonError::DanglingTarget("q2".into())),
			dfa.accepts_str("011"),
			"Dangling target not reported"
		);
	}

	#[test]
	fn readd_removed_state() {
		let mut dfa = two_state();
		dfa.remove_state("q1").unwrap();
		assert!(!dfa.has_state("q1"));
		assert_eq!(
			Err(AutomatonError::DanglingTarget("q1".into())),
			dfa.accepts_str("1"),
			"Removed state still reachable"
		);

		dfa.add_state("q1", &["q0", "q1"], false, true).unwrap();
		assert!(dfa.accepts_str("1").unwrap(), "Transition into re-added state not resolved");
		assert_eq!("q1", dfa.transition("q0", "1").unwrap().name());
	}

	#[test]
	fn accepted_words() {
		let dfa = two_state();
		assert_eq!(
			vec!["1", "01", "11", "001", "011", "101", "111"],
			dfa.accepted_words(3).unwrap()
		);
	}

	#[test]
	fn remove_unreachable() {
		let mut dfa = two_state();
		dfa.add_state("q2", &["q0", "q3"], false, false).unwrap();
		dfa.add_state("q3", &["q3", "q3"], false, true).unwrap();
		assert_eq!(2, dfa.remove_unreachable_states().unwrap());
		assert!(!dfa.has_state("q2"));
		assert!(!dfa.has_state("q3"));
		assert!(dfa.has_state("q0"), "Start state removed");
		assert_eq!(0, dfa.remove_unreachable_states().unwrap());
	}

	#[test]
	fn already_minimal() {
		let mut dfa = DFA::with_symbols(vec!["0", "1"]).unwrap();
		dfa.add_state("q0", &["q0", "q1"], true, false).unwrap();
		dfa.add_state("q1", &["q0", "q1"], false, true).unwrap();
		assert!(dfa.accepts_str("011").unwrap());

		let minimization = dfa.minimize().unwrap();
		assert_eq!(Minimization::default(), minimization);
		assert_eq!(2, dfa.states().len());
		assert!(dfa.accepts_str("011").unwrap());
	}

	#[test]
	fn minimize() {
		// q1 and q2 are equivalent, q3 is unreachable
		let mut dfa = DFA::with_symbols(vec!["a", "b"]).unwrap();
		dfa.add_state("q0", &["q1", "q2"], true, false).unwrap();
		dfa.add_state("q1", &["q1", "q2"], false, true).unwrap();
		dfa.add_state("q2", &["q2", "q1"], false, true).unwrap();
		dfa.add_state("q3", &["q0", "q0"], false, false).unwrap();

		let minimized = dfa.minimized().unwrap();
		assert_eq!(4, dfa.states().len(), "Source automaton changed");
		assert_eq!(2, minimized.states().len());
		assert!(minimized.has_state("{q1, q2}"));
		assert_eq!("{q1, q2}", minimized.transition("q0", "b").unwrap().name());
		assert_eq!(
			"{q1, q2}",
			minimized.transition("{q1, q2}", "a").unwrap().name(),
			"Self loop not remapped to merged state"
		);
		assert_eq!(dfa.accepted_words(4), minimized.accepted_words(4));
	}

	#[test]
	fn minimize_merges_start() {
		// every state accepts the same language
		let mut dfa = DFA::with_symbols(vec!["0"]).unwrap();
		dfa.add_state("a", &["b"], true, true).unwrap();
		dfa.add_state("b", &["a"], false, true).unwrap();
		let minimization = dfa.minimize().unwrap();
		assert_eq!(1, minimization.merged_classes);
		let start = dfa.start_state().unwrap();
		assert_eq!(">{a, b}*", start.to_string());
		assert!(dfa.accepts_str("000").unwrap());
	}

	#[test]
	fn minimize_is_atomic() {
		let mut dfa = two_state();
		dfa.set_transition("q1", "0", "gone").unwrap();
		assert_eq!(
			Err(AutomatonError::DanglingTarget("gone".into())),
			dfa.minimize()
		);
		assert_eq!(2, dfa.states().len(), "Failed minimization changed states");
		assert!(dfa.accepts_str("1").unwrap());
	}

	#[test]
	fn minimize_third_from_end() {
		let mut dfa = third_from_end();
		let before = dfa.accepted_words(6).unwrap();
		dfa.minimize().unwrap();
		assert_eq!(8, dfa.states().len(), "Minimal automaton got smaller");
		assert_eq!(before, dfa.accepted_words(6).unwrap());
	}

	#[test]
	fn table() {
		let dfa = two_state();
		let table = dfa.table().unwrap();
		assert!(table.contains("DF Automaton table"));
		assert!(table.contains("| >q0   | q0 | q1 |"), "{}", table);
		assert!(table.contains("|  q1*  | q0 | q1 |"), "{}", table);
	}
}
