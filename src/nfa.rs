use super::{
	table, Alphabet, Automaton, AutomatonError, NonDeterministicDefinition,
	NonDeterministicTransitionFunction, State, StateId, StateNaming, DFA,
};
use log::debug;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

type StateSet = BTreeSet<StateId>;

/// A non-deterministic finite state automaton.
#[derive(Clone, Debug)]
pub struct NFA {
	transitions: NonDeterministicTransitionFunction,
	null_state: State,
}

impl NFA {
	/// Creates a new NFA without states.
	pub fn new(alphabet: Alphabet) -> Self {
		Self {
			transitions: NonDeterministicTransitionFunction::new(alphabet),
			null_state: State::new(table::EMPTY_SET, false, false),
		}
	}

	/// Creates a new NFA over the given symbols.
	pub fn with_symbols<I, T>(symbols: I) -> Result<Self, AutomatonError>
	where
		I: IntoIterator<Item = T>,
		T: Into<String>,
	{
		Ok(Self::new(Alphabet::new(symbols)?))
	}

	/// Builds an NFA from a declarative definition.
	pub fn from_definition(definition: NonDeterministicDefinition) -> Result<Self, AutomatonError> {
		if let Some(epsilon) = definition.epsilon {
			return Err(AutomatonError::ReservedSymbol(epsilon));
		}
		let mut nfa = Self::with_symbols(definition.symbols)?;
		for state in &definition.states {
			let targets: Vec<Vec<&str>> = state
				.transitions
				.iter()
				.map(|set| set.iter().map(String::as_str).collect())
				.collect();
			let targets: Vec<&[&str]> = targets.iter().map(Vec::as_slice).collect();
			nfa.add_state(&state.name, &targets, state.starting, state.accepting)?;
		}
		Ok(nfa)
	}

	pub fn transitions(&self) -> &NonDeterministicTransitionFunction {
		&self.transitions
	}

	/// The state standing for "no state at all", used when displaying missing transitions.
	/// It never takes part in recognition.
	pub fn null_state(&self) -> &State {
		&self.null_state
	}

	/// Adds a new state and returns its handle.
	pub(crate) fn insert_state(
		&mut self,
		name: &str,
		targets: &[&[&str]],
		is_starting: bool,
		is_accepting: bool,
	) -> Result<StateId, AutomatonError> {
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
		Ok(id)
	}

	/// Adds a state with one set of targets per alphabet symbol.
	/// Targets may name states which are added later.
	pub fn add_state(
		&mut self,
		name: &str,
		targets: &[&[&str]],
		is_starting: bool,
		is_accepting: bool,
	) -> Result<&State, AutomatonError> {
		let id = self.insert_state(name, targets, is_starting, is_accepting)?;
		self.transitions.states().get(id)
	}

	/// Removes a state. Transitions pointing at it are left dangling.
	pub fn remove_state(&mut self, name: &str) -> Result<State, AutomatonError> {
		self.transitions.remove_state(name)
	}

	/// Checks whether the states of the automaton include a state.
	pub fn has_state(&self, name: &str) -> bool {
		self.transitions.states().id(name).is_some()
	}

	pub fn state(&self, name: &str) -> Option<&State> {
		self.transitions.states().find(name)
	}

	/// Returns the states reached from `state` by a single symbol.
	pub fn transition(&self, state: &str, symbol: &str) -> Result<Vec<&State>, AutomatonError> {
		let id = self
			.transitions
			.states()
			.id(state)
			.ok_or_else(|| AutomatonError::InexistentState(state.to_owned()))?;
		self.transitions.evaluate(id, symbol)
	}

	/// Returns the union of the targets of every state in `current` for one symbol.
	pub(crate) fn step(&self, current: &StateSet, position: usize) -> Result<StateSet, AutomatonError> {
		let mut next = StateSet::new();
		for state in current {
			next.extend(self.transitions.targets_at(*state, position)?);
		}
		Ok(next)
	}

	pub(crate) fn start_set(&self) -> Result<StateSet, AutomatonError> {
		let start = self
			.transitions
			.states()
			.start()
			.ok_or(AutomatonError::NoStartState)?;
		Ok(Some(start).into_iter().collect())
	}

	pub(crate) fn resolve(&self, set: &StateSet) -> Result<Vec<&State>, AutomatonError> {
		set.iter()
			.map(|id| self.transitions.states().get(*id))
			.collect()
	}

	pub(crate) fn is_accepting_set(&self, set: &StateSet) -> Result<bool, AutomatonError> {
		Ok(self.resolve(set)?.iter().any(|state| state.is_accepting()))
	}

	/// Returns the states the automaton ends in after reading a word.
	pub fn resulting_states<W>(&self, word: W) -> Result<Vec<&State>, AutomatonError>
	where
		W: IntoIterator,
		W::Item: AsRef<str>,
	{
		let positions = self.verify_word(word)?;
		let mut current = self.start_set()?;
		for position in positions {
			current = self.step(&current, position)?;
		}
		self.resolve(&current)
	}

	/// Converts the automaton into an equivalent DFA using subset construction.
	///
	/// Only state sets reachable from the start state become DFA states, in the order they are
	/// discovered. The first one is the starting state.
	pub fn to_dfa(&self, naming: StateNaming) -> Result<DFA, AutomatonError> {
		let alphabet = self.transitions.alphabet();
		let initial = self.start_set()?;

		let mut visited: Vec<(StateSet, Vec<StateSet>)> = Vec::new();
		let mut seen: HashSet<StateSet> = HashSet::new();
		let mut queue = VecDeque::new();
		seen.insert(initial.clone());
		queue.push_back(initial);

		while let Some(set) = queue.pop_front() {
			let images = (0..alphabet.len())
				.map(|position| self.step(&set, position))
				.collect::<Result<Vec<_>, _>>()?;
			for image in &images {
				if seen.insert(image.clone()) {
					queue.push_back(image.clone());
				}
			}
			visited.push((set, images));
		}
		debug!("Subset construction visited {} state sets", visited.len());

		let states = self.transitions.states();
		let mut taken = HashSet::new();
		let mut names: HashMap<&StateSet, String> = HashMap::new();
		for (index, (set, _)) in visited.iter().enumerate() {
			let mut name = match naming {
				StateNaming::Sequential => format!("s{}", index),
				StateNaming::Composite => {
					table::set_label(set.iter().filter_map(|id| states.name(*id)))
				}
			};
			// member names may contain ", " themselves
			while !taken.insert(name.clone()) {
				name.push('\'');
			}
			names.insert(set, name);
		}

		let mut dfa = DFA::new(alphabet.clone());
		for (index, (set, images)) in visited.iter().enumerate() {
			let targets: Vec<&str> = images
				.iter()
				.map(|image| names[image].as_str())
				.collect();
			dfa.add_state(
				&names[set],
				&targets,
				index == 0,
				self.is_accepting_set(set)?,
			)?;
		}
		Ok(dfa)
	}

	/// Renders the transition table.
	pub fn table(&self) -> Result<String, AutomatonError> {
		self.render_table("NF Automaton table")
	}

	pub(crate) fn render_table(&self, title: &str) -> Result<String, AutomatonError> {
		let symbols = self.transitions.alphabet().len();
		let rows = self
			.transitions
			.states()
			.iter()
			.map(|(id, state)| {
				let cells = (0..symbols)
					.map(|position| table::set_label(self.transitions.target_names(id, position)))
					.collect();
				(state, cells)
			})
			.collect();
		table::render(title, self.transitions.alphabet().symbols(), rows)
	}
}

impl Automaton for NFA {
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
		Ok(self
			.resulting_states(word)?
			.iter()
			.any(|state| state.is_accepting()))
	}
}
