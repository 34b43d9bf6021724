use super::{
	Alphabet, Automaton, AutomatonError, NonDeterministicDefinition, State, StateId, StateNaming,
	DFA, NFA,
};
use log::{debug, trace};
use std::collections::{BTreeSet, HashMap};

/// Symbol reserved for epsilon moves unless another one is chosen.
pub const DEFAULT_EPSILON: &str = "e";

type StateSet = BTreeSet<StateId>;
type Closures = HashMap<StateId, StateSet>;

/// A non-deterministic finite state automaton with epsilon moves.
///
/// Transition targets are given for every input symbol followed by the epsilon symbol.
#[derive(Clone, Debug)]
pub struct ENFA {
	nfa: NFA,
	input: Alphabet,
	epsilon: String,
	closures: Result<Closures, AutomatonError>,
}

impl ENFA {
	/// Creates a new ENFA using [`DEFAULT_EPSILON`] for epsilon moves.
	pub fn new(alphabet: Alphabet) -> Result<Self, AutomatonError> {
		Self::with_epsilon(alphabet, DEFAULT_EPSILON)
	}

	/// Creates a new ENFA with a custom epsilon symbol.
	/// Returns an `AutomatonError::ReservedSymbol` error if the alphabet already contains it.
	pub fn with_epsilon<E>(alphabet: Alphabet, epsilon: E) -> Result<Self, AutomatonError>
	where
		E: Into<String>,
	{
		let epsilon = epsilon.into();
		if alphabet.contains(&epsilon) {
			return Err(AutomatonError::ReservedSymbol(epsilon));
		}
		let mut symbols = alphabet.clone();
		symbols.push(epsilon.as_str())?;
		Ok(Self {
			nfa: NFA::new(symbols),
			input: alphabet,
			epsilon,
			closures: Ok(Closures::new()),
		})
	}

	/// Creates a new ENFA over the given symbols using [`DEFAULT_EPSILON`].
	pub fn with_symbols<I, T>(symbols: I) -> Result<Self, AutomatonError>
	where
		I: IntoIterator<Item = T>,
		T: Into<String>,
	{
		Self::new(Alphabet::new(symbols)?)
	}

	/// Builds an ENFA from a declarative definition.
	pub fn from_definition(definition: NonDeterministicDefinition) -> Result<Self, AutomatonError> {
		let alphabet = Alphabet::new(definition.symbols)?;
		let mut enfa = match definition.epsilon {
			Some(epsilon) => Self::with_epsilon(alphabet, epsilon)?,
			None => Self::new(alphabet)?,
		};
		for state in &definition.states {
			let targets: Vec<Vec<&str>> = state
				.transitions
				.iter()
				.map(|set| set.iter().map(String::as_str).collect())
				.collect();
			let targets: Vec<&[&str]> = targets.iter().map(Vec::as_slice).collect();
			enfa.add_state(&state.name, &targets, state.starting, state.accepting)?;
		}
		Ok(enfa)
	}

	pub fn epsilon(&self) -> &str {
		&self.epsilon
	}

	pub fn null_state(&self) -> &State {
		self.nfa.null_state()
	}

	/// Adds a state with one set of targets per input symbol plus a last one for epsilon moves.
	/// Targets may name states which are added later.
	pub fn add_state(
		&mut self,
		name: &str,
		targets: &[&[&str]],
		is_starting: bool,
		is_accepting: bool,
	) -> Result<&State, AutomatonError> {
		let id = self
			.nfa
			.insert_state(name, targets, is_starting, is_accepting)?;
		self.closures = self.compute_closures();
		if let Err(error) = &self.closures {
			trace!("Epsilon closures pending: {}", error);
		}
		self.nfa.transitions().states().get(id)
	}

	pub fn has_state(&self, name: &str) -> bool {
		self.nfa.has_state(name)
	}

	pub fn state(&self, name: &str) -> Option<&State> {
		self.nfa.state(name)
	}

	fn epsilon_position(&self) -> usize {
		self.input.len()
	}

	/// Computes the epsilon closure of every state with a work list, so cycles terminate.
	fn compute_closures(&self) -> Result<Closures, AutomatonError> {
		let transitions = self.nfa.transitions();
		let epsilon = self.epsilon_position();
		let mut closures = Closures::new();
		for (id, _) in transitions.states().iter() {
			let mut closure = StateSet::new();
			closure.insert(id);
			let mut work = vec![id];
			while let Some(state) = work.pop() {
				for target in transitions.targets_at(state, epsilon)? {
					if closure.insert(target) {
						work.push(target);
					}
				}
			}
			closures.insert(id, closure);
		}
		Ok(closures)
	}

	fn closures(&self) -> Result<&Closures, AutomatonError> {
		self.closures.as_ref().map_err(|error| error.clone())
	}

	/// Expands a set of states with everything reachable through epsilon moves.
	fn close(&self, set: &StateSet) -> Result<StateSet, AutomatonError> {
		let closures = self.closures()?;
		let mut closed = StateSet::new();
		for state in set {
			let closure = closures.get(state).ok_or_else(|| {
				AutomatonError::DanglingTarget(self.nfa.transitions().states().label(*state))
			})?;
			closed.extend(closure.iter().copied());
		}
		Ok(closed)
	}

	/// Returns the states reachable from a state through epsilon moves, the state itself included.
	pub fn epsilon_closure(&self, name: &str) -> Result<Vec<&State>, AutomatonError> {
		let id = self
			.nfa
			.transitions()
			.states()
			.id(name)
			.ok_or_else(|| AutomatonError::InexistentState(name.to_owned()))?;
		let closure = self.close(&Some(id).into_iter().collect())?;
		self.nfa.resolve(&closure)
	}

	/// Returns the states the automaton ends in after reading a word.
	pub fn resulting_states<W>(&self, word: W) -> Result<Vec<&State>, AutomatonError>
	where
		W: IntoIterator,
		W::Item: AsRef<str>,
	{
		let positions = self.verify_word(word)?;
		let mut current = self.close(&self.nfa.start_set()?)?;
		for position in positions {
			current = self.close(&self.nfa.step(&current, position)?)?;
		}
		self.nfa.resolve(&current)
	}

	/// Converts the automaton into an equivalent NFA without epsilon moves.
	pub fn to_nfa(&self) -> Result<NFA, AutomatonError> {
		let closures = self.closures()?;
		let states = self.nfa.transitions().states();
		let mut nfa = NFA::new(self.input.clone());

		for (id, state) in states.iter() {
			let closure = self.close(&Some(id).into_iter().collect())?;
			let mut targets: Vec<Vec<&str>> = Vec::with_capacity(self.input.len());
			for position in 0..self.input.len() {
				let image = self.close(&self.nfa.step(&closure, position)?)?;
				targets.push(image.iter().filter_map(|target| states.name(*target)).collect());
			}
			let targets: Vec<&[&str]> = targets.iter().map(Vec::as_slice).collect();
			let is_accepting = self.nfa.is_accepting_set(&closure)?;
			nfa.add_state(state.name(), &targets, state.is_starting(), is_accepting)?;
		}
		debug!("Removed epsilon moves from {} states", closures.len());
		Ok(nfa)
	}

	/// Converts the automaton into an equivalent DFA.
	pub fn to_dfa(&self, naming: StateNaming) -> Result<DFA, AutomatonError> {
		self.to_nfa()?.to_dfa(naming)
	}

	/// Renders the transition table, epsilon moves in the last column.
	pub fn table(&self) -> Result<String, AutomatonError> {
		self.nfa.render_table("e-NF Automaton table")
	}
}

impl Automaton for ENFA {
	fn alphabet(&self) -> &Alphabet {
		&self.input
	}

	fn start_state(&self) -> Option<&State> {
		self.nfa.start_state()
	}

	fn states(&self) -> Vec<&State> {
		self.nfa.states()
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
