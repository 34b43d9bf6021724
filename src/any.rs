use super::{Alphabet, Automaton, AutomatonError, State, StateNaming, DFA, ENFA, NFA};

/// Any of the supported automaton kinds.
#[derive(Clone, Debug)]
pub enum AnyAutomaton {
	Deterministic(DFA),
	NonDeterministic(NFA),
	Epsilon(ENFA),
}

impl AnyAutomaton {
	/// Converts the automaton into an equivalent DFA.
	/// A DFA is returned as it is, the others go through subset construction.
	pub fn into_dfa(self, naming: StateNaming) -> Result<DFA, AutomatonError> {
		match self {
			Self::Deterministic(dfa) => Ok(dfa),
			Self::NonDeterministic(nfa) => nfa.to_dfa(naming),
			Self::Epsilon(enfa) => enfa.to_dfa(naming),
		}
	}

	/// Renders the transition table of the wrapped automaton.
	pub fn table(&self) -> Result<String, AutomatonError> {
		match self {
			Self::Deterministic(dfa) => dfa.table(),
			Self::NonDeterministic(nfa) => nfa.table(),
			Self::Epsilon(enfa) => enfa.table(),
		}
	}
}

impl Automaton for AnyAutomaton {
	fn alphabet(&self) -> &Alphabet {
		match self {
			Self::Deterministic(dfa) => dfa.alphabet(),
			Self::NonDeterministic(nfa) => nfa.alphabet(),
			Self::Epsilon(enfa) => enfa.alphabet(),
		}
	}

	fn start_state(&self) -> Option<&State> {
		match self {
			Self::Deterministic(dfa) => dfa.start_state(),
			Self::NonDeterministic(nfa) => nfa.start_state(),
			Self::Epsilon(enfa) => enfa.start_state(),
		}
	}

	fn states(&self) -> Vec<&State> {
		match self {
			Self::Deterministic(dfa) => dfa.states(),
			Self::NonDeterministic(nfa) => nfa.states(),
			Self::Epsilon(enfa) => enfa.states(),
		}
	}

	fn accepts<W>(&self, word: W) -> Result<bool, AutomatonError>
	where
		W: IntoIterator,
		W::Item: AsRef<str>,
	{
		match self {
			Self::Deterministic(dfa) => dfa.accepts(word),
			Self::NonDeterministic(nfa) => nfa.accepts(word),
			Self::Epsilon(enfa) => enfa.accepts(word),
		}
	}
}

impl From<DFA> for AnyAutomaton {
	fn from(dfa: DFA) -> Self {
		Self::Deterministic(dfa)
	}
}

impl From<NFA> for AnyAutomaton {
	fn from(nfa: NFA) -> Self {
		Self::NonDeterministic(nfa)
	}
}

impl From<ENFA> for AnyAutomaton {
	fn from(enfa: ENFA) -> Self {
		Self::Epsilon(enfa)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn automata() -> Vec<AnyAutomaton> {
		// words over {a, b} containing "ab"
		let mut nfa = NFA::with_symbols(vec!["a", "b"]).unwrap();
		nfa.add_state("p", &[&["p", "q"], &["p"]], true, false)
			.unwrap();
		nfa.add_state("q", &[&[], &["r"]], false, false).unwrap();
		nfa.add_state("r", &[&["r"], &["r"]], false, true).unwrap();

		let mut enfa = ENFA::with_symbols(vec!["a", "b"]).unwrap();
		enfa.add_state("p", &[&["p", "q"], &["p"], &[]], true, false)
			.unwrap();
		enfa.add_state("q", &[&[], &["r"], &[]], false, false)
			.unwrap();
		enfa.add_state("r", &[&["r"], &["r"], &[]], false, true)
			.unwrap();

		let dfa = nfa.to_dfa(StateNaming::Sequential).unwrap();
		vec![dfa.into(), nfa.into(), enfa.into()]
	}

	#[test]
	fn delegate() {
		for automaton in automata() {
			assert!(automaton.start_state().is_some(), "Start state missing");
			assert_eq!(2, automaton.alphabet().len());
			assert!(automaton.accepts_str("bab").unwrap());
			assert!(!automaton.accepts_str("bba").unwrap());
			assert!(automaton.table().is_ok());
		}
	}

	#[test]
	fn into_dfa() {
		let expected = automata()[1].accepted_words(4).unwrap();
		for automaton in automata() {
			let dfa = automaton.into_dfa(StateNaming::Composite).unwrap();
			assert_eq!(expected, dfa.accepted_words(4).unwrap());
		}
	}
}
