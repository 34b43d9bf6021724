use super::{Alphabet, State};
use itertools::Itertools;
use std::{error, fmt};

/// Trait representing the recognition capability shared by every automaton kind.
pub trait Automaton {
	/// Returns the alphabet words are checked against.
	fn alphabet(&self) -> &Alphabet;

	/// Returns the starting state, if one was added.
	fn start_state(&self) -> Option<&State>;

	/// Returns all states in the order they were added.
	fn states(&self) -> Vec<&State>;

	/// Checks whether the automaton accepts a word given as a sequence of symbols.
	fn accepts<W>(&self, word: W) -> Result<bool, AutomatonError>
	where
		W: IntoIterator,
		W::Item: AsRef<str>;

	/// Checks whether the automaton accepts a word where every character is one symbol.
	/// Surrounding whitespace is ignored.
	fn accepts_str(&self, word: &str) -> Result<bool, AutomatonError> {
		self.accepts(word.trim().chars().map(String::from))
	}

	/// Maps every symbol of a word to its alphabet position.
	/// Returns an `AutomatonError::InvalidSymbol` error for symbols outside the alphabet
	/// and an `AutomatonError::NoStartState` error if there is nothing to start from.
	fn verify_word<W>(&self, word: W) -> Result<Vec<usize>, AutomatonError>
	where
		W: IntoIterator,
		W::Item: AsRef<str>,
	{
		let alphabet = self.alphabet();
		let positions = word
			.into_iter()
			.map(|symbol| {
				let symbol = symbol.as_ref();
				alphabet
					.position(symbol)
					.ok_or_else(|| AutomatonError::InvalidSymbol(symbol.to_owned()))
			})
			.collect::<Result<Vec<_>, _>>()?;
		if self.start_state().is_none() {
			return Err(AutomatonError::NoStartState);
		}
		Ok(positions)
	}

	/// Collects every accepted word with a length between 1 and `max_length`.
	///
	/// This tries every combination of symbols, so the work grows exponentially with `max_length`.
	fn accepted_words(&self, max_length: usize) -> Result<Vec<String>, AutomatonError> {
		let symbols = self.alphabet().symbols();
		let mut accepted = Vec::new();
		if symbols.is_empty() {
			return Ok(accepted);
		}
		for length in 1..=max_length {
			for word in (0..length)
				.map(|_| symbols.iter())
				.multi_cartesian_product()
			{
				if self.accepts(&word)? {
					accepted.push(word.into_iter().map(String::as_str).collect());
				}
			}
		}
		Ok(accepted)
	}
}

/// How subset construction names the states it creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateNaming {
	/// `s0`, `s1`, ... in the order the state sets were discovered.
	Sequential,

	/// The brace-joined names of the contributing states, e.g. `{q0, q1}`.
	Composite,
}

impl Default for StateNaming {
	fn default() -> Self {
		Self::Sequential
	}
}

/// Enum representing an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
	/// A word contains a symbol outside the alphabet.
	InvalidSymbol(String),

	/// The operation needs a starting state but none was added.
	NoStartState,

	/// A second starting state was added.
	DuplicateStartState(String),

	/// A deterministic transition is not defined for a state and symbol.
	UndefinedTransition { state: String, symbol: String },

	/// A transition points at a state that does not exist (anymore).
	DanglingTarget(String),

	/// The operation needs at least one state.
	EmptyAutomaton,

	/// The symbol is reserved for epsilon moves.
	ReservedSymbol(String),

	/// The symbol appears twice in an alphabet.
	DuplicateSymbol(String),

	/// The number of transition targets does not match the alphabet.
	InvalidTargetCount {
		state: String,
		expected: usize,
		found: usize,
	},

	/// The operation names a state the automaton does not have.
	InexistentState(String),
}

impl fmt::Display for AutomatonError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InvalidSymbol(symbol) => write!(f, "Invalid symbol \"{}\"", symbol),
			Self::NoStartState => write!(f, "There is no starting state"),
			Self::DuplicateStartState(state) => write!(
				f,
				"Automaton can't have more than one starting state, \"{}\" is a second one",
				state
			),
			Self::UndefinedTransition { state, symbol } => write!(
				f,
				"No transition defined from state \"{}\" with symbol \"{}\"",
				state, symbol
			),
			Self::DanglingTarget(state) => write!(f, "State \"{}\" is not defined", state),
			Self::EmptyAutomaton => write!(f, "Automaton has no states"),
			Self::ReservedSymbol(symbol) => {
				write!(f, "Symbol \"{}\" is reserved for epsilon moves", symbol)
			}
			Self::DuplicateSymbol(symbol) => write!(f, "Duplicate symbol \"{}\"", symbol),
			Self::InvalidTargetCount {
				state,
				expected,
				found,
			} => write!(
				f,
				"State \"{}\" has {} transition targets, expected {}",
				state, found, expected
			),
			Self::InexistentState(state) => write!(f, "Inexistent State ID \"{}\"", state),
		}
	}
}

impl error::Error for AutomatonError {}
