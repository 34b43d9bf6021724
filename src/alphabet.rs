use super::AutomatonError;
use std::fmt;

/// An ordered set of input symbols.
///
/// The order matters: transition targets are always given in alphabet order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alphabet {
	symbols: Vec<String>,
}

impl Alphabet {
	/// Creates an alphabet from a sequence of symbols.
	/// Returns an `AutomatonError::DuplicateSymbol` error if a symbol appears twice.
	pub fn new<I, T>(symbols: I) -> Result<Self, AutomatonError>
	where
		I: IntoIterator<Item = T>,
		T: Into<String>,
	{
		let mut alphabet = Self::default();
		for symbol in symbols {
			alphabet.push(symbol)?;
		}
		Ok(alphabet)
	}

	/// Appends a symbol at the end of the alphabet.
	pub fn push<T>(&mut self, symbol: T) -> Result<(), AutomatonError>
	where
		T: Into<String>,
	{
		let symbol = symbol.into();
		if self.contains(&symbol) {
			return Err(AutomatonError::DuplicateSymbol(symbol));
		}
		self.symbols.push(symbol);
		Ok(())
	}

	/// Returns the position of a symbol.
	pub fn position(&self, symbol: &str) -> Option<usize> {
		self.symbols.iter().position(|el| el == symbol)
	}

	pub fn contains(&self, symbol: &str) -> bool {
		self.position(symbol).is_some()
	}

	pub fn symbols(&self) -> &[String] {
		&self.symbols
	}

	pub fn len(&self) -> usize {
		self.symbols.len()
	}

	pub fn is_empty(&self) -> bool {
		self.symbols.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.symbols.iter().map(String::as_str)
	}
}

impl fmt::Display for Alphabet {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.symbols.join(", "))
	}
}
