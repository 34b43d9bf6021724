//! Context-free grammars over single-character symbols.

mod earley;

pub use earley::Earley;

use log::warn;
use std::{collections::BTreeSet, error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
	MalformedProduction(String),
	UnknownStartSymbol(char),
}

impl fmt::Display for GrammarError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::MalformedProduction(line) => write!(f, "Malformed production \"{}\"", line),
			Self::UnknownStartSymbol(symbol) => {
				write!(f, "Start symbol '{}' is not a non-terminal symbol", symbol)
			}
		}
	}
}

impl error::Error for GrammarError {}

/// Tokens used when reading productions from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionSyntax {
	/// Separators between head and body. The first one found in a line is used.
	pub arrows: Vec<String>,
	/// Separator between alternative bodies.
	pub alternative: char,
}

impl Default for ProductionSyntax {
	fn default() -> Self {
		Self {
			arrows: vec!["->".into(), "🠖".into(), "→".into()],
			alternative: '|',
		}
	}
}

impl ProductionSyntax {
	/// Splits a line at the earliest arrow.
	fn split<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
		self.arrows
			.iter()
			.filter(|arrow| !arrow.is_empty())
			.filter_map(|arrow| line.find(arrow.as_str()).map(|index| (index, arrow.len())))
			.min()
			.map(|(index, length)| (&line[..index], &line[index + length..]))
	}
}

/// A single production `head -> body`. An empty body produces the empty word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductionRule {
	pub head: char,
	pub body: Vec<char>,
}

impl ProductionRule {
	pub fn new<B>(head: char, body: B) -> Self
	where
		B: AsRef<str>,
	{
		Self {
			head,
			body: body.as_ref().chars().collect(),
		}
	}

	/// Parses a line such as `S -> aSb | ab` into one rule per alternative.
	/// Whitespace is not significant.
	pub fn parse(line: &str, syntax: &ProductionSyntax) -> Result<Vec<Self>, GrammarError> {
		let malformed = || GrammarError::MalformedProduction(line.to_owned());
		let (head, body) = syntax.split(line).ok_or_else(malformed)?;

		let mut head = head.chars().filter(|c| !c.is_whitespace());
		let head = match (head.next(), head.next()) {
			(Some(head), None) => head,
			_ => return Err(malformed()),
		};

		Ok(body
			.split(syntax.alternative)
			.map(|alternative| Self {
				head,
				body: alternative.chars().filter(|c| !c.is_whitespace()).collect(),
			})
			.collect())
	}

	pub fn is_empty(&self) -> bool {
		self.body.is_empty()
	}
}

impl fmt::Display for ProductionRule {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} -> ", self.head)?;
		if self.body.is_empty() {
			write!(f, "ε")
		} else {
			write!(f, "{}", self.body.iter().collect::<String>())
		}
	}
}

/// Ordered list of productions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductionList {
	rules: Vec<ProductionRule>,
}

impl ProductionList {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses one production line per line of text.
	/// Blank lines are ignored and malformed lines are skipped with a warning.
	pub fn parse(text: &str, syntax: &ProductionSyntax) -> Self {
		let mut list = Self::new();
		for line in text.lines().filter(|line| !line.trim().is_empty()) {
			match ProductionRule::parse(line, syntax) {
				Ok(rules) => list.extend(rules),
				Err(error) => warn!("Skipping line: {}", error),
			}
		}
		list
	}

	pub fn push(&mut self, rule: ProductionRule) {
		self.rules.push(rule);
	}

	/// Rules with the given head, in order.
	pub fn for_symbol(&self, head: char) -> impl Iterator<Item = &ProductionRule> {
		self.rules.iter().filter(move |rule| rule.head == head)
	}

	pub fn iter(&self) -> impl Iterator<Item = &ProductionRule> {
		self.rules.iter()
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}
}

impl Extend<ProductionRule> for ProductionList {
	fn extend<I>(&mut self, rules: I)
	where
		I: IntoIterator<Item = ProductionRule>,
	{
		self.rules.extend(rules);
	}
}

impl fmt::Display for ProductionList {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let rules: Vec<String> = self.rules.iter().map(ToString::to_string).collect();
		write!(f, "{}", rules.join(", "))
	}
}

/// A context-free grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
	non_terminals: BTreeSet<char>,
	terminals: BTreeSet<char>,
	start: char,
	productions: ProductionList,
}

impl Grammar {
	/// Creates a grammar from explicit symbol sets.
	/// Returns a `GrammarError::UnknownStartSymbol` error if `start` is not a non-terminal.
	pub fn new<N, T>(
		non_terminals: N,
		terminals: T,
		start: char,
		productions: ProductionList,
	) -> Result<Self, GrammarError>
	where
		N: IntoIterator<Item = char>,
		T: IntoIterator<Item = char>,
	{
		let non_terminals: BTreeSet<char> = non_terminals.into_iter().collect();
		if !non_terminals.contains(&start) {
			return Err(GrammarError::UnknownStartSymbol(start));
		}
		Ok(Self {
			non_terminals,
			terminals: terminals.into_iter().collect(),
			start,
			productions,
		})
	}

	/// Creates a grammar whose non-terminals are the heads of its rules.
	/// Every other symbol in a body is a terminal.
	pub fn from_productions(start: char, productions: ProductionList) -> Result<Self, GrammarError> {
		let non_terminals: BTreeSet<char> = productions.iter().map(|rule| rule.head).collect();
		let terminals: BTreeSet<char> = productions
			.iter()
			.flat_map(|rule| rule.body.iter().copied())
			.filter(|symbol| !non_terminals.contains(symbol))
			.collect();
		Self::new(non_terminals, terminals, start, productions)
	}

	pub fn non_terminals(&self) -> &BTreeSet<char> {
		&self.non_terminals
	}

	pub fn terminals(&self) -> &BTreeSet<char> {
		&self.terminals
	}

	pub fn start(&self) -> char {
		self.start
	}

	pub fn productions(&self) -> &ProductionList {
		&self.productions
	}

	pub fn is_terminal(&self, symbol: char) -> bool {
		self.terminals.contains(&symbol)
	}

	pub fn is_non_terminal(&self, symbol: char) -> bool {
		self.non_terminals.contains(&symbol)
	}
}

fn join(symbols: &BTreeSet<char>) -> String {
	let symbols: Vec<String> = symbols.iter().map(char::to_string).collect();
	symbols.join(", ")
}

impl fmt::Display for Grammar {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let lines = [
			"Grammar".to_owned(),
			format!("{:<22}{}", "Non-terminal symbols:", join(&self.non_terminals)),
			format!("{:<22}{}", "Terminal symbols:", join(&self.terminals)),
			format!("{:<22}{}", "Starting symbol:", self.start),
			"Productions".to_owned(),
			self.productions.to_string(),
		];
		let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or_default();
		let divider = format!("+{}+", "-".repeat(width + 2));

		writeln!(f, "{}", divider)?;
		for (index, line) in lines.iter().enumerate() {
			writeln!(f, "| {:<width$} |", line, width = width)?;
			if index == 0 || index == 3 || index == 5 {
				writeln!(f, "{}", divider)?;
			}
		}
		Ok(())
	}
}
