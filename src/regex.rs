//! Conversion of regular expressions from infix to postfix notation.

use std::{collections::HashMap, error, fmt};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fixity {
	/// Binary and left-associative.
	Infix,
	/// Unary, applied to the operand before it.
	Postfix,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operator {
	pub precedence: u8,
	pub fixity: Fixity,
}

/// Operators known to [`to_postfix`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorTable {
	operators: HashMap<char, Operator>,
	concatenation: char,
}

impl Default for OperatorTable {
	/// `+` for union, `,` for concatenation and `*` for the Kleene star, in rising precedence.
	fn default() -> Self {
		let mut table = Self::new(',', 3);
		table.insert('+', 2, Fixity::Infix);
		table.insert('*', 4, Fixity::Postfix);
		table
	}
}

impl OperatorTable {
	/// Creates a table holding only the concatenation operator.
	/// Concatenation is inserted between adjacent operands when it is not written out.
	pub fn new(concatenation: char, precedence: u8) -> Self {
		let mut operators = HashMap::new();
		operators.insert(
			concatenation,
			Operator {
				precedence,
				fixity: Fixity::Infix,
			},
		);
		Self {
			operators,
			concatenation,
		}
	}

	pub fn insert(&mut self, symbol: char, precedence: u8, fixity: Fixity) {
		self.operators.insert(symbol, Operator { precedence, fixity });
	}

	pub fn get(&self, symbol: char) -> Option<&Operator> {
		self.operators.get(&symbol)
	}

	pub fn concatenation(&self) -> char {
		self.concatenation
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
	UnbalancedParentheses,
	UnexpectedToken { token: char, position: usize },
	UnexpectedEnd,
}

impl fmt::Display for RegexError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::UnbalancedParentheses => write!(f, "Unbalanced parentheses"),
			Self::UnexpectedToken { token, position } => {
				write!(f, "Unexpected '{}' at position {}", token, position)
			}
			Self::UnexpectedEnd => write!(f, "Expression ends where an operand is expected"),
		}
	}
}

impl error::Error for RegexError {}

enum Entry {
	Operator(char, u8),
	Group,
}

/// Pops operators binding at least as tightly as `precedence` into the output.
fn reduce(stack: &mut Vec<Entry>, output: &mut String, precedence: u8) {
	while let Some(Entry::Operator(symbol, top)) = stack.last() {
		if *top < precedence {
			break;
		}
		output.push(*symbol);
		stack.pop();
	}
}

/// Converts an infix regular expression into postfix notation using the shunting yard algorithm.
///
/// Operands are alphanumeric characters and whitespace is skipped.
/// For example `(a+b)*c` becomes `ab+*c,` with the default table.
pub fn to_postfix(infix: &str, table: &OperatorTable) -> Result<String, RegexError> {
	let mut output = String::new();
	let mut stack = Vec::new();
	// whether the next token has to start an operand
	let mut expect_operand = true;

	for (position, token) in infix.chars().enumerate() {
		if token.is_whitespace() {
			continue;
		}
		let unexpected = RegexError::UnexpectedToken { token, position };

		if token.is_alphanumeric() || token == '(' {
			if !expect_operand {
				let concatenation = table.concatenation();
				if let Some(operator) = table.get(concatenation) {
					reduce(&mut stack, &mut output, operator.precedence);
					stack.push(Entry::Operator(concatenation, operator.precedence));
				}
			}
			if token == '(' {
				stack.push(Entry::Group);
				expect_operand = true;
			} else {
				output.push(token);
				expect_operand = false;
			}
		} else if token == ')' {
			if expect_operand {
				return Err(unexpected);
			}
			loop {
				match stack.pop() {
					Some(Entry::Operator(symbol, _)) => output.push(symbol),
					Some(Entry::Group) => break,
					None => return Err(RegexError::UnbalancedParentheses),
				}
			}
		} else {
			let operator = match table.get(token) {
				Some(operator) if !expect_operand => *operator,
				_ => return Err(unexpected),
			};
			match operator.fixity {
				Fixity::Postfix => output.push(token),
				Fixity::Infix => {
					reduce(&mut stack, &mut output, operator.precedence);
					stack.push(Entry::Operator(token, operator.precedence));
					expect_operand = true;
				}
			}
		}
	}

	if expect_operand {
		return Err(RegexError::UnexpectedEnd);
	}
	while let Some(entry) = stack.pop() {
		match entry {
			Entry::Operator(symbol, _) => output.push(symbol),
			Entry::Group => return Err(RegexError::UnbalancedParentheses),
		}
	}
	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn postfix(infix: &str) -> Result<String, RegexError> {
		to_postfix(infix, &OperatorTable::default())
	}

	#[test]
	fn convert() {
		assert_eq!(Ok("aa*,".to_owned()), postfix("aa*"));
		assert_eq!(Ok("ab+".to_owned()), postfix("a+b"));
		assert_eq!(Ok("ab+*c,".to_owned()), postfix("(a+b)*c"));
		assert_eq!(Ok("abc,+".to_owned()), postfix("a+bc"));
		assert_eq!(Ok("ab,c,".to_owned()), postfix("a,b c"), "Concatenation not left-associative");
		assert_eq!(Ok("a**".to_owned()), postfix("a**"));
		assert_eq!(Ok("ab*c,+d,".to_owned()), postfix("(a + b*c) d"));
	}

	#[test]
	fn parentheses() {
		assert_eq!(Err(RegexError::UnbalancedParentheses), postfix("(a+b"));
		assert_eq!(Err(RegexError::UnbalancedParentheses), postfix("a+b)"));
		assert_eq!(
			Err(RegexError::UnexpectedToken {
				token: ')',
				position: 1
			}),
			postfix("()")
		);
	}

	#[test]
	fn unexpected() {
		assert_eq!(
			Err(RegexError::UnexpectedToken {
				token: '+',
				position: 0
			}),
			postfix("+a")
		);
		assert_eq!(
			Err(RegexError::UnexpectedToken {
				token: '?',
				position: 1
			}),
			postfix("a?")
		);
		assert_eq!(Err(RegexError::UnexpectedEnd), postfix("a+"));
		assert_eq!(Err(RegexError::UnexpectedEnd), postfix(""));
	}

	#[test]
	fn custom_table() {
		let mut table = OperatorTable::new('.', 2);
		table.insert('|', 1, Fixity::Infix);
		table.insert('?', 3, Fixity::Postfix);
		assert_eq!(Ok("ab?.c|".to_owned()), to_postfix("ab?|c", &table));
	}
}
