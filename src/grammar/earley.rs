use super::{Grammar, ProductionRule};
use log::trace;
use std::collections::HashSet;

/// A rule with a dot position, started at `origin`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Item {
	rule: usize,
	dot: usize,
	origin: usize,
}

impl Item {
	fn advance(self) -> Self {
		Self {
			dot: self.dot + 1,
			..self
		}
	}
}

#[derive(Debug, Default)]
struct Set {
	items: Vec<Item>,
	seen: HashSet<Item>,
}

impl Set {
	fn add(&mut self, item: Item) {
		if self.seen.insert(item) {
			self.items.push(item);
		}
	}
}

/// Earley recognizer for a grammar.
///
/// The start symbol is wrapped in an extra rule that only the recognizer knows about, so the
/// grammar itself is left untouched.
#[derive(Debug)]
pub struct Earley<'a> {
	grammar: &'a Grammar,
	rules: Vec<&'a ProductionRule>,
	start: [char; 1],
	nullable: HashSet<char>,
}

impl<'a> Earley<'a> {
	pub fn new(grammar: &'a Grammar) -> Self {
		Self {
			grammar,
			rules: grammar.productions().iter().collect(),
			start: [grammar.start()],
			nullable: Self::nullable(grammar),
		}
	}

	/// Non-terminals deriving the empty word.
	fn nullable(grammar: &Grammar) -> HashSet<char> {
		let mut nullable = HashSet::new();
		loop {
			let before = nullable.len();
			for rule in grammar.productions().iter() {
				if rule.body.iter().all(|symbol| nullable.contains(symbol)) {
					nullable.insert(rule.head);
				}
			}
			if nullable.len() == before {
				return nullable;
			}
		}
	}

	/// The augmented rule sits right after the grammar's own rules.
	fn augmented(&self) -> usize {
		self.rules.len()
	}

	fn body(&self, rule: usize) -> &[char] {
		match self.rules.get(rule) {
			Some(rule) => &rule.body,
			None => &self.start,
		}
	}

	fn head(&self, rule: usize) -> Option<char> {
		self.rules.get(rule).map(|rule| rule.head)
	}

	/// Checks whether the start symbol derives the word. Whitespace in the word is ignored.
	pub fn recognizes(&self, word: &str) -> bool {
		let word: Vec<char> = word.chars().filter(|c| !c.is_whitespace()).collect();
		let mut chart: Vec<Set> = (0..=word.len()).map(|_| Set::default()).collect();
		let accept = Item {
			rule: self.augmented(),
			dot: 0,
			origin: 0,
		};
		chart[0].add(accept);

		for position in 0..=word.len() {
			let mut next = 0;
			while next < chart[position].items.len() {
				let item = chart[position].items[next];
				next += 1;
				match self.body(item.rule).get(item.dot) {
					Some(&symbol) if self.grammar.is_non_terminal(symbol) => {
						for (rule, _) in self
							.rules
							.iter()
							.enumerate()
							.filter(|(_, rule)| rule.head == symbol)
						{
							chart[position].add(Item {
								rule,
								dot: 0,
								origin: position,
							});
						}
						if self.nullable.contains(&symbol) {
							chart[position].add(item.advance());
						}
					}
					Some(&symbol) => {
						if word.get(position) == Some(&symbol) {
							chart[position + 1].add(item.advance());
						}
					}
					None => {
						if let Some(head) = self.head(item.rule) {
							let completed: Vec<Item> = chart[item.origin]
								.items
								.iter()
								.filter(|waiting| self.body(waiting.rule).get(waiting.dot) == Some(&head))
								.map(|waiting| waiting.advance())
								.collect();
							for waiting in completed {
								chart[position].add(waiting);
							}
						}
					}
				}
			}
			trace!("Earley set {} holds {} items", position, chart[position].items.len());
		}

		chart[word.len()].seen.contains(&accept.advance())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::grammar::{ProductionList, ProductionSyntax};
	use test_log::test;

	fn grammar(start: char, text: &str) -> Grammar {
		let list = ProductionList::parse(text, &ProductionSyntax::default());
		Grammar::from_productions(start, list).unwrap()
	}

	#[test]
	fn arithmetic() {
		let grammar = grammar('E', "E -> E+T | T\nT -> T*F | F\nF -> (E) | a");
		let earley = Earley::new(&grammar);
		assert!(earley.recognizes("a*a+a"));
		assert!(earley.recognizes("a+a*a"));
		assert!(earley.recognizes("(a + a) * a"));
		assert!(!earley.recognizes("a+*a"), "Accepted misplaced operator");
		assert!(!earley.recognizes("(a"));
		assert!(!earley.recognizes(""));
	}

	#[test]
	fn products_and_sums() {
		let grammar = grammar('E', "E -> T | E+T\nT -> P | T*P\nP -> a");
		let earley = Earley::new(&grammar);
		assert!(earley.recognizes("a*a+a"));
		assert!(earley.recognizes("a+a*a"));
		assert!(earley.recognizes("a"));
		assert!(!earley.recognizes("a+*a"), "Accepted misplaced operator");
		assert!(!earley.recognizes("a+"));
	}

	#[test]
	fn empty_productions() {
		let grammar = grammar('S', "S -> aSb |");
		let earley = Earley::new(&grammar);
		assert!(earley.recognizes(""), "Empty word rejected");
		assert!(earley.recognizes("ab"));
		assert!(earley.recognizes("aaabbb"));
		assert!(!earley.recognizes("aab"));
		assert!(!earley.recognizes("ba"));
	}

	#[test]
	fn nullable_chain() {
		let grammar = grammar('A', "A -> BBc\nB -> b |");
		assert!(Earley::new(&grammar).nullable.contains(&'B'));
		assert!(!Earley::new(&grammar).nullable.contains(&'A'));
		let earley = Earley::new(&grammar);
		for word in &["c", "bc", "bbc"] {
			assert!(earley.recognizes(word), "Rejected \"{}\"", word);
		}
		assert!(!earley.recognizes("bbbc"));
	}

	#[test]
	fn left_recursion() {
		let grammar = grammar('S', "S -> Sa | a");
		let earley = Earley::new(&grammar);
		assert!(earley.recognizes("aaaa"));
		assert!(!earley.recognizes("aab"));
	}
}
