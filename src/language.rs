use itertools::Itertools;
use std::{cmp::Ordering, collections::BTreeSet, fmt, iter::FromIterator, ops::Mul};

/// A finite set of words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Language {
	words: BTreeSet<String>,
}

impl Language {
	pub fn new<I, T>(words: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<String>,
	{
		words.into_iter().map(Into::into).collect()
	}

	/// The language holding only the empty word.
	pub fn empty_word() -> Self {
		Self::new(Some(""))
	}

	pub fn contains(&self, word: &str) -> bool {
		self.words.contains(word)
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	/// Words sorted by length, then lexicographically.
	pub fn words(&self) -> Vec<&str> {
		self.words
			.iter()
			.map(String::as_str)
			.sorted_by(|a, b| shortlex(a, b))
			.collect()
	}

	/// Every word of `self` followed by every word of `other`.
	pub fn concat(&self, other: &Self) -> Self {
		self.words
			.iter()
			.cartesian_product(&other.words)
			.map(|(prefix, suffix)| format!("{}{}", prefix, suffix))
			.collect()
	}

	/// Concatenates the language with itself `n` times. The zeroth power holds the empty word.
	pub fn power(&self, n: usize) -> Self {
		(0..n).fold(Self::empty_word(), |power, _| power.concat(self))
	}
}

fn shortlex(a: &str, b: &str) -> Ordering {
	a.chars()
		.count()
		.cmp(&b.chars().count())
		.then_with(|| a.cmp(b))
}

impl<T> FromIterator<T> for Language
where
	T: Into<String>,
{
	fn from_iter<I>(words: I) -> Self
	where
		I: IntoIterator<Item = T>,
	{
		Self {
			words: words.into_iter().map(Into::into).collect(),
		}
	}
}

impl<'a> Mul for &'a Language {
	type Output = Language;

	fn mul(self, other: Self) -> Language {
		self.concat(other)
	}
}

impl fmt::Display for Language {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{{{}}}", self.words().join(", "))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn concat() {
		let a = Language::new(vec!["a", "b"]);
		let b = Language::new(vec!["", "c"]);
		assert_eq!(Language::new(vec!["a", "ac", "b", "bc"]), &a * &b);
		assert_eq!(Language::new(vec!["a", "b", "ca", "cb"]), b.concat(&a));
		assert!((&a * &Language::default()).is_empty(), "Concatenation with empty language");
	}

	#[test]
	fn power() {
		let binary = Language::new(vec!["0", "1"]);
		assert_eq!(Language::empty_word(), binary.power(0));
		assert_eq!(binary, binary.power(1));
		let cube = binary.power(3);
		assert_eq!(8, cube.len());
		assert!(cube.contains("010"));
		assert!(!cube.contains("01"));
	}

	#[test]
	fn display() {
		let language = Language::new(vec!["ba", "b", "", "ab", "a"]);
		assert_eq!("{, a, b, ab, ba}", language.to_string());
		assert_eq!("{}", Language::default().to_string());
	}
}
