use std::collections::HashMap;
use std::iter::repeat_n;

use rand::Rng;

use serde::{Deserialize, Serialize};

use super::distribution::Distribution;
use super::generator;
use super::trainer;
use crate::error::{CharLmError, Result};

/// Fixed-order character language model.
///
/// Maps every history of `order` characters observed in the padded
/// training corpus to the distribution of the character that followed it.
///
/// # Responsibilities
/// - Expose the trained table (read-only)
/// - Sample the next character for a given history
/// - Generate text through `generator::generate`
///
/// # Invariants
/// - `order >= 1`, fixed at construction
/// - Each key of `table` holds exactly `order` characters
/// - The table is sparse: unseen histories are absent
/// - Immutable once built, so it can be shared across threads without locks
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CharLm {
	/// History length.
	order: usize,

	/// Boundary character used for padding.
	sentinel: char,

	/// Mapping from a history to its next-character distribution.
	table: HashMap<String, Distribution>,
}

impl CharLm {
	pub(crate) fn from_parts(order: usize, sentinel: char, table: HashMap<String, Distribution>) -> Self {
		Self { order, sentinel, table }
	}

	/// Trains a model from corpus lines in a single pass.
	///
	/// # Errors
	/// - `InvalidOrder` if `order == 0`
	/// - `InvalidSentinel` if `sentinel` is the substitute character
	///
	/// # Notes
	/// - A corpus without any non-empty line yields an empty model; the
	///   first generation step on it fails with `HistoryNotFound`.
	pub fn train<I, S>(lines: I, order: usize, sentinel: char) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		trainer::train(lines, order, sentinel)
	}

	/// Same as `train`, counting chunks of the corpus on several threads.
	pub fn train_parallel<S>(lines: &[S], order: usize, sentinel: char) -> Result<Self>
	where
		S: AsRef<str> + Sync,
	{
		trainer::train_parallel(lines, order, sentinel)
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn sentinel(&self) -> char {
		self.sentinel
	}

	/// Number of distinct histories in the table.
	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// The history generation starts from: `order` sentinels.
	pub fn start_history(&self) -> String {
		repeat_n(self.sentinel, self.order).collect()
	}

	/// Returns the distribution following `history`, if it was observed.
	pub fn distribution(&self, history: &str) -> Option<&Distribution> {
		self.table.get(history)
	}

	/// Iterates over all `(history, distribution)` entries.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Distribution)> {
		self.table.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Samples the character following `history`.
	///
	/// Only the trailing `order` characters of `history` are used as key.
	///
	/// # Errors
	/// - `HistoryNotFound` if the key was never observed during training
	/// - `EmptyDistribution` if the entry holds no transitions
	pub fn generate_letter<R: Rng + ?Sized>(&self, history: &str, rng: &mut R) -> Result<char> {
		let key = last_n_chars(history, self.order);
		let distribution = self
			.table
			.get(key)
			.ok_or_else(|| CharLmError::HistoryNotFound(key.to_owned()))?;

		distribution
			.sample(rng)
			.ok_or_else(|| CharLmError::EmptyDistribution(key.to_owned()))
	}

	/// Generates `n_letters` characters and turns sentinel runs into line breaks.
	///
	/// See `generator::generate`.
	pub fn generate<R: Rng + ?Sized>(&self, n_letters: usize, rng: &mut R) -> Result<String> {
		generator::generate(self, n_letters, rng)
	}
}

/// Returns the last `n` characters of a string.
///
/// If `n` is greater than the number of characters in `s`, the entire
/// string is returned. UTF-8 safe.
pub(crate) fn last_n_chars(s: &str, n: usize) -> &str {
	if n == 0 {
		return &s[s.len()..];
	}
	match s.char_indices().rev().nth(n - 1) {
		Some((index, _)) => &s[index..],
		None => s,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn test_last_n_chars() {
		assert_eq!(last_n_chars("abcdef", 3), "def");
		assert_eq!(last_n_chars("ab", 5), "ab");
		assert_eq!(last_n_chars("héllo", 4), "éllo");
		assert_eq!(last_n_chars("abc", 0), "");
	}

	#[test]
	fn test_start_history() {
		let model = CharLm::train(["abc"], 3, '#').unwrap();
		assert_eq!(model.start_history(), "###");
	}

	#[test]
	fn test_generate_letter_uses_trailing_window() {
		let model = CharLm::train(["ab"], 1, '~').unwrap();
		let mut rng = StdRng::seed_from_u64(1);
		// Only the last character "a" is used as key
		assert_eq!(model.generate_letter("zzza", &mut rng).unwrap(), 'b');
	}

	#[test]
	fn test_generate_letter_unknown_history() {
		let model = CharLm::train(["ab"], 2, '~').unwrap();
		let mut rng = StdRng::seed_from_u64(1);
		let err = model.generate_letter("zz", &mut rng).unwrap_err();
		assert!(matches!(err, CharLmError::HistoryNotFound(h) if h == "zz"));
	}

	#[test]
	fn test_generate_letter_empty_distribution() {
		let mut table = HashMap::new();
		table.insert("~".to_owned(), Distribution::from_counts(&[]));
		let model = CharLm::from_parts(1, '~', table);
		let mut rng = StdRng::seed_from_u64(1);
		assert!(matches!(
			model.generate_letter("~", &mut rng),
			Err(CharLmError::EmptyDistribution(_))
		));
	}
}
