use std::collections::HashMap;
use std::iter::repeat_n;
use std::panic::resume_unwind;
use std::thread;

use log::debug;

use super::charlm::CharLm;
use super::config::ModelConfig;
use super::state::State;
use crate::error::{CharLmError, Result};

/// Character written in place of any literal sentinel found in the corpus.
pub const SUBSTITUTE_CHAR: char = '-';

/// Number of chunks per CPU used by `train_parallel`.
const CHUNK_FACTOR: usize = 8;

/// Accumulates (history, next character) counts from corpus lines.
///
/// # Responsibilities
/// - Clean each line (trim, sentinel rewrite, skip empty lines)
/// - Pad the line with `order` sentinels on both sides
/// - Count every window of `order + 1` characters
/// - Merge with another trainer of the same order and sentinel
/// - Normalize the counts into a `CharLm`
///
/// # Invariants
/// - `order >= 1`
/// - `sentinel != SUBSTITUTE_CHAR`
/// - Every key of `states` holds exactly `order` characters
#[derive(Debug)]
pub struct Trainer {
	order: usize,
	sentinel: char,
	states: HashMap<String, State>,
	nb_lines: usize,
}

impl Trainer {
	/// Creates an empty trainer.
	///
	/// # Errors
	/// - `InvalidOrder` if `order == 0`
	/// - `InvalidSentinel` if `sentinel` is the substitute character
	pub fn new(order: usize, sentinel: char) -> Result<Self> {
		ModelConfig { order, sentinel }.validate()?;
		Ok(Self::empty(order, sentinel))
	}

	fn empty(order: usize, sentinel: char) -> Self {
		Self {
			order,
			sentinel,
			states: HashMap::new(),
			nb_lines: 0,
		}
	}

	/// Number of non-empty lines counted so far.
	pub fn nb_lines(&self) -> usize {
		self.nb_lines
	}

	/// Adds one raw corpus line.
	///
	/// # Notes
	/// - Leading and trailing whitespace is trimmed.
	/// - Lines that are empty after trimming are ignored entirely.
	/// - UTF-8 safe: windows are taken over characters, not bytes.
	pub fn add_line(&mut self, line: &str) {
		let line = line.trim();
		if line.is_empty() {
			return;
		}

		let sentinel = self.sentinel;
		let mut padded: Vec<char> = Vec::with_capacity(line.len() + 2 * self.order);
		padded.extend(repeat_n(sentinel, self.order));
		padded.extend(line.chars().map(|c| if c == sentinel { SUBSTITUTE_CHAR } else { c }));
		padded.extend(repeat_n(sentinel, self.order));

		for window in padded.windows(self.order + 1) {
			let (history, next) = window.split_at(self.order);
			let key: String = history.iter().collect();
			self.states
				.entry(key)
				.or_insert_with_key(|key| State::new(key))
				.add_transition(next[0], 1);
		}

		self.nb_lines += 1;
	}

	/// Adds every line of `lines`, in order.
	pub fn add_lines<I, S>(&mut self, lines: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for line in lines {
			self.add_line(line.as_ref());
		}
	}

	/// Merges the counts of `other` into this trainer.
	///
	/// Merging partial trainers in corpus order yields the same counts and
	/// the same transition order as a single sequential pass.
	///
	/// # Errors
	/// Returns an error if the orders or sentinels differ.
	pub fn merge(&mut self, other: Trainer) -> Result<()> {
		if self.order != other.order {
			return Err(CharLmError::OrderMismatch(self.order, other.order));
		}
		if self.sentinel != other.sentinel {
			return Err(CharLmError::SentinelMismatch(self.sentinel, other.sentinel));
		}

		for (key, state) in other.states {
			match self.states.get_mut(&key) {
				Some(existing) => existing.merge(state),
				None => {
					self.states.insert(key, state);
				}
			}
		}
		self.nb_lines += other.nb_lines;

		Ok(())
	}

	/// Normalizes the accumulated counts and returns the immutable model.
	pub fn finish(self) -> CharLm {
		debug!(
			"trained order {} model on {} lines: {} histories",
			self.order,
			self.nb_lines,
			self.states.len()
		);

		let table = self
			.states
			.into_iter()
			.map(|(key, state)| (key, state.normalize()))
			.collect();

		CharLm::from_parts(self.order, self.sentinel, table)
	}
}

/// Trains a model from a sequence of corpus lines in a single pass.
pub fn train<I, S>(lines: I, order: usize, sentinel: char) -> Result<CharLm>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut trainer = Trainer::new(order, sentinel)?;
	trainer.add_lines(lines);
	Ok(trainer.finish())
}

/// Trains a model from an in-memory corpus using one thread per chunk.
///
/// # Behavior
/// - Splits lines into chunks (based on CPU cores * factor).
/// - Counts each chunk on its own scoped thread.
/// - Merges the partial counts in chunk order, so the resulting model is
///   identical to the one produced by `train`.
pub fn train_parallel<S>(lines: &[S], order: usize, sentinel: char) -> Result<CharLm>
where
	S: AsRef<str> + Sync,
{
	let mut trainer = Trainer::new(order, sentinel)?;
	if lines.is_empty() {
		return Ok(trainer.finish());
	}

	let chunks = num_cpus::get() * CHUNK_FACTOR;
	let chunk_size = lines.len().div_ceil(chunks);

	let partials: Vec<Trainer> = thread::scope(|scope| {
		let handles: Vec<_> = lines
			.chunks(chunk_size)
			.map(|chunk| {
				scope.spawn(move || {
					let mut partial = Trainer::empty(order, sentinel);
					partial.add_lines(chunk);
					partial
				})
			})
			.collect();

		handles
			.into_iter()
			.map(|handle| handle.join().unwrap_or_else(|panic| resume_unwind(panic)))
			.collect()
	});

	for partial in partials {
		trainer.merge(partial)?;
	}

	Ok(trainer.finish())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_new_rejects_zero_order() {
		assert!(matches!(Trainer::new(0, '~'), Err(CharLmError::InvalidOrder(0))));
	}

	#[test]
	fn test_new_rejects_substitute_sentinel() {
		assert!(matches!(
			Trainer::new(2, SUBSTITUTE_CHAR),
			Err(CharLmError::InvalidSentinel('-'))
		));
	}

	#[test]
	fn test_add_line_counts_windows() {
		let mut trainer = Trainer::new(2, '~').unwrap();
		trainer.add_line("ab");

		// "~~ab~~" has 4 windows of width 3
		assert_eq!(trainer.states.len(), 4);
		assert_eq!(trainer.nb_lines(), 1);
	}

	#[test]
	fn test_add_line_skips_blank_lines() {
		let mut trainer = Trainer::new(3, '~').unwrap();
		trainer.add_line("");
		trainer.add_line("   \t");
		assert_eq!(trainer.nb_lines(), 0);
		assert!(trainer.finish().is_empty());
	}

	#[test]
	fn test_merge_rejects_mismatch() {
		let mut left = Trainer::new(2, '~').unwrap();
		let right = Trainer::new(3, '~').unwrap();
		assert!(matches!(left.merge(right), Err(CharLmError::OrderMismatch(2, 3))));

		let right = Trainer::new(2, '#').unwrap();
		assert!(matches!(left.merge(right), Err(CharLmError::SentinelMismatch('~', '#'))));
	}

	#[test]
	fn test_train_parallel_matches_sequential() {
		let lines: Vec<String> = (0..500)
			.map(|i| format!("line {} says {}", i, "abcdefghij".repeat(i % 7)))
			.collect();

		let sequential = train(&lines, 3, '~').unwrap();
		let parallel = train_parallel(&lines, 3, '~').unwrap();
		assert_eq!(sequential, parallel);
	}

	#[test]
	fn test_train_parallel_empty_corpus() {
		let lines: Vec<String> = Vec::new();
		let model = train_parallel(&lines, 2, '~').unwrap();
		assert!(model.is_empty());
	}
}
