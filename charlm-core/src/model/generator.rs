use rand::Rng;

use super::charlm::{CharLm, last_n_chars};
use crate::error::Result;

/// One generation run over a trained model.
///
/// Holds the sliding history window and the raw output (sentinels
/// included). Each run owns its own state; the model is only borrowed.
///
/// # Invariants
/// - `history` starts as `order` sentinels and always holds the trailing
///   `order` characters of the sequence sampled so far
#[derive(Debug)]
pub struct Generator<'m> {
	model: &'m CharLm,
	history: String,
	output: String,
}

impl<'m> Generator<'m> {
	/// Starts a run from the sentinel-padded history.
	pub fn new(model: &'m CharLm) -> Self {
		Self {
			model,
			history: model.start_history(),
			output: String::new(),
		}
	}

	/// Current history window.
	pub fn history(&self) -> &str {
		&self.history
	}

	/// Raw output so far, sentinels not yet translated.
	pub fn raw_output(&self) -> &str {
		&self.output
	}

	/// Samples one character and slides the history window by one.
	///
	/// # Errors
	/// Propagates `HistoryNotFound` / `EmptyDistribution` from the model.
	/// The run state is left untouched on error.
	pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<char> {
		let c = self.model.generate_letter(&self.history, rng)?;

		self.history.push(c);
		let keep = last_n_chars(&self.history, self.model.order()).len();
		let cut = self.history.len() - keep;
		self.history.drain(..cut);

		self.output.push(c);
		Ok(c)
	}

	/// Ends the run, replacing each run of `order` sentinels with `\n`.
	///
	/// Runs are matched left to right without overlap.
	pub fn finish(self) -> String {
		self.output.replace(&self.model.start_history(), "\n")
	}
}

/// Generates `n_letters` characters from `model`.
///
/// # Behavior
/// - Starts from `order` sentinels.
/// - At each step samples the next character from the distribution of
///   the current history, then slides the window.
/// - Finally replaces each run of `order` sentinels with a line break.
///
/// # Errors
/// Returns `HistoryNotFound` if a history is missing from the table
/// (only possible for an empty model). No partial text is returned.
pub fn generate<R: Rng + ?Sized>(model: &CharLm, n_letters: usize, rng: &mut R) -> Result<String> {
	let mut generator = Generator::new(model);
	for _ in 0..n_letters {
		generator.step(rng)?;
	}
	Ok(generator.finish())
}
