//! Integration tests for training and generation.

use charlm_core::model::trainer::Trainer;
use charlm_core::{CharLm, CharLmError, Generator, generate};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Random source whose every draw is 0.0.
struct ZeroRng;

impl RngCore for ZeroRng {
	fn next_u32(&mut self) -> u32 {
		0
	}

	fn next_u64(&mut self) -> u64 {
		0
	}

	fn fill_bytes(&mut self, dst: &mut [u8]) {
		dst.fill(0);
	}
}

/// Random source whose every draw is just below 1.0.
struct MaxRng;

impl RngCore for MaxRng {
	fn next_u32(&mut self) -> u32 {
		u32::MAX
	}

	fn next_u64(&mut self) -> u64 {
		u64::MAX
	}

	fn fill_bytes(&mut self, dst: &mut [u8]) {
		dst.fill(0xff);
	}
}

fn entries(model: &CharLm, history: &str) -> Vec<(char, f64)> {
	model
		.distribution(history)
		.unwrap_or_else(|| panic!("history {history:?} missing"))
		.entries()
		.to_vec()
}

#[test]
fn test_single_line_order_two_table() {
	let model = CharLm::train(["ab"], 2, '~').unwrap();

	assert_eq!(entries(&model, "~~"), vec![('a', 1.0)]);
	assert_eq!(entries(&model, "~a"), vec![('b', 1.0)]);
	assert_eq!(entries(&model, "ab"), vec![('~', 1.0)]);
	assert_eq!(entries(&model, "b~"), vec![('~', 1.0)]);
	assert_eq!(model.len(), 4);
}

#[test]
fn test_literal_sentinel_is_substituted() {
	let model = CharLm::train(["a~b"], 1, '~').unwrap();

	assert_eq!(entries(&model, "~"), vec![('a', 1.0)]);
	assert_eq!(entries(&model, "a"), vec![('-', 1.0)]);
	assert_eq!(entries(&model, "-"), vec![('b', 1.0)]);
	assert_eq!(entries(&model, "b"), vec![('~', 1.0)]);
}

#[test]
fn test_two_lines_order_one_table() {
	let model = CharLm::train(["ab", "ac"], 1, '~').unwrap();

	assert_eq!(entries(&model, "~"), vec![('a', 1.0)]);
	assert_eq!(entries(&model, "a"), vec![('b', 0.5), ('c', 0.5)]);
	assert_eq!(entries(&model, "b"), vec![('~', 1.0)]);
	assert_eq!(entries(&model, "c"), vec![('~', 1.0)]);
}

#[test]
fn test_zero_draws_pick_first_entries() {
	let model = CharLm::train(["ab", "ac"], 1, '~').unwrap();

	assert_eq!(generate(&model, 3, &mut ZeroRng).unwrap(), "ab\n");
	assert_eq!(generate(&model, 6, &mut ZeroRng).unwrap(), "ab\nab\n");
}

#[test]
fn test_max_draws_pick_last_entries() {
	let model = CharLm::train(["ab", "ac"], 1, '~').unwrap();

	assert_eq!(generate(&model, 6, &mut MaxRng).unwrap(), "ac\nac\n");
}

#[test]
fn test_whitespace_is_trimmed_and_blank_lines_skipped() {
	let padded = CharLm::train(["  ab \t", "", "   "], 2, '~').unwrap();
	let plain = CharLm::train(["ab"], 2, '~').unwrap();
	assert_eq!(padded, plain);
}

#[test]
fn test_counts_are_proportional() {
	let model = CharLm::train(["aab", "aac", "aab"], 2, '~').unwrap();
	let dist = model.distribution("aa").unwrap();

	assert!((dist.probability('b').unwrap() - 2.0 / 3.0).abs() < 1e-12);
	assert!((dist.probability('c').unwrap() - 1.0 / 3.0).abs() < 1e-12);
	assert!(dist.probability('a').is_none());
}

#[test]
fn test_seeded_generation_is_reproducible() {
	let corpus = ["the quick brown fox", "jumps over", "the lazy dog", "the end"];
	let model = CharLm::train(corpus, 3, '~').unwrap();

	let first = model.generate(2_000, &mut StdRng::seed_from_u64(2024)).unwrap();
	let second = model.generate(2_000, &mut StdRng::seed_from_u64(2024)).unwrap();
	assert_eq!(first, second);
}

#[test]
fn test_generated_lines_come_from_the_corpus_alphabet() {
	let corpus = ["banana", "bandana", "cabana"];
	let model = CharLm::train(corpus, 2, '~').unwrap();

	let text = model.generate(5_000, &mut StdRng::seed_from_u64(5)).unwrap();
	assert!(text.chars().all(|c| "abcdn\n~".contains(c)));
	assert!(text.contains('\n'));
}

#[test]
fn test_unicode_corpus() {
	let model = CharLm::train(["héhé", "ça"], 2, '~').unwrap();
	assert_eq!(entries(&model, "~~"), vec![('h', 0.5), ('ç', 0.5)]);
	assert_eq!(entries(&model, "hé"), vec![('h', 0.5), ('~', 0.5)]);

	let text = model.generate(500, &mut StdRng::seed_from_u64(8)).unwrap();
	assert!(!text.is_empty());
}

#[test]
fn test_empty_corpus_fails_on_first_step() {
	let model = CharLm::train(Vec::<&str>::new(), 3, '~').unwrap();
	assert!(model.is_empty());

	let err = model.generate(1, &mut ZeroRng).unwrap_err();
	assert!(matches!(err, CharLmError::HistoryNotFound(h) if h == "~~~"));
}

#[test]
fn test_invalid_order() {
	assert!(matches!(CharLm::train(["ab"], 0, '~'), Err(CharLmError::InvalidOrder(0))));
}

#[test]
fn test_trainer_merge_equals_single_pass() {
	let mut left = Trainer::new(2, '~').unwrap();
	left.add_lines(["abc", "abd"]);
	let mut right = Trainer::new(2, '~').unwrap();
	right.add_lines(["xbc", "abe"]);
	left.merge(right).unwrap();

	let merged = left.finish();
	let single = CharLm::train(["abc", "abd", "xbc", "abe"], 2, '~').unwrap();
	assert_eq!(merged, single);
	assert_eq!(
		entries(&merged, "ab"),
		vec![('c', 1.0 / 3.0), ('d', 1.0 / 3.0), ('e', 1.0 / 3.0)]
	);
}

#[test]
fn test_generator_steps_match_generate() {
	let model = CharLm::train(["abracadabra"], 2, '~').unwrap();

	let mut rng = StdRng::seed_from_u64(77);
	let mut generator = Generator::new(&model);
	for _ in 0..300 {
		generator.step(&mut rng).unwrap();
	}
	let stepped = generator.finish();

	let generated = generate(&model, 300, &mut StdRng::seed_from_u64(77)).unwrap();
	assert_eq!(stepped, generated);
}
