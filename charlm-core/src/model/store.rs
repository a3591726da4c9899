use std::fs;
use std::path::Path;

use log::{info, warn};

use serde::{Deserialize, Serialize};

use super::charlm::CharLm;
use super::config::ModelConfig;
use crate::error::Result;
use crate::io::{build_cache_path, read_lines};

/// Cached model along with the name of the corpus it was trained on.
#[derive(Serialize, Deserialize)]
struct CacheEntry {
	corpus: String,
	model: CharLm,
}

/// Serializes a model with `postcard` and writes it to `path`.
pub fn save<P: AsRef<Path>>(model: &CharLm, path: P) -> Result<()> {
	let bytes = postcard::to_stdvec(model)?;
	fs::write(path, bytes)?;
	Ok(())
}

/// Reads a model previously written by `save`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<CharLm> {
	let bytes = fs::read(path)?;
	Ok(postcard::from_bytes(&bytes)?)
}

fn read_cache(path: &Path) -> Result<CacheEntry> {
	let bytes = fs::read(path)?;
	Ok(postcard::from_bytes(&bytes)?)
}

fn write_cache(path: &Path, entry: &CacheEntry) -> Result<()> {
	let bytes = postcard::to_stdvec(entry)?;
	fs::write(path, bytes)?;
	Ok(())
}

/// Loads the cached model of a corpus, training it first if needed.
///
/// - The cache lives next to the corpus (`<stem>.o<order>.bin`).
/// - The cache records the corpus file name; a cache written for another
///   corpus, holding another order or sentinel, or failing to decode is
///   ignored and overwritten.
/// - Training reads the whole corpus and uses `CharLm::train_parallel`.
pub fn load_or_train<P: AsRef<Path>>(corpus_path: P, config: &ModelConfig) -> Result<CharLm> {
	config.validate()?;
	let corpus_path = corpus_path.as_ref();
	let cache_path = build_cache_path(corpus_path, config.order)?;
	let corpus = corpus_path
		.file_name()
		.map(|name| name.to_string_lossy().to_string())
		.unwrap_or_default();

	if cache_path.exists() {
		match read_cache(&cache_path) {
			Ok(entry)
				if entry.corpus == corpus
					&& entry.model.order() == config.order
					&& entry.model.sentinel() == config.sentinel =>
			{
				info!("loaded cached model {}", cache_path.display());
				return Ok(entry.model);
			}
			Ok(_) => warn!("cached model {} does not match corpus or config, retraining", cache_path.display()),
			Err(e) => warn!("failed to read cached model {}: {e}, retraining", cache_path.display()),
		}
	}

	let lines = read_lines(corpus_path)?;
	let model = CharLm::train_parallel(&lines, config.order, config.sentinel)?;
	let entry = CacheEntry { corpus, model };
	write_cache(&cache_path, &entry)?;
	info!(
		"trained {} ({} histories), cached to {}",
		corpus_path.display(),
		entry.model.len(),
		cache_path.display()
	);

	Ok(entry.model)
}
