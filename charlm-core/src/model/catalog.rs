use std::collections::HashMap;
use std::path::Path;

use log::info;

use super::charlm::CharLm;
use super::config::{GenerationInput, ModelConfig};
use super::store;
use crate::error::{CharLmError, Result};
use crate::io;

/// Extension of corpus files picked up by `ModelCatalog::from_dir`.
pub const CORPUS_EXTENSION: &str = "txt";

/// Named collection of trained models.
///
/// # Responsibilities
/// - Load every corpus of a directory (through the postcard cache)
/// - Look models up by name (the corpus file stem)
/// - Run a generation on a named model
///
/// All models of a catalog share the same `ModelConfig`.
#[derive(Debug)]
pub struct ModelCatalog {
	config: ModelConfig,
	models: HashMap<String, CharLm>,
}

impl ModelCatalog {
	/// Creates an empty catalog.
	///
	/// # Errors
	/// Returns an error if `config` is invalid.
	pub fn new(config: ModelConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self { config, models: HashMap::new() })
	}

	/// Creates a catalog by loading all `.txt` corpora from a directory.
	///
	/// # Parameters
	/// - `dir`: Path to a directory containing corpus files.
	///   Both `"folder"` and `"folder/"` are accepted.
	///
	/// # Errors
	/// - Returns an error if the path does not exist or is not a directory.
	/// - Returns an error if a corpus fails to load or train.
	///
	/// # Notes
	/// - Only files directly contained in the directory are loaded
	///   (subdirectories are ignored).
	pub fn from_dir<P: AsRef<Path>>(dir: P, config: ModelConfig) -> Result<Self> {
		let mut catalog = Self::new(config)?;

		let string_path = dir
			.as_ref()
			.to_str()
			.ok_or_else(|| CharLmError::InvalidPath(dir.as_ref().display().to_string()))?;
		let folder = io::normalize_folder(string_path);

		if !folder.is_dir() {
			return Err(CharLmError::InvalidPath(format!(
				"expected a directory, got: {}",
				folder.display()
			)));
		}

		for file in io::list_files(&folder, CORPUS_EXTENSION)? {
			catalog.load(folder.join(&file))?;
		}

		Ok(catalog)
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	/// Loads (or trains) the model of one corpus file.
	///
	/// The model name is the file name without extension.
	///
	/// # Errors
	/// Returns an error if the name is already loaded or if I/O fails.
	pub fn load<P: AsRef<Path>>(&mut self, corpus_path: P) -> Result<()> {
		let name = io::get_filename(&corpus_path)?;
		if self.models.contains_key(&name) {
			return Err(CharLmError::ModelAlreadyLoaded(name));
		}

		let model = store::load_or_train(&corpus_path, &self.config)?;
		info!("loaded model {name} ({} histories)", model.len());
		self.models.insert(name, model);
		Ok(())
	}

	/// Registers an already trained model under `name`.
	///
	/// # Errors
	/// Returns an error if the name is taken or if the model was trained
	/// with another order or sentinel than the catalog's config.
	pub fn insert(&mut self, name: &str, model: CharLm) -> Result<()> {
		if model.order() != self.config.order {
			return Err(CharLmError::OrderMismatch(self.config.order, model.order()));
		}
		if model.sentinel() != self.config.sentinel {
			return Err(CharLmError::SentinelMismatch(self.config.sentinel, model.sentinel()));
		}
		if self.models.contains_key(name) {
			return Err(CharLmError::ModelAlreadyLoaded(name.to_owned()));
		}
		self.models.insert(name.to_owned(), model);
		Ok(())
	}

	/// Returns the loaded model names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.models.keys().cloned().collect();
		names.sort();
		names
	}

	pub fn len(&self) -> usize {
		self.models.len()
	}

	pub fn is_empty(&self) -> bool {
		self.models.is_empty()
	}

	/// Returns the model registered under `name`.
	pub fn get(&self, name: &str) -> Result<&CharLm> {
		self.models
			.get(name)
			.ok_or_else(|| CharLmError::ModelNotFound(name.to_owned()))
	}

	/// Generates text with the model registered under `name`.
	pub fn generate(&self, name: &str, input: &GenerationInput) -> Result<String> {
		let model = self.get(name)?;
		model.generate(input.n_letters, &mut input.rng())
	}
}
