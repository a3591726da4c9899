use std::env;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware, put, web};

use charlm_core::io::list_files;
use charlm_core::model::catalog::CORPUS_EXTENSION;
use charlm_core::{CharLmError, GenerationInput, ModelCatalog, ModelConfig};
use log::{info, warn};
use serde::Deserialize;

/// Upper bound on `n_letters` accepted by `/v1/generate`.
const MAX_N_LETTERS: usize = 100_000;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	model: Option<String>,
	n_letters: Option<usize>,
	seed: Option<u64>,
}

/// Query parameters for the `/v1/load_models` endpoint
#[derive(Deserialize)]
struct ModelQuery {
	names: Option<String>,
	order: Option<usize>,
	sentinel: Option<String>,
}

struct SharedData {
	data_dir: PathBuf,
	catalog: ModelCatalog,
}

impl GenerateParams {
	/// Builds the generation input, enforcing the request size limit.
	fn input(&self) -> Result<GenerationInput, String> {
		let n_letters = self.n_letters.unwrap_or(GenerationInput::default().n_letters);
		if n_letters > MAX_N_LETTERS {
			return Err(format!("n_letters must be <= {MAX_N_LETTERS}"));
		}
		Ok(GenerationInput { n_letters, seed: self.seed })
	}

	/// Resolves the target model: explicit name, or the only loaded model.
	fn model_name(&self, catalog: &ModelCatalog) -> Result<String, String> {
		match &self.model {
			Some(name) if !name.trim().is_empty() => Ok(name.trim().to_owned()),
			_ => {
				let names = catalog.names();
				match names.as_slice() {
					[only] => Ok(only.clone()),
					[] => Err("No model loaded".into()),
					_ => Err("Several models loaded, 'model' parameter is required".into()),
				}
			}
		}
	}
}

impl ModelQuery {
	/// Builds the model configuration from the query, falling back to defaults.
	fn config(&self) -> Result<ModelConfig, String> {
		let defaults = ModelConfig::default();
		let sentinel = match &self.sentinel {
			None => defaults.sentinel,
			Some(s) => {
				let mut chars = s.chars();
				match (chars.next(), chars.next()) {
					(Some(c), None) => c,
					_ => return Err("Sentinel must be a single character".into()),
				}
			}
		};

		ModelConfig::new(self.order.unwrap_or(defaults.order), sentinel).map_err(|e| e.to_string())
	}
}

/// Maps a core error to an HTTP response.
fn error_response(e: CharLmError) -> HttpResponse {
	match e {
		CharLmError::ModelNotFound(_) => HttpResponse::NotFound().body(e.to_string()),
		CharLmError::InvalidOrder(_) | CharLmError::InvalidSentinel(_) => {
			HttpResponse::BadRequest().body(e.to_string())
		}
		_ => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// Failure while building a catalog for `/v1/load_models`.
enum LoadError {
	/// Name rejected or not present in the data directory.
	NotFound(String),
	/// Listing, reading or training failed.
	Failed(String),
}

/// Lists the model names available in `data_dir` (corpus file stems).
fn corpus_names(data_dir: &Path) -> std::io::Result<Vec<String>> {
	let suffix = format!(".{CORPUS_EXTENSION}");
	let files = list_files(data_dir, CORPUS_EXTENSION)?;
	Ok(files
		.iter()
		.filter_map(|f| f.strip_suffix(&suffix))
		.map(str::to_owned)
		.collect())
}

/// Maps a requested model name to its corpus file inside `data_dir`.
///
/// Only names listed by `corpus_names` are accepted, so a name cannot
/// point outside the data directory.
fn resolve_corpus(data_dir: &Path, name: &str) -> Result<PathBuf, LoadError> {
	if name.contains(['/', '\\']) || name.contains("..") {
		return Err(LoadError::NotFound(format!("Invalid model name {name}")));
	}

	let available = corpus_names(data_dir).map_err(|e| LoadError::Failed(format!("Failed to list models: {e}")))?;
	if !available.iter().any(|n| n == name) {
		return Err(LoadError::NotFound(format!("Model {name} not found")));
	}

	Ok(data_dir.join(format!("{name}.{CORPUS_EXTENSION}")))
}

/// Builds a new catalog from the named corpora of `data_dir`.
///
/// Trains (or reads cached models), so it runs on the blocking pool.
fn build_catalog(data_dir: &Path, names: &[String], config: ModelConfig) -> Result<ModelCatalog, LoadError> {
	let mut catalog = ModelCatalog::new(config).map_err(|e| LoadError::Failed(e.to_string()))?;

	for name in names {
		let corpus_path = resolve_corpus(data_dir, name)?;
		catalog
			.load(&corpus_path)
			.map_err(|e| LoadError::Failed(format!("Failed to load model: {e}")))?;
	}

	Ok(catalog)
}

/// GET `/v1/generate`
///
/// Generates `n_letters` characters from the requested model.
/// Returns the generated text as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<RwLock<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let input = match query.input() {
		Ok(input) => input,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let shared_data = match data.read() {
		Ok(guard) => guard,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let name = match query.model_name(&shared_data.catalog) {
		Ok(name) => name,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	match shared_data.catalog.generate(&name, &input) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => error_response(e),
	}
}

/// GET `/v1/models`
///
/// Lists the corpora available in the data directory.
#[get("/v1/models")]
async fn get_models(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let data_dir = match data.read() {
		Ok(guard) => guard.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match corpus_names(&data_dir) {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list models"),
	}
}

/// GET `/v1/loaded_models`
#[get("/v1/loaded_models")]
async fn get_loaded_models(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(guard) => guard,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.catalog.names().join("\n"))
}

/// PUT `/v1/load_models`
///
/// Replaces the loaded models by the comma-separated `names`, trained
/// (or read from cache) with the requested order and sentinel.
#[put("/v1/load_models")]
async fn put_model(data: web::Data<RwLock<SharedData>>, query: web::Query<ModelQuery>) -> impl Responder {
	let names: Vec<String> = match &query.names {
		Some(s) if !s.trim().is_empty() => s
			.split(',')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(str::to_owned)
			.collect(),
		_ => return HttpResponse::BadRequest().body("Missing or empty model name"),
	};

	let config = match query.config() {
		Ok(config) => config,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let data_dir = match data.read() {
		Ok(guard) => guard.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let catalog = match web::block(move || build_catalog(&data_dir, &names, config)).await {
		Ok(Ok(catalog)) => catalog,
		Ok(Err(LoadError::NotFound(e))) => return HttpResponse::NotFound().body(e),
		Ok(Err(LoadError::Failed(e))) => return HttpResponse::InternalServerError().body(e),
		Err(_) => return HttpResponse::InternalServerError().body("Model loading was interrupted"),
	};

	info!("loaded models {:?} (order {}, sentinel {:?})", catalog.names(), config.order, config.sentinel);
	match data.write() {
		Ok(mut guard) => guard.catalog = catalog,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	}

	HttpResponse::Ok().body("Models loaded successfully")
}

/// Main entry point for the server.
///
/// Loads every corpus of the data directory with the default model
/// configuration, then serves the HTTP API.
///
/// # Environment
/// - `CHARLM_DATA_DIR`: corpus directory (default `./data`)
/// - `CHARLM_BIND`: listen address (default `127.0.0.1:5000`)
/// - `RUST_LOG`: log filter (default `info`)
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let data_dir = PathBuf::from(env::var("CHARLM_DATA_DIR").unwrap_or_else(|_| "./data".to_owned()));
	let bind = env::var("CHARLM_BIND").unwrap_or_else(|_| "127.0.0.1:5000".to_owned());

	let catalog = match ModelCatalog::from_dir(&data_dir, ModelConfig::default()) {
		Ok(catalog) => catalog,
		Err(e) => {
			warn!("no model loaded from {}: {e}", data_dir.display());
			ModelCatalog::new(ModelConfig::default()).map_err(std::io::Error::other)?
		}
	};

	let shared_data = web::Data::new(RwLock::new(SharedData { data_dir, catalog }));

	info!("listening on {bind}");
	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_generated)
			.service(get_models)
			.service(put_model)
			.service(get_loaded_models)
	})
		.bind(bind.as_str())?
		.run()
		.await
}
