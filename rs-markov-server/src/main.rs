use std::sync::Mutex;

use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware, put, web};

use rs_markov_core::io::list_files;
use rs_markov_core::model::generator::TextGenerator;
use rs_markov_core::model::markov_model::MarkovModel;
use serde::Deserialize;

/// Directory holding the training corpora (`<name>.txt` files).
const DATA_FOLDER: &str = "./data";

/// Window length used when the `/v1/load` query does not provide one.
const DEFAULT_WINDOW: usize = 5;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	seed_text: String,
	length: Option<usize>,
	rng_seed: Option<u64>, // pins the draw sequence for reproducible output
}

#[derive(Deserialize)]
struct LoadQuery {
	names: Option<String>,
	window: Option<usize>,
}

struct SharedData {
	generator: Option<TextGenerator>,
	loaded: Vec<String>,
}

/// HTTP GET endpoint `/v1/generate`
///
/// Extends `seed_text` with up to `length` characters sampled from the
/// loaded model. A seed text shorter than the model window comes back
/// unchanged, and a dead end returns the partial text, mirroring the
/// library contract.
#[get("/v1/generate")]
async fn get_generated(
	data: web::Data<Mutex<SharedData>>,
	query: web::Query<GenerateParams>,
) -> impl Responder {
	let length = query.length.unwrap_or(100);

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let generator = match shared_data.generator.as_mut() {
		Some(generator) => generator,
		None => return HttpResponse::BadRequest().body("No model loaded, PUT /v1/load first"),
	};

	if let Some(rng_seed) = query.rng_seed {
		generator.reseed(rng_seed);
	}

	HttpResponse::Ok().body(generator.generate(&query.seed_text, length))
}

/// HTTP GET endpoint `/v1/corpora`
///
/// Lists the corpus files available for loading.
#[get("/v1/corpora")]
async fn get_corpora() -> impl Responder {
	match list_files(DATA_FOLDER, "txt") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".txt", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

/// HTTP GET endpoint `/v1/loaded`
///
/// Lists the corpora the live model was trained on.
#[get("/v1/loaded")]
async fn get_loaded(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.loaded.join("\n"))
}

/// HTTP GET endpoint `/v1/dump`
///
/// Human-readable enumeration of every context and its frequency table.
/// Inspection aid, not a stable format.
#[get("/v1/dump")]
async fn get_dump(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match shared_data.generator.as_ref() {
		Some(generator) => HttpResponse::Ok().body(generator.model().to_string()),
		None => HttpResponse::BadRequest().body("No model loaded, PUT /v1/load first"),
	}
}

/// HTTP PUT endpoint `/v1/load`
///
/// Builds a fresh model by training incrementally over the named corpora,
/// then replaces the live generator. Counts accumulate across corpora and
/// probabilities are recomputed after each one, so the resulting model is
/// identical to training once on the concatenation of compatible corpora.
#[put("/v1/load")]
async fn put_load(data: web::Data<Mutex<SharedData>>, query: web::Query<LoadQuery>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let corpus_names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();

	let window_length = query.window.unwrap_or(DEFAULT_WINDOW);
	let mut model = match MarkovModel::new(window_length) {
		Ok(m) => m,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	for name in &corpus_names {
		let corpus_path = format!("{DATA_FOLDER}/{name}.txt");
		if let Err(e) = model.train_file(&corpus_path) {
			return HttpResponse::InternalServerError()
				.body(format!("Failed to train on {corpus_path}: {e}"));
		}
	}

	log::info!(
		"Model trained on {} corpora: {} contexts (window length {})",
		corpus_names.len(),
		model.len(),
		window_length
	);

	shared_data.loaded = corpus_names.iter().map(|s| (*s).to_owned()).collect();
	shared_data.generator = Some(TextGenerator::new(model));

	HttpResponse::Ok().body("Model loaded successfully")
}

/// Main entry point for the server.
///
/// Starts with no model loaded; corpora are loaded on demand through
/// `PUT /v1/load`. The generator is wrapped in a `Mutex` so training
/// never overlaps sampling.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - The data folder path is hardcoded and should be made configurable.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

	let shared_data = SharedData {
		generator: None,
		loaded: Vec::new(),
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	log::info!("Listening on 127.0.0.1:5000, corpora folder: {DATA_FOLDER}");

	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.app_data(shared_model.clone())
			.service(get_generated)
			.service(get_corpora)
			.service(get_loaded)
			.service(get_dump)
			.service(put_load)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
