use std::path::Path;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};

use nwp_core::io::list_models;
use nwp_core::model::{DenseModel, SequenceModel};
use nwp_core::{Generator, Settings};
use serde::{Deserialize, Serialize};

mod page;

use page::Outcome;

/// Query parameters shared by the generation endpoints.
#[derive(Deserialize)]
struct GenerateParams {
	prompt: Option<String>,
	count: Option<i64>,
}

/// Response body of `/v1/info`.
#[derive(Serialize)]
struct Info {
	window: usize,
	vocabulary_size: usize,
	temperature: f32,
	max_words: usize,
}

struct SharedData {
	generator: Generator<DenseModel>,
	settings: Settings,
}

impl GenerateParams {
	/// Resolves the prompt and word count, falling back to the settings.
	///
	/// Negative counts are let through; the generator treats them as zero.
	fn resolve(&self, settings: &Settings) -> Result<(String, i64), String> {
		let prompt = self.prompt.clone().unwrap_or_else(|| settings.default_prompt.clone());
		let count = self.count.unwrap_or(settings.default_words as i64);
		if count > settings.max_words as i64 {
			return Err(format!("Count must be at most {}", settings.max_words));
		}
		Ok((prompt, count))
	}
}

/// HTTP GET endpoint `/`
///
/// Renders the empty form.
#[get("/")]
async fn index(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	let settings = &shared_data.settings;
	let body = page::render(&settings.default_prompt, settings.default_words as i64, settings.max_words, Outcome::Nothing);
	HttpResponse::Ok().content_type("text/html; charset=utf-8").body(body)
}

/// HTTP GET endpoint `/generate`
///
/// Form target: renders the page again with the generated text.
#[get("/generate")]
async fn generate_page(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	let settings = &shared_data.settings;

	let (prompt, count) = match query.resolve(settings) {
		Ok(resolved) => resolved,
		Err(e) => {
			let body = page::render(query.prompt.as_deref().unwrap_or_default(), settings.default_words as i64, settings.max_words, Outcome::Failed(&e));
			return HttpResponse::BadRequest().content_type("text/html; charset=utf-8").body(body);
		}
	};

	match shared_data.generator.generate(&prompt, count, &mut rand::rng()) {
		Ok(text) => {
			let body = page::render(&prompt, count, settings.max_words, Outcome::Generated(&text));
			HttpResponse::Ok().content_type("text/html; charset=utf-8").body(body)
		}
		Err(e) => {
			let body = page::render(&prompt, count, settings.max_words, Outcome::Failed(&e.to_string()));
			HttpResponse::InternalServerError().content_type("text/html; charset=utf-8").body(body)
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Returns the generated text as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};

	let (prompt, count) = match query.resolve(&shared_data.settings) {
		Ok(resolved) => resolved,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	match shared_data.generator.generate(&prompt, count, &mut rand::rng()) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/generate/report`
///
/// Same as `/v1/generate`, answered as a JSON report.
#[get("/v1/generate/report")]
async fn get_report(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};

	let (prompt, count) = match query.resolve(&shared_data.settings) {
		Ok(resolved) => resolved,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	match shared_data.generator.generate_report(&prompt, count, &mut rand::rng()) {
		Ok(report) => HttpResponse::Ok().json(report),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

#[get("/v1/info")]
async fn get_info(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	let predictor = shared_data.generator.predictor();
	HttpResponse::Ok().json(Info {
		window: predictor.window(),
		vocabulary_size: predictor.model().vocab_size(),
		temperature: predictor.sampler().temperature(),
		max_words: shared_data.settings.max_words,
	})
}

#[get("/v1/models")]
async fn get_models(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let folder = match data.lock() {
		Ok(m) => m.settings.model_path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	match list_models(&folder) {
		Ok(models) => HttpResponse::Ok().body(models.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list models"),
	}
}

/// Registers every endpoint on an app.
fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(index)
		.service(generate_page)
		.service(get_report)
		.service(get_generated)
		.service(get_info)
		.service(get_models);
}

/// Main entry point for the server.
///
/// Loads settings (from the file named by `NWP_CONFIG`, if set), then the
/// model and vocabulary once, wraps the generator in a `Mutex` so requests
/// are served one at a time, and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let config_path = std::env::var("NWP_CONFIG").ok();
	let settings = Settings::load(config_path.as_deref()).map_err(std::io::Error::other)?;
	let generator = Generator::from_settings(&settings).map_err(std::io::Error::other)?;

	let bind = (settings.host.clone(), settings.port);
	log::info!("Listening on {}:{}", bind.0, bind.1);

	let shared_data = web::Data::new(Mutex::new(SharedData { generator, settings }));

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]))
			.app_data(shared_data.clone())
			.configure(configure)
	})
		.bind(bind)?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::{test, App};

	fn shared_data(dir: &Path) -> web::Data<Mutex<SharedData>> {
		let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("../data");
		let model_path = dir.join("movie.json");
		let vocabulary_path = dir.join("movie.vocab.json");
		std::fs::copy(data.join("movie.json"), &model_path).unwrap();
		std::fs::copy(data.join("movie.vocab.json"), &vocabulary_path).unwrap();

		let settings = Settings { model_path, vocabulary_path, ..Settings::default() };
		let generator = Generator::from_settings(&settings).unwrap();
		web::Data::new(Mutex::new(SharedData { generator, settings }))
	}

	#[actix_web::test]
	async fn test_generate_text() {
		let dir = tempfile::tempdir().unwrap();
		let app = test::init_service(App::new().app_data(shared_data(dir.path())).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/generate?prompt=The%20movie%20was&count=0").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "The movie was");

		let req = test::TestRequest::get().uri("/v1/generate?prompt=I%20loved&count=4").to_request();
		let body = test::call_and_read_body(&app, req).await;
		let text = std::str::from_utf8(&body).unwrap();
		assert!(text.starts_with("I loved"));
		assert!(text.split_whitespace().count() <= 6);
	}

	#[actix_web::test]
	async fn test_count_above_limit_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let app = test::init_service(App::new().app_data(shared_data(dir.path())).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/generate?count=21").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::get().uri("/generate?prompt=x&count=99").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn test_negative_count_returns_prompt() {
		let dir = tempfile::tempdir().unwrap();
		let app = test::init_service(App::new().app_data(shared_data(dir.path())).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/generate?prompt=%20Hello%20&count=-3").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "Hello");
	}

	#[actix_web::test]
	async fn test_report_and_info() {
		let dir = tempfile::tempdir().unwrap();
		let app = test::init_service(App::new().app_data(shared_data(dir.path())).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/generate/report?prompt=the&count=3").to_request();
		let report: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		assert!(report["text"].as_str().unwrap().starts_with("the"));
		assert!(report["words"].as_array().unwrap().len() <= 3);
		assert!(report["stopped_early"].is_boolean());

		let req = test::TestRequest::get().uri("/v1/info").to_request();
		let info: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(info["window"], 5);
		assert_eq!(info["vocabulary_size"], 19);
		assert_eq!(info["max_words"], 20);
	}

	#[actix_web::test]
	async fn test_pages() {
		let dir = tempfile::tempdir().unwrap();
		let app = test::init_service(App::new().app_data(shared_data(dir.path())).configure(configure)).await;

		let req = test::TestRequest::get().uri("/").to_request();
		let body = test::call_and_read_body(&app, req).await;
		let html = std::str::from_utf8(&body).unwrap();
		assert!(html.contains("The movie was"));

		let req = test::TestRequest::get().uri("/generate?prompt=the%20movie&count=2").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert!(std::str::from_utf8(&body).unwrap().contains("Generated Text"));
	}

	#[actix_web::test]
	async fn test_models_listing() {
		let dir = tempfile::tempdir().unwrap();
		let app = test::init_service(App::new().app_data(shared_data(dir.path())).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/models").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "movie");
	}

	#[actix_web::test]
	async fn test_failed_inference_page_is_server_error() {
		let dir = tempfile::tempdir().unwrap();
		let data = shared_data(dir.path());
		// A vocabulary index past the model output makes inference fail
		let vocabulary_path = dir.path().join("broken.vocab.json");
		std::fs::write(&vocabulary_path, r#"{ "word_index": { "the": 1, "zebra": 50 } }"#).unwrap();
		{
			let mut shared = data.lock().unwrap();
			shared.settings.vocabulary_path = vocabulary_path;
			let generator = Generator::from_settings(&shared.settings).unwrap();
			shared.generator = generator;
		}
		let app = test::init_service(App::new().app_data(data).configure(configure)).await;

		let req = test::TestRequest::get().uri("/generate?prompt=zebra&count=1").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let req = test::TestRequest::get().uri("/v1/generate?prompt=zebra&count=1").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}
}
