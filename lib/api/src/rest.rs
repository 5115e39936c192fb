use actix_cors::Cors;
use actix_files::NamedFile;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use mouserec_core::{image::is_safe_filename, Error, ImageResolver};
use mouserec_similarity::{Recommender, UserPreferences, MODEL_NAME};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

const FALLBACK_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Mouse Recommendation System</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; }
        .container { max-width: 800px; margin: 0 auto; }
        .error { padding: 20px; background: #f8d7da; color: #721c24; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Mouse Recommendation System</h1>
        <div class="error">
            <h2>Error: Frontend files not found</h2>
            <p>Please make sure index.html is in the static folder</p>
        </div>
    </div>
</body>
</html>
"#;

/// Server settings that do not belong to the recommender itself
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    /// Searched in order when serving images
    pub image_dirs: Vec<PathBuf>,
    pub top_n: usize,
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            static_dir: PathBuf::from("static"),
            image_dirs: vec![PathBuf::from("img"), PathBuf::from("static/img")],
            top_n: 5,
            environment: "development".to_string(),
        }
    }
}

/// Shared handler state
pub struct ApiState {
    recommender: Arc<Recommender>,
    images: ImageResolver,
    config: ApiConfig,
}

impl ApiState {
    pub fn new(recommender: Arc<Recommender>, config: ApiConfig) -> Self {
        let images = ImageResolver::new(config.image_dirs.clone());
        Self {
            recommender,
            images,
            config,
        }
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(recommender: Arc<Recommender>, config: ApiConfig) -> std::io::Result<()> {
        let port = config.port;
        let state = web::Data::new(ApiState::new(recommender, config));

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(state.clone())
                .configure(Self::configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Register every route; handlers expect `web::Data<ApiState>` in app data
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.route("/", web::get().to(serve_index))
            .route("/static/{filename:.*}", web::get().to(serve_static))
            .route("/api/options", web::get().to(get_options))
            .route("/api/recommendations", web::post().to(get_recommendations))
            .route("/api/info", web::get().to(get_info))
            .route("/api/images/{filename}", web::get().to(serve_image))
            .route("/img/{filename}", web::get().to(serve_image))
            .route("/health", web::get().to(health_check))
            .default_service(web::to(not_found));
    }
}

fn error_response(e: &Error) -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": e.to_string()
    }))
}

/// A relative path that stays inside the directory it is joined to
fn is_safe_relative(path: &str) -> bool {
    !path.is_empty() && Path::new(path).components().all(|c| matches!(c, Component::Normal(_)))
}

async fn serve_index(state: web::Data<ApiState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    let index = state.config.static_dir.join("index.html");
    match NamedFile::open(&index) {
        Ok(file) => Ok(file.into_response(&req)),
        Err(e) => {
            error!("Error serving index {:?}: {}", index, e);
            Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(FALLBACK_INDEX))
        }
    }
}

async fn serve_static(
    state: web::Data<ApiState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let filename = path.into_inner();
    if !is_safe_relative(&filename) {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "File not found"
        })));
    }

    match NamedFile::open(state.config.static_dir.join(&filename)) {
        Ok(file) => Ok(file.into_response(&req)),
        Err(e) => {
            error!("Error serving static file {}: {}", filename, e);
            Ok(HttpResponse::NotFound().json(serde_json::json!({
                "error": "File not found"
            })))
        }
    }
}

async fn get_options(state: web::Data<ApiState>) -> ActixResult<HttpResponse> {
    match state.recommender.get_options() {
        Ok(options) => Ok(HttpResponse::Ok().json(options)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn get_recommendations(
    state: web::Data<ApiState>,
    body: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    if !state.recommender.is_initialized() {
        return Ok(error_response(&Error::NotInitialized));
    }

    let body = body.into_inner();
    if !body.is_object() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Preferences must be a JSON object"
        })));
    }
    let prefs: UserPreferences = match serde_json::from_value(body) {
        Ok(prefs) => prefs,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            })));
        }
    };
    info!("User preferences received: {:?}", prefs);

    match state.recommender.get_recommendations(&prefs, state.config.top_n) {
        Ok(response) => {
            info!("Recommendations generated: {} items", response.len());
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn get_info(state: web::Data<ApiState>) -> ActixResult<HttpResponse> {
    match state.recommender.get_system_info() {
        Ok(info) => Ok(HttpResponse::Ok().json(info)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn serve_image(
    state: web::Data<ApiState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let filename = path.into_inner();
    if !is_safe_filename(filename.trim()) {
        warn!("Rejected image request: {:?}", filename);
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Image not found"
        })));
    }

    let Some(found) = state.images.locate(&filename) else {
        warn!("Image not found: {}", filename);
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Image not found"
        })));
    };

    match NamedFile::open(&found) {
        Ok(file) => Ok(file.into_response(&req)),
        Err(e) => {
            error!("Error serving image {}: {}", filename, e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to serve image"
            })))
        }
    }
}

async fn health_check(state: web::Data<ApiState>) -> ActixResult<HttpResponse> {
    let info = state.recommender.get_system_info().ok();
    let initialized = info.is_some();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "message": "Mouse Recommendation System is running",
        "recommendation_system": if initialized { "initialized" } else { "not initialized" },
        "dataset_size": info.as_ref().map_or(0, |i| i.total_data),
        "model_name": if initialized { MODEL_NAME } else { "N/A" },
        "image_support": initialized,
        "image_folder": info.as_ref().map_or("N/A".to_string(), |i| i.image_folder.clone()),
        "port": state.config.port,
        "environment": state.config.environment,
    })))
}

async fn not_found() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::NotFound().json(serde_json::json!({
        "error": "Endpoint not found"
    })))
}
