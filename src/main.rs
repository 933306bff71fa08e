use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::info;
use tutormatch::config::Settings;
use tutormatch::routes::{self, AppState};
use tutormatch::services::{
    AccessControl, AuditLog, GeoDistanceCache, GeocodingClient, MatchPipeline, TaskEmitter,
    TutorStore, TutorshipLifecycle,
};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting tutormatch engine...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize PostgreSQL store (runs migrations)
    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);

    let store = Arc::new(
        TutorStore::from_settings(&settings.database.url, Some(db_max_conn), Some(db_min_conn))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Failed to connect to PostgreSQL: {}", e);
                panic!("PostgreSQL connection error: {}", e);
            }),
    );

    info!("PostgreSQL store initialized (max: {} connections)", db_max_conn);

    // Initialize geocoding client and geodistance cache
    let geocoder = Arc::new(GeocodingClient::new(
        settings.geocoding.base_url.clone(),
        settings.geocoding.timeout_secs.unwrap_or(10),
        settings.geocoding.attempts.unwrap_or(3),
        settings.geocoding.backoff_ms.unwrap_or(500),
    ));

    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(86400);

    let geodistance = Arc::new(GeoDistanceCache::new(
        store.pool().clone(),
        Arc::clone(&geocoder),
        l1_cache_size,
        cache_ttl,
    ));

    info!("Geodistance cache initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);

    // Access control, audit sink and task emitter
    let access = Arc::new(AccessControl::new(Arc::clone(&store)));
    let audit = Arc::new(AuditLog::new(store.pool().clone()));

    let emitter = Arc::new(TaskEmitter::new(
        Arc::clone(&store),
        settings.tasks.poll_interval_secs.unwrap_or(1),
        settings.tasks.give_up_secs.unwrap_or(60),
        settings.tasks.tutee_match_due_days.unwrap_or(7),
        settings.tasks.technical_review_due_days.unwrap_or(14),
    ));

    // Matching pipeline and lifecycle executor
    let pipeline = Arc::new(MatchPipeline::new(
        Arc::clone(&store),
        Arc::clone(&geodistance),
        Arc::clone(&access),
    ));

    let lifecycle = Arc::new(TutorshipLifecycle::new(
        Arc::clone(&store),
        Arc::clone(&access),
        Arc::clone(&audit),
        Arc::clone(&emitter),
    ));

    info!("Matching pipeline and lifecycle executor initialized");

    // Build application state
    let app_state = AppState { store, pipeline, lifecycle, emitter, access };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
