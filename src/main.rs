use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use exam_score_api::config::{LogFormat, LoggingSettings, Settings};
use exam_score_api::routes::{self, prediction::AppState};
use exam_score_api::services::{ModelArtifacts, RateLimiter, SqliteStore};
use std::sync::Arc;
use tracing::{info, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing from the logging settings
///
/// Returns the file writer guard when a log file is configured; it must be
/// held for the lifetime of the process so buffered lines get flushed.
fn init_logging(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let (file_layer, guard) = match &settings.file {
        Some(path) => {
            let path = std::path::Path::new(path);
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(std::path::Path::new("."));
            let name = path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "exam-score-api.log".into());
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    match settings.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
        LogFormat::Plain => registry.with(fmt::layer().with_target(false)).init(),
    }

    guard
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so the log settings apply from the first line
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let _log_guard = init_logging(&settings.logging);

    info!("Starting exam score prediction service...");

    // Artifacts are required; refuse to serve without them
    let pipeline = match ModelArtifacts::load(&settings.artifacts).and_then(ModelArtifacts::into_pipeline) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to load model artifacts: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    info!("Inference pipeline ready: {:?}", pipeline);

    // The saved-input store is optional; predictions are served without it
    let store = if settings.database.save_inputs {
        match SqliteStore::from_settings(&settings.database.url, settings.database.max_connections).await {
            Ok(store) => {
                info!("Saved-input store initialized");
                Some(Arc::new(store))
            }
            Err(e) => {
                error!("Failed to open saved-input store ({}), inputs will not be saved", e);
                None
            }
        }
    } else {
        info!("Saving of submitted inputs is disabled");
        None
    };

    let limiter = RateLimiter::new(&settings.rate_limit);

    info!("Rate limits per client: {:?}", limiter.limits());

    // Build application state
    let app_state = AppState {
        pipeline,
        store,
        limiter,
        api_key: Arc::from(settings.auth.api_key.as_str()),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::PayloadConfig::default().limit(64 * 1024))
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
