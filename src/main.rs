use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use advisory_crm::auth::AuthVerifier;
use advisory_crm::config::{Settings, StorageBackend};
use advisory_crm::core::Matcher;
use advisory_crm::error::{handle_json_payload_error, handle_query_payload_error};
use advisory_crm::routes::{self, AppState};
use advisory_crm::services::{HostedClient, MatchCache, MemoryStore, Notifier, PipelineBoard, PostgresClient, RecordStore};
use std::io;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    // LOG_LEVEL and LOG_FORMAT override the configured values
    let filter = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| format.to_string());
    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

async fn build_store(settings: &Settings) -> io::Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match settings.storage.backend {
        StorageBackend::Hosted => {
            let client = HostedClient::new(
                settings.hosted.endpoint.clone(),
                settings.hosted.api_key.clone(),
                (&settings.hosted.tables).into(),
            )
            .map_err(|e| startup_error("Failed to build hosted datastore client", e))?;
            info!("Hosted datastore client initialized");
            Arc::new(client)
        }
        StorageBackend::Postgres => {
            let db = &settings.database;
            let client = PostgresClient::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;
            info!("PostgreSQL client initialized (max: {} connections)", db.max_connections.unwrap_or(10));
            Arc::new(client)
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory store; registrations are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    Ok(store)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(io::Error::new(io::ErrorKind::InvalidData, e.to_string()));
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting advisory CRM service...");

    let store = build_store(&settings).await?;

    if settings.auth.jwt_secret.is_empty() {
        warn!("No JWT secret configured; every authenticated request will be refused");
    }
    let auth = Arc::new(AuthVerifier::new(&settings.auth));

    let notifier = if settings.notify.enabled {
        let notifier = Notifier::new(
            settings.hosted.endpoint.clone(),
            settings.hosted.api_key.clone(),
            settings.notify.function.clone(),
        )
        .map_err(|e| startup_error("Failed to build notifier", e))?;
        info!("Email notifications enabled via {}", settings.notify.function);
        Some(Arc::new(notifier))
    } else {
        None
    };

    let cache = Arc::new(MatchCache::new(settings.cache.capacity, settings.cache.ttl_secs));
    info!("Match cache initialized ({} entries, TTL: {}s)", settings.cache.capacity, settings.cache.ttl_secs);

    let matcher = Matcher::new(
        settings.scoring_weights(),
        settings.quality_thresholds(),
        settings.scoring.label_matching,
    );
    info!(
        "Matcher initialized with weights: {:?}, labels: {:?}",
        matcher.weights(),
        matcher.label_matching()
    );

    let board = Arc::new(PipelineBoard::new());
    match board.refresh(store.as_ref()).await {
        Ok(count) => info!("Pipeline board loaded with {} investors", count),
        Err(e) => warn!("Pipeline board starts empty, initial load failed: {}", e),
    }

    let app_state = AppState {
        store,
        board,
        matcher,
        cache,
        notifier,
        auth,
        documents: Arc::new(settings.documents.clone()),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let allowed_origins = settings.server.allowed_origins.clone();

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = if allowed_origins.is_empty() {
            Cors::permissive()
        } else {
            allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
                .allow_any_method()
                .allow_any_header()
                .max_age(3600)
        };

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
