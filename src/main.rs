use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use guru_match::config::{LoggingSettings, Settings, StoreBackend};
use guru_match::core::Matcher;
use guru_match::routes::{self, handle_query_payload_error, AppState};
use guru_match::services::{FirebaseClient, InMemoryUserStore, SnapshotCache, UserStore};

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

fn build_store(settings: &Settings) -> io::Result<Arc<dyn UserStore>> {
    match settings.store.backend {
        StoreBackend::Firebase => {
            let firebase = &settings.firebase;
            if firebase.database_url.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "firebase backend selected but firebase.database_url is not set",
                ));
            }

            let client = FirebaseClient::new(
                firebase.database_url.clone(),
                firebase.users_path.clone(),
                firebase.auth_token.clone(),
                Duration::from_secs(firebase.timeout_secs),
            )
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

            info!(
                "Firebase store initialized ({}/{})",
                firebase.database_url, firebase.users_path
            );
            Ok(Arc::new(client))
        }
        StoreBackend::Memory => {
            let store = match &settings.store.seed_file {
                Some(path) => InMemoryUserStore::from_seed_file(path)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?,
                None => {
                    warn!("Memory store has no seed_file; serving an empty community");
                    InMemoryUserStore::new(Vec::new())
                }
            };

            info!("Memory store initialized ({} users)", store.len());
            Ok(Arc::new(store))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);
    info!("Starting Guru Match skill matching service...");

    let store = build_store(&settings).map_err(|e| {
        error!("Failed to initialize user store: {}", e);
        e
    })?;

    let cache = Arc::new(SnapshotCache::new(
        settings.cache.max_entries,
        settings.cache.ttl_secs,
    ));
    if cache.is_enabled() {
        info!("Snapshot cache enabled (TTL: {}s)", settings.cache.ttl_secs);
    } else {
        info!("Snapshot cache disabled");
    }

    let matcher = Matcher::with_standard_taxonomy();
    info!(
        "Matcher initialized with {} skill categories",
        matcher.taxonomy().categories().len()
    );

    let app_state = AppState {
        store,
        cache,
        matcher,
        matching: settings.matching.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
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
