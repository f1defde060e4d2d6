//! Perfume shop HTTP server.
//!
//! Loads the profile's `.env` file, connects MongoDB and Redis, builds every
//! registered repository and service, then serves the REST API.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use perfume_shop_backend::caching::redis::RedisClient;
use perfume_shop_backend::config::{Environment, RateLimitConfig, ServerConfig, UploadConfig};
use perfume_shop_backend::core::registry::ServiceLocator;
use perfume_shop_backend::db::Database;
use perfume_shop_backend::routes::{configure_all_routes, json_config, query_config};
use perfume_shop_backend::services::uploads::UploadService;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 Starting perfume shop backend ({:?})", Environment::current());

    let (database, redis_client) = initialize_data_stores().await?;
    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);

    ServiceLocator::initialize_all().await.map_err(|e| {
        error!("Service initialization failed: {}", e);
        io::Error::other(e.to_string())
    })?;

    UploadService::instance()
        .ensure_directories()
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;
    info!("📁 Uploads served from {}", UploadConfig::root_dir().display());

    start_http_server().await
}

async fn start_http_server() -> io::Result<()> {
    let bind_address = (ServerConfig::host(), ServerConfig::port());
    let workers = ServerConfig::workers();

    let rate_limit = RateLimitConfig::from_env();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("invalid rate limit configuration"))?;

    info!(
        "🛡️ Rate limiting: {} req/s, burst {}",
        rate_limit.per_second, rate_limit.burst_size
    );
    info!("🌐 Listening on http://{}:{}", bind_address.0, bind_address.1);
    info!("📍 Health check: http://{}:{}/health", bind_address.0, bind_address.1);

    let origins = ServerConfig::client_origins();

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(json_config())
            .app_data(query_config())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(workers)
    .run()
    .await
}

/// Loads `.env.<profile>` for `PROFILE=dev|prod`, falling back to `.env`.
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    let file_name = match profile.as_str() {
        "prod" => Some(".env.prod"),
        "dev" => Some(".env.dev"),
        _ => None,
    };

    match file_name {
        Some(name) => {
            if let Err(e) = dotenv::from_filename(name) {
                // logger is not up yet
                eprintln!("failed to load {}: {}", name, e);
                dotenv().ok();
            }
        }
        None => {
            dotenv().ok();
        }
    }
}

fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

async fn initialize_data_stores() -> io::Result<(Arc<Database>, Arc<RedisClient>)> {
    info!("📡 Connecting data stores...");

    let database = Database::new().await.map_err(|e| {
        error!("MongoDB connection failed: {}", e);
        io::Error::other(e.to_string())
    })?;

    let redis_client = RedisClient::new().await.map_err(|e| {
        error!("Redis connection failed: {}", e);
        io::Error::other(e.to_string())
    })?;

    Ok((Arc::new(database), Arc::new(redis_client)))
}

/// Credentialed CORS for the storefront and admin origins from `CLIENT_URL`.
fn configure_cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::CACHE_CONTROL,
            header::EXPIRES,
            header::PRAGMA,
        ])
        .supports_credentials()
        .max_age(3600)
}
