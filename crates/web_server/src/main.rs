//! Main entry point for the campsite availability server.
//! This crate serves the availability API and the frontend application.

use std::sync::Arc;

use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use campground_scan::{AvailabilityAggregator, CampgroundDirectory};
use rec_gov::RecGovClient;
use web_handlers::{configure_routes, cors_headers};

/// Server settings read from the environment
mod config;
use config::ServerConfig;

fn load_directory(config: &ServerConfig) -> anyhow::Result<CampgroundDirectory> {
    match &config.campground_names_file {
        Some(path) => {
            let directory = CampgroundDirectory::from_json_file(path)?;
            log::info!(
                "🗺️ Loaded {} campground names from {}",
                directory.len(),
                path.display()
            );
            Ok(directory)
        }
        None => Ok(CampgroundDirectory::default()),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting campsite availability server...");

    let config = ServerConfig::from_env()?;
    let directory = load_directory(&config)?;

    let client = RecGovClient::new(Some(config.rec_gov.clone()))?;
    let aggregator = web::Data::new(AvailabilityAggregator::new(
        Arc::new(client),
        directory,
        Some(config.aggregator.clone()),
    ));

    let static_dir = config.static_dir.clone();
    log::info!("📁 Frontend files location: {}", static_dir.display());
    log::info!(
        "🌐 Server will be available at: http://{}:{}",
        config.bind_address,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(aggregator.clone())
            .wrap(cors_headers())
            .wrap(Logger::default())
            .configure(configure_routes)
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
