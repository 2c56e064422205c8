#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the rescue dashboard.
//!
//! Loads the rescue request table once at startup and serves the map and
//! bar chart data for the current filter selection, plus the static
//! dashboard page.

pub mod config;
mod handlers;
pub mod interactive;
pub mod theme;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use rescue_dashboard_incident_models::IncidentRecord;
use rescue_dashboard_query::clock::DashboardClock;
use rescue_dashboard_reader::{ReadError, TableReader};
use thiserror::Error;

use crate::config::{ConfigError, ServerConfig};
use crate::theme::DashboardTheme;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration or theme error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request table could not be loaded.
    #[error("failed to load rescue requests: {0}")]
    Read(#[from] ReadError),

    /// Binding or serving failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// The request table, read once at startup and never mutated.
    pub records: Arc<[IncidentRecord]>,
    /// Calendar convention for the time-window filter.
    pub clock: DashboardClock,
    /// Dashboard styling served to the frontend.
    pub theme: Arc<DashboardTheme>,
}

/// Registers the `/api` routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route("/theme", web::get().to(handlers::theme))
            .route("/map", web::get().to(handlers::map))
            .route("/bar", web::get().to(handlers::bar)),
    );
}

/// Starts the rescue dashboard server.
///
/// Loads the theme and the request table, then starts the Actix-Web HTTP
/// server. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns [`ServerError`] if the theme or table cannot be loaded, or if
/// the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let theme = theme::load_theme(config.theme_path.as_deref())?;

    log::info!("Loading rescue requests from {}...", config.data_source);
    let records = TableReader::new(&config.data_source).load().await?;
    log::info!(
        "Loaded {} requests (calendar offset {})",
        records.len(),
        config.clock.offset()
    );

    let state = web::Data::new(AppState {
        records: Arc::from(records),
        clock: config.clock,
        theme: Arc::new(theme),
    });

    let static_dir = config.static_dir;
    log::info!(
        "Starting server on {}:{} (static files from {})",
        config.bind_addr,
        config.port,
        static_dir.display()
    );

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await?;

    Ok(())
}
