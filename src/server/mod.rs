//! Actix-Web transport for the complaint core.
//!
//! Thin layer: handlers validate wire payloads into typed inputs, run the
//! store-backed work off the async executor, and map [`Error`] to HTTP
//! status codes. Observers follow changes over server-sent events.

mod events;
mod handlers;
pub mod requests;

pub use events::{event_stream, sse_frame};

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, ResponseError};
use tracing::info;

use crate::bus::BroadcastBus;
use crate::config::Config;
use crate::error::Error;
use crate::lifecycle::ComplaintLifecycle;
use crate::planner::{PlanOptions, RoutePlanner};
use crate::store::MemoryStore;
use crate::traits::ComplaintStore;

/// Shared application state.
pub struct AppState {
    pub lifecycle: ComplaintLifecycle<Arc<dyn ComplaintStore>, BroadcastBus>,
    pub planner: RoutePlanner<Arc<dyn ComplaintStore>>,
    /// Kept alongside the lifecycle's copy so new observers can subscribe.
    pub bus: BroadcastBus,
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn ComplaintStore>, bus: BroadcastBus, config: &Config) -> Self {
        Self {
            lifecycle: ComplaintLifecycle::with_policy(
                store.clone(),
                bus.clone(),
                config.transition_policy,
            ),
            planner: RoutePlanner::with_options(
                store,
                PlanOptions {
                    missing: config.missing_policy,
                },
            ),
            bus,
            store_timeout: config.store_timeout(),
        }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(config: &Config) -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            BroadcastBus::new(config.event_capacity),
            config,
        )
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| Error::invalid(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .service(
                web::resource("/complaints")
                    .route(web::get().to(handlers::list_complaints))
                    .route(web::post().to(handlers::create_complaint)),
            )
            .route("/complaint/{id}", web::get().to(handlers::get_complaint))
            .route("/complaint/{id}/status", web::post().to(handlers::update_status))
            .route("/compute_route", web::post().to(handlers::compute_route))
            .route("/events", web::get().to(handlers::events)),
    );
}

/// Starts the HTTP server over an in-memory store.
///
/// # Errors
///
/// Returns an `std::io::Error` if the server fails to bind or stops with a
/// runtime error.
pub async fn run(config: Config) -> std::io::Result<()> {
    let state = web::Data::new(AppState::in_memory(&config));

    info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        missing_policy = ?config.missing_policy,
        transition_policy = ?config.transition_policy,
        "starting complaint server"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.clone(), config.port))?
    .run()
    .await
}
