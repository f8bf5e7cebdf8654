//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders, from_fn},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::{TimingMiddleware, internal_error_handlers, request_id_middleware};
use crate::api::services::{health_routes, lookup_routes};
use crate::config::StaticConfig;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// Prepares the lookup service, binds the configured address and serves
/// until actix receives a shutdown signal (Ctrl-C / SIGTERM).
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config);
    let lookup_service = startup.lookup_service;

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            // 后注册的中间件在外层：Timing 最外层，ErrorHandlers 紧贴路由
            .wrap(internal_error_handlers())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .wrap(Compress::default())
            .wrap(from_fn(request_id_middleware))
            .wrap(TimingMiddleware)
            .app_data(web::Data::new(lookup_service.clone()))
            .service(health_routes())
            .service(lookup_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);
    server.run().await.context("HTTP server terminated with error")?;

    warn!("Server stopped");
    Ok(())
}
