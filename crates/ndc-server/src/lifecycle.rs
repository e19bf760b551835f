//! Server lifecycle: wire the pieces together and serve until shutdown.

use crate::connector::Connector;
use crate::logging;
use crate::middleware::{BearerAuth, FailureBoundary, VersionNegotiation};
use crate::options::ServerOptions;
use crate::routes::{self, ServerState};
use crate::telemetry::{self, Telemetry};
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;
use std::sync::Arc;

/// Parse the process command line and environment, then run the server.
pub async fn start_server_from_args<C: Connector>(connector: C) -> anyhow::Result<()> {
    let options = ServerOptions::from_args()?;
    start_server(connector, options).await
}

/// Run the server for a connector with resolved options.
///
/// Configuration parsing and state initialization happen once, before
/// binding; the resulting values are shared read-mostly across all workers
/// for the process lifetime.
pub async fn start_server<C: Connector>(
    connector: C,
    options: ServerOptions,
) -> anyhow::Result<()> {
    logging::init_logging(&options.log_level, options.pretty_print_logs)?;

    let telemetry = Telemetry::new();
    let metrics_handle = telemetry::install_metrics_recorder()?;

    let configuration = connector.parse_configuration(&options.configuration).await?;
    let state = connector.try_init_state(&configuration).await?;

    let server_state = ServerState {
        connector: Arc::new(connector),
        configuration: Arc::new(configuration),
        state: Arc::new(state),
        telemetry,
        metrics: metrics_handle,
    };

    let service_token_secret = options.service_token_secret.clone();
    let workers = num_cpus::get();

    info!(
        "Server starting on http://{}:{} with {} workers",
        options.host, options.port, workers
    );

    // wrap() layers run outermost-last: the Logger sees the request first,
    // then the failure boundary, then auth, then version negotiation.
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(server_state.clone()))
            .configure(routes::configure::<C>)
            .wrap(VersionNegotiation::default())
            .wrap(BearerAuth::new(service_token_secret.clone()))
            .wrap(FailureBoundary)
            .wrap(Logger::default())
    })
    .workers(workers)
    .bind((options.host.as_str(), options.port))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
