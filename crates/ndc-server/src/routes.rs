//! Route table and handlers for the connector protocol surface.
//!
//! POST handlers capture the raw body and decode it themselves so a decode
//! failure becomes a `MalformedRequestBody` with the serde diagnostic in
//! `details.cause`, instead of actix's own JSON extractor error shape.

use crate::connector::Connector;
use crate::error::ConnectorError;
use crate::telemetry::Telemetry;
use actix_web::{web, HttpResponse};
use metrics::counter;
use metrics_exporter_prometheus::PrometheusHandle;
use ndc_ir::{CapabilitiesResponse, MutationRequest, QueryRequest, SqlRequest, VERSION};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;

/// Shared per-process state handed to every handler.
pub struct ServerState<C: Connector> {
    pub connector: Arc<C>,
    pub configuration: Arc<C::Configuration>,
    pub state: Arc<C::State>,
    pub telemetry: Telemetry,
    pub metrics: PrometheusHandle,
}

// Derived Clone would require C: Clone; only the Arcs are cloned.
impl<C: Connector> Clone for ServerState<C> {
    fn clone(&self) -> Self {
        Self {
            connector: self.connector.clone(),
            configuration: self.configuration.clone(),
            state: self.state.clone(),
            telemetry: self.telemetry.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

/// Register the protocol routes for a connector type.
pub fn configure<C: Connector>(cfg: &mut web::ServiceConfig) {
    cfg.route("/capabilities", web::get().to(get_capabilities::<C>))
        .route("/health", web::get().to(get_health::<C>))
        .route("/metrics", web::get().to(get_metrics::<C>))
        .route("/schema", web::get().to(get_schema::<C>))
        .route("/query", web::post().to(post_query::<C>))
        .route("/query/explain", web::post().to(post_query_explain::<C>))
        .route("/mutation", web::post().to(post_mutation::<C>))
        .route(
            "/mutation/explain",
            web::post().to(post_mutation_explain::<C>),
        )
        .route("/sql", web::post().to(post_sql::<C>));
}

fn decode_request<T: DeserializeOwned>(body: &web::Bytes) -> Result<T, ConnectorError> {
    serde_json::from_slice(body).map_err(|e| ConnectorError::malformed_request_body(e.to_string()))
}

async fn get_capabilities<C: Connector>(
    state: web::Data<ServerState<C>>,
) -> Result<HttpResponse, ConnectorError> {
    counter!("ndc_requests_total", "route" => "capabilities").increment(1);
    let response = state
        .telemetry
        .with_active_span("getCapabilities", async {
            Ok::<_, ConnectorError>(CapabilitiesResponse {
                capabilities: state.connector.get_capabilities(&state.configuration),
                version: VERSION.to_string(),
            })
        })
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn get_health<C: Connector>(
    state: web::Data<ServerState<C>>,
) -> Result<HttpResponse, ConnectorError> {
    state
        .connector
        .get_health_readiness(&state.configuration, &state.state)
        .await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

async fn get_metrics<C: Connector>(
    state: web::Data<ServerState<C>>,
) -> Result<HttpResponse, ConnectorError> {
    state
        .connector
        .fetch_metrics(&state.configuration, &state.state)
        .await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain")
        .body(state.metrics.render()))
}

async fn get_schema<C: Connector>(
    state: web::Data<ServerState<C>>,
) -> Result<HttpResponse, ConnectorError> {
    counter!("ndc_requests_total", "route" => "schema").increment(1);
    let response = state
        .telemetry
        .with_active_span("getSchema", state.connector.get_schema(&state.configuration))
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn post_query<C: Connector>(
    state: web::Data<ServerState<C>>,
    body: web::Bytes,
) -> Result<HttpResponse, ConnectorError> {
    counter!("ndc_requests_total", "route" => "query").increment(1);
    let request: QueryRequest = decode_request(&body)?;
    let response = state
        .telemetry
        .with_active_span(
            "query",
            state
                .connector
                .query(&state.configuration, &state.state, request),
        )
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn post_query_explain<C: Connector>(
    state: web::Data<ServerState<C>>,
    body: web::Bytes,
) -> Result<HttpResponse, ConnectorError> {
    counter!("ndc_requests_total", "route" => "query_explain").increment(1);
    let request: QueryRequest = decode_request(&body)?;
    let response = state
        .telemetry
        .with_active_span(
            "queryExplain",
            state
                .connector
                .query_explain(&state.configuration, &state.state, request),
        )
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn post_mutation<C: Connector>(
    state: web::Data<ServerState<C>>,
    body: web::Bytes,
) -> Result<HttpResponse, ConnectorError> {
    counter!("ndc_requests_total", "route" => "mutation").increment(1);
    let request: MutationRequest = decode_request(&body)?;
    let response = state
        .telemetry
        .with_active_span(
            "mutation",
            state
                .connector
                .mutation(&state.configuration, &state.state, request),
        )
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn post_mutation_explain<C: Connector>(
    state: web::Data<ServerState<C>>,
    body: web::Bytes,
) -> Result<HttpResponse, ConnectorError> {
    counter!("ndc_requests_total", "route" => "mutation_explain").increment(1);
    let request: MutationRequest = decode_request(&body)?;
    let response = state
        .telemetry
        .with_active_span(
            "mutationExplain",
            state
                .connector
                .mutation_explain(&state.configuration, &state.state, request),
        )
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn post_sql<C: Connector>(
    state: web::Data<ServerState<C>>,
    body: web::Bytes,
) -> Result<HttpResponse, ConnectorError> {
    counter!("ndc_requests_total", "route" => "sql").increment(1);
    let request: SqlRequest = decode_request(&body)?;
    let response = state
        .telemetry
        .with_active_span(
            "sql",
            state
                .connector
                .sql(&state.configuration, &state.state, request),
        )
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
