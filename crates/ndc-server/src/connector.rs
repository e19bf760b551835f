//! The seam between the harness and a concrete data source.

use crate::error::ConnectorError;
use async_trait::async_trait;
use ndc_ir::capabilities::Capabilities;
use ndc_ir::{
    ExplainResponse, MutationRequest, MutationResponse, QueryRequest, QueryResponse,
    SchemaResponse, SqlRequest,
};
use serde_json::Value as JsonValue;
use std::path::Path;

/// A data connector: the harness owns the HTTP surface, implementations of
/// this trait own everything behind it.
///
/// `parse_configuration` and `try_init_state` each run once at startup; the
/// resulting values are shared across all requests for the lifetime of the
/// process, so `State` is the place for connection pools and other
/// long-lived resources.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Validated settings loaded from the configuration directory
    type Configuration: Send + Sync + 'static;
    /// Mutable-behind-a-lock or read-mostly runtime resources
    type State: Send + Sync + 'static;

    /// Validate the configuration files provided by the user.
    async fn parse_configuration(
        &self,
        configuration_dir: &Path,
    ) -> Result<Self::Configuration, ConnectorError>;

    /// Initialize the connector's in-memory state, e.g. connection pools or
    /// prepared queries.
    async fn try_init_state(
        &self,
        configuration: &Self::Configuration,
    ) -> Result<Self::State, ConnectorError>;

    /// Update any connector-specific metrics before a scrape.
    async fn fetch_metrics(
        &self,
        _configuration: &Self::Configuration,
        _state: &Self::State,
    ) -> Result<(), ConnectorError> {
        Ok(())
    }

    /// Check the readiness of the connector's backing source.
    async fn get_health_readiness(
        &self,
        _configuration: &Self::Configuration,
        _state: &Self::State,
    ) -> Result<(), ConnectorError> {
        Ok(())
    }

    /// The protocol features this connector supports. Infallible: a
    /// connector always knows its own capabilities.
    fn get_capabilities(&self, configuration: &Self::Configuration) -> Capabilities;

    async fn get_schema(
        &self,
        configuration: &Self::Configuration,
    ) -> Result<SchemaResponse, ConnectorError>;

    /// Explain a query by producing a plan description without running it.
    async fn query_explain(
        &self,
        configuration: &Self::Configuration,
        state: &Self::State,
        request: QueryRequest,
    ) -> Result<ExplainResponse, ConnectorError>;

    /// Explain a mutation without applying it.
    async fn mutation_explain(
        &self,
        configuration: &Self::Configuration,
        state: &Self::State,
        request: MutationRequest,
    ) -> Result<ExplainResponse, ConnectorError>;

    async fn mutation(
        &self,
        configuration: &Self::Configuration,
        state: &Self::State,
        request: MutationRequest,
    ) -> Result<MutationResponse, ConnectorError>;

    async fn query(
        &self,
        configuration: &Self::Configuration,
        state: &Self::State,
        request: QueryRequest,
    ) -> Result<QueryResponse, ConnectorError>;

    /// Execute a relational plan, returning its rows as a JSON array.
    async fn sql(
        &self,
        configuration: &Self::Configuration,
        state: &Self::State,
        request: SqlRequest,
    ) -> Result<Vec<JsonValue>, ConnectorError>;
}
