//! HTTP server harness for the NDC data connector protocol.
//!
//! The harness owns the wire surface: routing, authentication, version
//! negotiation, error rendering, telemetry, metrics, and startup options.
//! A data source plugs in by implementing [`Connector`] and calling
//! [`start_server_from_args`] from its `main`.
//!
//! ```no_run
//! # use ndc_server::{start_server_from_args, Connector};
//! # async fn run<MyConnector: Connector + Default>() -> anyhow::Result<()> {
//! start_server_from_args(MyConnector::default()).await
//! # }
//! ```

pub mod connector;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod middleware;
pub mod options;
pub mod routes;
pub mod telemetry;

pub use connector::Connector;
pub use error::ConnectorError;
pub use lifecycle::{start_server, start_server_from_args};
pub use options::ServerOptions;
pub use routes::ServerState;
pub use telemetry::Telemetry;
