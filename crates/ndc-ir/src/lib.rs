//! Wire-format intermediate representation for the NDC connector protocol.
//!
//! Every type in this crate is pure data: the structured tree grammar the
//! orchestrating engine exchanges with a connector over HTTP/JSON. Variant
//! types serialize as internally tagged JSON objects, and the discriminator
//! key and tag strings are part of the wire contract — changing any of them
//! breaks interoperability with the engine.
//!
//! Two tagging conventions coexist and must not be mixed:
//!
//! - The query IR ([`query`], [`mutation`]) and schema descriptors
//!   ([`schema`]) use a `"type"` discriminator with snake_case tags
//!   (`"and"`, `"binary_comparison_operator"`, `"root_collection_column"`).
//! - The relational algebras ([`plan`], [`rel`]) use a `"type"`
//!   discriminator with PascalCase tags (`"From"`, `"Project"`, `"Eq"`).
//!   The two algebras are independent sub-grammars with independent
//!   serializers even where they look structurally identical.
//!
//! Optional attributes that are absent are omitted from the emitted JSON,
//! never written as `null`. The one exception is
//! [`response::ErrorResponse::details`], which the contract requires to be
//! present (and allows to be `null`).

pub mod capabilities;
pub mod mutation;
pub mod plan;
pub mod query;
pub mod rel;
pub mod response;
pub mod schema;

/// The protocol version this crate implements. Served in
/// `CapabilitiesResponse` and checked by version negotiation.
pub const VERSION: &str = "0.1.6";

pub use capabilities::{Capabilities, CapabilitiesResponse};
pub use mutation::{MutationOperation, MutationOperationResults, MutationRequest, MutationResponse};
pub use plan::SqlRequest;
pub use query::{Query, QueryRequest};
pub use response::{ErrorResponse, ExplainResponse, QueryResponse, RowSet};
pub use schema::SchemaResponse;
