//! Response-side wire shapes shared by the query and explain routes, plus
//! the uniform error envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::collections::HashMap;

/// The body of a successful `POST /query`.
///
/// Queries with variables return one [`RowSet`] per variable set; otherwise
/// there is exactly one. On the wire this is a bare JSON array, not an
/// object wrapping one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryResponse(pub Vec<RowSet>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    /// The results of the aggregates returned by the query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<JsonMap<String, JsonValue>>,

    /// The rows returned by the query, corresponding to the query's fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<JsonMap<String, JsonValue>>>,
}

/// The body of a successful `POST /query/explain` or
/// `POST /mutation/explain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainResponse {
    /// Human-readable key-value pairs describing the execution plan. A
    /// relational connector might return the generated SQL and/or the
    /// output of `EXPLAIN`; an API-based connector might list the calls it
    /// would make.
    pub details: HashMap<String, String>,
}

/// The uniform error body written for every failed request, regardless of
/// whether the failure came from the connector or from the dispatcher
/// itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A human-readable summary of the error
    pub message: String,

    /// Any additional structured information about the error. Unlike every
    /// other optional in this crate, `details` is always present on the
    /// wire and may be `null`.
    pub details: Option<JsonValue>,
}
