//! Capability advertisement for `GET /capabilities`.
//!
//! Leaf capabilities carry no data of their own: presence means supported,
//! absence means unsupported. They are empty JSON objects on the wire so
//! future revisions can attach options without a breaking change.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// A capability toggle with no options, `{}` on the wire when present.
pub type LeafCapability = JsonMap<String, JsonValue>;

/// The body of a successful `GET /capabilities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilitiesResponse {
    pub capabilities: Capabilities,

    /// The protocol version the connector speaks, e.g. [`crate::VERSION`]
    pub version: String,
}

/// Describes the features of the protocol which a data connector
/// implements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub mutation: MutationCapabilities,
    pub query: QueryCapabilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<RelationshipCapabilities>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationCapabilities {
    /// Does the connector support explaining mutations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<LeafCapability>,

    /// Does the connector support executing multiple mutations in a
    /// transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactional: Option<LeafCapability>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryCapabilities {
    /// Does the connector support aggregate queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<LeafCapability>,

    /// Does the connector support EXISTS predicates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exists: Option<ExistsCapabilities>,

    /// Does the connector support explaining queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<LeafCapability>,

    /// Does the connector support nested fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_fields: Option<NestedFieldCapabilities>,

    /// Does the connector support queries which use variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<LeafCapability>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExistsCapabilities {
    /// Does the connector support EXISTS over nested collections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_collections: Option<LeafCapability>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestedFieldCapabilities {
    /// Does the connector support aggregating values within nested fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<LeafCapability>,

    /// Does the connector support filtering by values of nested fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_by: Option<LeafCapability>,

    /// Does the connector support ordering by values of nested fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<LeafCapability>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipCapabilities {
    /// Does the connector support ordering by an aggregated array
    /// relationship
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by_aggregate: Option<LeafCapability>,

    /// Does the connector support comparisons that involve related
    /// collections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_comparisons: Option<LeafCapability>,
}
