//! Mutation request/response wire shapes for `/mutation` and
//! `/mutation/explain`.

use crate::query::{NestedField, Relationship};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::collections::HashMap;

/// The body of `POST /mutation` and `POST /mutation/explain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRequest {
    /// The mutation operations to perform
    pub operations: Vec<MutationOperation>,

    /// The relationships between collections involved in the entire
    /// mutation request
    pub collection_relationships: HashMap<String, Relationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MutationOperation {
    Procedure {
        /// The name of a procedure
        name: String,

        /// Any named procedure arguments
        arguments: JsonMap<String, JsonValue>,

        /// The fields to return from the result, or null to return
        /// everything
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fields: Option<NestedField>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    /// The results of each mutation operation, in the same order as they
    /// were received
    pub operation_results: Vec<MutationOperationResults>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MutationOperationResults {
    Procedure { result: JsonValue },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn procedure_operation_round_trips() {
        let raw = json!({
            "operations": [{
                "type": "procedure",
                "name": "upsert_user",
                "arguments": { "id": 1 }
            }],
            "collection_relationships": {}
        });
        let request: MutationRequest = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&request).unwrap(), raw);
    }

    #[test]
    fn procedure_result_is_tagged() {
        let response = MutationResponse {
            operation_results: vec![MutationOperationResults::Procedure {
                result: json!({ "affected_rows": 1 }),
            }],
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "operation_results": [{
                    "type": "procedure",
                    "result": { "affected_rows": 1 }
                }]
            })
        );
    }
}
