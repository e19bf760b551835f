//! An in-memory connector over a hardcoded `users` collection.
//!
//! Small enough to read in one sitting, complete enough to exercise every
//! route of the harness: discovery, query with projection and paging,
//! explain, and the NotSupported paths for mutations and SQL passthrough.

use async_trait::async_trait;
use ndc_ir::capabilities::{
    Capabilities, LeafCapability, MutationCapabilities, QueryCapabilities,
};
use ndc_ir::query::Field;
use ndc_ir::response::RowSet;
use ndc_ir::schema::{
    CollectionInfo, ObjectField, ObjectType, RepresentationType, ScalarType, SchemaResponse,
    Type, TypeRepresentation, UniquenessConstraint,
};
use ndc_ir::{
    ExplainResponse, MutationRequest, MutationResponse, QueryRequest, QueryResponse, SqlRequest,
};
use ndc_server::{Connector, ConnectorError};
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use std::collections::HashMap;
use std::path::Path;

pub struct ReferenceConnector;

/// No settings beyond the (validated) configuration directory.
pub struct Configuration;

pub struct State {
    users: Vec<JsonMap<String, JsonValue>>,
}

fn seed_users() -> Vec<JsonMap<String, JsonValue>> {
    let rows = [json!({ "id": 1, "name": "Alice" }), json!({ "id": 2, "name": "Bob" })];
    rows.iter()
        .map(|row| row.as_object().unwrap().clone())
        .collect()
}

fn scalar_type(representation: RepresentationType) -> ScalarType {
    ScalarType {
        aggregate_functions: HashMap::new(),
        comparison_operators: HashMap::new(),
        representation: Some(TypeRepresentation {
            representation_type: representation,
            one_of: None,
        }),
    }
}

fn named(name: &str) -> Type {
    Type::Named {
        name: name.to_string(),
    }
}

/// Project one stored row down to the requested fields. Absent columns
/// come back as JSON null rather than failing the whole query.
fn project_row(
    row: &JsonMap<String, JsonValue>,
    fields: &HashMap<String, Field>,
) -> Result<JsonMap<String, JsonValue>, ConnectorError> {
    let mut projected = JsonMap::new();
    for (alias, field) in fields {
        match field {
            Field::Column { column, .. } => {
                let value = row.get(column).cloned().unwrap_or(JsonValue::Null);
                projected.insert(alias.clone(), value);
            }
            Field::Relationship { .. } => {
                return Err(ConnectorError::not_supported(
                    "Relationship fields are not supported",
                ));
            }
        }
    }
    Ok(projected)
}

#[async_trait]
impl Connector for ReferenceConnector {
    type Configuration = Configuration;
    type State = State;

    async fn parse_configuration(
        &self,
        configuration_dir: &Path,
    ) -> Result<Configuration, ConnectorError> {
        if !configuration_dir.is_dir() {
            return Err(ConnectorError::bad_request(format!(
                "Configuration directory does not exist: {}",
                configuration_dir.display()
            )));
        }
        Ok(Configuration)
    }

    async fn try_init_state(&self, _configuration: &Configuration) -> Result<State, ConnectorError> {
        Ok(State {
            users: seed_users(),
        })
    }

    fn get_capabilities(&self, _configuration: &Configuration) -> Capabilities {
        Capabilities {
            mutation: MutationCapabilities::default(),
            query: QueryCapabilities {
                explain: Some(LeafCapability::new()),
                ..Default::default()
            },
            relationships: None,
        }
    }

    async fn get_schema(&self, _configuration: &Configuration) -> Result<SchemaResponse, ConnectorError> {
        let user_fields = HashMap::from([
            (
                "id".to_string(),
                ObjectField {
                    arguments: None,
                    description: None,
                    field_type: named("Int"),
                },
            ),
            (
                "name".to_string(),
                ObjectField {
                    arguments: None,
                    description: None,
                    field_type: named("String"),
                },
            ),
        ]);

        Ok(SchemaResponse {
            collections: vec![CollectionInfo {
                arguments: HashMap::new(),
                description: Some("Registered users".to_string()),
                foreign_keys: HashMap::new(),
                name: "users".to_string(),
                collection_type: "user".to_string(),
                uniqueness_constraints: HashMap::from([(
                    "UserById".to_string(),
                    UniquenessConstraint {
                        unique_columns: vec!["id".to_string()],
                    },
                )]),
            }],
            functions: vec![],
            object_types: HashMap::from([(
                "user".to_string(),
                ObjectType {
                    description: None,
                    fields: user_fields,
                },
            )]),
            procedures: vec![],
            scalar_types: HashMap::from([
                ("Int".to_string(), scalar_type(RepresentationType::Int32)),
                ("String".to_string(), scalar_type(RepresentationType::String)),
            ]),
        })
    }

    async fn query_explain(
        &self,
        _configuration: &Configuration,
        _state: &State,
        request: QueryRequest,
    ) -> Result<ExplainResponse, ConnectorError> {
        Ok(ExplainResponse {
            details: HashMap::from([(
                "plan".to_string(),
                format!("in-memory scan of {}", request.collection),
            )]),
        })
    }

    async fn mutation_explain(
        &self,
        _configuration: &Configuration,
        _state: &State,
        _request: MutationRequest,
    ) -> Result<ExplainResponse, ConnectorError> {
        Err(ConnectorError::not_supported("Mutations are not supported"))
    }

    async fn mutation(
        &self,
        _configuration: &Configuration,
        _state: &State,
        _request: MutationRequest,
    ) -> Result<MutationResponse, ConnectorError> {
        Err(ConnectorError::not_supported("Mutations are not supported"))
    }

    async fn query(
        &self,
        _configuration: &Configuration,
        state: &State,
        request: QueryRequest,
    ) -> Result<QueryResponse, ConnectorError> {
        if request.collection != "users" {
            return Err(ConnectorError::bad_request(format!(
                "Unknown collection: {}",
                request.collection
            )));
        }

        let offset = request.query.offset.map(|o| o as usize).unwrap_or(0);
        let limit = request
            .query
            .limit
            .map(|l| l as usize)
            .unwrap_or(state.users.len());

        let rows = state
            .users
            .iter()
            .skip(offset)
            .take(limit)
            .map(|row| match &request.query.fields {
                Some(fields) => project_row(row, fields),
                None => Ok(row.clone()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryResponse(vec![RowSet {
            aggregates: None,
            rows: Some(rows),
        }]))
    }

    async fn sql(
        &self,
        _configuration: &Configuration,
        _state: &State,
        _request: SqlRequest,
    ) -> Result<Vec<JsonValue>, ConnectorError> {
        Err(ConnectorError::not_supported("SQL is not supported"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> State {
        State {
            users: seed_users(),
        }
    }

    fn users_request(query: JsonValue) -> QueryRequest {
        serde_json::from_value(json!({ "collection": "users", "query": query })).unwrap()
    }

    #[actix_web::test]
    async fn projects_requested_columns() {
        let request = users_request(json!({
            "fields": { "user_name": { "type": "column", "column": "name" } }
        }));
        let response = ReferenceConnector
            .query(&Configuration, &state(), request)
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!([{ "rows": [{ "user_name": "Alice" }, { "user_name": "Bob" }] }])
        );
    }

    #[actix_web::test]
    async fn honors_limit_and_offset() {
        let request = users_request(json!({ "limit": 1, "offset": 1 }));
        let response = ReferenceConnector
            .query(&Configuration, &state(), request)
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!([{ "rows": [{ "id": 2, "name": "Bob" }] }])
        );
    }

    #[actix_web::test]
    async fn rejects_unknown_collections() {
        let request = users_request(json!({}));
        let request = QueryRequest {
            collection: "orders".to_string(),
            ..request
        };
        let err = ReferenceConnector
            .query(&Configuration, &state(), request)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Unknown collection: orders");
    }

    #[actix_web::test]
    async fn configuration_directory_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ReferenceConnector
            .parse_configuration(dir.path())
            .await
            .is_ok());

        let missing = dir.path().join("nope");
        assert!(ReferenceConnector
            .parse_configuration(&missing)
            .await
            .is_err());
    }

    #[actix_web::test]
    async fn schema_declares_the_users_collection() {
        let schema = ReferenceConnector
            .get_schema(&Configuration)
            .await
            .unwrap();
        assert_eq!(schema.collections[0].name, "users");
        assert!(schema.object_types.contains_key("user"));
        assert!(schema.scalar_types.contains_key("Int"));
    }
}
