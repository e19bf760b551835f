//! Query IR: the request-side tree grammar for `/query` and
//! `/query/explain`.
//!
//! The tree is rooted at [`QueryRequest`] and recursive through
//! [`Field::Relationship`] (which embeds a full sub-[`Query`]) and the
//! boolean connectives of [`Expression`]. Trees are constructed top-down
//! per request and immutable once decoded.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// The body of `POST /query` and `POST /query/explain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The collection being queried
    pub collection: String,

    /// Arguments to be provided to the collection
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub arguments: HashMap<String, Argument>,

    /// The query to be executed
    pub query: Query,

    /// The relationships between collections involved in the entire query
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub collection_relationships: HashMap<String, Relationship>,

    /// Variables to be used in the query, one set per requested row set
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<HashMap<String, JsonValue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Aggregate fields of the query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<HashMap<String, Aggregate>>,

    /// Fields of the query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<HashMap<String, Field>>,

    /// Optionally limit to N results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Optionally offset from the Nth result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Aggregate {
    ColumnCount {
        /// The column to apply the count aggregate function to
        column: String,

        /// Path to a nested field within an object column
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_path: Option<Vec<String>>,

        /// Whether or not only distinct items should be counted
        distinct: bool,
    },
    SingleColumn {
        /// The column to apply the aggregation function to
        column: String,

        /// Path to a nested field within an object column
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_path: Option<Vec<String>>,

        /// Single column aggregate function name
        function: String,
    },
    StarCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    /// The elements to order by, in priority order
    pub elements: Vec<OrderByElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByElement {
    pub order_direction: OrderDirection,
    pub target: OrderByTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderByTarget {
    Column {
        /// The name of the column
        name: String,

        /// Path to a nested field within an object column
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_path: Option<Vec<String>>,

        /// Any relationships to traverse to reach this column
        path: Vec<PathElement>,
    },
    SingleColumnAggregate {
        /// The column to apply the aggregation function to
        column: String,

        /// Path to a nested field within an object column
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_path: Option<Vec<String>>,

        /// Single column aggregate function name
        function: String,

        /// Non-empty collection of relationships to traverse
        path: Vec<PathElement>,
    },
    StarCountAggregate {
        /// Non-empty collection of relationships to traverse
        path: Vec<PathElement>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    /// The name of the relationship to follow
    pub relationship: String,

    /// Values to be provided to any collection arguments
    pub arguments: HashMap<String, RelationshipArgument>,

    /// A predicate expression to apply to the target collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Box<Expression>>,
}

/// A boolean predicate over one row of a collection. Recursive through
/// the connectives and through `exists`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    And {
        expressions: Vec<Expression>,
    },
    Or {
        expressions: Vec<Expression>,
    },
    Not {
        expression: Box<Expression>,
    },
    UnaryComparisonOperator {
        column: ComparisonTarget,
        operator: UnaryComparisonOperator,
    },
    BinaryComparisonOperator {
        column: ComparisonTarget,
        operator: String,
        value: ComparisonValue,
    },
    Exists {
        in_collection: ExistsInCollection,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        predicate: Option<Box<Expression>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonTarget {
    Column {
        /// The name of the column
        name: String,

        /// Path to a nested field within an object column
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_path: Option<Vec<String>>,

        /// Any relationships to traverse to reach this column
        path: Vec<PathElement>,
    },
    RootCollectionColumn {
        /// The name of the column
        name: String,

        /// Path to a nested field within an object column
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_path: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryComparisonOperator {
    IsNull,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonValue {
    Column { column: ComparisonTarget },
    Scalar { value: JsonValue },
    Variable { name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExistsInCollection {
    Related {
        relationship: String,
        /// Values to be provided to any collection arguments
        arguments: HashMap<String, RelationshipArgument>,
    },
    Unrelated {
        /// The name of a collection
        collection: String,
        /// Values to be provided to any collection arguments
        arguments: HashMap<String, RelationshipArgument>,
    },
    NestedCollection {
        column_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arguments: Option<HashMap<String, Argument>>,
        /// Path to a nested collection via object columns
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_path: Option<Vec<String>>,
    },
}

/// One requested output field of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Field {
    Column {
        column: String,

        /// When the type of the column is a (possibly-nullable) array or
        /// object, the caller can request a subset of the complete column
        /// data by specifying fields to fetch here. If omitted, the column
        /// data is fetched in full.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fields: Option<NestedField>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        arguments: Option<HashMap<String, Argument>>,
    },
    Relationship {
        query: Query,

        /// The name of the relationship to follow for the subquery
        relationship: String,

        /// Values to be provided to any collection arguments
        arguments: HashMap<String, RelationshipArgument>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NestedField {
    Object { fields: HashMap<String, Field> },
    Array { fields: Box<NestedField> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Argument {
    /// The argument is provided by reference to a variable
    Variable { name: String },
    /// The argument is provided as a literal value
    Literal { value: JsonValue },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelationshipArgument {
    /// The argument is provided by reference to a variable
    Variable { name: String },
    /// The argument is provided as a literal value
    Literal { value: JsonValue },
    Column { name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// A mapping between columns on the source collection to columns on
    /// the target collection
    pub column_mapping: HashMap<String, String>,

    pub relationship_type: RelationshipType,

    /// The name of a collection
    pub target_collection: String,

    /// Values to be provided to any collection arguments
    pub arguments: HashMap<String, RelationshipArgument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Object,
    Array,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expression_discriminators_are_snake_case() {
        let expr = Expression::BinaryComparisonOperator {
            column: ComparisonTarget::Column {
                name: "id".to_string(),
                field_path: None,
                path: vec![],
            },
            operator: "eq".to_string(),
            value: ComparisonValue::Scalar { value: json!(1) },
        };
        let encoded = serde_json::to_value(&expr).unwrap();
        assert_eq!(encoded["type"], "binary_comparison_operator");
        assert_eq!(encoded["column"]["type"], "column");
        assert_eq!(encoded["value"]["type"], "scalar");
    }

    #[test]
    fn absent_optionals_are_omitted_not_null() {
        let query = Query {
            aggregates: None,
            fields: None,
            limit: Some(10),
            offset: None,
            order_by: None,
            predicate: None,
        };
        let encoded = serde_json::to_value(&query).unwrap();
        assert_eq!(encoded, json!({ "limit": 10 }));
    }

    #[test]
    fn field_path_uses_external_snake_case_name() {
        let agg = Aggregate::ColumnCount {
            column: "price".to_string(),
            field_path: Some(vec!["nested".to_string()]),
            distinct: true,
        };
        let encoded = serde_json::to_value(&agg).unwrap();
        assert_eq!(
            encoded,
            json!({
                "type": "column_count",
                "column": "price",
                "field_path": ["nested"],
                "distinct": true
            })
        );
    }

    #[test]
    fn unknown_discriminator_is_rejected() {
        let err = serde_json::from_value::<Expression>(json!({
            "type": "xor",
            "expressions": []
        }))
        .unwrap_err();
        assert!(err.to_string().contains("xor"));
    }

    #[test]
    fn relationship_field_embeds_sub_query() {
        let raw = json!({
            "type": "relationship",
            "relationship": "author",
            "arguments": {},
            "query": {
                "fields": {
                    "name": { "type": "column", "column": "name" }
                }
            }
        });
        let field: Field = serde_json::from_value(raw.clone()).unwrap();
        match &field {
            Field::Relationship { query, relationship, .. } => {
                assert_eq!(relationship, "author");
                assert!(query.fields.as_ref().unwrap().contains_key("name"));
            }
            other => panic!("expected relationship field, got {:?}", other),
        }
        assert_eq!(serde_json::to_value(&field).unwrap(), raw);
    }

    #[test]
    fn query_request_defaults_round_trip() {
        let raw = json!({
            "collection": "users",
            "query": {
                "fields": {
                    "id": { "type": "column", "column": "id" }
                }
            }
        });
        let request: QueryRequest = serde_json::from_value(raw.clone()).unwrap();
        assert!(request.arguments.is_empty());
        assert!(request.collection_relationships.is_empty());
        assert!(request.variables.is_empty());
        // Empty defaults stay off the wire on the way back out.
        assert_eq!(serde_json::to_value(&request).unwrap(), raw);
    }

    #[test]
    fn nested_expression_round_trips() {
        let expr = Expression::And {
            expressions: vec![
                Expression::Not {
                    expression: Box::new(Expression::UnaryComparisonOperator {
                        column: ComparisonTarget::RootCollectionColumn {
                            name: "deleted_at".to_string(),
                            field_path: None,
                        },
                        operator: UnaryComparisonOperator::IsNull,
                    }),
                },
                Expression::Exists {
                    in_collection: ExistsInCollection::Related {
                        relationship: "orders".to_string(),
                        arguments: HashMap::new(),
                    },
                    predicate: None,
                },
            ],
        };
        let encoded = serde_json::to_string(&expr).unwrap();
        let decoded: Expression = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, expr);
    }
}
