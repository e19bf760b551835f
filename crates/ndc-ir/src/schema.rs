//! Schema wire shapes for `GET /schema`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The body of a successful `GET /schema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaResponse {
    /// Collections which are available for queries
    pub collections: Vec<CollectionInfo>,

    /// Functions (i.e. collections which return a single column and row)
    pub functions: Vec<FunctionInfo>,

    /// Object types which can be used as the types of arguments, or return
    /// types of procedures. Names should not overlap with scalar type names.
    pub object_types: HashMap<String, ObjectType>,

    /// Procedures which are available for execution as part of mutations
    pub procedures: Vec<ProcedureInfo>,

    /// Scalar types which will be used as the types of collection columns
    pub scalar_types: HashMap<String, ScalarType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// Any arguments that this collection requires
    pub arguments: HashMap<String, ArgumentInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Any foreign key constraints enforced on this collection
    pub foreign_keys: HashMap<String, ForeignKeyConstraint>,

    /// The name of the collection. These names are abstract, with no
    /// requirement that they correspond to actual collection names in the
    /// backing store.
    pub name: String,

    /// The name of the collection's object type
    #[serde(rename = "type")]
    pub collection_type: String,

    /// Any uniqueness constraints enforced on this collection
    pub uniqueness_constraints: HashMap<String, UniquenessConstraint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The type of this argument
    #[serde(rename = "type")]
    pub argument_type: Type,
}

/// Types used in the schema: scalar and object type references plus the
/// nullable/array constructors over them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Type {
    /// A named scalar or object type
    Named { name: String },
    /// A nullable type
    Nullable { underlying_type: Box<Type> },
    /// An array type
    Array { element_type: Box<Type> },
    /// A predicate type for a given object type
    Predicate { object_type_name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyConstraint {
    /// Mapping from local column names to referenced column names
    pub column_mapping: HashMap<String, String>,

    /// The referenced collection
    pub foreign_collection: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniquenessConstraint {
    /// Columns which this constraint requires to be unique in combination
    pub unique_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    /// Any arguments that this function requires
    pub arguments: HashMap<String, ArgumentInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The name of the function
    pub name: String,

    /// The name of the function's result type
    pub result_type: Type,
}

/// The definition of an object type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Fields defined on this object type
    pub fields: HashMap<String, ObjectField>,
}

/// The definition of an object field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectField {
    /// The arguments available to the field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<HashMap<String, ArgumentInfo>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The type of this field
    #[serde(rename = "type")]
    pub field_type: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureInfo {
    /// Any arguments that this procedure requires
    pub arguments: HashMap<String, ArgumentInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The name of the procedure
    pub name: String,

    /// The name of the result type
    pub result_type: Type,
}

/// The definition of a scalar type, i.e. types that can be used as the
/// types of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarType {
    /// A map from aggregate function names to their definitions
    pub aggregate_functions: HashMap<String, AggregateFunctionDefinition>,

    /// A map from comparison operator names to their definitions
    pub comparison_operators: HashMap<String, ComparisonOperatorDefinition>,

    /// A description of valid values for this scalar type. Consumers treat
    /// an omitted representation as arbitrary JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representation: Option<TypeRepresentation>,
}

/// The definition of an aggregation function on a scalar type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateFunctionDefinition {
    /// The scalar or object type of the result of this function
    pub result_type: Type,
}

/// The definition of a comparison operator on a scalar type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOperatorDefinition {
    #[serde(rename = "type")]
    pub operator_type: ComparisonOperatorDefinitionType,

    /// The type of the argument to this operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_type: Option<Type>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperatorDefinitionType {
    Custom,
    Equal,
    In,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRepresentation {
    #[serde(rename = "type")]
    pub representation_type: RepresentationType,

    /// The admissible string values, for the `enum` representation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepresentationType {
    Bigdecimal,
    Biginteger,
    Boolean,
    Bytes,
    Date,
    Enum,
    Float32,
    Float64,
    Geography,
    Geometry,
    Int8,
    Int16,
    Int32,
    Int64,
    Integer,
    Json,
    Number,
    String,
    Timestamp,
    Timestamptz,
    Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_constructors_nest() {
        let ty = Type::Nullable {
            underlying_type: Box::new(Type::Array {
                element_type: Box::new(Type::Named {
                    name: "Int".to_string(),
                }),
            }),
        };
        let encoded = serde_json::to_value(&ty).unwrap();
        assert_eq!(
            encoded,
            json!({
                "type": "nullable",
                "underlying_type": {
                    "type": "array",
                    "element_type": { "type": "named", "name": "Int" }
                }
            })
        );
        let decoded: Type = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, ty);
    }

    #[test]
    fn collection_info_uses_type_field_on_the_wire() {
        let info = CollectionInfo {
            arguments: HashMap::new(),
            description: None,
            foreign_keys: HashMap::new(),
            name: "users".to_string(),
            collection_type: "user".to_string(),
            uniqueness_constraints: HashMap::from([(
                "UserByID".to_string(),
                UniquenessConstraint {
                    unique_columns: vec!["id".to_string()],
                },
            )]),
        };
        let encoded = serde_json::to_value(&info).unwrap();
        assert_eq!(encoded["type"], "user");
        assert!(encoded.get("description").is_none());
        assert_eq!(
            encoded["uniqueness_constraints"]["UserByID"]["unique_columns"],
            json!(["id"])
        );
    }

    #[test]
    fn comparison_operator_kinds_are_lowercase() {
        let op = ComparisonOperatorDefinition {
            operator_type: ComparisonOperatorDefinitionType::Equal,
            argument_type: None,
        };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({ "type": "equal" })
        );
        let custom: ComparisonOperatorDefinition = serde_json::from_value(json!({
            "type": "custom",
            "argument_type": { "type": "named", "name": "String" }
        }))
        .unwrap();
        assert_eq!(
            custom.operator_type,
            ComparisonOperatorDefinitionType::Custom
        );
    }

    #[test]
    fn enum_representation_carries_one_of() {
        let representation = TypeRepresentation {
            representation_type: RepresentationType::Enum,
            one_of: Some(vec!["on".to_string(), "off".to_string()]),
        };
        assert_eq!(
            serde_json::to_value(&representation).unwrap(),
            json!({ "type": "enum", "one_of": ["on", "off"] })
        );
    }
}
