//! The relational `Plan` algebra: the body of `POST /sql`.
//!
//! A plan is a tree of relational nodes, each wrapping its `input`
//! sub-plan. Column references in [`PlanExpression::Column`] are positional
//! indices into the input node's output schema, not names — consumers must
//! track schema shape through each node to resolve them.
//!
//! This algebra uses PascalCase `"type"` discriminators and is a separate
//! sub-grammar from the snake_case query IR; the [`crate::rel`] algebra is
//! structurally similar but independent, and the two never share
//! serializers.

use serde::{Deserialize, Serialize};

pub type CollectionName = String;
pub type ColumnName = String;

/// The body of `POST /sql`: a relational plan produced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlRequest {
    pub plan: Plan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Plan {
    From {
        collection: CollectionName,
        columns: Vec<ColumnName>,
    },
    Limit {
        input: Box<Plan>,
        fetch: Option<usize>,
        skip: usize,
    },
    Project {
        input: Box<Plan>,
        exprs: Vec<PlanExpression>,
    },
    Filter {
        input: Box<Plan>,
        predicate: PlanExpression,
    },
    Sort {
        input: Box<Plan>,
        exprs: Vec<SortExpr>,
    },
    Distinct {
        input: Box<Plan>,
    },
    DistinctOn {
        input: Box<Plan>,
        exprs: Vec<PlanExpression>,
    },
    Join {
        left: Box<Plan>,
        right: Box<Plan>,
        on: Vec<JoinOn>,
        join_type: JoinType,
    },
    Aggregate {
        input: Box<Plan>,
        group_by: Vec<PlanExpression>,
        aggregates: Vec<PlanExpression>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinOn {
    pub left: PlanExpression,
    pub right: PlanExpression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Left,
    Right,
    Inner,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortExpr {
    pub expr: PlanExpression,
    pub asc: bool,
    pub nulls_first: bool,
}

/// Typed literals, one variant per scalar width/kind. Every payload is
/// nullable on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Literal {
    Null,
    Boolean { value: Option<bool> },
    Float32 { value: Option<f32> },
    Float64 { value: Option<f64> },
    Int8 { value: Option<i8> },
    Int16 { value: Option<i16> },
    Int32 { value: Option<i32> },
    Int64 { value: Option<i64> },
    UInt8 { value: Option<u8> },
    UInt16 { value: Option<u16> },
    UInt32 { value: Option<u32> },
    UInt64 { value: Option<u64> },
    Utf8 { value: Option<String> },
    Date32 { value: Option<i32> },
    Date64 { value: Option<i64> },
    Time32Second { value: Option<i32> },
    Time32Millisecond { value: Option<i32> },
    Time64Microsecond { value: Option<i64> },
    Time64Nanosecond { value: Option<i64> },
    TimestampSecond { value: Option<i64> },
    TimestampMillisecond { value: Option<i64> },
    TimestampMicrosecond { value: Option<i64> },
    TimestampNanosecond { value: Option<i64> },
    DurationSecond { value: Option<i64> },
    DurationMillisecond { value: Option<i64> },
    DurationMicrosecond { value: Option<i64> },
    DurationNanosecond { value: Option<i64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlanExpression {
    Literal { literal: Literal },
    /// Positional index into the input plan's output schema
    Column { index: usize },

    // Binary operators
    And { left: Box<PlanExpression>, right: Box<PlanExpression> },
    Or { left: Box<PlanExpression>, right: Box<PlanExpression> },
    Eq { left: Box<PlanExpression>, right: Box<PlanExpression> },
    NotEq { left: Box<PlanExpression>, right: Box<PlanExpression> },
    Lt { left: Box<PlanExpression>, right: Box<PlanExpression> },
    LtEq { left: Box<PlanExpression>, right: Box<PlanExpression> },
    Gt { left: Box<PlanExpression>, right: Box<PlanExpression> },
    GtEq { left: Box<PlanExpression>, right: Box<PlanExpression> },
    Plus { left: Box<PlanExpression>, right: Box<PlanExpression> },
    Minus { left: Box<PlanExpression>, right: Box<PlanExpression> },
    Multiply { left: Box<PlanExpression>, right: Box<PlanExpression> },
    Divide { left: Box<PlanExpression>, right: Box<PlanExpression> },
    Modulo { left: Box<PlanExpression>, right: Box<PlanExpression> },
    Like { expr: Box<PlanExpression>, pattern: Box<PlanExpression> },
    ILike { expr: Box<PlanExpression>, pattern: Box<PlanExpression> },
    NotLike { expr: Box<PlanExpression>, pattern: Box<PlanExpression> },
    NotILike { expr: Box<PlanExpression>, pattern: Box<PlanExpression> },

    // Unary operators
    Not { expr: Box<PlanExpression> },
    IsNotNull { expr: Box<PlanExpression> },
    IsNull { expr: Box<PlanExpression> },
    IsTrue { expr: Box<PlanExpression> },
    IsFalse { expr: Box<PlanExpression> },
    IsUnknown { expr: Box<PlanExpression> },
    IsNotTrue { expr: Box<PlanExpression> },
    IsNotFalse { expr: Box<PlanExpression> },
    IsNotUnknown { expr: Box<PlanExpression> },
    Negative { expr: Box<PlanExpression> },

    // Other operators
    Between { low: Box<PlanExpression>, high: Box<PlanExpression> },
    NotBetween { low: Box<PlanExpression>, high: Box<PlanExpression> },
    In { expr: Box<PlanExpression>, list: Vec<PlanExpression> },
    NotIn { expr: Box<PlanExpression>, list: Vec<PlanExpression> },

    // Scalar functions
    ToLower { expr: Box<PlanExpression> },
    ToUpper { expr: Box<PlanExpression> },

    // Aggregate functions
    Average { expr: Box<PlanExpression> },
    BoolAnd { expr: Box<PlanExpression> },
    BoolOr { expr: Box<PlanExpression> },
    Count { expr: Box<PlanExpression> },
    FirstValue { expr: Box<PlanExpression> },
    LastValue { expr: Box<PlanExpression> },
    Max { expr: Box<PlanExpression> },
    Mean { expr: Box<PlanExpression> },
    Median { expr: Box<PlanExpression> },
    Min { expr: Box<PlanExpression> },
    StringAgg { expr: Box<PlanExpression> },
    Sum { expr: Box<PlanExpression> },
    Var { expr: Box<PlanExpression> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nodes_use_pascal_case_type_tags() {
        let plan = Plan::Limit {
            input: Box::new(Plan::From {
                collection: "users".to_string(),
                columns: vec!["id".to_string(), "name".to_string()],
            }),
            fetch: Some(10),
            skip: 0,
        };
        let encoded = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            encoded,
            json!({
                "type": "Limit",
                "input": {
                    "type": "From",
                    "collection": "users",
                    "columns": ["id", "name"]
                },
                "fetch": 10,
                "skip": 0
            })
        );
    }

    #[test]
    fn column_references_are_positional() {
        let expr = PlanExpression::Eq {
            left: Box::new(PlanExpression::Column { index: 1 }),
            right: Box::new(PlanExpression::Literal {
                literal: Literal::Int64 { value: Some(42) },
            }),
        };
        let encoded = serde_json::to_value(&expr).unwrap();
        assert_eq!(encoded["left"], json!({ "type": "Column", "index": 1 }));
        assert_eq!(
            encoded["right"]["literal"],
            json!({ "type": "Int64", "value": 42 })
        );
        let decoded: PlanExpression = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, expr);
    }

    #[test]
    fn null_literal_payloads_stay_explicit() {
        // Literal payloads are required-but-nullable, unlike the query IR's
        // omitted optionals.
        let literal = Literal::Utf8 { value: None };
        assert_eq!(
            serde_json::to_value(&literal).unwrap(),
            json!({ "type": "Utf8", "value": null })
        );
        assert!(serde_json::from_value::<Literal>(json!({ "type": "Utf8" })).is_err());
    }

    #[test]
    fn snake_case_tags_are_not_accepted() {
        // The algebras are distinct sub-grammars; a query-IR style tag must
        // not decode here.
        assert!(serde_json::from_value::<Plan>(json!({
            "type": "from",
            "collection": "users",
            "columns": []
        }))
        .is_err());
    }

    #[test]
    fn sql_request_wraps_a_plan() {
        let raw = json!({
            "plan": {
                "type": "Filter",
                "input": { "type": "From", "collection": "t", "columns": ["a"] },
                "predicate": {
                    "type": "IsNotNull",
                    "expr": { "type": "Column", "index": 0 }
                }
            }
        });
        let request: SqlRequest = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&request).unwrap(), raw);
    }
}
