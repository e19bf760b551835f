//! The relational `Rel` algebra: the engine-side plan envelope.
//!
//! Structurally parallel to [`crate::plan`] but an independent sub-grammar
//! with its own serializers; its expression grammar is wider (`Cast`,
//! `TryCast`, `Case`). Column references are positional indices into the
//! input node's output schema, exactly as in the `Plan` algebra.

use serde::{Deserialize, Serialize};

pub type CollectionName = String;
pub type ColumnName = String;

/// The engine-side envelope wrapping a [`Rel`] tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRel {
    pub rel: Rel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Rel {
    From {
        collection: CollectionName,
        columns: Vec<ColumnName>,
    },
    Limit {
        input: Box<Rel>,
        fetch: Option<usize>,
        skip: usize,
    },
    Project {
        input: Box<Rel>,
        exprs: Vec<RelExpression>,
    },
    Filter {
        input: Box<Rel>,
        predicate: RelExpression,
    },
    Sort {
        input: Box<Rel>,
        exprs: Vec<SortExpr>,
    },
    Distinct {
        input: Box<Rel>,
    },
    DistinctOn {
        input: Box<Rel>,
        exprs: Vec<RelExpression>,
    },
    Join {
        left: Box<Rel>,
        right: Box<Rel>,
        on: Vec<JoinOn>,
        join_type: JoinType,
    },
    Aggregate {
        input: Box<Rel>,
        group_by: Vec<RelExpression>,
        aggregates: Vec<RelExpression>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseWhen {
    pub when: RelExpression,
    pub then: RelExpression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinOn {
    pub left: RelExpression,
    pub right: RelExpression,
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
    pub expr: RelExpression,
    pub asc: bool,
    pub nulls_first: bool,
}

/// Typed literals; every payload is nullable on the wire.
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
pub enum RelExpression {
    Literal { literal: Literal },
    /// Positional index into the input node's output schema
    Column { index: usize },
    Cast { expr: Box<RelExpression>, as_type: Literal },
    TryCast { expr: Box<RelExpression>, as_type: Literal },
    Case { when: Vec<CaseWhen>, default: Option<Box<RelExpression>> },

    // Binary operators
    And { left: Box<RelExpression>, right: Box<RelExpression> },
    Or { left: Box<RelExpression>, right: Box<RelExpression> },
    Eq { left: Box<RelExpression>, right: Box<RelExpression> },
    NotEq { left: Box<RelExpression>, right: Box<RelExpression> },
    Lt { left: Box<RelExpression>, right: Box<RelExpression> },
    LtEq { left: Box<RelExpression>, right: Box<RelExpression> },
    Gt { left: Box<RelExpression>, right: Box<RelExpression> },
    GtEq { left: Box<RelExpression>, right: Box<RelExpression> },
    Plus { left: Box<RelExpression>, right: Box<RelExpression> },
    Minus { left: Box<RelExpression>, right: Box<RelExpression> },
    Multiply { left: Box<RelExpression>, right: Box<RelExpression> },
    Divide { left: Box<RelExpression>, right: Box<RelExpression> },
    Modulo { left: Box<RelExpression>, right: Box<RelExpression> },
    Like { expr: Box<RelExpression>, pattern: Box<RelExpression> },
    ILike { expr: Box<RelExpression>, pattern: Box<RelExpression> },
    NotLike { expr: Box<RelExpression>, pattern: Box<RelExpression> },
    NotILike { expr: Box<RelExpression>, pattern: Box<RelExpression> },

    // Unary operators
    Not { expr: Box<RelExpression> },
    IsNotNull { expr: Box<RelExpression> },
    IsNull { expr: Box<RelExpression> },
    IsTrue { expr: Box<RelExpression> },
    IsFalse { expr: Box<RelExpression> },
    IsUnknown { expr: Box<RelExpression> },
    IsNotTrue { expr: Box<RelExpression> },
    IsNotFalse { expr: Box<RelExpression> },
    IsNotUnknown { expr: Box<RelExpression> },
    Negative { expr: Box<RelExpression> },

    // Other operators
    Between { low: Box<RelExpression>, high: Box<RelExpression> },
    NotBetween { low: Box<RelExpression>, high: Box<RelExpression> },
    In { expr: Box<RelExpression>, list: Vec<RelExpression> },
    NotIn { expr: Box<RelExpression>, list: Vec<RelExpression> },

    // Scalar functions
    ToLower { expr: Box<RelExpression> },
    ToUpper { expr: Box<RelExpression> },

    // Aggregate functions
    Average { expr: Box<RelExpression> },
    BoolAnd { expr: Box<RelExpression> },
    BoolOr { expr: Box<RelExpression> },
    Count { expr: Box<RelExpression> },
    FirstValue { expr: Box<RelExpression> },
    LastValue { expr: Box<RelExpression> },
    Max { expr: Box<RelExpression> },
    Mean { expr: Box<RelExpression> },
    Median { expr: Box<RelExpression> },
    Min { expr: Box<RelExpression> },
    StringAgg { expr: Box<RelExpression> },
    Sum { expr: Box<RelExpression> },
    Var { expr: Box<RelExpression> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn case_expression_round_trips() {
        let raw = json!({
            "rel": {
                "type": "Project",
                "input": { "type": "From", "collection": "t", "columns": ["a"] },
                "exprs": [{
                    "type": "Case",
                    "when": [{
                        "when": {
                            "type": "IsNull",
                            "expr": { "type": "Column", "index": 0 }
                        },
                        "then": {
                            "type": "Literal",
                            "literal": { "type": "Utf8", "value": "unknown" }
                        }
                    }],
                    "default": { "type": "Column", "index": 0 }
                }]
            }
        });
        let request: QueryRel = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&request).unwrap(), raw);
    }

    #[test]
    fn cast_carries_target_type_as_literal() {
        let expr = RelExpression::TryCast {
            expr: Box::new(RelExpression::Column { index: 2 }),
            as_type: Literal::Int32 { value: None },
        };
        let encoded = serde_json::to_value(&expr).unwrap();
        assert_eq!(encoded["type"], "TryCast");
        assert_eq!(encoded["as_type"]["type"], "Int32");
        let decoded: RelExpression = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, expr);
    }
}
