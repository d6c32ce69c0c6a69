//! Transpiler test modules.
//!
//! Tests are organized by category:
//! - `core`: basic SELECT, INSERT, UPDATE, DELETE on the default dialect
//! - `dialects`: dialect-specific rendering and rejection
//! - `features`: CTEs, upserts, EXPLAIN, lateral joins, modifiers

mod dialects;
mod features;

use crate::ast::*;

pub(super) fn col(name: &str) -> ColumnNode {
    ColumnNode::create(name).unwrap()
}

pub(super) fn tables(names: &[&str]) -> Vec<OperationNode> {
    table_list(names.iter().copied()).unwrap()
}

/// `"<column>" = <bound value>`
pub(super) fn eq(column: &str, value: impl Into<Value>) -> BinaryOperationNode {
    BinaryOperationNode::create(col(column), Operator::Eq, ValueNode::create(value))
}

pub(super) fn delete_from(table: &str) -> DeleteQueryNode {
    DeleteQueryNode::create(tables(&[table]), None).unwrap()
}

pub(super) fn select_from(table: &str) -> SelectQueryNode {
    SelectQueryNode::create_from(tables(&[table]), None).unwrap()
}
