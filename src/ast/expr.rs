//! Expression nodes: values, operators, predicates and function calls.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::node::{NodeKind, NodeList, OperationNode, non_empty};
use crate::ast::operators::{LogicalOp, Operator};
use crate::ast::values::Value;
use crate::error::{QueryError, QueryResult};

/// A scalar. Bound values become parameters; immediate values are inlined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueNode {
    pub value: Value,
    #[serde(default)]
    pub immediate: bool,
}

impl ValueNode {
    pub fn create(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            immediate: false,
        }
    }

    /// A value rendered as a literal instead of a placeholder.
    pub fn create_immediate(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            immediate: true,
        }
    }
}

/// Parenthesized list of expressions: `(a, b, c)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueListNode {
    pub values: NodeList<OperationNode>,
}

impl ValueListNode {
    pub fn create(values: impl IntoIterator<Item = OperationNode>) -> QueryResult<Self> {
        Ok(Self {
            values: non_empty(values, NodeKind::ValueList, "requires at least one value")?,
        })
    }

    /// Build a list of bound values.
    pub fn from_values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> QueryResult<Self> {
        Self::create(values.into_iter().map(|v| ValueNode::create(v).into()))
    }
}

/// Verbatim SQL. `sql_fragments` surround the parameters:
/// `fragments[0] param[0] fragments[1] ... fragments[n]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub sql_fragments: NodeList<String>,
    pub parameters: NodeList<OperationNode>,
}

impl RawNode {
    pub fn create(
        sql_fragments: impl IntoIterator<Item = String>,
        parameters: impl IntoIterator<Item = OperationNode>,
    ) -> QueryResult<Self> {
        let sql_fragments: NodeList<String> = sql_fragments.into_iter().collect();
        let parameters: NodeList<OperationNode> = parameters.into_iter().collect();
        if sql_fragments.len() != parameters.len() + 1 {
            return Err(QueryError::invalid(
                NodeKind::Raw,
                "requires exactly one more SQL fragment than parameters",
            ));
        }
        Ok(Self {
            sql_fragments,
            parameters,
        })
    }

    pub fn create_with_sql(sql: impl Into<String>) -> Self {
        Self {
            sql_fragments: vec![sql.into()].into(),
            parameters: Vec::new().into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorNode {
    pub operator: Operator,
}

impl OperatorNode {
    pub fn create(operator: Operator) -> Self {
        Self { operator }
    }
}

/// `<left> <operator> <right>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOperationNode {
    pub left: OperationNode,
    pub operator: Arc<OperatorNode>,
    pub right: OperationNode,
}

impl BinaryOperationNode {
    pub fn create(
        left: impl Into<OperationNode>,
        operator: Operator,
        right: impl Into<OperationNode>,
    ) -> Self {
        Self {
            left: left.into(),
            operator: Arc::new(OperatorNode::create(operator)),
            right: right.into(),
        }
    }
}

/// `<operator> <operand>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOperationNode {
    pub operator: Arc<OperatorNode>,
    pub operand: OperationNode,
}

impl UnaryOperationNode {
    pub fn create(operator: Operator, operand: impl Into<OperationNode>) -> QueryResult<Self> {
        if !operator.is_unary() {
            return Err(QueryError::invalid(
                NodeKind::UnaryOperation,
                "requires a unary operator",
            ));
        }
        Ok(Self {
            operator: Arc::new(OperatorNode::create(operator)),
            operand: operand.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndNode {
    pub left: OperationNode,
    pub right: OperationNode,
}

impl AndNode {
    pub fn create(left: impl Into<OperationNode>, right: impl Into<OperationNode>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrNode {
    pub left: OperationNode,
    pub right: OperationNode,
}

impl OrNode {
    pub fn create(left: impl Into<OperationNode>, right: impl Into<OperationNode>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParensNode {
    pub node: OperationNode,
}

impl ParensNode {
    pub fn create(node: impl Into<OperationNode>) -> Self {
        Self { node: node.into() }
    }
}

/// `name(arg, ...)`. The name is emitted verbatim, never quoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionNode {
    pub name: String,
    pub arguments: NodeList<OperationNode>,
}

impl FunctionNode {
    pub fn create(
        name: impl Into<String>,
        arguments: impl IntoIterator<Item = OperationNode>,
    ) -> QueryResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(QueryError::invalid(NodeKind::Function, "requires a non-empty name"));
        }
        Ok(Self {
            name,
            arguments: arguments.into_iter().collect(),
        })
    }
}

/// Join two predicates with AND / OR.
pub fn combine(op: LogicalOp, left: OperationNode, right: OperationNode) -> OperationNode {
    match op {
        LogicalOp::And => AndNode::create(left, right).into(),
        LogicalOp::Or => OrNode::create(left, right).into(),
    }
}
