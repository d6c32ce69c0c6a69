//! Identifier-like nodes: tables, columns, references and aliases.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::node::{NodeKind, OperationNode};
use crate::error::{QueryError, QueryResult};

/// A bare identifier. Quoted by the dialect at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierNode {
    pub name: String,
}

impl IdentifierNode {
    pub fn create(name: impl Into<String>) -> QueryResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(QueryError::invalid(NodeKind::Identifier, "requires a non-empty name"));
        }
        Ok(Self { name })
    }
}

/// A table, optionally qualified by a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableNode {
    pub schema: Option<Arc<IdentifierNode>>,
    pub table: Arc<IdentifierNode>,
}

impl TableNode {
    pub fn create(table: impl Into<String>) -> QueryResult<Self> {
        Ok(Self {
            schema: None,
            table: Arc::new(IdentifierNode::create(table)?),
        })
    }

    pub fn create_with_schema(
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> QueryResult<Self> {
        Ok(Self {
            schema: Some(Arc::new(IdentifierNode::create(schema)?)),
            table: Arc::new(IdentifierNode::create(table)?),
        })
    }

    /// Same table, qualified by `schema`. The table identifier is shared.
    pub fn clone_with_schema(&self, schema: Arc<IdentifierNode>) -> Self {
        Self {
            schema: Some(schema),
            table: self.table.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.table.name
    }
}

/// An unqualified column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNode {
    pub column: Arc<IdentifierNode>,
}

impl ColumnNode {
    pub fn create(column: impl Into<String>) -> QueryResult<Self> {
        Ok(Self {
            column: Arc::new(IdentifierNode::create(column)?),
        })
    }
}

/// `*`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectAllNode {}

impl SelectAllNode {
    pub fn create() -> Self {
        Self {}
    }
}

/// A column (or `*`) qualified by a table: `"users"."id"`, `"users".*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceNode {
    pub table: Option<Arc<TableNode>>,
    /// Either a [`ColumnNode`] or a [`SelectAllNode`].
    pub column: OperationNode,
}

impl ReferenceNode {
    pub fn create(column: ColumnNode, table: Option<TableNode>) -> Self {
        Self {
            table: table.map(Arc::new),
            column: column.into(),
        }
    }

    pub fn create_select_all(table: TableNode) -> Self {
        Self {
            table: Some(Arc::new(table)),
            column: SelectAllNode::create().into(),
        }
    }

    /// Parse a dotted `table.column` name into a reference.
    pub fn parse(name: &str) -> QueryResult<Self> {
        match name.rsplit_once('.') {
            Some((table, "*")) => Ok(Self::create_select_all(TableNode::create(table)?)),
            Some((table, column)) => Ok(Self::create(
                ColumnNode::create(column)?,
                Some(TableNode::create(table)?),
            )),
            None => Ok(Self::create(ColumnNode::create(name)?, None)),
        }
    }
}

/// `<node> AS <alias>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasNode {
    pub node: OperationNode,
    pub alias: Arc<IdentifierNode>,
}

impl AliasNode {
    pub fn create(node: impl Into<OperationNode>, alias: impl Into<String>) -> QueryResult<Self> {
        Ok(Self {
            node: node.into(),
            alias: Arc::new(IdentifierNode::create(alias)?),
        })
    }
}
