//! Clause nodes: FROM, USING, JOIN, WHERE, RETURNING, ORDER BY, LIMIT, ...
//!
//! List-valued clauses reject an empty item list at construction, so a
//! present clause always renders something. "No clause" is expressed by the
//! owning query holding `None`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::expr::{ValueListNode, ValueNode, combine};
use crate::ast::names::{ColumnNode, IdentifierNode, SelectAllNode, TableNode};
use crate::ast::node::{NodeKind, NodeList, OperationNode, appended, non_empty};
use crate::ast::operators::{
    ExplainFormat, JoinType, LogicalOp, SortDirection, StatementModifier, TopModifier,
};
use crate::ast::values::Value;
use crate::error::QueryResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromNode {
    pub froms: NodeList<OperationNode>,
}

impl FromNode {
    pub fn create(froms: impl IntoIterator<Item = OperationNode>) -> QueryResult<Self> {
        Ok(Self {
            froms: non_empty(froms, NodeKind::From, "requires at least one table")?,
        })
    }

    pub fn clone_with_froms(&self, froms: impl IntoIterator<Item = OperationNode>) -> Self {
        Self {
            froms: appended(&self.froms, froms),
        }
    }
}

/// `USING t1, t2` of a multi-table DELETE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsingNode {
    pub tables: NodeList<OperationNode>,
}

impl UsingNode {
    pub fn create(tables: impl IntoIterator<Item = OperationNode>) -> QueryResult<Self> {
        Ok(Self {
            tables: non_empty(tables, NodeKind::Using, "requires at least one table")?,
        })
    }

    pub fn clone_with_tables(&self, tables: impl IntoIterator<Item = OperationNode>) -> Self {
        Self {
            tables: appended(&self.tables, tables),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnNode {
    pub on: OperationNode,
}

impl OnNode {
    pub fn create(on: impl Into<OperationNode>) -> Self {
        Self { on: on.into() }
    }

    pub fn clone_with_operation(&self, op: LogicalOp, operation: impl Into<OperationNode>) -> Self {
        Self {
            on: combine(op, self.on.clone(), operation.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinNode {
    pub join_type: JoinType,
    pub table: OperationNode,
    pub on: Option<Arc<OnNode>>,
}

impl JoinNode {
    pub fn create(join_type: JoinType, table: impl Into<OperationNode>) -> Self {
        Self {
            join_type,
            table: table.into(),
            on: None,
        }
    }

    pub fn create_with_on(
        join_type: JoinType,
        table: impl Into<OperationNode>,
        on: impl Into<OperationNode>,
    ) -> Self {
        Self {
            join_type,
            table: table.into(),
            on: Some(Arc::new(OnNode::create(on))),
        }
    }

    /// Add a join condition, AND-ed with any existing one.
    pub fn clone_with_on(&self, operation: impl Into<OperationNode>) -> Self {
        let on = match &self.on {
            Some(on) => on.clone_with_operation(LogicalOp::And, operation),
            None => OnNode::create(operation),
        };
        Self {
            on: Some(Arc::new(on)),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereNode {
    pub predicate: OperationNode,
}

impl WhereNode {
    pub fn create(predicate: impl Into<OperationNode>) -> Self {
        Self {
            predicate: predicate.into(),
        }
    }

    pub fn clone_with_operation(&self, op: LogicalOp, operation: impl Into<OperationNode>) -> Self {
        Self {
            predicate: combine(op, self.predicate.clone(), operation.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HavingNode {
    pub predicate: OperationNode,
}

impl HavingNode {
    pub fn create(predicate: impl Into<OperationNode>) -> Self {
        Self {
            predicate: predicate.into(),
        }
    }

    pub fn clone_with_operation(&self, op: LogicalOp, operation: impl Into<OperationNode>) -> Self {
        Self {
            predicate: combine(op, self.predicate.clone(), operation.into()),
        }
    }
}

/// One item of a select list / RETURNING list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionNode {
    pub selection: OperationNode,
}

impl SelectionNode {
    pub fn create(selection: impl Into<OperationNode>) -> Self {
        Self {
            selection: selection.into(),
        }
    }

    pub fn create_select_all() -> Self {
        Self::create(SelectAllNode::create())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturningNode {
    pub selections: NodeList<Arc<SelectionNode>>,
}

impl ReturningNode {
    pub fn create(selections: impl IntoIterator<Item = SelectionNode>) -> QueryResult<Self> {
        Ok(Self {
            selections: non_empty(
                selections.into_iter().map(Arc::new),
                NodeKind::Returning,
                "requires at least one selection",
            )?,
        })
    }

    pub fn clone_with_selections(&self, selections: impl IntoIterator<Item = SelectionNode>) -> Self {
        Self {
            selections: appended(&self.selections, selections.into_iter().map(Arc::new)),
        }
    }
}

/// SQL Server `OUTPUT inserted.x, deleted.y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputNode {
    pub selections: NodeList<OperationNode>,
}

impl OutputNode {
    pub fn create(selections: impl IntoIterator<Item = OperationNode>) -> QueryResult<Self> {
        Ok(Self {
            selections: non_empty(selections, NodeKind::Output, "requires at least one selection")?,
        })
    }

    pub fn clone_with_selections(&self, selections: impl IntoIterator<Item = OperationNode>) -> Self {
        Self {
            selections: appended(&self.selections, selections),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItemNode {
    pub order_by: OperationNode,
    pub direction: Option<SortDirection>,
}

impl OrderByItemNode {
    pub fn create(order_by: impl Into<OperationNode>, direction: Option<SortDirection>) -> Self {
        Self {
            order_by: order_by.into(),
            direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByNode {
    pub items: NodeList<Arc<OrderByItemNode>>,
}

impl OrderByNode {
    pub fn create(items: impl IntoIterator<Item = Arc<OrderByItemNode>>) -> QueryResult<Self> {
        Ok(Self {
            items: non_empty(items, NodeKind::OrderBy, "requires at least one item")?,
        })
    }

    pub fn clone_with_items(&self, items: impl IntoIterator<Item = Arc<OrderByItemNode>>) -> Self {
        Self {
            items: appended(&self.items, items),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupByNode {
    pub items: NodeList<OperationNode>,
}

impl GroupByNode {
    pub fn create(items: impl IntoIterator<Item = OperationNode>) -> QueryResult<Self> {
        Ok(Self {
            items: non_empty(items, NodeKind::GroupBy, "requires at least one item")?,
        })
    }

    pub fn clone_with_items(&self, items: impl IntoIterator<Item = OperationNode>) -> Self {
        Self {
            items: appended(&self.items, items),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitNode {
    pub limit: OperationNode,
}

impl LimitNode {
    pub fn create(limit: impl Into<OperationNode>) -> Self {
        Self {
            limit: limit.into(),
        }
    }

    /// `LIMIT <n>` with `n` bound as a parameter.
    pub fn rows(n: i64) -> Self {
        Self::create(ValueNode::create(n))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetNode {
    pub offset: OperationNode,
}

impl OffsetNode {
    pub fn create(offset: impl Into<OperationNode>) -> Self {
        Self {
            offset: offset.into(),
        }
    }

    pub fn rows(n: i64) -> Self {
        Self::create(ValueNode::create(n))
    }
}

/// `TOP(<n>) [PERCENT] [WITH TIES]`. The count is always a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopNode {
    pub expression: u64,
    pub modifiers: Option<TopModifier>,
}

impl TopNode {
    pub fn create(expression: u64, modifiers: Option<TopModifier>) -> Self {
        Self {
            expression,
            modifiers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainNode {
    pub format: Option<ExplainFormat>,
    /// Extra options, typically a raw node such as `ANALYZE`.
    pub options: Option<OperationNode>,
}

impl ExplainNode {
    pub fn create(format: Option<ExplainFormat>, options: Option<OperationNode>) -> Self {
        Self { format, options }
    }
}

/// `"name"("col1", "col2")` heading a common table expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableExpressionNameNode {
    pub table: Arc<IdentifierNode>,
    pub columns: Option<NodeList<Arc<ColumnNode>>>,
}

impl CommonTableExpressionNameNode {
    pub fn create(table: impl Into<String>, columns: Option<Vec<String>>) -> QueryResult<Self> {
        let columns = match columns {
            Some(cols) => Some(
                cols.into_iter()
                    .map(|c| ColumnNode::create(c).map(Arc::new))
                    .collect::<QueryResult<Vec<_>>>()?
                    .into(),
            ),
            None => None,
        };
        Ok(Self {
            table: Arc::new(IdentifierNode::create(table)?),
            columns,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableExpressionNode {
    pub name: Arc<CommonTableExpressionNameNode>,
    /// `Some(true)` = MATERIALIZED, `Some(false)` = NOT MATERIALIZED.
    pub materialized: Option<bool>,
    pub expression: OperationNode,
}

impl CommonTableExpressionNode {
    pub fn create(name: CommonTableExpressionNameNode, expression: impl Into<OperationNode>) -> Self {
        Self {
            name: Arc::new(name),
            materialized: None,
            expression: expression.into(),
        }
    }

    pub fn clone_with_materialized(&self, materialized: bool) -> Self {
        Self {
            materialized: Some(materialized),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithNode {
    pub recursive: bool,
    pub expressions: NodeList<Arc<CommonTableExpressionNode>>,
}

impl WithNode {
    pub fn create(expression: CommonTableExpressionNode, recursive: bool) -> Self {
        Self {
            recursive,
            expressions: vec![Arc::new(expression)].into(),
        }
    }

    pub fn clone_with_expression(&self, expression: CommonTableExpressionNode) -> Self {
        Self {
            recursive: self.recursive,
            expressions: appended(&self.expressions, [Arc::new(expression)]),
        }
    }

    /// Names bound by this WITH clause.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.expressions.iter().map(|cte| cte.name.table.name.as_str())
    }
}

/// `"column" = <value>` inside SET / ON CONFLICT DO UPDATE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnUpdateNode {
    pub column: Arc<ColumnNode>,
    pub value: OperationNode,
}

impl ColumnUpdateNode {
    pub fn create(column: ColumnNode, value: impl Into<OperationNode>) -> Self {
        Self {
            column: Arc::new(column),
            value: value.into(),
        }
    }

    /// Assign a bound value to a named column.
    pub fn set(column: impl Into<String>, value: impl Into<Value>) -> QueryResult<Self> {
        Ok(Self::create(ColumnNode::create(column)?, ValueNode::create(value)))
    }
}

/// `VALUES (..), (..)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuesNode {
    pub rows: NodeList<Arc<ValueListNode>>,
}

impl ValuesNode {
    pub fn create(rows: impl IntoIterator<Item = ValueListNode>) -> QueryResult<Self> {
        Ok(Self {
            rows: non_empty(
                rows.into_iter().map(Arc::new),
                NodeKind::Values,
                "requires at least one row",
            )?,
        })
    }
}

/// `ON CONFLICT (...) DO NOTHING | DO UPDATE SET ... [WHERE ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnConflictNode {
    pub columns: Option<NodeList<Arc<ColumnNode>>>,
    pub constraint: Option<Arc<IdentifierNode>>,
    pub do_nothing: bool,
    pub updates: Option<NodeList<Arc<ColumnUpdateNode>>>,
    pub update_where: Option<Arc<WhereNode>>,
}

impl OnConflictNode {
    pub fn create_do_nothing(columns: impl IntoIterator<Item = ColumnNode>) -> Self {
        Self {
            columns: Self::target(columns),
            constraint: None,
            do_nothing: true,
            updates: None,
            update_where: None,
        }
    }

    pub fn create_do_update(
        columns: impl IntoIterator<Item = ColumnNode>,
        updates: impl IntoIterator<Item = ColumnUpdateNode>,
    ) -> QueryResult<Self> {
        Ok(Self {
            columns: Self::target(columns),
            constraint: None,
            do_nothing: false,
            updates: Some(non_empty(
                updates.into_iter().map(Arc::new),
                NodeKind::OnConflict,
                "DO UPDATE requires at least one assignment",
            )?),
            update_where: None,
        })
    }

    pub fn clone_with_constraint(&self, constraint: impl Into<String>) -> QueryResult<Self> {
        Ok(Self {
            constraint: Some(Arc::new(IdentifierNode::create(constraint)?)),
            ..self.clone()
        })
    }

    pub fn clone_with_update_where(&self, operation: impl Into<OperationNode>) -> Self {
        let update_where = match &self.update_where {
            Some(w) => w.clone_with_operation(LogicalOp::And, operation),
            None => WhereNode::create(operation),
        };
        Self {
            update_where: Some(Arc::new(update_where)),
            ..self.clone()
        }
    }

    fn target(columns: impl IntoIterator<Item = ColumnNode>) -> Option<NodeList<Arc<ColumnNode>>> {
        let columns: Vec<Arc<ColumnNode>> = columns.into_iter().map(Arc::new).collect();
        if columns.is_empty() {
            None
        } else {
            Some(columns.into())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierNode {
    pub modifier: StatementModifier,
}

impl ModifierNode {
    pub fn create(modifier: StatementModifier) -> Self {
        Self { modifier }
    }
}

/// Table nodes for a list of plain table names.
pub fn table_list<S: Into<String>>(
    names: impl IntoIterator<Item = S>,
) -> QueryResult<Vec<OperationNode>> {
    names
        .into_iter()
        .map(|t| TableNode::create(t).map(OperationNode::from))
        .collect()
}
