//! Statement nodes and the field-slot traits they share.
//!
//! Clauses that appear on several statement kinds (WHERE, ORDER BY, LIMIT,
//! RETURNING, ...) are manipulated through one trait per slot. Each trait has
//! two required methods, a getter and a `replace_*` that returns a copy with
//! only that slot swapped, and provides every `clone_with_*` operation on top
//! of them. The operations are therefore written once and behave the same for
//! SELECT, INSERT, UPDATE and DELETE.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use std::sync::Arc;

pub use self::delete::DeleteQueryNode;
pub use self::insert::InsertQueryNode;
pub use self::select::SelectQueryNode;
pub use self::update::UpdateQueryNode;

use crate::ast::clauses::{
    ExplainNode, JoinNode, LimitNode, OrderByItemNode, OrderByNode, OutputNode, ReturningNode,
    SelectionNode, TopNode, WhereNode, WithNode,
};
use crate::ast::node::{NodeList, OperationNode, appended};
use crate::ast::operators::LogicalOp;
use crate::error::QueryResult;

pub trait HasWith: Clone {
    fn with(&self) -> Option<&Arc<WithNode>>;
    fn replace_with(&self, with: Option<Arc<WithNode>>) -> Self;

    /// Add common table expressions. An existing WITH keeps its expressions
    /// and becomes recursive if either side is.
    fn clone_with_with(&self, with: WithNode) -> Self {
        let merged = match self.with() {
            Some(existing) => WithNode {
                recursive: existing.recursive || with.recursive,
                expressions: appended(&existing.expressions, with.expressions.iter().cloned()),
            },
            None => with,
        };
        self.replace_with(Some(Arc::new(merged)))
    }

    fn clone_without_with(&self) -> Self {
        self.replace_with(None)
    }
}

pub trait HasWhere: Clone {
    fn where_clause(&self) -> Option<&Arc<WhereNode>>;
    fn replace_where(&self, where_clause: Option<Arc<WhereNode>>) -> Self;

    /// Add a predicate, AND-ed with any existing one.
    fn clone_with_where(&self, operation: impl Into<OperationNode>) -> Self {
        merge_where(self, LogicalOp::And, operation.into())
    }

    /// Add a predicate, OR-ed with any existing one.
    fn clone_with_or_where(&self, operation: impl Into<OperationNode>) -> Self {
        merge_where(self, LogicalOp::Or, operation.into())
    }

    fn clone_without_where(&self) -> Self {
        self.replace_where(None)
    }
}

fn merge_where<N: HasWhere>(node: &N, op: LogicalOp, operation: OperationNode) -> N {
    let where_clause = match node.where_clause() {
        Some(existing) => existing.clone_with_operation(op, operation),
        None => WhereNode::create(operation),
    };
    node.replace_where(Some(Arc::new(where_clause)))
}

pub trait HasJoins: Clone {
    fn joins(&self) -> Option<&NodeList<Arc<JoinNode>>>;
    fn replace_joins(&self, joins: Option<NodeList<Arc<JoinNode>>>) -> Self;

    /// Append a join after the existing ones.
    fn clone_with_join(&self, join: JoinNode) -> Self {
        let join = Arc::new(join);
        let joins = match self.joins() {
            Some(existing) => appended(existing, [join]),
            None => vec![join].into(),
        };
        self.replace_joins(Some(joins))
    }

    fn clone_without_joins(&self) -> Self {
        self.replace_joins(None)
    }
}

pub trait HasReturning: Clone {
    fn returning(&self) -> Option<&Arc<ReturningNode>>;
    fn replace_returning(&self, returning: Option<Arc<ReturningNode>>) -> Self;

    fn clone_with_returning(
        &self,
        selections: impl IntoIterator<Item = SelectionNode>,
    ) -> QueryResult<Self> {
        let returning = match self.returning() {
            Some(existing) => existing.clone_with_selections(selections),
            None => ReturningNode::create(selections)?,
        };
        Ok(self.replace_returning(Some(Arc::new(returning))))
    }

    fn clone_without_returning(&self) -> Self {
        self.replace_returning(None)
    }
}

pub trait HasOutput: Clone {
    fn output(&self) -> Option<&Arc<OutputNode>>;
    fn replace_output(&self, output: Option<Arc<OutputNode>>) -> Self;

    fn clone_with_output(
        &self,
        selections: impl IntoIterator<Item = OperationNode>,
    ) -> QueryResult<Self> {
        let output = match self.output() {
            Some(existing) => existing.clone_with_selections(selections),
            None => OutputNode::create(selections)?,
        };
        Ok(self.replace_output(Some(Arc::new(output))))
    }

    fn clone_without_output(&self) -> Self {
        self.replace_output(None)
    }
}

pub trait HasOrderBy: Clone {
    fn order_by(&self) -> Option<&Arc<OrderByNode>>;
    fn replace_order_by(&self, order_by: Option<Arc<OrderByNode>>) -> Self;

    /// Append ORDER BY items, creating the clause if needed.
    fn clone_with_order_by_items(
        &self,
        items: impl IntoIterator<Item = OrderByItemNode>,
    ) -> QueryResult<Self> {
        let items = items.into_iter().map(Arc::new);
        let order_by = match self.order_by() {
            Some(existing) => existing.clone_with_items(items),
            None => OrderByNode::create(items)?,
        };
        Ok(self.replace_order_by(Some(Arc::new(order_by))))
    }

    fn clone_without_order_by(&self) -> Self {
        self.replace_order_by(None)
    }
}

pub trait HasLimit: Clone {
    fn limit(&self) -> Option<&Arc<LimitNode>>;
    fn replace_limit(&self, limit: Option<Arc<LimitNode>>) -> Self;

    fn clone_with_limit(&self, limit: impl Into<Arc<LimitNode>>) -> Self {
        self.replace_limit(Some(limit.into()))
    }

    fn clone_without_limit(&self) -> Self {
        self.replace_limit(None)
    }
}

pub trait HasTop: Clone {
    fn top(&self) -> Option<&Arc<TopNode>>;
    fn replace_top(&self, top: Option<Arc<TopNode>>) -> Self;

    fn clone_with_top(&self, top: impl Into<Arc<TopNode>>) -> Self {
        self.replace_top(Some(top.into()))
    }

    fn clone_without_top(&self) -> Self {
        self.replace_top(None)
    }
}

pub trait HasExplain: Clone {
    fn explain(&self) -> Option<&Arc<ExplainNode>>;
    fn replace_explain(&self, explain: Option<Arc<ExplainNode>>) -> Self;

    fn clone_with_explain(&self, explain: impl Into<Arc<ExplainNode>>) -> Self {
        self.replace_explain(Some(explain.into()))
    }

    fn clone_without_explain(&self) -> Self {
        self.replace_explain(None)
    }
}

pub trait HasEndModifiers: Clone {
    fn end_modifiers(&self) -> Option<&NodeList<OperationNode>>;
    fn replace_end_modifiers(&self, modifiers: Option<NodeList<OperationNode>>) -> Self;

    /// Append a trailing modifier (e.g. `FOR UPDATE`, or raw SQL).
    fn clone_with_end_modifier(&self, modifier: impl Into<OperationNode>) -> Self {
        let modifier = modifier.into();
        let modifiers = match self.end_modifiers() {
            Some(existing) => appended(existing, [modifier]),
            None => vec![modifier].into(),
        };
        self.replace_end_modifiers(Some(modifiers))
    }

    fn clone_without_end_modifiers(&self) -> Self {
        self.replace_end_modifiers(None)
    }
}

/// Implement a slot trait for several statement nodes over the same field.
macro_rules! field_slot {
    ($trait:ident, $get:ident, $replace:ident, $field:ident: $ty:ty; $($node:ty),+ $(,)?) => {
        $(
            impl $crate::ast::query::$trait for $node {
                fn $get(&self) -> Option<&$ty> {
                    self.$field.as_ref()
                }

                fn $replace(&self, $field: Option<$ty>) -> Self {
                    Self {
                        $field,
                        ..self.clone()
                    }
                }
            }
        )+
    };
}

field_slot!(HasWith, with, replace_with, with: Arc<WithNode>;
    SelectQueryNode, InsertQueryNode, UpdateQueryNode, DeleteQueryNode);
field_slot!(HasWhere, where_clause, replace_where, where_clause: Arc<WhereNode>;
    SelectQueryNode, UpdateQueryNode, DeleteQueryNode);
field_slot!(HasJoins, joins, replace_joins, joins: NodeList<Arc<JoinNode>>;
    SelectQueryNode, UpdateQueryNode, DeleteQueryNode);
field_slot!(HasReturning, returning, replace_returning, returning: Arc<ReturningNode>;
    InsertQueryNode, UpdateQueryNode, DeleteQueryNode);
field_slot!(HasOutput, output, replace_output, output: Arc<OutputNode>;
    InsertQueryNode, UpdateQueryNode, DeleteQueryNode);
field_slot!(HasOrderBy, order_by, replace_order_by, order_by: Arc<OrderByNode>;
    SelectQueryNode, UpdateQueryNode, DeleteQueryNode);
field_slot!(HasLimit, limit, replace_limit, limit: Arc<LimitNode>;
    SelectQueryNode, UpdateQueryNode, DeleteQueryNode);
field_slot!(HasTop, top, replace_top, top: Arc<TopNode>;
    SelectQueryNode, InsertQueryNode, UpdateQueryNode, DeleteQueryNode);
field_slot!(HasExplain, explain, replace_explain, explain: Arc<ExplainNode>;
    SelectQueryNode, InsertQueryNode, UpdateQueryNode, DeleteQueryNode);
field_slot!(HasEndModifiers, end_modifiers, replace_end_modifiers, end_modifiers: NodeList<OperationNode>;
    SelectQueryNode, InsertQueryNode, UpdateQueryNode, DeleteQueryNode);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::clauses::table_list;
    use crate::ast::expr::ValueNode;
    use crate::ast::names::ColumnNode;
    use crate::ast::operators::SortDirection;

    fn item(col: &str) -> OrderByItemNode {
        OrderByItemNode::create(ColumnNode::create(col).unwrap(), Some(SortDirection::Asc))
    }

    #[test]
    fn test_order_by_is_uniform_across_kinds() {
        let select = SelectQueryNode::create_from(table_list(["users"]).unwrap(), None)
            .unwrap()
            .clone_with_order_by_items([item("a")])
            .unwrap()
            .clone_with_order_by_items([item("b")])
            .unwrap();
        let delete = DeleteQueryNode::create(table_list(["users"]).unwrap(), None)
            .unwrap()
            .clone_with_order_by_items([item("a")])
            .unwrap()
            .clone_with_order_by_items([item("b")])
            .unwrap();

        assert_eq!(select.order_by, delete.order_by);
        assert_eq!(select.order_by.as_ref().unwrap().items.len(), 2);
        assert!(delete.clone_without_order_by().order_by.is_none());
    }

    #[test]
    fn test_order_by_rejects_empty_on_create() {
        let delete = DeleteQueryNode::create(table_list(["users"]).unwrap(), None)
            .unwrap();
        assert!(delete.clone_with_order_by_items(Vec::new()).is_err());
    }

    #[test]
    fn test_where_merges() {
        let delete = DeleteQueryNode::create(table_list(["users"]).unwrap(), None)
            .unwrap()
            .clone_with_where(ValueNode::create(true))
            .clone_with_or_where(ValueNode::create(false));
        let predicate = &delete.where_clause.as_ref().unwrap().predicate;
        assert_eq!(predicate.kind(), crate::ast::NodeKind::Or);
    }

    #[test]
    fn test_end_modifiers_append() {
        use crate::ast::clauses::ModifierNode;
        use crate::ast::operators::StatementModifier;

        let select = SelectQueryNode::create_from(table_list(["jobs"]).unwrap(), None)
            .unwrap()
            .clone_with_end_modifier(ModifierNode::create(StatementModifier::ForUpdate))
            .clone_with_end_modifier(ModifierNode::create(StatementModifier::SkipLocked));
        assert_eq!(select.end_modifiers.as_ref().unwrap().len(), 2);
    }
}
