use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::clauses::{
    ExplainNode, FromNode, GroupByNode, HavingNode, JoinNode, LimitNode, OffsetNode, OrderByNode,
    SelectionNode, TopNode, WhereNode, WithNode,
};
use crate::ast::node::{NodeList, OperationNode, appended};
use crate::ast::operators::LogicalOp;
use crate::error::QueryResult;

/// `SELECT ...`
///
/// A select without `from` compiles to a bare `SELECT <selections>`; one
/// without selections selects `*`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectQueryNode {
    pub from: Option<Arc<FromNode>>,
    pub selections: Option<NodeList<Arc<SelectionNode>>>,
    #[serde(default)]
    pub distinct: bool,
    pub joins: Option<NodeList<Arc<JoinNode>>>,
    pub where_clause: Option<Arc<WhereNode>>,
    pub group_by: Option<Arc<GroupByNode>>,
    pub having: Option<Arc<HavingNode>>,
    pub order_by: Option<Arc<OrderByNode>>,
    pub limit: Option<Arc<LimitNode>>,
    pub offset: Option<Arc<OffsetNode>>,
    pub with: Option<Arc<WithNode>>,
    pub explain: Option<Arc<ExplainNode>>,
    pub top: Option<Arc<TopNode>>,
    pub end_modifiers: Option<NodeList<OperationNode>>,
}

impl SelectQueryNode {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn create_from(
        from_items: impl IntoIterator<Item = OperationNode>,
        with: Option<WithNode>,
    ) -> QueryResult<Self> {
        Ok(Self {
            from: Some(Arc::new(FromNode::create(from_items)?)),
            with: with.map(Arc::new),
            ..Self::default()
        })
    }

    pub fn clone_with_selections(&self, selections: impl IntoIterator<Item = SelectionNode>) -> Self {
        let selections = selections.into_iter().map(Arc::new);
        let selections = match &self.selections {
            Some(existing) => appended(existing, selections),
            None => selections.collect(),
        };
        Self {
            selections: Some(selections),
            ..self.clone()
        }
    }

    pub fn clone_without_selections(&self) -> Self {
        Self {
            selections: None,
            ..self.clone()
        }
    }

    pub fn clone_with_from_items(
        &self,
        items: impl IntoIterator<Item = OperationNode>,
    ) -> QueryResult<Self> {
        let from = match &self.from {
            Some(from) => from.clone_with_froms(items),
            None => FromNode::create(items)?,
        };
        Ok(Self {
            from: Some(Arc::new(from)),
            ..self.clone()
        })
    }

    pub fn clone_with_distinct(&self, distinct: bool) -> Self {
        Self {
            distinct,
            ..self.clone()
        }
    }

    pub fn clone_with_group_by_items(
        &self,
        items: impl IntoIterator<Item = OperationNode>,
    ) -> QueryResult<Self> {
        let group_by = match &self.group_by {
            Some(group_by) => group_by.clone_with_items(items),
            None => GroupByNode::create(items)?,
        };
        Ok(Self {
            group_by: Some(Arc::new(group_by)),
            ..self.clone()
        })
    }

    pub fn clone_without_group_by(&self) -> Self {
        Self {
            group_by: None,
            ..self.clone()
        }
    }

    /// Add a HAVING predicate, AND-ed with any existing one.
    pub fn clone_with_having(&self, operation: impl Into<OperationNode>) -> Self {
        let having = match &self.having {
            Some(having) => having.clone_with_operation(LogicalOp::And, operation),
            None => HavingNode::create(operation),
        };
        Self {
            having: Some(Arc::new(having)),
            ..self.clone()
        }
    }

    pub fn clone_with_offset(&self, offset: impl Into<Arc<OffsetNode>>) -> Self {
        Self {
            offset: Some(offset.into()),
            ..self.clone()
        }
    }

    pub fn clone_without_offset(&self) -> Self {
        Self {
            offset: None,
            ..self.clone()
        }
    }
}
