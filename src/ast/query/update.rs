use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::clauses::{
    ColumnUpdateNode, ExplainNode, FromNode, JoinNode, LimitNode, OrderByNode, OutputNode,
    ReturningNode, TopNode, WhereNode, WithNode,
};
use crate::ast::node::{NodeList, OperationNode, appended};
use crate::error::QueryResult;

/// `UPDATE <table> SET ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateQueryNode {
    pub table: OperationNode,
    pub updates: Option<NodeList<Arc<ColumnUpdateNode>>>,
    pub from: Option<Arc<FromNode>>,
    pub joins: Option<NodeList<Arc<JoinNode>>>,
    pub where_clause: Option<Arc<WhereNode>>,
    pub returning: Option<Arc<ReturningNode>>,
    pub output: Option<Arc<OutputNode>>,
    pub with: Option<Arc<WithNode>>,
    pub order_by: Option<Arc<OrderByNode>>,
    pub limit: Option<Arc<LimitNode>>,
    pub top: Option<Arc<TopNode>>,
    pub explain: Option<Arc<ExplainNode>>,
    pub end_modifiers: Option<NodeList<OperationNode>>,
}

impl UpdateQueryNode {
    pub fn create(table: impl Into<OperationNode>, with: Option<WithNode>) -> Self {
        Self {
            table: table.into(),
            updates: None,
            from: None,
            joins: None,
            where_clause: None,
            returning: None,
            output: None,
            with: with.map(Arc::new),
            order_by: None,
            limit: None,
            top: None,
            explain: None,
            end_modifiers: None,
        }
    }

    /// Append SET assignments after the existing ones.
    pub fn clone_with_updates(&self, updates: impl IntoIterator<Item = ColumnUpdateNode>) -> Self {
        let updates = updates.into_iter().map(Arc::new);
        let updates = match &self.updates {
            Some(existing) => appended(existing, updates),
            None => updates.collect(),
        };
        Self {
            updates: Some(updates),
            ..self.clone()
        }
    }

    /// `UPDATE t SET ... FROM <items>`, creating or extending the FROM list.
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
}
