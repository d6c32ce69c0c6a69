use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::clauses::{
    ExplainNode, FromNode, JoinNode, LimitNode, OrderByItemNode, OrderByNode, OutputNode,
    ReturningNode, TopNode, UsingNode, WhereNode, WithNode,
};
use crate::ast::node::{NodeList, OperationNode};
use crate::ast::query::HasOrderBy;
use crate::error::QueryResult;

/// `DELETE FROM ...`
///
/// Only `from` is mandatory. Every other clause is `None` until a
/// `clone_with_*` call adds it; `None` means "not specified", which is not the
/// same as an empty clause.
///
/// Limit, where, returning, ... come from the slot traits in
/// [`crate::ast::query`]; only USING is specific to this statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteQueryNode {
    pub from: Arc<FromNode>,
    pub using: Option<Arc<UsingNode>>,
    pub joins: Option<NodeList<Arc<JoinNode>>>,
    pub where_clause: Option<Arc<WhereNode>>,
    pub returning: Option<Arc<ReturningNode>>,
    pub with: Option<Arc<WithNode>>,
    pub order_by: Option<Arc<OrderByNode>>,
    pub limit: Option<Arc<LimitNode>>,
    pub explain: Option<Arc<ExplainNode>>,
    pub end_modifiers: Option<NodeList<OperationNode>>,
    pub top: Option<Arc<TopNode>>,
    pub output: Option<Arc<OutputNode>>,
}

impl DeleteQueryNode {
    /// Fails if `from_items` is empty.
    pub fn create(
        from_items: impl IntoIterator<Item = OperationNode>,
        with: Option<WithNode>,
    ) -> QueryResult<Self> {
        Ok(Self {
            from: Arc::new(FromNode::create(from_items)?),
            using: None,
            joins: None,
            where_clause: None,
            returning: None,
            with: with.map(Arc::new),
            order_by: None,
            limit: None,
            explain: None,
            end_modifiers: None,
            top: None,
            output: None,
        })
    }

    /// Add USING tables. Creates the clause when absent, otherwise appends
    /// after the tables already listed.
    pub fn clone_with_using(
        &self,
        tables: impl IntoIterator<Item = OperationNode>,
    ) -> QueryResult<Self> {
        let using = match &self.using {
            Some(using) => using.clone_with_tables(tables),
            None => UsingNode::create(tables)?,
        };
        Ok(Self {
            using: Some(Arc::new(using)),
            ..self.clone()
        })
    }

    pub fn clone_with_order_by_items(
        &self,
        items: impl IntoIterator<Item = OrderByItemNode>,
    ) -> QueryResult<Self> {
        HasOrderBy::clone_with_order_by_items(self, items)
    }

    pub fn clone_without_order_by(&self) -> Self {
        HasOrderBy::clone_without_order_by(self)
    }
}
