use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::clauses::{
    ExplainNode, OnConflictNode, OutputNode, ReturningNode, TopNode, ValuesNode, WithNode,
};
use crate::ast::names::{ColumnNode, TableNode};
use crate::ast::node::{NodeList, OperationNode, appended};

/// `INSERT INTO ...`
///
/// `values` holds either a [`ValuesNode`] or a query node used as the row
/// source (`INSERT INTO t (..) SELECT ...`). With neither `values` nor
/// `default_values` set the statement has no row source; the compiler
/// rejects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertQueryNode {
    pub into: Arc<TableNode>,
    pub columns: Option<NodeList<Arc<ColumnNode>>>,
    pub values: Option<OperationNode>,
    #[serde(default)]
    pub default_values: bool,
    /// INSERT IGNORE / INSERT OR IGNORE.
    #[serde(default)]
    pub ignore: bool,
    pub on_conflict: Option<Arc<OnConflictNode>>,
    pub returning: Option<Arc<ReturningNode>>,
    pub output: Option<Arc<OutputNode>>,
    pub with: Option<Arc<WithNode>>,
    pub explain: Option<Arc<ExplainNode>>,
    pub top: Option<Arc<TopNode>>,
    pub end_modifiers: Option<NodeList<OperationNode>>,
}

impl InsertQueryNode {
    pub fn create(into: TableNode, with: Option<WithNode>) -> Self {
        Self {
            into: Arc::new(into),
            columns: None,
            values: None,
            default_values: false,
            ignore: false,
            on_conflict: None,
            returning: None,
            output: None,
            with: with.map(Arc::new),
            explain: None,
            top: None,
            end_modifiers: None,
        }
    }

    /// Append target columns after those already listed.
    pub fn clone_with_columns(&self, columns: impl IntoIterator<Item = ColumnNode>) -> Self {
        let columns = columns.into_iter().map(Arc::new);
        let columns = match &self.columns {
            Some(existing) => appended(existing, columns),
            None => columns.collect(),
        };
        Self {
            columns: Some(columns),
            ..self.clone()
        }
    }

    pub fn clone_with_values(&self, values: ValuesNode) -> Self {
        Self {
            values: Some(values.into()),
            default_values: false,
            ..self.clone()
        }
    }

    /// Use a query as the row source.
    pub fn clone_with_source(&self, source: impl Into<OperationNode>) -> Self {
        Self {
            values: Some(source.into()),
            default_values: false,
            ..self.clone()
        }
    }

    pub fn clone_with_default_values(&self) -> Self {
        Self {
            values: None,
            default_values: true,
            ..self.clone()
        }
    }

    pub fn clone_with_on_conflict(&self, on_conflict: impl Into<Arc<OnConflictNode>>) -> Self {
        Self {
            on_conflict: Some(on_conflict.into()),
            ..self.clone()
        }
    }

    pub fn clone_with_ignore(&self, ignore: bool) -> Self {
        Self {
            ignore,
            ..self.clone()
        }
    }
}
