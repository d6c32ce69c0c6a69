//! DML (Data Manipulation Language) SQL generation.
//!
//! Statement rules emit their clauses in the order the dialect gives for
//! the statement kind; clause rules shared by several statements live here.

pub mod cte;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;
pub mod upsert;

use std::sync::Arc;

use crate::ast::*;
use crate::error::QueryResult;
use crate::transpiler::compiler::QueryCompiler;
use crate::transpiler::traits::{Clause, StatementKind};

impl QueryCompiler<'_> {
    /// Emit a statement clause by clause, one space between non-empty
    /// clauses. `present` lists the clauses the node actually carries; one
    /// that the dialect's order has no slot for is rejected rather than
    /// silently dropped.
    pub(crate) fn emit_statement<F>(
        &mut self,
        statement: StatementKind,
        present: &[Clause],
        mut emit: F,
    ) -> QueryResult<()>
    where
        F: FnMut(&mut Self, Clause) -> QueryResult<()>,
    {
        let adapter = self.adapter;
        let order = adapter.clause_order(statement);
        if let Some(missing) = present.iter().find(|c| !order.contains(c)) {
            return Err(self.unsupported(format!("{:?}", missing)));
        }

        let start = self.sql.len();
        for clause in order.iter().copied() {
            let mark = self.sql.len();
            if mark > start {
                self.append(" ");
            }
            let before = self.sql.len();
            emit(self, clause)?;
            if self.sql.len() == before {
                self.sql.truncate(mark);
            }
        }
        Ok(())
    }

    pub(crate) fn visit_opt<T: NodeType>(&mut self, node: &Option<Arc<T>>) -> QueryResult<()> {
        match node {
            Some(node) => self.visit_child(node),
            None => Ok(()),
        }
    }

    pub(crate) fn visit_joins(&mut self, joins: &Option<NodeList<Arc<JoinNode>>>) -> QueryResult<()> {
        match joins {
            Some(joins) => self.visit_child_list(joins, " "),
            None => Ok(()),
        }
    }

    pub(crate) fn visit_end_modifiers(
        &mut self,
        modifiers: &Option<NodeList<OperationNode>>,
    ) -> QueryResult<()> {
        match modifiers {
            Some(modifiers) => self.visit_list(modifiers, " "),
            None => Ok(()),
        }
    }

    pub(crate) fn visit_from(&mut self, from: &FromNode) -> QueryResult<()> {
        self.append("FROM ");
        self.visit_list(&from.froms, ", ")
    }

    pub(crate) fn visit_using(&mut self, using: &UsingNode) -> QueryResult<()> {
        self.append("USING ");
        self.visit_list(&using.tables, ", ")
    }

    pub(crate) fn visit_join(&mut self, join: &JoinNode) -> QueryResult<()> {
        self.append(join.join_type.as_sql());
        self.append(" ");
        self.visit_node(&join.table)?;
        if let Some(on) = &join.on {
            self.append(" ");
            self.visit_child(on)?;
        }
        Ok(())
    }

    pub(crate) fn visit_on(&mut self, on: &OnNode) -> QueryResult<()> {
        self.append("ON ");
        self.visit_node(&on.on)
    }

    pub(crate) fn visit_where(&mut self, node: &WhereNode) -> QueryResult<()> {
        self.append("WHERE ");
        self.visit_node(&node.predicate)
    }

    pub(crate) fn visit_having(&mut self, node: &HavingNode) -> QueryResult<()> {
        self.append("HAVING ");
        self.visit_node(&node.predicate)
    }

    pub(crate) fn visit_returning(&mut self, node: &ReturningNode) -> QueryResult<()> {
        self.append("RETURNING ");
        self.visit_child_list(&node.selections, ", ")
    }

    pub(crate) fn visit_output(&mut self, node: &OutputNode) -> QueryResult<()> {
        self.append("OUTPUT ");
        self.visit_list(&node.selections, ", ")
    }

    pub(crate) fn visit_order_by(&mut self, node: &OrderByNode) -> QueryResult<()> {
        self.append("ORDER BY ");
        self.visit_child_list(&node.items, ", ")
    }

    pub(crate) fn visit_order_by_item(&mut self, node: &OrderByItemNode) -> QueryResult<()> {
        self.visit_node(&node.order_by)?;
        match node.direction {
            Some(SortDirection::Asc) => self.append(" ASC"),
            Some(SortDirection::Desc) => self.append(" DESC"),
            None => {}
        }
        Ok(())
    }

    pub(crate) fn visit_group_by(&mut self, node: &GroupByNode) -> QueryResult<()> {
        self.append("GROUP BY ");
        self.visit_list(&node.items, ", ")
    }

    pub(crate) fn visit_limit(&mut self, node: &LimitNode) -> QueryResult<()> {
        self.append("LIMIT ");
        self.visit_node(&node.limit)
    }

    pub(crate) fn visit_offset(&mut self, node: &OffsetNode) -> QueryResult<()> {
        self.append("OFFSET ");
        self.visit_node(&node.offset)?;
        self.append(self.adapter.offset_suffix());
        Ok(())
    }

    pub(crate) fn visit_top(&mut self, node: &TopNode) {
        self.append(&format!("TOP({})", node.expression));
        if let Some(modifier) = node.modifiers {
            self.append(" ");
            self.append(modifier.as_sql());
        }
    }

    pub(crate) fn visit_explain(&mut self, node: &ExplainNode) -> QueryResult<()> {
        self.append("EXPLAIN");
        if node.options.is_none() && node.format.is_none() {
            return Ok(());
        }
        let syntax = self
            .adapter
            .explain_options()
            .ok_or_else(|| self.unsupported("EXPLAIN options"))?;

        self.append(" ");
        self.append(syntax.open);
        if let Some(options) = &node.options {
            self.visit_node(options)?;
        }
        if let Some(format) = node.format {
            if node.options.is_some() {
                self.append(syntax.delimiter);
            }
            self.append("FORMAT");
            self.append(syntax.assignment);
            self.append(format.as_sql());
        }
        self.append(syntax.close);
        Ok(())
    }

    pub(crate) fn visit_column_update(&mut self, node: &ColumnUpdateNode) -> QueryResult<()> {
        self.visit_child(&node.column)?;
        self.append(" = ");
        self.visit_node(&node.value)
    }

    pub(crate) fn visit_values(&mut self, node: &ValuesNode) -> QueryResult<()> {
        self.append("VALUES ");
        self.visit_child_list(&node.rows, ", ")
    }
}
