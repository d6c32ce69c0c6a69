//! WITH clause (common table expressions) SQL generation.

use crate::ast::*;
use crate::error::QueryResult;
use crate::transpiler::compiler::QueryCompiler;

impl QueryCompiler<'_> {
    pub(crate) fn visit_with(&mut self, node: &WithNode) -> QueryResult<()> {
        self.append(if node.recursive { "WITH RECURSIVE " } else { "WITH " });
        self.visit_child_list(&node.expressions, ", ")
    }

    /// `"name"("a", "b") AS [NOT ]MATERIALIZED (<query>)`
    pub(crate) fn visit_cte(&mut self, node: &CommonTableExpressionNode) -> QueryResult<()> {
        self.visit_child(&node.name)?;
        self.append(" AS ");
        match node.materialized {
            Some(true) => self.append("MATERIALIZED "),
            Some(false) => self.append("NOT MATERIALIZED "),
            None => {}
        }
        self.visit_node(&node.expression)
    }

    pub(crate) fn visit_cte_name(&mut self, node: &CommonTableExpressionNameNode) -> QueryResult<()> {
        self.visit_child(&node.table)?;
        if let Some(columns) = &node.columns {
            self.append("(");
            self.visit_child_list(columns, ", ")?;
            self.append(")");
        }
        Ok(())
    }
}
