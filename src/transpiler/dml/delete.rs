//! DELETE SQL generation.

use crate::ast::*;
use crate::error::QueryResult;
use crate::transpiler::compiler::QueryCompiler;
use crate::transpiler::traits::{Clause, StatementKind};

impl QueryCompiler<'_> {
    pub(crate) fn visit_delete(&mut self, node: &DeleteQueryNode) -> QueryResult<()> {
        let mut present = vec![Clause::Keyword, Clause::From];
        present.extend(node.explain.as_ref().map(|_| Clause::Explain));
        present.extend(node.with.as_ref().map(|_| Clause::With));
        present.extend(node.top.as_ref().map(|_| Clause::Top));
        present.extend(node.using.as_ref().map(|_| Clause::Using));
        present.extend(node.joins.as_ref().map(|_| Clause::Joins));
        present.extend(node.where_clause.as_ref().map(|_| Clause::Where));
        present.extend(node.returning.as_ref().map(|_| Clause::Returning));
        present.extend(node.output.as_ref().map(|_| Clause::Output));
        present.extend(node.order_by.as_ref().map(|_| Clause::OrderBy));
        present.extend(node.limit.as_ref().map(|_| Clause::Limit));
        present.extend(node.end_modifiers.as_ref().map(|_| Clause::EndModifiers));

        self.emit_statement(StatementKind::Delete, &present, |c, clause| match clause {
            Clause::Explain => c.visit_opt(&node.explain),
            Clause::With => c.visit_opt(&node.with),
            Clause::Keyword => {
                c.append("DELETE");
                Ok(())
            }
            Clause::Top => c.visit_opt(&node.top),
            Clause::From => c.visit_child(&node.from),
            Clause::Using => c.visit_opt(&node.using),
            Clause::Joins => c.visit_joins(&node.joins),
            Clause::Where => c.visit_opt(&node.where_clause),
            Clause::Returning => c.visit_opt(&node.returning),
            Clause::Output => c.visit_opt(&node.output),
            Clause::OrderBy => c.visit_opt(&node.order_by),
            Clause::Limit => c.visit_opt(&node.limit),
            Clause::EndModifiers => c.visit_end_modifiers(&node.end_modifiers),
            _ => Ok(()),
        })
    }
}
