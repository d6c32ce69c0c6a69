//! SELECT SQL generation.

use crate::ast::*;
use crate::error::QueryResult;
use crate::transpiler::compiler::QueryCompiler;
use crate::transpiler::traits::{Clause, StatementKind};

impl QueryCompiler<'_> {
    pub(crate) fn visit_select(&mut self, node: &SelectQueryNode) -> QueryResult<()> {
        let mut present = vec![Clause::Keyword, Clause::Selections];
        present.extend(node.explain.as_ref().map(|_| Clause::Explain));
        present.extend(node.with.as_ref().map(|_| Clause::With));
        present.extend(node.top.as_ref().map(|_| Clause::Top));
        present.extend(node.from.as_ref().map(|_| Clause::From));
        present.extend(node.joins.as_ref().map(|_| Clause::Joins));
        present.extend(node.where_clause.as_ref().map(|_| Clause::Where));
        present.extend(node.group_by.as_ref().map(|_| Clause::GroupBy));
        present.extend(node.having.as_ref().map(|_| Clause::Having));
        present.extend(node.order_by.as_ref().map(|_| Clause::OrderBy));
        present.extend(node.limit.as_ref().map(|_| Clause::Limit));
        present.extend(node.offset.as_ref().map(|_| Clause::Offset));
        present.extend(node.end_modifiers.as_ref().map(|_| Clause::EndModifiers));

        self.emit_statement(StatementKind::Select, &present, |c, clause| match clause {
            Clause::Explain => c.visit_opt(&node.explain),
            Clause::With => c.visit_opt(&node.with),
            Clause::Keyword => {
                c.append(if node.distinct { "SELECT DISTINCT" } else { "SELECT" });
                Ok(())
            }
            Clause::Top => c.visit_opt(&node.top),
            Clause::Selections => match &node.selections {
                Some(selections) if !selections.is_empty() => c.visit_child_list(selections, ", "),
                _ => {
                    c.append("*");
                    Ok(())
                }
            },
            Clause::From => c.visit_opt(&node.from),
            Clause::Joins => c.visit_joins(&node.joins),
            Clause::Where => c.visit_opt(&node.where_clause),
            Clause::GroupBy => c.visit_opt(&node.group_by),
            Clause::Having => c.visit_opt(&node.having),
            Clause::OrderBy => c.visit_opt(&node.order_by),
            Clause::Limit => c.visit_opt(&node.limit),
            Clause::Offset => c.visit_opt(&node.offset),
            Clause::EndModifiers => c.visit_end_modifiers(&node.end_modifiers),
            _ => Ok(()),
        })
    }
}
