//! INSERT SQL generation.

use crate::ast::*;
use crate::error::{QueryError, QueryResult};
use crate::transpiler::compiler::QueryCompiler;
use crate::transpiler::traits::{Clause, StatementKind};

impl QueryCompiler<'_> {
    pub(crate) fn visit_insert(&mut self, node: &InsertQueryNode) -> QueryResult<()> {
        if node.values.is_none() && !node.default_values {
            return Err(QueryError::invalid(
                NodeKind::InsertQuery,
                "requires VALUES, a source query or DEFAULT VALUES",
            ));
        }
        let keyword = if node.ignore {
            self.adapter
                .insert_ignore()
                .ok_or_else(|| self.unsupported("INSERT IGNORE"))?
        } else {
            "INSERT"
        };

        let mut present = vec![Clause::Keyword, Clause::Into, Clause::Values];
        present.extend(node.explain.as_ref().map(|_| Clause::Explain));
        present.extend(node.with.as_ref().map(|_| Clause::With));
        present.extend(node.top.as_ref().map(|_| Clause::Top));
        present.extend(node.columns.as_ref().map(|_| Clause::Columns));
        present.extend(node.on_conflict.as_ref().map(|_| Clause::OnConflict));
        present.extend(node.returning.as_ref().map(|_| Clause::Returning));
        present.extend(node.output.as_ref().map(|_| Clause::Output));
        present.extend(node.end_modifiers.as_ref().map(|_| Clause::EndModifiers));

        self.emit_statement(StatementKind::Insert, &present, |c, clause| match clause {
            Clause::Explain => c.visit_opt(&node.explain),
            Clause::With => c.visit_opt(&node.with),
            Clause::Keyword => {
                c.append(keyword);
                Ok(())
            }
            Clause::Top => c.visit_opt(&node.top),
            Clause::Into => {
                c.append("INTO ");
                c.visit_child(&node.into)
            }
            Clause::Columns => match &node.columns {
                Some(columns) if !columns.is_empty() => {
                    c.append("(");
                    c.visit_child_list(columns, ", ")?;
                    c.append(")");
                    Ok(())
                }
                _ => Ok(()),
            },
            Clause::Values => match &node.values {
                Some(values) => c.visit_node(values),
                None => {
                    c.append("DEFAULT VALUES");
                    Ok(())
                }
            },
            Clause::OnConflict => c.visit_opt(&node.on_conflict),
            Clause::Returning => c.visit_opt(&node.returning),
            Clause::Output => c.visit_opt(&node.output),
            Clause::EndModifiers => c.visit_end_modifiers(&node.end_modifiers),
            _ => Ok(()),
        })
    }
}
