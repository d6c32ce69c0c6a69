//! ON CONFLICT (upsert) SQL generation.

use crate::ast::*;
use crate::error::{QueryError, QueryResult};
use crate::transpiler::compiler::QueryCompiler;

impl QueryCompiler<'_> {
    pub(crate) fn visit_on_conflict(&mut self, node: &OnConflictNode) -> QueryResult<()> {
        self.append("ON CONFLICT");
        if let Some(columns) = &node.columns {
            self.append(" (");
            self.visit_child_list(columns, ", ")?;
            self.append(")");
        }
        if let Some(constraint) = &node.constraint {
            self.append(" ON CONSTRAINT ");
            self.visit_child(constraint)?;
        }

        if node.do_nothing {
            self.append(" DO NOTHING");
            return Ok(());
        }
        let updates = match &node.updates {
            Some(updates) if !updates.is_empty() => updates,
            _ => {
                return Err(QueryError::invalid(
                    NodeKind::OnConflict,
                    "requires DO NOTHING or DO UPDATE assignments",
                ));
            }
        };
        self.append(" DO UPDATE SET ");
        self.visit_child_list(updates, ", ")?;
        if let Some(update_where) = &node.update_where {
            self.append(" ");
            self.visit_child(update_where)?;
        }
        Ok(())
    }
}
