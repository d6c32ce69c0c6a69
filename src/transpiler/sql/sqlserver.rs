use crate::ast::NodeKind;
use crate::transpiler::traits::{Clause, DialectAdapter, ExplainSyntax, StatementKind, quote_with};

/// T-SQL puts TOP right after the statement keyword and OUTPUT between the
/// target and the row source, so every statement gets its own order.
const SELECT_ORDER: &[Clause] = &[
    Clause::Explain,
    Clause::With,
    Clause::Keyword,
    Clause::Top,
    Clause::Selections,
    Clause::From,
    Clause::Joins,
    Clause::Where,
    Clause::GroupBy,
    Clause::Having,
    Clause::OrderBy,
    Clause::Offset,
    Clause::Limit,
    Clause::EndModifiers,
];

const INSERT_ORDER: &[Clause] = &[
    Clause::Explain,
    Clause::With,
    Clause::Keyword,
    Clause::Top,
    Clause::Into,
    Clause::Columns,
    Clause::Output,
    Clause::Values,
    Clause::OnConflict,
    Clause::Returning,
    Clause::EndModifiers,
];

const UPDATE_ORDER: &[Clause] = &[
    Clause::Explain,
    Clause::With,
    Clause::Keyword,
    Clause::Top,
    Clause::Table,
    Clause::Set,
    Clause::Output,
    Clause::From,
    Clause::Joins,
    Clause::Where,
    Clause::Returning,
    Clause::OrderBy,
    Clause::Limit,
    Clause::EndModifiers,
];

/// No `Joins` slot: T-SQL joins in a DELETE need a second FROM, so a DELETE
/// with joins is rejected.
const DELETE_ORDER: &[Clause] = &[
    Clause::Explain,
    Clause::With,
    Clause::Keyword,
    Clause::Top,
    Clause::From,
    Clause::Output,
    Clause::Using,
    Clause::Where,
    Clause::Returning,
    Clause::OrderBy,
    Clause::Limit,
    Clause::EndModifiers,
];

pub struct SqlServerGenerator;

impl DialectAdapter for SqlServerGenerator {
    fn name(&self) -> &str {
        "sqlserver"
    }

    fn quote_identifier(&self, id: &str) -> String {
        quote_with(id, '[', ']')
    }

    fn placeholder(&self, index: usize) -> String {
        format!("@p{}", index)
    }

    fn supports(&self, kind: NodeKind) -> bool {
        // Row limits go through TOP / OFFSET .. ROWS; plans through SHOWPLAN.
        !matches!(
            kind,
            NodeKind::Limit
                | NodeKind::Using
                | NodeKind::Returning
                | NodeKind::OnConflict
                | NodeKind::Explain
                | NodeKind::Modifier
        )
    }

    fn clause_order(&self, statement: StatementKind) -> &[Clause] {
        match statement {
            StatementKind::Select => SELECT_ORDER,
            StatementKind::Insert => INSERT_ORDER,
            StatementKind::Update => UPDATE_ORDER,
            StatementKind::Delete => DELETE_ORDER,
        }
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn explain_options(&self) -> Option<ExplainSyntax> {
        None
    }

    fn offset_suffix(&self) -> &'static str {
        " ROWS"
    }
}
