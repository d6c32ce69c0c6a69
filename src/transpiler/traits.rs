//! Dialect adapter trait and clause ordering.

use serde::{Deserialize, Serialize};

use crate::ast::NodeKind;

/// The four statement kinds whose clause order a dialect may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

/// One position in a statement's emitted clause sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clause {
    Explain,
    With,
    /// The statement keyword itself (`SELECT [DISTINCT]`, `DELETE`, ...)
    Keyword,
    Top,
    Selections,
    /// INSERT target table
    Into,
    /// INSERT column list
    Columns,
    /// UPDATE target table
    Table,
    Set,
    From,
    Using,
    Joins,
    Where,
    GroupBy,
    Having,
    Values,
    OnConflict,
    Returning,
    Output,
    OrderBy,
    Limit,
    Offset,
    EndModifiers,
}

pub const SELECT_ORDER: &[Clause] = &[
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
    Clause::Limit,
    Clause::Offset,
    Clause::EndModifiers,
];

pub const INSERT_ORDER: &[Clause] = &[
    Clause::Explain,
    Clause::With,
    Clause::Keyword,
    Clause::Top,
    Clause::Into,
    Clause::Columns,
    Clause::Values,
    Clause::OnConflict,
    Clause::Returning,
    Clause::Output,
    Clause::EndModifiers,
];

pub const UPDATE_ORDER: &[Clause] = &[
    Clause::Explain,
    Clause::With,
    Clause::Keyword,
    Clause::Table,
    Clause::Set,
    Clause::From,
    Clause::Joins,
    Clause::Where,
    Clause::Returning,
    Clause::Output,
    Clause::OrderBy,
    Clause::Limit,
    Clause::Top,
    Clause::EndModifiers,
];

pub const DELETE_ORDER: &[Clause] = &[
    Clause::Explain,
    Clause::With,
    Clause::Keyword,
    Clause::From,
    Clause::Using,
    Clause::Joins,
    Clause::Where,
    Clause::Returning,
    Clause::Output,
    Clause::OrderBy,
    Clause::Limit,
    Clause::Top,
    Clause::EndModifiers,
];

impl StatementKind {
    /// Clause order shared by most engines.
    pub fn default_order(&self) -> &'static [Clause] {
        match self {
            StatementKind::Select => SELECT_ORDER,
            StatementKind::Insert => INSERT_ORDER,
            StatementKind::Update => UPDATE_ORDER,
            StatementKind::Delete => DELETE_ORDER,
        }
    }
}

/// How EXPLAIN options are wrapped: `EXPLAIN (ANALYZE, FORMAT JSON)` vs
/// `EXPLAIN ANALYZE FORMAT=JSON`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplainSyntax {
    pub open: &'static str,
    pub delimiter: &'static str,
    pub assignment: &'static str,
    pub close: &'static str,
}

pub const PARENTHESIZED_EXPLAIN: ExplainSyntax = ExplainSyntax {
    open: "(",
    delimiter: ", ",
    assignment: " ",
    close: ")",
};

/// Wrap `name` in `open`/`close`, doubling any embedded `close` character.
pub fn quote_with(name: &str, open: char, close: char) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push(open);
    for c in name.chars() {
        if c == close {
            quoted.push(close);
        }
        quoted.push(c);
    }
    quoted.push(close);
    quoted
}

/// Per-engine rules consulted by the compiler.
pub trait DialectAdapter: Send + Sync {
    /// Dialect name used in error messages and logs.
    fn name(&self) -> &str;
    /// Quote an identifier (table, column, alias).
    fn quote_identifier(&self, name: &str) -> String;
    /// Generate the parameter placeholder (e.g., $1, ?, @p1) for a 1-based index.
    fn placeholder(&self, index: usize) -> String;

    /// Whether the engine has syntax for this node kind.
    fn supports(&self, _kind: NodeKind) -> bool {
        true
    }

    /// Order in which a statement's clauses are emitted.
    fn clause_order(&self, statement: StatementKind) -> &[Clause] {
        statement.default_order()
    }

    /// Get the boolean literal used for immediate values.
    fn bool_literal(&self, val: bool) -> String {
        if val {
            "TRUE".to_string()
        } else {
            "FALSE".to_string()
        }
    }

    /// Escape a string as a SQL literal.
    fn string_literal(&self, val: &str) -> String {
        quote_with(val, '\'', '\'')
    }

    /// Spelling of the case-insensitive LIKE operator.
    fn case_insensitive_like(&self, negated: bool) -> &'static str {
        if negated { "NOT LIKE" } else { "LIKE" }
    }

    /// Syntax for EXPLAIN options, or `None` if EXPLAIN takes no options.
    fn explain_options(&self) -> Option<ExplainSyntax> {
        Some(PARENTHESIZED_EXPLAIN)
    }

    /// Appended after an OFFSET expression (SQL Server wants `ROWS`).
    fn offset_suffix(&self) -> &'static str {
        ""
    }

    /// Keyword for an INSERT that skips conflicting rows, if any.
    fn insert_ignore(&self) -> Option<&'static str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_with_doubles_close() {
        assert_eq!(quote_with("users", '"', '"'), "\"users\"");
        assert_eq!(quote_with("we\"ird", '"', '"'), "\"we\"\"ird\"");
        assert_eq!(quote_with("a]b", '[', ']'), "[a]]b]");
    }

    #[test]
    fn test_default_delete_order() {
        let order = StatementKind::Delete.default_order();
        let pos = |c| order.iter().position(|x| *x == c).unwrap();
        assert!(pos(Clause::With) < pos(Clause::Keyword));
        assert!(pos(Clause::From) < pos(Clause::Using));
        assert!(pos(Clause::Using) < pos(Clause::Joins));
        assert!(pos(Clause::Where) < pos(Clause::Returning));
        assert!(pos(Clause::OrderBy) < pos(Clause::Limit));
        assert_eq!(*order.last().unwrap(), Clause::EndModifiers);
    }
}
