//! SQL compiler for operation-node trees.
//!
//! Walks a tree and produces dialect-specific SQL text together with the
//! ordered list of bound parameter values.

pub mod compiler;
pub mod dialect;
pub mod dml;
pub mod params;
pub mod profile;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::ast::{NodeType, OperationNode};
use crate::error::QueryResult;

pub use compiler::{CompiledQuery, compile};
pub use dialect::Dialect;
pub use profile::DialectProfile;
pub use traits::{Clause, DialectAdapter, StatementKind};

/// Trait for compiling nodes to SQL.
pub trait ToSql {
    /// Compile with the default dialect (Postgres).
    fn to_sql(&self) -> QueryResult<CompiledQuery> {
        self.to_sql_with_dialect(Dialect::default())
    }

    /// Compile with a specific dialect.
    fn to_sql_with_dialect(&self, dialect: Dialect) -> QueryResult<CompiledQuery>;
}

impl ToSql for OperationNode {
    fn to_sql_with_dialect(&self, dialect: Dialect) -> QueryResult<CompiledQuery> {
        compile(self, dialect.generator())
    }
}

impl<T: NodeType + Clone> ToSql for T {
    fn to_sql_with_dialect(&self, dialect: Dialect) -> QueryResult<CompiledQuery> {
        compile(&Arc::new(self.clone()).into_node(), dialect.generator())
    }
}
