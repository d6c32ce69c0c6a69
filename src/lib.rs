//! # querynode — immutable SQL operation trees
//!
//! Build a query as a tree of immutable nodes, change it with
//! `clone_with_*` calls that share every untouched subtree, and compile it
//! to dialect-specific SQL plus an ordered parameter list.
//!
//! ## Quick Example
//!
//! ```
//! use querynode::prelude::*;
//!
//! let delete = DeleteQueryNode::create(table_list(["users"])?, None)?
//!     .clone_with_using(table_list(["logs"])?)?
//!     .clone_with_limit(LimitNode::rows(10));
//!
//! let compiled = delete.to_sql()?;
//! assert_eq!(compiled.sql, r#"DELETE FROM "users" USING "logs" LIMIT $1"#);
//! assert_eq!(compiled.parameters, vec![Value::Int(10)]);
//! # Ok::<(), querynode::error::QueryError>(())
//! ```
//!
//! ## Dialects
//!
//! | Dialect     | Quoting   | Placeholder | Extra clauses         |
//! |-------------|-----------|-------------|-----------------------|
//! | `Postgres`  | `"name"`  | `$1`        | RETURNING, ON CONFLICT |
//! | `MySQL`     | `` `name` `` | `?`      | INSERT IGNORE         |
//! | `SQLite`    | `"name"`  | `?`         | RETURNING, OR IGNORE  |
//! | `SqlServer` | `[name]`  | `@p1`       | TOP, OUTPUT           |

pub mod ast;
pub mod error;
pub mod transformer;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::error::*;
    pub use crate::transformer::{NodeTransformer, WithSchema, transform};
    pub use crate::transpiler::{CompiledQuery, Dialect, DialectAdapter, ToSql, compile};
}

pub use transpiler::compile;
