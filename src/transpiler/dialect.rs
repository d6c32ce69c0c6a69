use serde::{Deserialize, Serialize};

use crate::transpiler::sql::mysql::MysqlGenerator;
use crate::transpiler::sql::postgres::PostgresGenerator;
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::sql::sqlserver::SqlServerGenerator;
use crate::transpiler::traits::DialectAdapter;

/// Built-in SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    MySQL,
    SQLite,
    SqlServer,
}

impl Dialect {
    pub fn generator(&self) -> &'static dyn DialectAdapter {
        match self {
            Dialect::Postgres => &PostgresGenerator,
            Dialect::MySQL => &MysqlGenerator,
            Dialect::SQLite => &SqliteGenerator,
            Dialect::SqlServer => &SqlServerGenerator,
        }
    }
}
