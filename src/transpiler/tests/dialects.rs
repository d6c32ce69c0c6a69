//! SQL dialect tests (MySQL, SQLite, SQL Server, profiles).

use pretty_assertions::assert_eq;

use super::{col, delete_from, eq, select_from, tables};
use crate::ast::*;
use crate::error::QueryError;
use crate::transpiler::profile::{DialectProfile, PlaceholderStyle};
use crate::transpiler::{Dialect, ToSql, compile};

fn unsupported(result: Result<impl std::fmt::Debug, QueryError>) -> (String, String) {
    match result {
        Err(QueryError::UnsupportedClause { clause, dialect }) => (clause, dialect),
        other => panic!("expected an unsupported clause, got {:?}", other),
    }
}

fn pair(clause: &str, dialect: &str) -> (String, String) {
    (clause.to_string(), dialect.to_string())
}

#[test]
fn test_postgres_rejects_output_and_top() {
    let node = delete_from("users")
        .clone_with_output(vec![ReferenceNode::parse("deleted.id").unwrap().into()])
        .unwrap();
    assert_eq!(unsupported(node.to_sql()), pair("Output", "postgres"));

    let node = delete_from("users").clone_with_top(TopNode::create(5, None));
    assert_eq!(unsupported(node.to_sql()), pair("Top", "postgres"));
}

#[test]
fn test_case_insensitive_like() {
    let node = select_from("users").clone_with_where(BinaryOperationNode::create(
        col("name"),
        Operator::ILike,
        ValueNode::create("%ada%"),
    ));
    assert_eq!(
        node.to_sql().unwrap().sql,
        "SELECT * FROM \"users\" WHERE \"name\" ILIKE $1"
    );
    assert_eq!(
        node.to_sql_with_dialect(Dialect::MySQL).unwrap().sql,
        "SELECT * FROM `users` WHERE `name` LIKE ?"
    );
}

#[test]
fn test_identifier_escaping() {
    let node = delete_from("we\"ird");
    assert_eq!(node.to_sql().unwrap().sql, "DELETE FROM \"we\"\"ird\"");

    let node = delete_from("a]b");
    assert_eq!(
        node.to_sql_with_dialect(Dialect::SqlServer).unwrap().sql,
        "DELETE FROM [a]]b]"
    );

    let node = delete_from("tick`ed");
    assert_eq!(
        node.to_sql_with_dialect(Dialect::MySQL).unwrap().sql,
        "DELETE FROM `tick``ed`"
    );
}

#[test]
fn test_mysql_delete() {
    let node = delete_from("users")
        .clone_with_where(eq("active", false))
        .clone_with_limit(LimitNode::rows(50));
    let compiled = node.to_sql_with_dialect(Dialect::MySQL).unwrap();
    assert_eq!(compiled.sql, "DELETE FROM `users` WHERE `active` = ? LIMIT ?");
    assert_eq!(compiled.parameters, vec![Value::Bool(false), Value::Int(50)]);
}

#[test]
fn test_mysql_literals() {
    let node = select_from("users").clone_with_where(BinaryOperationNode::create(
        col("active"),
        Operator::Eq,
        ValueNode::create_immediate(true),
    ));
    assert_eq!(
        node.to_sql_with_dialect(Dialect::MySQL).unwrap().sql,
        "SELECT * FROM `users` WHERE `active` = 1"
    );

    let node = SelectQueryNode::create()
        .clone_with_selections([SelectionNode::create(ValueNode::create_immediate("a\\b"))]);
    assert_eq!(
        node.to_sql_with_dialect(Dialect::MySQL).unwrap().sql,
        "SELECT 'a\\\\b'"
    );
}

#[test]
fn test_mysql_rejects_returning() {
    let node = delete_from("users")
        .clone_with_returning([SelectionNode::create(col("id"))])
        .unwrap();
    assert_eq!(
        unsupported(node.to_sql_with_dialect(Dialect::MySQL)),
        pair("Returning", "mysql")
    );
}

#[test]
fn test_mysql_insert_ignore() {
    let node = InsertQueryNode::create(TableNode::create("users").unwrap(), None)
        .clone_with_columns([col("email")])
        .clone_with_values(ValuesNode::create([ValueListNode::from_values(["a@x.io"]).unwrap()]).unwrap())
        .clone_with_ignore(true);
    assert_eq!(
        node.to_sql_with_dialect(Dialect::MySQL).unwrap().sql,
        "INSERT IGNORE INTO `users` (`email`) VALUES (?)"
    );
    assert_eq!(
        node.to_sql_with_dialect(Dialect::SQLite).unwrap().sql,
        "INSERT OR IGNORE INTO \"users\" (\"email\") VALUES (?)"
    );
    assert_eq!(unsupported(node.to_sql()), pair("INSERT IGNORE", "postgres"));
}

#[test]
fn test_mysql_explain_options() {
    let node = select_from("users").clone_with_explain(ExplainNode::create(
        Some(ExplainFormat::Json),
        Some(RawNode::create_with_sql("ANALYZE").into()),
    ));
    assert_eq!(
        node.to_sql_with_dialect(Dialect::MySQL).unwrap().sql,
        "EXPLAIN ANALYZE FORMAT=JSON SELECT * FROM `users`"
    );
}

#[test]
fn test_sqlite_dialect() {
    let node = delete_from("users").clone_with_where(eq("active", true));
    assert_eq!(
        node.to_sql_with_dialect(Dialect::SQLite).unwrap().sql,
        "DELETE FROM \"users\" WHERE \"active\" = ?"
    );

    let node = delete_from("users").clone_with_using(tables(&["logs"])).unwrap();
    assert_eq!(
        unsupported(node.to_sql_with_dialect(Dialect::SQLite)),
        pair("Using", "sqlite")
    );
}

#[test]
fn test_sqlite_explain_without_options() {
    let node = select_from("users").clone_with_explain(ExplainNode::create(None, None));
    assert_eq!(
        node.to_sql_with_dialect(Dialect::SQLite).unwrap().sql,
        "EXPLAIN SELECT * FROM \"users\""
    );

    let node = node.clone_with_explain(ExplainNode::create(Some(ExplainFormat::Json), None));
    assert_eq!(
        unsupported(node.to_sql_with_dialect(Dialect::SQLite)),
        pair("EXPLAIN options", "sqlite")
    );
}

#[test]
fn test_sqlserver_delete_top_output() {
    let node = delete_from("users")
        .clone_with_where(eq("active", false))
        .clone_with_output(vec![ReferenceNode::parse("deleted.id").unwrap().into()])
        .unwrap()
        .clone_with_top(TopNode::create(10, None));
    let compiled = node.to_sql_with_dialect(Dialect::SqlServer).unwrap();
    assert_eq!(
        compiled.sql,
        "DELETE TOP(10) FROM [users] OUTPUT [deleted].[id] WHERE [active] = @p1"
    );
    assert_eq!(compiled.parameters, vec![Value::Bool(false)]);
}

#[test]
fn test_sqlserver_update_top_output() {
    let node = UpdateQueryNode::create(TableNode::create("users").unwrap(), None)
        .clone_with_updates([ColumnUpdateNode::set("name", "Ada").unwrap()])
        .clone_with_where(eq("id", 1))
        .clone_with_output(vec![ReferenceNode::parse("inserted.name").unwrap().into()])
        .unwrap()
        .clone_with_top(TopNode::create(5, None));
    assert_eq!(
        node.to_sql_with_dialect(Dialect::SqlServer).unwrap().sql,
        "UPDATE TOP(5) [users] SET [name] = @p1 OUTPUT [inserted].[name] WHERE [id] = @p2"
    );
}

#[test]
fn test_sqlserver_insert_output() {
    let node = InsertQueryNode::create(TableNode::create("users").unwrap(), None)
        .clone_with_columns([col("email")])
        .clone_with_values(ValuesNode::create([ValueListNode::from_values(["a@x.io"]).unwrap()]).unwrap())
        .clone_with_output(vec![ReferenceNode::parse("inserted.id").unwrap().into()])
        .unwrap();
    assert_eq!(
        node.to_sql_with_dialect(Dialect::SqlServer).unwrap().sql,
        "INSERT INTO [users] ([email]) OUTPUT [inserted].[id] VALUES (@p1)"
    );
}

#[test]
fn test_sqlserver_select_top_and_offset() {
    let node = select_from("users")
        .clone_with_selections([SelectionNode::create(col("id"))])
        .clone_with_top(TopNode::create(5, Some(TopModifier::Percent)));
    assert_eq!(
        node.to_sql_with_dialect(Dialect::SqlServer).unwrap().sql,
        "SELECT TOP(5) PERCENT [id] FROM [users]"
    );

    let node = select_from("users")
        .clone_with_order_by_items([OrderByItemNode::create(col("id"), Some(SortDirection::Asc))])
        .unwrap()
        .clone_with_offset(OffsetNode::rows(20));
    assert_eq!(
        node.to_sql_with_dialect(Dialect::SqlServer).unwrap().sql,
        "SELECT * FROM [users] ORDER BY [id] ASC OFFSET @p1 ROWS"
    );
}

#[test]
fn test_sqlserver_rejects_limit() {
    let node = delete_from("users").clone_with_limit(LimitNode::rows(1));
    assert_eq!(
        unsupported(node.to_sql_with_dialect(Dialect::SqlServer)),
        pair("Limit", "sqlserver")
    );
}

#[test]
fn test_sqlserver_rejects_delete_joins() {
    let on = BinaryOperationNode::create(
        ReferenceNode::parse("sessions.user_id").unwrap(),
        Operator::Eq,
        ReferenceNode::parse("users.id").unwrap(),
    );
    let node = delete_from("users").clone_with_join(JoinNode::create_with_on(
        JoinType::Inner,
        TableNode::create("sessions").unwrap(),
        on,
    ));
    assert_eq!(
        unsupported(node.to_sql_with_dialect(Dialect::SqlServer)),
        pair("Joins", "sqlserver")
    );
    assert!(node.to_sql().is_ok());
}

#[test]
fn test_profile_overrides() {
    let mut profile = DialectProfile::new("cockroach", Dialect::Postgres);
    profile.placeholder = Some(PlaceholderStyle::Question);
    profile.unsupported = vec![NodeKind::Modifier];

    let node: OperationNode = delete_from("users").clone_with_where(eq("id", 1)).into();
    assert_eq!(
        compile(&node, &profile).unwrap().sql,
        "DELETE FROM \"users\" WHERE \"id\" = ?"
    );

    let locked: OperationNode = select_from("jobs")
        .clone_with_end_modifier(ModifierNode::create(StatementModifier::ForUpdate))
        .into();
    assert_eq!(unsupported(compile(&locked, &profile)), pair("Modifier", "cockroach"));
    assert!(compile(&locked, Dialect::Postgres.generator()).is_ok());
}

#[test]
fn test_profile_enables_clause() {
    let mut profile = DialectProfile::new("mariadb", Dialect::MySQL);
    profile.supported = vec![NodeKind::Returning];

    let node: OperationNode = delete_from("users")
        .clone_with_returning([SelectionNode::create(col("id"))])
        .unwrap()
        .into();
    assert_eq!(
        compile(&node, &profile).unwrap().sql,
        "DELETE FROM `users` RETURNING `id`"
    );
}
