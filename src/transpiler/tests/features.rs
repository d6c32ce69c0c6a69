//! CTEs, upserts, EXPLAIN, lateral joins and statement modifiers.

use pretty_assertions::assert_eq;

use super::{col, delete_from, eq, select_from, tables};
use crate::ast::*;
use crate::transpiler::ToSql;

fn cte(name: &str, columns: Option<Vec<String>>, query: impl Into<OperationNode>) -> CommonTableExpressionNode {
    CommonTableExpressionNode::create(
        CommonTableExpressionNameNode::create(name, columns).unwrap(),
        query,
    )
}

#[test]
fn test_delete_with_cte() {
    let recent = select_from("logs")
        .clone_with_selections([SelectionNode::create(col("user_id"))])
        .clone_with_where(BinaryOperationNode::create(
            col("at"),
            Operator::Gt,
            ValueNode::create("2024-01-01"),
        ));
    let with = WithNode::create(cte("recent", Some(vec!["id".to_string()]), recent), false);

    let node = DeleteQueryNode::create(tables(&["users"]), Some(with))
        .unwrap()
        .clone_with_using(tables(&["recent"]))
        .unwrap()
        .clone_with_where(BinaryOperationNode::create(
            ReferenceNode::parse("users.id").unwrap(),
            Operator::Eq,
            ReferenceNode::parse("recent.id").unwrap(),
        ));

    let compiled = node.to_sql().unwrap();
    assert_eq!(
        compiled.sql,
        "WITH \"recent\"(\"id\") AS (SELECT \"user_id\" FROM \"logs\" WHERE \"at\" > $1) \
         DELETE FROM \"users\" USING \"recent\" WHERE \"users\".\"id\" = \"recent\".\"id\""
    );
    assert_eq!(compiled.parameters, vec![Value::from("2024-01-01")]);
}

#[test]
fn test_with_merges_and_materialization() {
    let first = WithNode::create(cte("a", None, select_from("t1")), false);
    let second = WithNode::create(
        cte("b", None, select_from("t2")).clone_with_materialized(false),
        true,
    );
    let node = select_from("a").clone_with_with(first).clone_with_with(second);

    assert_eq!(
        node.to_sql().unwrap().sql,
        "WITH RECURSIVE \"a\" AS (SELECT * FROM \"t1\"), \
         \"b\" AS NOT MATERIALIZED (SELECT * FROM \"t2\") SELECT * FROM \"a\""
    );
    assert!(node.clone_without_with().with.is_none());
}

#[test]
fn test_explain_postgres() {
    let node = delete_from("users").clone_with_explain(ExplainNode::create(
        Some(ExplainFormat::Json),
        Some(RawNode::create_with_sql("ANALYZE").into()),
    ));
    assert_eq!(
        node.to_sql().unwrap().sql,
        "EXPLAIN (ANALYZE, FORMAT JSON) DELETE FROM \"users\""
    );

    let bare = delete_from("users").clone_with_explain(ExplainNode::create(None, None));
    assert_eq!(bare.to_sql().unwrap().sql, "EXPLAIN DELETE FROM \"users\"");
}

#[test]
fn test_on_conflict_do_update() {
    let on_conflict = OnConflictNode::create_do_update(
        [col("email")],
        [ColumnUpdateNode::set("name", "Ada").unwrap()],
    )
    .unwrap()
    .clone_with_update_where(eq("active", true));
    let node = InsertQueryNode::create(TableNode::create("users").unwrap(), None)
        .clone_with_columns([col("email"), col("name")])
        .clone_with_values(
            ValuesNode::create([ValueListNode::from_values(["a@x.io", "A"]).unwrap()]).unwrap(),
        )
        .clone_with_on_conflict(on_conflict);

    let compiled = node.to_sql().unwrap();
    assert_eq!(
        compiled.sql,
        "INSERT INTO \"users\" (\"email\", \"name\") VALUES ($1, $2) \
         ON CONFLICT (\"email\") DO UPDATE SET \"name\" = $3 WHERE \"active\" = $4"
    );
    assert_eq!(
        compiled.parameters,
        vec![
            Value::from("a@x.io"),
            Value::from("A"),
            Value::from("Ada"),
            Value::Bool(true),
        ]
    );
}

#[test]
fn test_on_conflict_do_nothing_on_constraint() {
    let on_conflict = OnConflictNode::create_do_nothing(Vec::new())
        .clone_with_constraint("users_email_key")
        .unwrap();
    let node = InsertQueryNode::create(TableNode::create("users").unwrap(), None)
        .clone_with_values(ValuesNode::create([ValueListNode::from_values(["a@x.io"]).unwrap()]).unwrap())
        .clone_with_on_conflict(on_conflict);
    assert_eq!(
        node.to_sql().unwrap().sql,
        "INSERT INTO \"users\" VALUES ($1) ON CONFLICT ON CONSTRAINT \"users_email_key\" DO NOTHING"
    );
}

#[test]
fn test_end_modifiers() {
    let node = select_from("jobs")
        .clone_with_where(eq("state", "queued"))
        .clone_with_limit(LimitNode::rows(1))
        .clone_with_end_modifier(ModifierNode::create(StatementModifier::ForUpdate))
        .clone_with_end_modifier(ModifierNode::create(StatementModifier::SkipLocked));
    assert_eq!(
        node.to_sql().unwrap().sql,
        "SELECT * FROM \"jobs\" WHERE \"state\" = $1 LIMIT $2 FOR UPDATE SKIP LOCKED"
    );
}

#[test]
fn test_raw_end_modifier_on_delete() {
    let node = delete_from("users").clone_with_end_modifier(RawNode::create_with_sql("-- purge"));
    assert_eq!(node.to_sql().unwrap().sql, "DELETE FROM \"users\" -- purge");
}

#[test]
fn test_lateral_join_with_aliased_subquery() {
    let latest = select_from("orders")
        .clone_with_where(BinaryOperationNode::create(
            ReferenceNode::parse("orders.user_id").unwrap(),
            Operator::Eq,
            ReferenceNode::parse("users.id").unwrap(),
        ))
        .clone_with_limit(LimitNode::rows(1));
    let join = JoinNode::create_with_on(
        JoinType::LateralLeft,
        AliasNode::create(latest, "latest").unwrap(),
        ValueNode::create_immediate(true),
    );
    let node = select_from("users").clone_with_join(join);

    assert_eq!(
        node.to_sql().unwrap().sql,
        "SELECT * FROM \"users\" LEFT JOIN LATERAL (SELECT * FROM \"orders\" \
         WHERE \"orders\".\"user_id\" = \"users\".\"id\" LIMIT $1) AS \"latest\" ON true"
    );
}

#[test]
fn test_select_all_reference_and_schema() {
    let node = SelectQueryNode::create_from(
        vec![TableNode::create_with_schema("app", "users").unwrap().into()],
        None,
    )
    .unwrap()
    .clone_with_selections([SelectionNode::create(ReferenceNode::parse("users.*").unwrap())]);
    assert_eq!(
        node.to_sql().unwrap().sql,
        "SELECT \"users\".* FROM \"app\".\"users\""
    );
}

#[test]
fn test_placeholders_align_with_parameters() {
    let node = delete_from("users")
        .clone_with_where(eq("a", "x"))
        .clone_with_where(BinaryOperationNode::create(
            col("b"),
            Operator::In,
            ValueListNode::from_values([1, 2, 3]).unwrap(),
        ))
        .clone_with_limit(LimitNode::rows(9));
    let compiled = node.to_sql().unwrap();

    assert_eq!(
        compiled.sql,
        "DELETE FROM \"users\" WHERE \"a\" = $1 AND \"b\" IN ($2, $3, $4) LIMIT $5"
    );
    assert_eq!(compiled.parameters.len(), 5);
    assert_eq!(compiled.parameters[0], Value::from("x"));
    assert_eq!(compiled.parameters[4], Value::Int(9));
}
