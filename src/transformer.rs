//! Bottom-up tree rewriting.
//!
//! [`transform`] visits every node, rebuilds a parent only when one of its
//! children came back as a different allocation, and hands each (possibly
//! rebuilt) node to the transformer. Untouched subtrees are returned as the
//! same `Arc`s.

use std::collections::HashSet;
use std::sync::Arc;

use crate::ast::*;
use crate::error::QueryResult;

pub trait NodeTransformer {
    /// Called before a node's children are visited.
    fn enter(&mut self, _node: &OperationNode) {}

    /// Called after the children, with the node rebuilt around them.
    fn transform_node(&mut self, node: OperationNode) -> QueryResult<OperationNode> {
        Ok(node)
    }

    /// Called last, with the node as it was passed to [`NodeTransformer::enter`].
    fn exit(&mut self, _node: &OperationNode) {}
}

/// Rewrite `node` with `transformer`.
///
/// A typed child slot (a table, a WHERE clause, ...) fails with a kind
/// mismatch if the transformer replaces it with a node of another kind.
pub fn transform<T: NodeTransformer + ?Sized>(
    node: &OperationNode,
    transformer: &mut T,
) -> QueryResult<OperationNode> {
    transformer.enter(node);
    let rebuilt = rebuild(node, transformer)?;
    let out = transformer.transform_node(rebuilt)?;
    transformer.exit(node);
    Ok(out)
}

/// Tracks whether any child of the node being rebuilt changed.
struct Children<'t, T: ?Sized> {
    transformer: &'t mut T,
    changed: bool,
}

impl<T: NodeTransformer + ?Sized> Children<'_, T> {
    fn node(&mut self, child: &OperationNode) -> QueryResult<OperationNode> {
        let new = transform(child, &mut *self.transformer)?;
        if !new.ptr_eq(child) {
            self.changed = true;
        }
        Ok(new)
    }

    fn typed<N: NodeType>(&mut self, child: &Arc<N>) -> QueryResult<Arc<N>> {
        let original = child.clone().into_node();
        let new = transform(&original, &mut *self.transformer)?;
        if new.ptr_eq(&original) {
            return Ok(child.clone());
        }
        self.changed = true;
        Ok(new.cast::<N>()?.clone())
    }

    fn opt_node(&mut self, child: &Option<OperationNode>) -> QueryResult<Option<OperationNode>> {
        child.as_ref().map(|c| self.node(c)).transpose()
    }

    fn opt<N: NodeType>(&mut self, child: &Option<Arc<N>>) -> QueryResult<Option<Arc<N>>> {
        child.as_ref().map(|c| self.typed(c)).transpose()
    }

    fn list(&mut self, items: &NodeList<OperationNode>) -> QueryResult<NodeList<OperationNode>> {
        let before = self.changed;
        self.changed = false;
        let new: Vec<OperationNode> = items
            .iter()
            .map(|item| self.node(item))
            .collect::<QueryResult<_>>()?;
        let list_changed = self.changed;
        self.changed = before || list_changed;
        Ok(if list_changed { new.into() } else { items.clone() })
    }

    fn typed_list<N: NodeType>(&mut self, items: &NodeList<Arc<N>>) -> QueryResult<NodeList<Arc<N>>> {
        let before = self.changed;
        self.changed = false;
        let new: Vec<Arc<N>> = items
            .iter()
            .map(|item| self.typed(item))
            .collect::<QueryResult<_>>()?;
        let list_changed = self.changed;
        self.changed = before || list_changed;
        Ok(if list_changed { new.into() } else { items.clone() })
    }

    fn opt_list(
        &mut self,
        items: &Option<NodeList<OperationNode>>,
    ) -> QueryResult<Option<NodeList<OperationNode>>> {
        items.as_ref().map(|l| self.list(l)).transpose()
    }

    fn opt_typed_list<N: NodeType>(
        &mut self,
        items: &Option<NodeList<Arc<N>>>,
    ) -> QueryResult<Option<NodeList<Arc<N>>>> {
        items.as_ref().map(|l| self.typed_list(l)).transpose()
    }

    /// The original node if nothing changed, otherwise a new one.
    fn finish<N: NodeType>(self, original: &OperationNode, build: impl FnOnce() -> N) -> OperationNode {
        if self.changed {
            Arc::new(build()).into_node()
        } else {
            original.clone()
        }
    }
}

fn rebuild<T: NodeTransformer + ?Sized>(
    node: &OperationNode,
    transformer: &mut T,
) -> QueryResult<OperationNode> {
    let mut c = Children {
        transformer,
        changed: false,
    };
    let rebuilt = match node {
        OperationNode::Identifier(_)
        | OperationNode::SelectAll(_)
        | OperationNode::Value(_)
        | OperationNode::Operator(_)
        | OperationNode::Top(_)
        | OperationNode::Modifier(_) => node.clone(),
        OperationNode::Table(n) => {
            let schema = c.opt(&n.schema)?;
            let table = c.typed(&n.table)?;
            c.finish(node, || TableNode { schema, table })
        }
        OperationNode::Column(n) => {
            let column = c.typed(&n.column)?;
            c.finish(node, || ColumnNode { column })
        }
        OperationNode::Reference(n) => {
            let table = c.opt(&n.table)?;
            let column = c.node(&n.column)?;
            c.finish(node, || ReferenceNode { table, column })
        }
        OperationNode::Alias(n) => {
            let inner = c.node(&n.node)?;
            let alias = c.typed(&n.alias)?;
            c.finish(node, || AliasNode { node: inner, alias })
        }
        OperationNode::ValueList(n) => {
            let values = c.list(&n.values)?;
            c.finish(node, || ValueListNode { values })
        }
        OperationNode::Raw(n) => {
            let parameters = c.list(&n.parameters)?;
            c.finish(node, || RawNode {
                sql_fragments: n.sql_fragments.clone(),
                parameters,
            })
        }
        OperationNode::BinaryOperation(n) => {
            let left = c.node(&n.left)?;
            let operator = c.typed(&n.operator)?;
            let right = c.node(&n.right)?;
            c.finish(node, || BinaryOperationNode { left, operator, right })
        }
        OperationNode::UnaryOperation(n) => {
            let operator = c.typed(&n.operator)?;
            let operand = c.node(&n.operand)?;
            c.finish(node, || UnaryOperationNode { operator, operand })
        }
        OperationNode::And(n) => {
            let left = c.node(&n.left)?;
            let right = c.node(&n.right)?;
            c.finish(node, || AndNode { left, right })
        }
        OperationNode::Or(n) => {
            let left = c.node(&n.left)?;
            let right = c.node(&n.right)?;
            c.finish(node, || OrNode { left, right })
        }
        OperationNode::Parens(n) => {
            let inner = c.node(&n.node)?;
            c.finish(node, || ParensNode { node: inner })
        }
        OperationNode::Function(n) => {
            let arguments = c.list(&n.arguments)?;
            c.finish(node, || FunctionNode {
                name: n.name.clone(),
                arguments,
            })
        }
        OperationNode::From(n) => {
            let froms = c.list(&n.froms)?;
            c.finish(node, || FromNode { froms })
        }
        OperationNode::Using(n) => {
            let tables = c.list(&n.tables)?;
            c.finish(node, || UsingNode { tables })
        }
        OperationNode::Join(n) => {
            let table = c.node(&n.table)?;
            let on = c.opt(&n.on)?;
            c.finish(node, || JoinNode {
                join_type: n.join_type,
                table,
                on,
            })
        }
        OperationNode::On(n) => {
            let on = c.node(&n.on)?;
            c.finish(node, || OnNode { on })
        }
        OperationNode::Where(n) => {
            let predicate = c.node(&n.predicate)?;
            c.finish(node, || WhereNode { predicate })
        }
        OperationNode::Having(n) => {
            let predicate = c.node(&n.predicate)?;
            c.finish(node, || HavingNode { predicate })
        }
        OperationNode::Selection(n) => {
            let selection = c.node(&n.selection)?;
            c.finish(node, || SelectionNode { selection })
        }
        OperationNode::Returning(n) => {
            let selections = c.typed_list(&n.selections)?;
            c.finish(node, || ReturningNode { selections })
        }
        OperationNode::Output(n) => {
            let selections = c.list(&n.selections)?;
            c.finish(node, || OutputNode { selections })
        }
        OperationNode::OrderBy(n) => {
            let items = c.typed_list(&n.items)?;
            c.finish(node, || OrderByNode { items })
        }
        OperationNode::OrderByItem(n) => {
            let order_by = c.node(&n.order_by)?;
            c.finish(node, || OrderByItemNode {
                order_by,
                direction: n.direction,
            })
        }
        OperationNode::GroupBy(n) => {
            let items = c.list(&n.items)?;
            c.finish(node, || GroupByNode { items })
        }
        OperationNode::Limit(n) => {
            let limit = c.node(&n.limit)?;
            c.finish(node, || LimitNode { limit })
        }
        OperationNode::Offset(n) => {
            let offset = c.node(&n.offset)?;
            c.finish(node, || OffsetNode { offset })
        }
        OperationNode::Explain(n) => {
            let options = c.opt_node(&n.options)?;
            c.finish(node, || ExplainNode {
                format: n.format,
                options,
            })
        }
        OperationNode::With(n) => {
            let expressions = c.typed_list(&n.expressions)?;
            c.finish(node, || WithNode {
                recursive: n.recursive,
                expressions,
            })
        }
        OperationNode::CommonTableExpression(n) => {
            let name = c.typed(&n.name)?;
            let expression = c.node(&n.expression)?;
            c.finish(node, || CommonTableExpressionNode {
                name,
                materialized: n.materialized,
                expression,
            })
        }
        OperationNode::CommonTableExpressionName(n) => {
            let table = c.typed(&n.table)?;
            let columns = c.opt_typed_list(&n.columns)?;
            c.finish(node, || CommonTableExpressionNameNode { table, columns })
        }
        OperationNode::ColumnUpdate(n) => {
            let column = c.typed(&n.column)?;
            let value = c.node(&n.value)?;
            c.finish(node, || ColumnUpdateNode { column, value })
        }
        OperationNode::Values(n) => {
            let rows = c.typed_list(&n.rows)?;
            c.finish(node, || ValuesNode { rows })
        }
        OperationNode::OnConflict(n) => {
            let columns = c.opt_typed_list(&n.columns)?;
            let constraint = c.opt(&n.constraint)?;
            let updates = c.opt_typed_list(&n.updates)?;
            let update_where = c.opt(&n.update_where)?;
            c.finish(node, || OnConflictNode {
                columns,
                constraint,
                do_nothing: n.do_nothing,
                updates,
                update_where,
            })
        }
        OperationNode::SelectQuery(n) => {
            let with = c.opt(&n.with)?;
            let explain = c.opt(&n.explain)?;
            let top = c.opt(&n.top)?;
            let selections = c.opt_typed_list(&n.selections)?;
            let from = c.opt(&n.from)?;
            let joins = c.opt_typed_list(&n.joins)?;
            let where_clause = c.opt(&n.where_clause)?;
            let group_by = c.opt(&n.group_by)?;
            let having = c.opt(&n.having)?;
            let order_by = c.opt(&n.order_by)?;
            let limit = c.opt(&n.limit)?;
            let offset = c.opt(&n.offset)?;
            let end_modifiers = c.opt_list(&n.end_modifiers)?;
            c.finish(node, || SelectQueryNode {
                from,
                selections,
                distinct: n.distinct,
                joins,
                where_clause,
                group_by,
                having,
                order_by,
                limit,
                offset,
                with,
                explain,
                top,
                end_modifiers,
            })
        }
        OperationNode::InsertQuery(n) => {
            let with = c.opt(&n.with)?;
            let explain = c.opt(&n.explain)?;
            let top = c.opt(&n.top)?;
            let into = c.typed(&n.into)?;
            let columns = c.opt_typed_list(&n.columns)?;
            let values = c.opt_node(&n.values)?;
            let on_conflict = c.opt(&n.on_conflict)?;
            let returning = c.opt(&n.returning)?;
            let output = c.opt(&n.output)?;
            let end_modifiers = c.opt_list(&n.end_modifiers)?;
            c.finish(node, || InsertQueryNode {
                into,
                columns,
                values,
                default_values: n.default_values,
                ignore: n.ignore,
                on_conflict,
                returning,
                output,
                with,
                explain,
                top,
                end_modifiers,
            })
        }
        OperationNode::UpdateQuery(n) => {
            let with = c.opt(&n.with)?;
            let explain = c.opt(&n.explain)?;
            let top = c.opt(&n.top)?;
            let table = c.node(&n.table)?;
            let updates = c.opt_typed_list(&n.updates)?;
            let from = c.opt(&n.from)?;
            let joins = c.opt_typed_list(&n.joins)?;
            let where_clause = c.opt(&n.where_clause)?;
            let returning = c.opt(&n.returning)?;
            let output = c.opt(&n.output)?;
            let order_by = c.opt(&n.order_by)?;
            let limit = c.opt(&n.limit)?;
            let end_modifiers = c.opt_list(&n.end_modifiers)?;
            c.finish(node, || UpdateQueryNode {
                table,
                updates,
                from,
                joins,
                where_clause,
                returning,
                output,
                with,
                order_by,
                limit,
                top,
                explain,
                end_modifiers,
            })
        }
        OperationNode::DeleteQuery(n) => {
            let with = c.opt(&n.with)?;
            let explain = c.opt(&n.explain)?;
            let top = c.opt(&n.top)?;
            let from = c.typed(&n.from)?;
            let using = c.opt(&n.using)?;
            let joins = c.opt_typed_list(&n.joins)?;
            let where_clause = c.opt(&n.where_clause)?;
            let returning = c.opt(&n.returning)?;
            let output = c.opt(&n.output)?;
            let order_by = c.opt(&n.order_by)?;
            let limit = c.opt(&n.limit)?;
            let end_modifiers = c.opt_list(&n.end_modifiers)?;
            c.finish(node, || DeleteQueryNode {
                from,
                using,
                joins,
                where_clause,
                returning,
                with,
                order_by,
                limit,
                explain,
                end_modifiers,
                top,
                output,
            })
        }
    };
    Ok(rebuilt)
}

/// Qualifies every schema-less table with `schema`, leaving names bound by
/// a WITH clause alone. A WITH binds its names inside its own statement
/// only.
pub struct WithSchema {
    schema: Arc<IdentifierNode>,
    /// One frame of CTE names per statement currently being visited.
    scopes: Vec<HashSet<String>>,
}

impl WithSchema {
    pub fn new(schema: impl Into<String>) -> QueryResult<Self> {
        Ok(Self {
            schema: Arc::new(IdentifierNode::create(schema)?),
            scopes: Vec::new(),
        })
    }

    fn is_cte_name(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains(name))
    }
}

fn statement_with(node: &OperationNode) -> Option<Option<&Arc<WithNode>>> {
    match node {
        OperationNode::SelectQuery(q) => Some(q.with.as_ref()),
        OperationNode::InsertQuery(q) => Some(q.with.as_ref()),
        OperationNode::UpdateQuery(q) => Some(q.with.as_ref()),
        OperationNode::DeleteQuery(q) => Some(q.with.as_ref()),
        _ => None,
    }
}

impl NodeTransformer for WithSchema {
    fn enter(&mut self, node: &OperationNode) {
        if let Some(with) = statement_with(node) {
            let names = with
                .map(|w| w.names().map(str::to_string).collect())
                .unwrap_or_default();
            self.scopes.push(names);
        }
    }

    fn transform_node(&mut self, node: OperationNode) -> QueryResult<OperationNode> {
        if let Some(table) = node.downcast::<TableNode>() {
            if table.schema.is_none() && !self.is_cte_name(table.name()) {
                tracing::trace!("Qualifying table {} with schema {}", table.name(), self.schema.name);
                return Ok(table.clone_with_schema(self.schema.clone()).into());
            }
        }
        Ok(node)
    }

    fn exit(&mut self, node: &OperationNode) {
        if statement_with(node).is_some() {
            self.scopes.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpiler::ToSql;
    use pretty_assertions::assert_eq;

    struct Identity;
    impl NodeTransformer for Identity {}

    /// Replaces every column with a value node.
    struct ColumnsToValues;
    impl NodeTransformer for ColumnsToValues {
        fn transform_node(&mut self, node: OperationNode) -> QueryResult<OperationNode> {
            if ColumnNode::is(&node) {
                return Ok(ValueNode::create(0).into());
            }
            Ok(node)
        }
    }

    fn delete_users() -> OperationNode {
        DeleteQueryNode::create(table_list(["users"]).unwrap(), None)
            .unwrap()
            .clone_with_using(table_list(["logs"]).unwrap())
            .unwrap()
            .clone_with_where(BinaryOperationNode::create(
                ColumnNode::create("id").unwrap(),
                Operator::Eq,
                ValueNode::create(1),
            ))
            .into()
    }

    #[test]
    fn test_identity_returns_same_tree() {
        let node = delete_users();
        let out = transform(&node, &mut Identity).unwrap();
        assert!(out.ptr_eq(&node));
    }

    #[test]
    fn test_with_schema_qualifies_tables() {
        let node = delete_users();
        let out = transform(&node, &mut WithSchema::new("app").unwrap()).unwrap();

        assert_eq!(
            out.to_sql().unwrap().sql,
            "DELETE FROM \"app\".\"users\" USING \"app\".\"logs\" WHERE \"id\" = $1"
        );
        assert_eq!(
            node.to_sql().unwrap().sql,
            "DELETE FROM \"users\" USING \"logs\" WHERE \"id\" = $1"
        );

        let before = node.cast::<DeleteQueryNode>().unwrap();
        let after = out.cast::<DeleteQueryNode>().unwrap();
        assert!(Arc::ptr_eq(
            before.where_clause.as_ref().unwrap(),
            after.where_clause.as_ref().unwrap()
        ));
        assert!(!Arc::ptr_eq(&before.from, &after.from));
    }

    #[test]
    fn test_with_schema_skips_cte_names() {
        let body = SelectQueryNode::create_from(table_list(["logs"]).unwrap(), None).unwrap();
        let cte = CommonTableExpressionNode::create(
            CommonTableExpressionNameNode::create("recent", None).unwrap(),
            body,
        );
        let node: OperationNode = DeleteQueryNode::create(
            table_list(["users"]).unwrap(),
            Some(WithNode::create(cte, false)),
        )
        .unwrap()
        .clone_with_using(table_list(["recent"]).unwrap())
        .unwrap()
        .into();

        let out = transform(&node, &mut WithSchema::new("app").unwrap()).unwrap();
        assert_eq!(
            out.to_sql().unwrap().sql,
            "WITH \"recent\" AS (SELECT * FROM \"app\".\"logs\") \
             DELETE FROM \"app\".\"users\" USING \"recent\""
        );
    }

    #[test]
    fn test_with_schema_cte_names_stay_in_their_statement() {
        let archive = SelectQueryNode::create_from(table_list(["archive"]).unwrap(), None).unwrap();
        let cte = CommonTableExpressionNode::create(
            CommonTableExpressionNameNode::create("orders", None).unwrap(),
            archive,
        );
        let inner = SelectQueryNode::create_from(
            table_list(["orders"]).unwrap(),
            Some(WithNode::create(cte, false)),
        )
        .unwrap();
        let outer: OperationNode = SelectQueryNode::create_from(table_list(["orders"]).unwrap(), None)
            .unwrap()
            .clone_with_selections([SelectionNode::create(inner)])
            .into();

        let mut with_schema = WithSchema::new("app").unwrap();
        let out = transform(&outer, &mut with_schema).unwrap();
        assert_eq!(
            out.to_sql().unwrap().sql,
            "SELECT (WITH \"orders\" AS (SELECT * FROM \"app\".\"archive\") \
             SELECT * FROM \"orders\") FROM \"app\".\"orders\""
        );
        assert!(with_schema.scopes.is_empty());
    }

    #[test]
    fn test_wrong_kind_in_typed_slot_fails() {
        let insert: OperationNode = InsertQueryNode::create(TableNode::create("users").unwrap(), None)
            .clone_with_columns([ColumnNode::create("id").unwrap()])
            .clone_with_default_values()
            .into();
        let err = transform(&insert, &mut ColumnsToValues).unwrap_err();
        assert!(matches!(
            err,
            crate::error::QueryError::KindMismatch {
                expected: NodeKind::Column,
                found: NodeKind::Value
            }
        ));
    }

    #[test]
    fn test_untyped_slot_accepts_any_kind() {
        let node = delete_users();
        let out = transform(&node, &mut ColumnsToValues).unwrap();
        let compiled = out.to_sql().unwrap();
        assert_eq!(
            compiled.sql,
            "DELETE FROM \"users\" USING \"logs\" WHERE $1 = $2"
        );
        assert_eq!(compiled.parameters, vec![Value::Int(0), Value::Int(1)]);
    }
}
