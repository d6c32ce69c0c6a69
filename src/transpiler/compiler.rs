//! Tree walker turning an operation node into SQL text and parameters.
//!
//! Statement and clause rules live in [`crate::transpiler::dml`]; this module
//! owns the output buffer, the parameter list, and the rules for names and
//! expressions.

use std::sync::Arc;

use serde::Serialize;

use crate::ast::*;
use crate::error::{QueryError, QueryResult};
use crate::transpiler::params::ParamContext;
use crate::transpiler::traits::DialectAdapter;

/// SQL text plus the values bound to its placeholders, in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub parameters: Vec<Value>,
}

/// Compile `root` for the given dialect.
///
/// On failure no partial text is returned.
pub fn compile(root: &OperationNode, adapter: &dyn DialectAdapter) -> QueryResult<CompiledQuery> {
    let mut compiler = QueryCompiler::new(adapter);
    match compiler.visit_node(root) {
        Ok(()) => {
            tracing::debug!(
                "Compiled {} for {}: {} parameter(s)",
                root.kind(),
                adapter.name(),
                compiler.params.params.len()
            );
            Ok(compiler.finish())
        }
        Err(e) => {
            tracing::debug!("Rejected {} for {}: {}", root.kind(), adapter.name(), e);
            Err(e)
        }
    }
}

/// Expression position an operand is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    /// Operand of AND: OR binds looser.
    And,
    /// Operand of a comparison or arithmetic operator.
    Binary,
    /// Operand of NOT / EXISTS.
    Prefix,
    /// Operand of unary minus: anything that may render with a leading `-`
    /// would start a `--` comment.
    Negation,
}

impl Grouping {
    fn wraps(self, node: &OperationNode) -> bool {
        match (self, node) {
            (_, OperationNode::Or(_)) => true,
            (Grouping::And, _) => false,
            (_, OperationNode::And(_)) => true,
            (Grouping::Prefix, _) => false,
            (_, OperationNode::BinaryOperation(_)) => true,
            (Grouping::Binary, OperationNode::UnaryOperation(u)) => {
                u.operator.operator == Operator::Not
            }
            (Grouping::Binary, _) => false,
            (
                Grouping::Negation,
                OperationNode::Column(_)
                | OperationNode::Reference(_)
                | OperationNode::Function(_)
                | OperationNode::Parens(_)
                | OperationNode::ValueList(_)
                | OperationNode::SelectQuery(_),
            ) => false,
            (Grouping::Negation, OperationNode::Value(v)) => v.immediate,
            (Grouping::Negation, _) => true,
        }
    }
}

pub(crate) struct QueryCompiler<'a> {
    pub(crate) adapter: &'a dyn DialectAdapter,
    pub(crate) sql: String,
    pub(crate) params: ParamContext,
    /// Kinds of the nodes currently being visited, innermost last.
    parents: Vec<NodeKind>,
}

impl<'a> QueryCompiler<'a> {
    pub(crate) fn new(adapter: &'a dyn DialectAdapter) -> Self {
        Self {
            adapter,
            sql: String::new(),
            params: ParamContext::new(),
            parents: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> CompiledQuery {
        CompiledQuery {
            sql: self.sql,
            parameters: self.params.params,
        }
    }

    pub(crate) fn append(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    pub(crate) fn unsupported(&self, clause: impl Into<String>) -> QueryError {
        QueryError::unsupported(clause, self.adapter.name())
    }

    /// Visit any node: dialect check, subquery parentheses, then the kind's rule.
    pub(crate) fn visit_node(&mut self, node: &OperationNode) -> QueryResult<()> {
        let kind = node.kind();
        if !self.adapter.supports(kind) {
            return Err(self.unsupported(kind.as_str()));
        }

        let wrap = kind.is_query() && self.is_nested_query();
        if wrap {
            self.append("(");
        }
        self.parents.push(kind);
        let result = self.dispatch(node);
        self.parents.pop();
        result?;
        if wrap {
            self.append(")");
        }
        Ok(())
    }

    /// A query directly inside Parens or used as an INSERT source is already
    /// delimited.
    fn is_nested_query(&self) -> bool {
        !matches!(
            self.parents.last(),
            None | Some(NodeKind::Parens) | Some(NodeKind::InsertQuery)
        )
    }

    pub(crate) fn visit_child<T: NodeType>(&mut self, node: &Arc<T>) -> QueryResult<()> {
        self.visit_node(&node.clone().into_node())
    }

    pub(crate) fn visit_list(&mut self, items: &[OperationNode], separator: &str) -> QueryResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.append(separator);
            }
            self.visit_node(item)?;
        }
        Ok(())
    }

    pub(crate) fn visit_child_list<T: NodeType>(
        &mut self,
        items: &[Arc<T>],
        separator: &str,
    ) -> QueryResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.append(separator);
            }
            self.visit_child(item)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, node: &OperationNode) -> QueryResult<()> {
        match node {
            OperationNode::Identifier(n) => {
                let quoted = self.adapter.quote_identifier(&n.name);
                self.append(&quoted);
                Ok(())
            }
            OperationNode::Table(n) => self.visit_table(n),
            OperationNode::Column(n) => self.visit_child(&n.column),
            OperationNode::Reference(n) => self.visit_reference(n),
            OperationNode::SelectAll(_) => {
                self.append("*");
                Ok(())
            }
            OperationNode::Alias(n) => {
                self.visit_node(&n.node)?;
                self.append(" AS ");
                self.visit_child(&n.alias)
            }
            OperationNode::Value(n) => {
                self.visit_value(n);
                Ok(())
            }
            OperationNode::ValueList(n) => {
                self.append("(");
                self.visit_list(&n.values, ", ")?;
                self.append(")");
                Ok(())
            }
            OperationNode::Raw(n) => self.visit_raw(n),
            OperationNode::Operator(n) => {
                let op = self.operator_sql(n.operator);
                self.append(op);
                Ok(())
            }
            OperationNode::BinaryOperation(n) => {
                self.visit_operand(&n.left, Grouping::Binary)?;
                self.append(" ");
                self.visit_child(&n.operator)?;
                self.append(" ");
                self.visit_operand(&n.right, Grouping::Binary)
            }
            OperationNode::UnaryOperation(n) => {
                self.visit_child(&n.operator)?;
                if n.operator.operator == Operator::Neg {
                    self.visit_operand(&n.operand, Grouping::Negation)
                } else {
                    self.append(" ");
                    self.visit_operand(&n.operand, Grouping::Prefix)
                }
            }
            OperationNode::And(n) => {
                self.visit_operand(&n.left, Grouping::And)?;
                self.append(" AND ");
                self.visit_operand(&n.right, Grouping::And)
            }
            OperationNode::Or(n) => {
                self.visit_node(&n.left)?;
                self.append(" OR ");
                self.visit_node(&n.right)
            }
            OperationNode::Parens(n) => {
                self.append("(");
                self.visit_node(&n.node)?;
                self.append(")");
                Ok(())
            }
            OperationNode::Function(n) => {
                self.append(&n.name);
                self.append("(");
                self.visit_list(&n.arguments, ", ")?;
                self.append(")");
                Ok(())
            }
            OperationNode::From(n) => self.visit_from(n),
            OperationNode::Using(n) => self.visit_using(n),
            OperationNode::Join(n) => self.visit_join(n),
            OperationNode::On(n) => self.visit_on(n),
            OperationNode::Where(n) => self.visit_where(n),
            OperationNode::Selection(n) => self.visit_node(&n.selection),
            OperationNode::Returning(n) => self.visit_returning(n),
            OperationNode::Output(n) => self.visit_output(n),
            OperationNode::OrderBy(n) => self.visit_order_by(n),
            OperationNode::OrderByItem(n) => self.visit_order_by_item(n),
            OperationNode::GroupBy(n) => self.visit_group_by(n),
            OperationNode::Having(n) => self.visit_having(n),
            OperationNode::Limit(n) => self.visit_limit(n),
            OperationNode::Offset(n) => self.visit_offset(n),
            OperationNode::Top(n) => {
                self.visit_top(n);
                Ok(())
            }
            OperationNode::Explain(n) => self.visit_explain(n),
            OperationNode::With(n) => self.visit_with(n),
            OperationNode::CommonTableExpression(n) => self.visit_cte(n),
            OperationNode::CommonTableExpressionName(n) => self.visit_cte_name(n),
            OperationNode::ColumnUpdate(n) => self.visit_column_update(n),
            OperationNode::Values(n) => self.visit_values(n),
            OperationNode::OnConflict(n) => self.visit_on_conflict(n),
            OperationNode::Modifier(n) => {
                self.append(n.modifier.as_sql());
                Ok(())
            }
            OperationNode::SelectQuery(n) => self.visit_select(n),
            OperationNode::InsertQuery(n) => self.visit_insert(n),
            OperationNode::UpdateQuery(n) => self.visit_update(n),
            OperationNode::DeleteQuery(n) => self.visit_delete(n),
        }
    }

    fn visit_table(&mut self, table: &TableNode) -> QueryResult<()> {
        if let Some(schema) = &table.schema {
            self.visit_child(schema)?;
            self.append(".");
        }
        self.visit_child(&table.table)
    }

    fn visit_reference(&mut self, reference: &ReferenceNode) -> QueryResult<()> {
        if let Some(table) = &reference.table {
            self.visit_child(table)?;
            self.append(".");
        }
        self.visit_node(&reference.column)
    }

    /// Bound values become placeholders, immediate values literals.
    fn visit_value(&mut self, node: &ValueNode) {
        if node.immediate {
            let literal = self.literal(&node.value);
            self.append(&literal);
        } else {
            let placeholder = self.params.add_param(node.value.clone(), self.adapter);
            self.append(&placeholder);
        }
    }

    fn visit_raw(&mut self, raw: &RawNode) -> QueryResult<()> {
        for (i, fragment) in raw.sql_fragments.iter().enumerate() {
            self.append(fragment);
            if let Some(param) = raw.parameters.get(i) {
                self.visit_node(param)?;
            }
        }
        Ok(())
    }

    /// Visit an expression operand, parenthesized when SQL precedence would
    /// otherwise regroup it.
    fn visit_operand(&mut self, node: &OperationNode, grouping: Grouping) -> QueryResult<()> {
        if grouping.wraps(node) {
            self.append("(");
            self.visit_node(node)?;
            self.append(")");
            Ok(())
        } else {
            self.visit_node(node)
        }
    }

    fn operator_sql(&self, op: Operator) -> &'static str {
        match op {
            Operator::ILike => self.adapter.case_insensitive_like(false),
            Operator::NotILike => self.adapter.case_insensitive_like(true),
            other => other.as_sql(),
        }
    }

    pub(crate) fn literal(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => self.adapter.bool_literal(*b),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::String(s) => self.adapter.string_literal(s),
            Value::Bytes(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
                format!("X'{}'", hex)
            }
            Value::Uuid(u) => self.adapter.string_literal(&u.to_string()),
            Value::Timestamp(t) => self.adapter.string_literal(&t.to_rfc3339()),
            Value::Json(j) => self.adapter.string_literal(&j.to_string()),
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(|v| self.literal(v)).collect();
                format!("({})", items.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpiler::Dialect;
    use pretty_assertions::assert_eq;

    fn pg(node: impl Into<OperationNode>) -> CompiledQuery {
        compile(&node.into(), Dialect::Postgres.generator()).unwrap()
    }

    fn col(name: &str) -> ColumnNode {
        ColumnNode::create(name).unwrap()
    }

    #[test]
    fn test_identifiers_are_quoted() {
        let table = TableNode::create_with_schema("app", "users").unwrap();
        assert_eq!(pg(table).sql, "\"app\".\"users\"");

        let reference = ReferenceNode::parse("users.id").unwrap();
        assert_eq!(pg(reference).sql, "\"users\".\"id\"");

        let alias = AliasNode::create(col("email"), "e").unwrap();
        assert_eq!(pg(alias).sql, "\"email\" AS \"e\"");
    }

    #[test]
    fn test_binary_operation_binds_value() {
        let node = BinaryOperationNode::create(col("age"), Operator::Gte, ValueNode::create(18));
        let compiled = pg(node);
        assert_eq!(compiled.sql, "\"age\" >= $1");
        assert_eq!(compiled.parameters, vec![Value::Int(18)]);
    }

    #[test]
    fn test_or_inside_and_is_grouped() {
        let a = BinaryOperationNode::create(col("a"), Operator::Eq, ValueNode::create(1));
        let b = BinaryOperationNode::create(col("b"), Operator::Eq, ValueNode::create(2));
        let c = BinaryOperationNode::create(col("c"), Operator::Eq, ValueNode::create(3));
        let node = AndNode::create(OrNode::create(a, b), c);
        assert_eq!(pg(node).sql, "(\"a\" = $1 OR \"b\" = $2) AND \"c\" = $3");
    }

    #[test]
    fn test_unary_spacing() {
        let not = UnaryOperationNode::create(Operator::Not, col("deleted")).unwrap();
        assert_eq!(pg(not).sql, "NOT \"deleted\"");

        let neg = UnaryOperationNode::create(Operator::Neg, col("balance")).unwrap();
        assert_eq!(pg(neg).sql, "-\"balance\"");
    }

    #[test]
    fn test_negation_never_emits_comment_marker() {
        let neg = |operand: OperationNode| {
            UnaryOperationNode::create(Operator::Neg, operand).unwrap()
        };

        let double = neg(neg(col("balance").into()).into());
        assert_eq!(pg(double).sql, "-(-\"balance\")");

        let literal = neg(ValueNode::create_immediate(-5).into());
        assert_eq!(pg(literal).sql, "-(-5)");

        let bound = neg(ValueNode::create(-5).into());
        let compiled = pg(bound);
        assert_eq!(compiled.sql, "-$1");
        assert_eq!(compiled.parameters, vec![Value::Int(-5)]);
    }

    #[test]
    fn test_not_groups_logical_operand() {
        let a = BinaryOperationNode::create(col("a"), Operator::Eq, ValueNode::create(1));
        let b = BinaryOperationNode::create(col("b"), Operator::Eq, ValueNode::create(2));

        let not_or = UnaryOperationNode::create(Operator::Not, OrNode::create(a.clone(), b.clone()))
            .unwrap();
        assert_eq!(pg(not_or).sql, "NOT (\"a\" = $1 OR \"b\" = $2)");

        let not_and = UnaryOperationNode::create(Operator::Not, AndNode::create(a.clone(), b))
            .unwrap();
        assert_eq!(pg(not_and).sql, "NOT (\"a\" = $1 AND \"b\" = $2)");

        let not_cmp = UnaryOperationNode::create(Operator::Not, a).unwrap();
        assert_eq!(pg(not_cmp).sql, "NOT \"a\" = $1");
    }

    #[test]
    fn test_binary_groups_compound_operands() {
        let a = BinaryOperationNode::create(col("a"), Operator::Eq, ValueNode::create(1));
        let b = BinaryOperationNode::create(col("b"), Operator::Eq, ValueNode::create(2));
        let node = BinaryOperationNode::create(
            OrNode::create(a, b),
            Operator::Eq,
            ValueNode::create_immediate(true),
        );
        assert_eq!(pg(node).sql, "(\"a\" = $1 OR \"b\" = $2) = true");

        let sum = BinaryOperationNode::create(col("x"), Operator::Add, col("y"));
        let node = BinaryOperationNode::create(sum, Operator::Mul, ValueNode::create(2));
        assert_eq!(pg(node).sql, "(\"x\" + \"y\") * $1");
    }

    #[test]
    fn test_raw_interleaves_parameters() {
        let raw = RawNode::create(
            vec!["now() - interval '1 day' * ".to_string(), "".to_string()],
            vec![ValueNode::create(7).into()],
        )
        .unwrap();
        let compiled = pg(raw);
        assert_eq!(compiled.sql, "now() - interval '1 day' * $1");
        assert_eq!(compiled.parameters, vec![Value::Int(7)]);
    }

    #[test]
    fn test_immediate_literals() {
        assert_eq!(pg(ValueNode::create_immediate("O'Brien")).sql, "'O''Brien'");
        assert_eq!(pg(ValueNode::create_immediate(true)).sql, "true");
        assert_eq!(pg(ValueNode::create_immediate(Value::Null)).sql, "NULL");
        assert_eq!(
            pg(ValueNode::create_immediate(Value::Bytes(vec![0xde, 0xad]))).sql,
            "X'DEAD'"
        );
        assert!(pg(ValueNode::create_immediate(5)).parameters.is_empty());
    }

    #[test]
    fn test_function_and_value_list() {
        let f = FunctionNode::create("coalesce", vec![col("a").into(), ValueNode::create(0).into()])
            .unwrap();
        assert_eq!(pg(f).sql, "coalesce(\"a\", $1)");

        let list = ValueListNode::from_values(vec![1, 2]).unwrap();
        assert_eq!(pg(list).sql, "($1, $2)");
    }
}
