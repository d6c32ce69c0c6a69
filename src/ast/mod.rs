pub mod clauses;
pub mod expr;
pub mod names;
pub mod node;
pub mod operators;
pub mod query;
pub mod values;

pub use self::clauses::{
    ColumnUpdateNode, CommonTableExpressionNameNode, CommonTableExpressionNode, ExplainNode,
    FromNode, GroupByNode, HavingNode, JoinNode, LimitNode, ModifierNode, OffsetNode,
    OnConflictNode, OnNode, OrderByItemNode, OrderByNode, OutputNode, ReturningNode,
    SelectionNode, TopNode, UsingNode, ValuesNode, WhereNode, WithNode, table_list,
};
pub use self::expr::{
    AndNode, BinaryOperationNode, FunctionNode, OperatorNode, OrNode, ParensNode, RawNode,
    UnaryOperationNode, ValueListNode, ValueNode, combine,
};
pub use self::names::{
    AliasNode, ColumnNode, IdentifierNode, ReferenceNode, SelectAllNode, TableNode,
};
pub use self::node::{NodeKind, NodeList, NodeType, OperationNode};
pub use self::operators::{
    ExplainFormat, JoinType, LogicalOp, Operator, SortDirection, StatementModifier, TopModifier,
};
pub use self::query::{
    DeleteQueryNode, HasEndModifiers, HasExplain, HasJoins, HasLimit, HasOrderBy, HasOutput,
    HasReturning, HasTop, HasWhere, HasWith, InsertQueryNode, SelectQueryNode, UpdateQueryNode,
};
pub use self::values::Value;
