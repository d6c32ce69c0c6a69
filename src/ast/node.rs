//! The operation-node enum and its kind tag.
//!
//! Every SQL construct is one variant of [`OperationNode`]. Variants hold their
//! payload behind an `Arc`, so cloning a node (or a parent that owns it) copies
//! a pointer and never the subtree. Node structs are never mutated after
//! construction; all "changes" go through `clone_with_*` methods that build a
//! new parent around the same children.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::clauses::*;
use crate::ast::expr::*;
use crate::ast::names::*;
use crate::ast::query::{DeleteQueryNode, InsertQueryNode, SelectQueryNode, UpdateQueryNode};
use crate::error::{QueryError, QueryResult};

/// Ordered, shareable list of children. Cloning it copies a pointer.
pub type NodeList<T> = Arc<[T]>;

/// Implemented by every concrete node struct.
pub trait NodeType: Sized {
    /// The kind tag of this node type.
    const KIND: NodeKind;

    /// Borrow the payload if `node` is of this kind.
    fn downcast(node: &OperationNode) -> Option<&Arc<Self>>;

    /// Wrap a shared payload back into the tagged enum.
    fn into_node(self: Arc<Self>) -> OperationNode;

    /// Kind test enabling safe access to kind-specific fields.
    fn is(node: &OperationNode) -> bool {
        node.kind() == Self::KIND
    }

    /// Like [`NodeType::downcast`], but a wrong kind is an error.
    fn cast(node: &OperationNode) -> QueryResult<&Arc<Self>> {
        Self::downcast(node).ok_or_else(|| QueryError::mismatch(Self::KIND, node.kind()))
    }
}

macro_rules! operation_nodes {
    ($( $(#[$doc:meta])* $kind:ident => $node:ident ),+ $(,)?) => {
        /// Field-less discriminant of [`OperationNode`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum NodeKind {
            $( $(#[$doc])* $kind ),+
        }

        impl NodeKind {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( NodeKind::$kind => stringify!($kind) ),+
                }
            }
        }

        /// One immutable node of a query tree.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "kind")]
        pub enum OperationNode {
            $( $(#[$doc])* $kind(Arc<$node>) ),+
        }

        impl OperationNode {
            pub fn kind(&self) -> NodeKind {
                match self {
                    $( OperationNode::$kind(_) => NodeKind::$kind ),+
                }
            }

            /// True when both nodes point at the same allocation.
            pub fn ptr_eq(&self, other: &OperationNode) -> bool {
                match (self, other) {
                    $( (OperationNode::$kind(a), OperationNode::$kind(b)) => Arc::ptr_eq(a, b), )+
                    _ => false,
                }
            }
        }

        $(
            impl NodeType for $node {
                const KIND: NodeKind = NodeKind::$kind;

                fn downcast(node: &OperationNode) -> Option<&Arc<Self>> {
                    match node {
                        OperationNode::$kind(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn into_node(self: Arc<Self>) -> OperationNode {
                    OperationNode::$kind(self)
                }
            }

            impl From<$node> for OperationNode {
                fn from(node: $node) -> Self {
                    OperationNode::$kind(Arc::new(node))
                }
            }

            impl From<Arc<$node>> for OperationNode {
                fn from(node: Arc<$node>) -> Self {
                    OperationNode::$kind(node)
                }
            }
        )+
    };
}

operation_nodes! {
    // Names
    Identifier => IdentifierNode,
    Table => TableNode,
    Column => ColumnNode,
    Reference => ReferenceNode,
    SelectAll => SelectAllNode,
    Alias => AliasNode,

    // Expressions
    /// Bound (or immediate) scalar value
    Value => ValueNode,
    ValueList => ValueListNode,
    /// Verbatim SQL fragments interleaved with parameter nodes
    Raw => RawNode,
    Operator => OperatorNode,
    BinaryOperation => BinaryOperationNode,
    UnaryOperation => UnaryOperationNode,
    And => AndNode,
    Or => OrNode,
    Parens => ParensNode,
    Function => FunctionNode,

    // Clauses
    From => FromNode,
    Using => UsingNode,
    Join => JoinNode,
    On => OnNode,
    Where => WhereNode,
    Selection => SelectionNode,
    Returning => ReturningNode,
    /// SQL Server OUTPUT clause
    Output => OutputNode,
    OrderBy => OrderByNode,
    OrderByItem => OrderByItemNode,
    GroupBy => GroupByNode,
    Having => HavingNode,
    Limit => LimitNode,
    Offset => OffsetNode,
    /// SQL Server TOP row limiter
    Top => TopNode,
    Explain => ExplainNode,
    With => WithNode,
    CommonTableExpression => CommonTableExpressionNode,
    CommonTableExpressionName => CommonTableExpressionNameNode,
    ColumnUpdate => ColumnUpdateNode,
    Values => ValuesNode,
    OnConflict => OnConflictNode,
    /// Trailing statement modifier (FOR UPDATE, SKIP LOCKED, ...)
    Modifier => ModifierNode,

    // Statements
    SelectQuery => SelectQueryNode,
    InsertQuery => InsertQueryNode,
    UpdateQuery => UpdateQueryNode,
    DeleteQuery => DeleteQueryNode,
}

impl NodeKind {
    /// True for the four statement kinds.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            NodeKind::SelectQuery | NodeKind::InsertQuery | NodeKind::UpdateQuery | NodeKind::DeleteQuery
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OperationNode {
    /// Borrow the payload as `T`, or `None` on a kind mismatch.
    pub fn downcast<T: NodeType>(&self) -> Option<&Arc<T>> {
        T::downcast(self)
    }

    /// Borrow the payload as `T`, failing fast on a kind mismatch.
    pub fn cast<T: NodeType>(&self) -> QueryResult<&Arc<T>> {
        T::cast(self)
    }

    pub fn is<T: NodeType>(&self) -> bool {
        T::is(self)
    }
}

/// Collect items into a shared list, rejecting an empty one.
pub(crate) fn non_empty<T>(
    items: impl IntoIterator<Item = T>,
    node: NodeKind,
    reason: &'static str,
) -> QueryResult<NodeList<T>> {
    let items: Vec<T> = items.into_iter().collect();
    if items.is_empty() {
        return Err(QueryError::invalid(node, reason));
    }
    Ok(items.into())
}

/// Append `extra` after the items of `list`, keeping order.
pub(crate) fn appended<T: Clone>(list: &NodeList<T>, extra: impl IntoIterator<Item = T>) -> NodeList<T> {
    list.iter().cloned().chain(extra).collect()
}
