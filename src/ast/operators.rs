use serde::{Deserialize, Serialize};

/// Binary and unary operators usable in expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// Equal (=)
    Eq,
    /// Not equal (<>)
    Ne,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    Like,
    NotLike,
    /// Case-insensitive LIKE (ILIKE on Postgres)
    ILike,
    NotILike,
    In,
    NotIn,
    Is,
    IsNot,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// String concatenation (||)
    Concat,
    // Unary
    Not,
    Exists,
    NotExists,
    /// Arithmetic negation (-x)
    Neg,
}

impl Operator {
    /// Dialect-neutral SQL spelling.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::ILike => "ILIKE",
            Operator::NotILike => "NOT ILIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
            Operator::Add => "+",
            Operator::Sub | Operator::Neg => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Concat => "||",
            Operator::Not => "NOT",
            Operator::Exists => "EXISTS",
            Operator::NotExists => "NOT EXISTS",
        }
    }

    /// Operators that take a single operand.
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            Operator::Not | Operator::Exists | Operator::NotExists | Operator::Neg
        )
    }
}

/// Logical connective used when merging predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    LateralInner,
    LateralLeft,
}

impl JoinType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
            JoinType::Cross => "CROSS JOIN",
            JoinType::LateralInner => "INNER JOIN LATERAL",
            JoinType::LateralLeft => "LEFT JOIN LATERAL",
        }
    }
}

/// Sort direction for ORDER BY items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Modifier trailing a TOP expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopModifier {
    Percent,
    WithTies,
    PercentWithTies,
}

impl TopModifier {
    pub fn as_sql(&self) -> &'static str {
        match self {
            TopModifier::Percent => "PERCENT",
            TopModifier::WithTies => "WITH TIES",
            TopModifier::PercentWithTies => "PERCENT WITH TIES",
        }
    }
}

/// Output format requested from EXPLAIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplainFormat {
    Text,
    Json,
    Xml,
    Yaml,
    Traditional,
    Tree,
}

impl ExplainFormat {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ExplainFormat::Text => "TEXT",
            ExplainFormat::Json => "JSON",
            ExplainFormat::Xml => "XML",
            ExplainFormat::Yaml => "YAML",
            ExplainFormat::Traditional => "TRADITIONAL",
            ExplainFormat::Tree => "TREE",
        }
    }
}

/// Row-locking and similar modifiers appended after a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementModifier {
    ForUpdate,
    ForNoKeyUpdate,
    ForShare,
    ForKeyShare,
    NoWait,
    SkipLocked,
}

impl StatementModifier {
    pub fn as_sql(&self) -> &'static str {
        match self {
            StatementModifier::ForUpdate => "FOR UPDATE",
            StatementModifier::ForNoKeyUpdate => "FOR NO KEY UPDATE",
            StatementModifier::ForShare => "FOR SHARE",
            StatementModifier::ForKeyShare => "FOR KEY SHARE",
            StatementModifier::NoWait => "NOWAIT",
            StatementModifier::SkipLocked => "SKIP LOCKED",
        }
    }
}
