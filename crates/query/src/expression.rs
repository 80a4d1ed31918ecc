//! The SQL expression tree.
//!
//! [`ExpNode`] is the abstract syntax for boolean and scalar expressions:
//! column references, literals, bind markers, comparisons, LIKE with an
//! optional ESCAPE, null tests, IN lists, function calls, EXISTS
//! subqueries, AND/OR chains, NOT, and explicit parenthesized groups.
//!
//! Trees are immutable once constructed and fully owned by their
//! containing [`Select`](crate::Select) or
//! [`WhereFragment`](crate::WhereFragment); rendering never mutates them.
//! Grouping is explicit: the renderer emits parentheses only where the
//! tree contains a [`ExpNode::Paren`] node.

use crate::bind::{BindMarker, BindValue};
use crate::select::Select;

/// Comparison operators usable in a [`ExpNode::Comparison`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    Neq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

impl CompareOp {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// Operators accepted by the streaming form of the where-fragment grammar
/// (`col(..).operator(op)` completed by the next operand).
///
/// Extends [`CompareOp`] with `LIKE`, which completes into an
/// [`ExpNode::Like`] node rather than a plain comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    Neq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `LIKE`
    Like,
}

impl Operator {
    pub(crate) fn compare_op(self) -> Option<CompareOp> {
        match self {
            Operator::Eq => Some(CompareOp::Eq),
            Operator::Neq => Some(CompareOp::Neq),
            Operator::Gt => Some(CompareOp::Gt),
            Operator::Gte => Some(CompareOp::Gte),
            Operator::Lt => Some(CompareOp::Lt),
            Operator::Lte => Some(CompareOp::Lte),
            Operator::Like => None,
        }
    }
}

/// Logical combinators for [`ExpNode::Logical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl LogicalOp {
    pub(crate) fn separator(self) -> &'static str {
        match self {
            LogicalOp::And => " AND ",
            LogicalOp::Or => " OR ",
        }
    }
}

/// Literal values rendered inline in the SQL text.
///
/// Strings render single-quoted (embedded quotes escaped by the
/// translator); numbers render as bare decimal text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A text literal, e.g. `'N'`.
    String(String),
    /// An integer literal, e.g. `1274`.
    Integer(i64),
    /// A floating point literal.
    Double(f64),
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Integer(i64::from(value))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Double(value)
    }
}

/// A node in the boolean/scalar expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpNode {
    /// `alias.name`
    Column {
        /// The table alias qualifying the column.
        alias: String,
        /// The column name.
        name: String,
    },

    /// An inline literal value.
    Literal(Literal),

    /// A `?` placeholder plus the owned value to bind at that position.
    Bind(BindMarker),

    /// `left op right`
    Comparison {
        /// The comparison operator.
        op: CompareOp,
        /// Left operand.
        left: Box<ExpNode>,
        /// Right operand.
        right: Box<ExpNode>,
    },

    /// `column LIKE pattern [ESCAPE 'c']`
    Like {
        /// The matched expression.
        column: Box<ExpNode>,
        /// The pattern, typically a bind marker or literal.
        pattern: Box<ExpNode>,
        /// Optional escape character.
        escape: Option<char>,
    },

    /// `operand IS [NOT] NULL`
    NullTest {
        /// The tested expression.
        operand: Box<ExpNode>,
        /// true renders `IS NOT NULL`.
        negated: bool,
    },

    /// `operand IN (item, item, ...)`
    InList {
        /// The tested expression.
        operand: Box<ExpNode>,
        /// The list members.
        items: Vec<ExpNode>,
    },

    /// `NAME(arg, arg, ...)`, e.g. `COALESCE(a, b)`.
    Function {
        /// The function name, rendered as given.
        name: String,
        /// The argument list, in order.
        args: Vec<ExpNode>,
    },

    /// `EXISTS (subquery)`
    Exists(Box<Select>),

    /// Operands joined by ` AND ` / ` OR `, flattened left to right.
    ///
    /// The renderer adds no parentheses around or between operands.
    Logical {
        /// The combinator.
        op: LogicalOp,
        /// Two or more operands, in appearance order.
        operands: Vec<ExpNode>,
    },

    /// `NOT operand`
    Not(Box<ExpNode>),

    /// `(inner)`, the only source of parentheses in rendered output.
    Paren(Box<ExpNode>),
}

impl ExpNode {
    /// Folds `next` into `current` under `op`, extending an existing
    /// same-operator chain rather than nesting a new one. Mixed operators
    /// fold left to right; the rendered text is the call sequence either
    /// way, with no re-association and no inserted parentheses.
    pub(crate) fn fold_logical(current: ExpNode, op: LogicalOp, next: ExpNode) -> ExpNode {
        match current {
            ExpNode::Logical {
                op: existing,
                mut operands,
            } if existing == op => {
                operands.push(next);
                ExpNode::Logical { op, operands }
            }
            other => ExpNode::Logical {
                op,
                operands: vec![other, next],
            },
        }
    }
}

impl From<i32> for ExpNode {
    fn from(value: i32) -> Self {
        ExpNode::Literal(Literal::from(value))
    }
}

impl From<i64> for ExpNode {
    fn from(value: i64) -> Self {
        ExpNode::Literal(Literal::from(value))
    }
}

impl From<f64> for ExpNode {
    fn from(value: f64) -> Self {
        ExpNode::Literal(Literal::from(value))
    }
}

impl From<Literal> for ExpNode {
    fn from(value: Literal) -> Self {
        ExpNode::Literal(value)
    }
}

impl From<BindMarker> for ExpNode {
    fn from(value: BindMarker) -> Self {
        ExpNode::Bind(value)
    }
}

/// A qualified column reference, `alias.name`.
pub fn col(alias: impl Into<String>, name: impl Into<String>) -> ExpNode {
    ExpNode::Column {
        alias: alias.into(),
        name: name.into(),
    }
}

/// An inline literal. Strings render single-quoted, numbers bare.
pub fn literal(value: impl Into<Literal>) -> ExpNode {
    ExpNode::Literal(value.into())
}

/// A bind marker: renders `?` and captures the value for positional binding.
pub fn bind(value: impl Into<BindValue>) -> ExpNode {
    ExpNode::Bind(BindMarker::new(value.into()))
}

/// A `COALESCE(...)` function call over the given arguments.
pub fn coalesce(args: impl IntoIterator<Item = ExpNode>) -> ExpNode {
    ExpNode::Function {
        name: "COALESCE".to_string(),
        args: args.into_iter().collect(),
    }
}
