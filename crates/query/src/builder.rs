//! Fluent builders that freeze into an immutable [`Select`].
//!
//! [`SelectBuilder`] assembles the statement skeleton (projection, FROM,
//! joins, ordering, pagination); [`WhereBuilder`] layers the full
//! [`WhereFragment`] grammar on top and finalizes the statement with
//! [`build`](WhereBuilder::build). Both consume `self` on every call, so a
//! frozen statement can never be half-mutated: misuse is a type error, and
//! the remaining structural requirements (non-empty projection, FROM
//! present, balanced predicate grammar) surface as
//! [`QueryBuildError`] from `build()`.
//!
//! Join conditions are assembled with the infallible [`on`] typestate
//! chain: `on("P2", "LOGICAL_RESOURCE_ID").eq(col("LR1",
//! "LOGICAL_RESOURCE_ID")).and("P2", "PARAMETER_NAME_ID").eq(1246)`.

use crate::bind::BindValue;
use crate::error::QueryBuildError;
use crate::expression::{col, CompareOp, ExpNode, Literal, Operator};
use crate::fragment::WhereFragment;
use crate::select::{Alias, FromClause, FromSource, Join, Pagination, Select};

/// Builder for the statement skeleton.
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    distinct: bool,
    projection: Vec<String>,
    from: Option<FromClause>,
    joins: Vec<Join>,
    order_by: Vec<String>,
    pagination: Option<Pagination>,
}

impl SelectBuilder {
    pub(crate) fn new(distinct: bool, projection: Vec<String>) -> Self {
        Self {
            distinct,
            projection,
            from: None,
            joins: Vec::new(),
            order_by: Vec::new(),
            pagination: None,
        }
    }

    /// Sets the FROM source to a named table or view.
    pub fn from(mut self, table: impl Into<String>, alias: Alias) -> Self {
        self.from = Some(FromClause {
            source: FromSource::Table(table.into()),
            alias,
        });
        self
    }

    /// Sets the FROM source to a built sub-select, rendered parenthesized.
    pub fn from_select(mut self, subquery: Select, alias: Alias) -> Self {
        self.from = Some(FromClause {
            source: FromSource::Select(Box::new(subquery)),
            alias,
        });
        self
    }

    /// Appends an `INNER JOIN <table> AS <alias> ON <condition>`.
    ///
    /// Joins render in the order they were appended.
    pub fn inner_join(
        mut self,
        table: impl Into<String>,
        alias: Alias,
        on_condition: impl Into<ExpNode>,
    ) -> Self {
        self.joins.push(Join {
            table: table.into(),
            alias,
            on_condition: on_condition.into(),
        });
        self
    }

    /// Sets the ORDER BY column list (raw SQL strings, rendered as given).
    pub fn order_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the row offset and page size, rendered through the dialect
    /// translator.
    pub fn pagination(mut self, offset: u64, rows_per_page: u64) -> Self {
        self.pagination = Some(Pagination {
            offset,
            rows_per_page,
        });
        self
    }

    /// Starts the WHERE clause; the returned builder exposes the full
    /// predicate grammar and freezes the statement with `build()`.
    pub fn where_clause(self) -> WhereBuilder {
        WhereBuilder {
            select: self,
            fragment: WhereFragment::new(),
        }
    }

    /// Freezes the statement without a WHERE clause.
    pub fn build(self) -> Result<Select, QueryBuildError> {
        self.finish(None)
    }

    fn finish(self, where_clause: Option<ExpNode>) -> Result<Select, QueryBuildError> {
        if self.projection.is_empty() {
            return Err(QueryBuildError::EmptyProjection);
        }
        let from = self.from.ok_or(QueryBuildError::MissingFrom)?;
        Ok(Select {
            distinct: self.distinct,
            projection: self.projection,
            from,
            joins: self.joins,
            where_clause,
            order_by: self.order_by,
            pagination: self.pagination,
            union_all_next: None,
        })
    }
}

/// Builder for a statement's WHERE clause.
///
/// Every method mirrors the corresponding [`WhereFragment`] call;
/// [`build`](WhereBuilder::build) finalizes the fragment and freezes the
/// statement.
#[derive(Debug, Clone)]
pub struct WhereBuilder {
    select: SelectBuilder,
    fragment: WhereFragment,
}

impl WhereBuilder {
    /// Pushes a qualified column reference as the next predicand.
    pub fn col(mut self, alias: impl Into<String>, name: impl Into<String>) -> Self {
        self.fragment.col(alias, name);
        self
    }

    /// Pushes a literal as the next predicand.
    pub fn literal(mut self, value: impl Into<Literal>) -> Self {
        self.fragment.literal(value);
        self
    }

    /// Pushes a bind marker as the next predicand.
    pub fn bind(mut self, value: impl Into<BindValue>) -> Self {
        self.fragment.bind(value);
        self
    }

    /// Pushes an already-built expression as the next predicand.
    pub fn expr(mut self, node: ExpNode) -> Self {
        self.fragment.expr(node);
        self
    }

    /// Streams a comparison operator; the next predicand completes it.
    pub fn operator(mut self, op: Operator) -> Self {
        self.fragment.operator(op);
        self
    }

    /// Completes the pending predicand with `= rhs`.
    pub fn eq(mut self, rhs: impl Into<ExpNode>) -> Self {
        self.fragment.eq(rhs);
        self
    }

    /// Completes the pending predicand with `!= rhs`.
    pub fn neq(mut self, rhs: impl Into<ExpNode>) -> Self {
        self.fragment.neq(rhs);
        self
    }

    /// Completes the pending predicand with `> rhs`.
    pub fn gt(mut self, rhs: impl Into<ExpNode>) -> Self {
        self.fragment.gt(rhs);
        self
    }

    /// Completes the pending predicand with `>= rhs`.
    pub fn gte(mut self, rhs: impl Into<ExpNode>) -> Self {
        self.fragment.gte(rhs);
        self
    }

    /// Completes the pending predicand with `< rhs`.
    pub fn lt(mut self, rhs: impl Into<ExpNode>) -> Self {
        self.fragment.lt(rhs);
        self
    }

    /// Completes the pending predicand with `<= rhs`.
    pub fn lte(mut self, rhs: impl Into<ExpNode>) -> Self {
        self.fragment.lte(rhs);
        self
    }

    /// Completes the pending predicand with `LIKE rhs`.
    pub fn like(mut self, rhs: impl Into<ExpNode>) -> Self {
        self.fragment.like(rhs);
        self
    }

    /// Adds `ESCAPE 'c'` to the LIKE predicate just completed.
    pub fn escape(mut self, escape_char: char) -> Self {
        self.fragment.escape(escape_char);
        self
    }

    /// Completes the pending predicand with `IS NULL`.
    pub fn is_null(mut self) -> Self {
        self.fragment.is_null();
        self
    }

    /// Completes the pending predicand with `IS NOT NULL`.
    pub fn is_not_null(mut self) -> Self {
        self.fragment.is_not_null();
        self
    }

    /// Completes the pending predicand with `IN (literal, ...)`.
    pub fn in_literals<I, L>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        self.fragment.in_literals(items);
        self
    }

    /// Appends an `EXISTS (subquery)` predicate.
    pub fn exists(mut self, subquery: Select) -> Self {
        self.fragment.exists(subquery);
        self
    }

    /// Appends a `NOT EXISTS (subquery)` predicate.
    pub fn not_exists(mut self, subquery: Select) -> Self {
        self.fragment.not_exists(subquery);
        self
    }

    /// Appends `AND` at the current nesting level.
    pub fn and(mut self) -> Self {
        self.fragment.and();
        self
    }

    /// Appends `OR` at the current nesting level.
    pub fn or(mut self) -> Self {
        self.fragment.or();
        self
    }

    /// Negates the next completed predicate or parenthesized group.
    pub fn not(mut self) -> Self {
        self.fragment.not();
        self
    }

    /// Opens an explicit grouping scope.
    pub fn left_paren(mut self) -> Self {
        self.fragment.left_paren();
        self
    }

    /// Closes the innermost grouping scope.
    pub fn right_paren(mut self) -> Self {
        self.fragment.right_paren();
        self
    }

    /// Finalizes the predicate tree and freezes the statement.
    pub fn build(self) -> Result<Select, QueryBuildError> {
        let expression = self.fragment.expression()?;
        self.select.finish(Some(expression))
    }
}

/// Starts a join ON-condition with `alias.name` as the left operand.
pub fn on(alias: impl Into<String>, name: impl Into<String>) -> OnClause {
    OnClause {
        condition: None,
        left: col(alias, name),
    }
}

/// An ON-condition with a pending left operand.
#[derive(Debug, Clone)]
pub struct OnClause {
    condition: Option<ExpNode>,
    left: ExpNode,
}

impl OnClause {
    fn complete(self, op: CompareOp, rhs: ExpNode) -> OnCondition {
        let comparison = ExpNode::Comparison {
            op,
            left: Box::new(self.left),
            right: Box::new(rhs),
        };
        let node = match self.condition {
            None => comparison,
            Some(acc) => ExpNode::fold_logical(acc, crate::expression::LogicalOp::And, comparison),
        };
        OnCondition { node }
    }

    /// Completes the pending operand with `= rhs`.
    pub fn eq(self, rhs: impl Into<ExpNode>) -> OnCondition {
        self.complete(CompareOp::Eq, rhs.into())
    }

    /// Completes the pending operand with `!= rhs`.
    pub fn neq(self, rhs: impl Into<ExpNode>) -> OnCondition {
        self.complete(CompareOp::Neq, rhs.into())
    }

    /// Completes the pending operand with `> rhs`.
    pub fn gt(self, rhs: impl Into<ExpNode>) -> OnCondition {
        self.complete(CompareOp::Gt, rhs.into())
    }

    /// Completes the pending operand with `>= rhs`.
    pub fn gte(self, rhs: impl Into<ExpNode>) -> OnCondition {
        self.complete(CompareOp::Gte, rhs.into())
    }

    /// Completes the pending operand with `< rhs`.
    pub fn lt(self, rhs: impl Into<ExpNode>) -> OnCondition {
        self.complete(CompareOp::Lt, rhs.into())
    }

    /// Completes the pending operand with `<= rhs`.
    pub fn lte(self, rhs: impl Into<ExpNode>) -> OnCondition {
        self.complete(CompareOp::Lte, rhs.into())
    }
}

/// A complete ON-condition; convertible into an [`ExpNode`] or extendable
/// with a further `AND`.
#[derive(Debug, Clone)]
pub struct OnCondition {
    node: ExpNode,
}

impl OnCondition {
    /// Appends `AND alias.name ...` to this condition.
    pub fn and(self, alias: impl Into<String>, name: impl Into<String>) -> OnClause {
        OnClause {
            condition: Some(self.node),
            left: col(alias, name),
        }
    }
}

impl From<OnCondition> for ExpNode {
    fn from(value: OnCondition) -> Self {
        value.node
    }
}
