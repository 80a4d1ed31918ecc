//! Incremental builder for WHERE-clause predicate trees.
//!
//! [`WhereFragment`] turns a sequence of fluent calls into a single rooted
//! [`ExpNode`] tree. The grammar is a token stream: push a predicand
//! (`col`, `literal`, `bind`, `expr`), complete it with a comparison
//! (`eq`, `like`, `is_null`, ...) or stream an [`Operator`] and complete it
//! with the next predicand. Predicates must be joined with an explicit
//! [`and`](WhereFragment::and) or [`or`](WhereFragment::or); there is no
//! implicit conjunction. Grouping comes only from explicit
//! [`left_paren`](WhereFragment::left_paren) /
//! [`right_paren`](WhereFragment::right_paren) pairs.
//!
//! Misuse is recorded at the offending call and surfaced as `Err` from
//! [`expression`](WhereFragment::expression); nothing is deferred to
//! render time.
//!
//! Correlation to an enclosing statement is expressed purely through
//! alias names: `col("LR0", ...)` inside a subquery fragment refers to
//! whatever the enclosing FROM bound as `LR0`. The fragment does not
//! resolve aliases.

use crate::error::QueryBuildError;
use crate::expression::{CompareOp, ExpNode, Literal, LogicalOp, Operator};
use crate::select::Select;

#[derive(Debug, Default, Clone)]
struct Frame {
    tree: Option<ExpNode>,
    conj: Option<LogicalOp>,
    negate: bool,
}

/// A mutable accumulator that assembles one predicate tree.
///
/// ```
/// use helios_query::{bind, WhereFragment};
///
/// let mut fragment = WhereFragment::new();
/// fragment
///     .col("tab", "foo")
///     .like(bind("hello%"))
///     .escape('+');
/// let expression = fragment.expression().unwrap();
/// # let _ = expression;
/// ```
#[derive(Debug, Default, Clone)]
pub struct WhereFragment {
    root: Frame,
    open: Vec<Frame>,
    left: Option<ExpNode>,
    pending_op: Option<Operator>,
    staged: Option<ExpNode>,
    error: Option<QueryBuildError>,
}

impl WhereFragment {
    /// Creates an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, error: QueryBuildError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn current_frame(&mut self) -> &mut Frame {
        if self.open.is_empty() {
            &mut self.root
        } else {
            let innermost = self.open.len() - 1;
            &mut self.open[innermost]
        }
    }

    /// Stages a completed predicate, applying a pending NOT.
    fn stage(&mut self, predicate: ExpNode) {
        if self.staged.is_some() {
            self.fail(QueryBuildError::MissingConjunction);
            return;
        }
        let negate = {
            let frame = self.current_frame();
            std::mem::take(&mut frame.negate)
        };
        self.staged = Some(if negate {
            ExpNode::Not(Box::new(predicate))
        } else {
            predicate
        });
    }

    /// Folds the staged predicate into the current frame's tree.
    fn flush(&mut self) {
        if self.error.is_some() {
            return;
        }
        let Some(predicate) = self.staged.take() else {
            return;
        };
        let frame = self.current_frame();
        if let Some(tree) = frame.tree.take() {
            if let Some(op) = frame.conj.take() {
                frame.tree = Some(ExpNode::fold_logical(tree, op, predicate));
            } else {
                frame.tree = Some(tree);
                self.fail(QueryBuildError::MissingConjunction);
            }
        } else {
            frame.tree = Some(predicate);
        }
    }

    /// Promotes a bare operand (e.g. an attached boolean expression) to a
    /// staged predicate ahead of a conjunction or group close.
    fn settle_operand(&mut self) {
        if self.error.is_some() {
            return;
        }
        if self.pending_op.is_some() {
            self.fail(QueryBuildError::incomplete("operator missing its right operand"));
            return;
        }
        if let Some(operand) = self.left.take() {
            self.stage(operand);
        }
    }

    fn push_operand(&mut self, node: ExpNode) {
        if self.error.is_some() {
            return;
        }
        if let Some(op) = self.pending_op.take() {
            match self.left.take() {
                Some(left) => {
                    let predicate = match op.compare_op() {
                        Some(cmp) => ExpNode::Comparison {
                            op: cmp,
                            left: Box::new(left),
                            right: Box::new(node),
                        },
                        None => ExpNode::Like {
                            column: Box::new(left),
                            pattern: Box::new(node),
                            escape: None,
                        },
                    };
                    self.stage(predicate);
                }
                None => self.fail(QueryBuildError::incomplete(
                    "operator without a left operand",
                )),
            }
        } else if self.left.is_some() {
            self.fail(QueryBuildError::incomplete("operand follows another operand"));
        } else if self.staged.is_some() {
            self.fail(QueryBuildError::MissingConjunction);
        } else {
            self.left = Some(node);
        }
    }

    fn compare(&mut self, op: CompareOp, rhs: ExpNode) {
        if self.error.is_some() {
            return;
        }
        if self.pending_op.is_some() {
            self.fail(QueryBuildError::incomplete(
                "comparison follows a dangling operator",
            ));
            return;
        }
        match self.left.take() {
            Some(left) => self.stage(ExpNode::Comparison {
                op,
                left: Box::new(left),
                right: Box::new(rhs),
            }),
            None => self.fail(QueryBuildError::incomplete(
                "comparison without a left operand",
            )),
        }
    }

    /// Pushes a qualified column reference as the next predicand.
    pub fn col(&mut self, alias: impl Into<String>, name: impl Into<String>) -> &mut Self {
        self.push_operand(crate::expression::col(alias, name));
        self
    }

    /// Pushes a literal as the next predicand.
    pub fn literal(&mut self, value: impl Into<Literal>) -> &mut Self {
        self.push_operand(ExpNode::Literal(value.into()));
        self
    }

    /// Pushes a bind marker as the next predicand.
    pub fn bind(&mut self, value: impl Into<crate::bind::BindValue>) -> &mut Self {
        self.push_operand(crate::expression::bind(value));
        self
    }

    /// Pushes an already-built expression as the next predicand. A bare
    /// expression left standing at a conjunction or at finalization is
    /// taken as a predicate in its own right.
    pub fn expr(&mut self, node: ExpNode) -> &mut Self {
        self.push_operand(node);
        self
    }

    /// Streams a comparison operator; the next predicand completes it.
    pub fn operator(&mut self, op: Operator) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.pending_op.is_some() {
            self.fail(QueryBuildError::incomplete("operator follows another operator"));
        } else if self.left.is_none() {
            self.fail(QueryBuildError::incomplete("operator without a left operand"));
        } else {
            self.pending_op = Some(op);
        }
        self
    }

    /// Completes the pending predicand with `= rhs`.
    pub fn eq(&mut self, rhs: impl Into<ExpNode>) -> &mut Self {
        self.compare(CompareOp::Eq, rhs.into());
        self
    }

    /// Completes the pending predicand with `!= rhs`.
    pub fn neq(&mut self, rhs: impl Into<ExpNode>) -> &mut Self {
        self.compare(CompareOp::Neq, rhs.into());
        self
    }

    /// Completes the pending predicand with `> rhs`.
    pub fn gt(&mut self, rhs: impl Into<ExpNode>) -> &mut Self {
        self.compare(CompareOp::Gt, rhs.into());
        self
    }

    /// Completes the pending predicand with `>= rhs`.
    pub fn gte(&mut self, rhs: impl Into<ExpNode>) -> &mut Self {
        self.compare(CompareOp::Gte, rhs.into());
        self
    }

    /// Completes the pending predicand with `< rhs`.
    pub fn lt(&mut self, rhs: impl Into<ExpNode>) -> &mut Self {
        self.compare(CompareOp::Lt, rhs.into());
        self
    }

    /// Completes the pending predicand with `<= rhs`.
    pub fn lte(&mut self, rhs: impl Into<ExpNode>) -> &mut Self {
        self.compare(CompareOp::Lte, rhs.into());
        self
    }

    /// Completes the pending predicand with `LIKE rhs`.
    pub fn like(&mut self, rhs: impl Into<ExpNode>) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.pending_op.is_some() {
            self.fail(QueryBuildError::incomplete(
                "comparison follows a dangling operator",
            ));
            return self;
        }
        match self.left.take() {
            Some(left) => {
                let predicate = ExpNode::Like {
                    column: Box::new(left),
                    pattern: Box::new(rhs.into()),
                    escape: None,
                };
                self.stage(predicate);
            }
            None => self.fail(QueryBuildError::incomplete(
                "LIKE without a left operand",
            )),
        }
        self
    }

    /// Adds `ESCAPE 'c'` to the LIKE predicate just completed.
    pub fn escape(&mut self, escape_char: char) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        match self.staged.as_mut() {
            Some(ExpNode::Like { escape, .. }) if escape.is_none() => {
                *escape = Some(escape_char);
            }
            _ => self.fail(QueryBuildError::MisplacedEscape),
        }
        self
    }

    /// Completes the pending predicand with `IS NULL`.
    pub fn is_null(&mut self) -> &mut Self {
        self.null_test(false)
    }

    /// Completes the pending predicand with `IS NOT NULL`.
    pub fn is_not_null(&mut self) -> &mut Self {
        self.null_test(true)
    }

    fn null_test(&mut self, negated: bool) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.pending_op.is_some() {
            self.fail(QueryBuildError::incomplete(
                "null test follows a dangling operator",
            ));
            return self;
        }
        match self.left.take() {
            Some(operand) => self.stage(ExpNode::NullTest {
                operand: Box::new(operand),
                negated,
            }),
            None => self.fail(QueryBuildError::incomplete(
                "null test without an operand",
            )),
        }
        self
    }

    /// Completes the pending predicand with `IN (literal, ...)`.
    ///
    /// Literal members are deliberate: identifier-list filters (e.g.
    /// common token value ids) perform better without bind variables.
    pub fn in_literals<I, L>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        if self.error.is_some() {
            return self;
        }
        if self.pending_op.is_some() {
            self.fail(QueryBuildError::incomplete(
                "IN list follows a dangling operator",
            ));
            return self;
        }
        let items: Vec<ExpNode> = items
            .into_iter()
            .map(|item| ExpNode::Literal(item.into()))
            .collect();
        if items.is_empty() {
            self.fail(QueryBuildError::incomplete(
                "IN list requires at least one member",
            ));
            return self;
        }
        match self.left.take() {
            Some(operand) => self.stage(ExpNode::InList {
                operand: Box::new(operand),
                items,
            }),
            None => self.fail(QueryBuildError::incomplete(
                "IN list without an operand",
            )),
        }
        self
    }

    /// Appends an `EXISTS (subquery)` predicate.
    pub fn exists(&mut self, subquery: Select) -> &mut Self {
        self.exists_predicate(subquery, false)
    }

    /// Appends a `NOT EXISTS (subquery)` predicate.
    pub fn not_exists(&mut self, subquery: Select) -> &mut Self {
        self.exists_predicate(subquery, true)
    }

    fn exists_predicate(&mut self, subquery: Select, negated: bool) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.pending_op.is_some() || self.left.is_some() {
            self.fail(QueryBuildError::incomplete(
                "EXISTS cannot complete a comparison",
            ));
            return self;
        }
        if self.staged.is_some() {
            self.fail(QueryBuildError::MissingConjunction);
            return self;
        }
        let exists = ExpNode::Exists(Box::new(subquery));
        self.stage(if negated {
            ExpNode::Not(Box::new(exists))
        } else {
            exists
        });
        self
    }

    /// Appends `AND` at the current nesting level.
    pub fn and(&mut self) -> &mut Self {
        self.conjunction(LogicalOp::And)
    }

    /// Appends `OR` at the current nesting level.
    pub fn or(&mut self) -> &mut Self {
        self.conjunction(LogicalOp::Or)
    }

    fn conjunction(&mut self, op: LogicalOp) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        self.settle_operand();
        self.flush();
        if self.error.is_some() {
            return self;
        }
        let (has_tree, has_conj) = {
            let frame = self.current_frame();
            (frame.tree.is_some(), frame.conj.is_some())
        };
        if !has_tree {
            self.fail(QueryBuildError::incomplete(
                "AND/OR with no preceding predicate",
            ));
        } else if has_conj {
            self.fail(QueryBuildError::incomplete(
                "AND/OR follows another AND/OR",
            ));
        } else {
            self.current_frame().conj = Some(op);
        }
        self
    }

    /// Negates the next completed predicate or parenthesized group.
    pub fn not(&mut self) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.pending_op.is_some() || self.left.is_some() || self.staged.is_some() {
            self.fail(QueryBuildError::incomplete("NOT must precede a predicate"));
            return self;
        }
        let frame = self.current_frame();
        frame.negate = !frame.negate;
        self
    }

    /// Opens an explicit grouping scope.
    pub fn left_paren(&mut self) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.pending_op.is_some() || self.left.is_some() {
            self.fail(QueryBuildError::incomplete(
                "group opened inside an unfinished predicate",
            ));
            return self;
        }
        if self.staged.is_some() {
            self.fail(QueryBuildError::MissingConjunction);
            return self;
        }
        self.open.push(Frame::default());
        self
    }

    /// Closes the innermost grouping scope, wrapping it in parentheses.
    pub fn right_paren(&mut self) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        self.settle_operand();
        self.flush();
        if self.error.is_some() {
            return self;
        }
        match self.open.pop() {
            None => self.fail(QueryBuildError::UnmatchedRightParen),
            Some(frame) => {
                if frame.conj.is_some() {
                    self.fail(QueryBuildError::incomplete(
                        "trailing AND/OR inside a parenthesis group",
                    ));
                } else if frame.negate {
                    self.fail(QueryBuildError::incomplete("NOT with no predicate"));
                } else {
                    match frame.tree {
                        None => self.fail(QueryBuildError::incomplete(
                            "empty parenthesized group",
                        )),
                        Some(tree) => self.stage(ExpNode::Paren(Box::new(tree))),
                    }
                }
            }
        }
        self
    }

    /// Returns the finished root expression.
    ///
    /// The fragment is not consumed; calling this twice returns the same
    /// tree. All accumulated misuse surfaces here.
    pub fn expression(&self) -> Result<ExpNode, QueryBuildError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if self.pending_op.is_some() {
            return Err(QueryBuildError::incomplete(
                "operator missing its right operand",
            ));
        }
        if !self.open.is_empty() {
            return Err(QueryBuildError::UnclosedParens {
                open: self.open.len(),
            });
        }
        let pending = self.staged.clone().or_else(|| self.left.clone());
        let pending = match (pending, self.root.negate) {
            (Some(predicate), true) => Some(ExpNode::Not(Box::new(predicate))),
            (None, true) => {
                return Err(QueryBuildError::incomplete("NOT with no predicate"));
            }
            (predicate, false) => predicate,
        };
        match (self.root.tree.clone(), self.root.conj, pending) {
            (None, _, None) => Err(QueryBuildError::EmptyFragment),
            (None, _, Some(predicate)) => Ok(predicate),
            (Some(tree), None, None) => Ok(tree),
            (Some(tree), Some(op), Some(predicate)) => {
                Ok(ExpNode::fold_logical(tree, op, predicate))
            }
            (Some(_), Some(_), None) => {
                Err(QueryBuildError::incomplete("trailing AND/OR"))
            }
            (Some(_), None, Some(_)) => Err(QueryBuildError::MissingConjunction),
        }
    }
}
