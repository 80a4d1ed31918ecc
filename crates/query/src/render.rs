//! Rendering of a [`Select`] tree to SQL text plus ordered bind markers.
//!
//! A single depth-first, left-to-right traversal emits the statement text
//! and, at the exact position each bind marker is encountered, pushes that
//! marker onto the output list. Text order and list order are therefore
//! identical by construction, which is the contract positional parameter
//! binding relies on. Rendering is pure: the tree is never mutated, and the same
//! tree with the same translator always produces byte-identical output.
//!
//! Parentheses are emitted only where the tree contains them
//! ([`ExpNode::Paren`], `EXISTS (...)`, sub-select FROM sources); the
//! renderer neither inserts nor removes grouping.

use crate::bind::BindMarker;
use crate::expression::{ExpNode, Literal};
use crate::select::{FromSource, Select};
use crate::translator::DatabaseTranslator;

/// Renders `select` for the given dialect.
///
/// Returns the SQL text with positional `?` placeholders and the captured
/// bind markers; `markers[i]` corresponds to the i-th `?`, left to right.
pub fn render(select: &Select, translator: &dyn DatabaseTranslator) -> (String, Vec<BindMarker>) {
    let mut renderer = SqlRenderer {
        translator,
        sql: String::new(),
        binds: Vec::new(),
    };
    renderer.push_select(select);
    tracing::debug!(
        sql = %renderer.sql,
        bind_count = renderer.binds.len(),
        "rendered select statement"
    );
    (renderer.sql, renderer.binds)
}

/// Renders a standalone expression tree for the given dialect.
///
/// Used to inspect the output of a [`WhereFragment`](crate::WhereFragment)
/// on its own; the bind-ordering contract is the same as [`render`].
pub fn render_expression(
    node: &ExpNode,
    translator: &dyn DatabaseTranslator,
) -> (String, Vec<BindMarker>) {
    let mut renderer = SqlRenderer {
        translator,
        sql: String::new(),
        binds: Vec::new(),
    };
    renderer.push_expr(node);
    (renderer.sql, renderer.binds)
}

struct SqlRenderer<'a> {
    translator: &'a dyn DatabaseTranslator,
    sql: String,
    binds: Vec<BindMarker>,
}

impl SqlRenderer<'_> {
    fn push_select(&mut self, select: &Select) {
        self.sql.push_str("SELECT ");
        if select.distinct {
            self.sql.push_str("DISTINCT ");
        }
        for (i, column) in select.projection.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.sql.push_str(column);
        }
        self.sql.push_str(" FROM ");
        match &select.from.source {
            FromSource::Table(table) => self.sql.push_str(table),
            FromSource::Select(subquery) => {
                self.sql.push('(');
                self.push_select(subquery);
                self.sql.push(')');
            }
        }
        self.sql.push_str(" AS ");
        self.sql.push_str(select.from.alias.as_str());

        for join in &select.joins {
            self.sql.push_str(" INNER JOIN ");
            self.sql.push_str(&join.table);
            self.sql.push_str(" AS ");
            self.sql.push_str(join.alias.as_str());
            self.sql.push_str(" ON ");
            self.push_expr(&join.on_condition);
        }

        if let Some(where_clause) = &select.where_clause {
            self.sql.push_str(" WHERE ");
            self.push_expr(where_clause);
        }

        if !select.order_by.is_empty() {
            self.sql.push_str(" ORDER BY ");
            for (i, column) in select.order_by.iter().enumerate() {
                if i > 0 {
                    self.sql.push_str(", ");
                }
                self.sql.push_str(column);
            }
        }

        if let Some(pagination) = &select.pagination {
            let clause = self
                .translator
                .pagination_clause(pagination.offset, pagination.rows_per_page);
            self.sql.push(' ');
            self.sql.push_str(&clause);
        }

        if let Some(next) = &select.union_all_next {
            self.sql.push_str(" UNION ALL ");
            self.push_select(next);
        }
    }

    fn push_expr(&mut self, node: &ExpNode) {
        match node {
            ExpNode::Column { alias, name } => {
                self.sql.push_str(alias);
                self.sql.push('.');
                self.sql.push_str(name);
            }
            ExpNode::Literal(literal) => self.push_literal(literal),
            ExpNode::Bind(marker) => {
                self.sql.push('?');
                self.binds.push(marker.clone());
            }
            ExpNode::Comparison { op, left, right } => {
                self.push_expr(left);
                self.sql.push(' ');
                self.sql.push_str(op.as_sql());
                self.sql.push(' ');
                self.push_expr(right);
            }
            ExpNode::Like {
                column,
                pattern,
                escape,
            } => {
                self.push_expr(column);
                self.sql.push_str(" LIKE ");
                self.push_expr(pattern);
                if let Some(escape_char) = escape {
                    self.sql.push_str(" ESCAPE '");
                    self.sql.push(*escape_char);
                    self.sql.push('\'');
                }
            }
            ExpNode::NullTest { operand, negated } => {
                self.push_expr(operand);
                self.sql.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            ExpNode::InList { operand, items } => {
                self.push_expr(operand);
                self.sql.push_str(" IN (");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(", ");
                    }
                    self.push_expr(item);
                }
                self.sql.push(')');
            }
            ExpNode::Function { name, args } => {
                self.sql.push_str(name);
                self.sql.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(", ");
                    }
                    self.push_expr(arg);
                }
                self.sql.push(')');
            }
            ExpNode::Exists(subquery) => {
                self.sql.push_str("EXISTS (");
                self.push_select(subquery);
                self.sql.push(')');
            }
            ExpNode::Logical { op, operands } => {
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(op.separator());
                    }
                    self.push_expr(operand);
                }
            }
            ExpNode::Not(operand) => {
                self.sql.push_str("NOT ");
                self.push_expr(operand);
            }
            ExpNode::Paren(inner) => {
                self.sql.push('(');
                self.push_expr(inner);
                self.sql.push(')');
            }
        }
    }

    fn push_literal(&mut self, literal: &Literal) {
        match literal {
            Literal::String(value) => {
                let escaped = self.translator.escape_string_literal(value);
                self.sql.push('\'');
                self.sql.push_str(&escaped);
                self.sql.push('\'');
            }
            Literal::Integer(value) => self.sql.push_str(&value.to_string()),
            Literal::Double(value) => self.sql.push_str(&value.to_string()),
        }
    }
}
