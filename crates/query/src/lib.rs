//! Helios FHIR Server Query Model
//!
//! This crate provides a database-agnostic model for SQL SELECT statements.
//! Calling code assembles a statement as an in-memory expression tree
//! through fluent builders, rather than by string concatenation, and then
//! renders the tree to dialect-correct SQL text together with an ordered
//! list of typed bind markers for safe positional parameter binding.
//!
//! It exists to support the query shapes FHIR search requires: deeply
//! nested, alias-correlated `EXISTS` subqueries (one per search
//! parameter), inner joins for reference chaining, `UNION ALL` across
//! per-resource-type partitions, `LIKE ... ESCAPE`, `COALESCE`, and
//! boolean combinators with explicit grouping.
//!
//! # Architecture
//!
//! - [`expression`] - the [`ExpNode`] tree for boolean/scalar expressions
//! - [`bind`](mod@bind) - typed bind values, markers, and the binding visitor
//! - [`fragment`] - [`WhereFragment`], the incremental predicate builder
//! - [`select`] - the frozen [`Select`] statement model
//! - [`builder`] - fluent builders that freeze into a [`Select`]
//! - [`render`](mod@render) - SQL text + ordered bind marker generation
//! - [`translator`] - the dialect capability and its implementations
//! - [`error`] - construction errors and the data-access taxonomy
//!
//! # Guarantees
//!
//! - **Bind/text alignment**: the i-th captured marker corresponds to the
//!   i-th `?` in the rendered text, always.
//! - **Determinism**: rendering the same tree with the same translator
//!   yields byte-identical output; rendering never mutates the tree.
//! - **Explicit grouping**: parentheses appear in output exactly where
//!   the tree contains them. The builders enforce explicit `and()`/`or()`
//!   between predicates; there is no implicit precedence.
//! - **Fail fast**: structural misuse (unbalanced parentheses, missing
//!   FROM, dangling operators) is reported from `expression()`/`build()`,
//!   never deferred to render time.
//!
//! # Quick Start
//!
//! One correlated `EXISTS` per search parameter, bolted onto the root
//! statement's WHERE clause:
//!
//! ```
//! use helios_query::{alias, bind, col, literal, render, Select, SqliteTranslator};
//!
//! # fn main() -> Result<(), helios_query::QueryBuildError> {
//! let name_filter = Select::select(["1"])
//!     .from("Patient_STR_VALUES", alias("P1"))
//!     .where_clause()
//!     .col("P1", "PARAMETER_NAME_ID").eq(1246)
//!     .and().col("P1", "STR_VALUE").eq(bind("Jones"))
//!     .and().col("P1", "LOGICAL_RESOURCE_ID").eq(col("LR0", "LOGICAL_RESOURCE_ID"))
//!     .build()?;
//!
//! let count = Select::select(["COUNT(*)"])
//!     .from("Patient_LOGICAL_RESOURCES", alias("LR0"))
//!     .where_clause()
//!     .col("LR0", "IS_DELETED").eq(literal("N"))
//!     .and().exists(name_filter)
//!     .build()?;
//!
//! let (sql, binds) = render(&count, &SqliteTranslator);
//! assert_eq!(
//!     sql,
//!     "SELECT COUNT(*) FROM Patient_LOGICAL_RESOURCES AS LR0 \
//!      WHERE LR0.IS_DELETED = 'N' \
//!      AND EXISTS (SELECT 1 FROM Patient_STR_VALUES AS P1 \
//!      WHERE P1.PARAMETER_NAME_ID = 1246 \
//!      AND P1.STR_VALUE = ? \
//!      AND P1.LOGICAL_RESOURCE_ID = LR0.LOGICAL_RESOURCE_ID)"
//! );
//! assert_eq!(binds.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Joins, sub-select sources, and pagination
//!
//! ```
//! use helios_query::{alias, col, literal, on, render, PostgresTranslator, Select};
//!
//! # fn main() -> Result<(), helios_query::QueryBuildError> {
//! let logical_resources = Select::select([
//!     "LR0.LOGICAL_RESOURCE_ID",
//!     "LR0.LOGICAL_ID",
//!     "LR0.CURRENT_RESOURCE_ID",
//! ])
//!     .from("Patient_LOGICAL_RESOURCES", alias("LR0"))
//!     .where_clause()
//!     .col("LR0", "IS_DELETED").eq(literal("N"))
//!     .build()?;
//!
//! let data_query = Select::select(["R.RESOURCE_ID", "R.DATA", "LR.LOGICAL_ID"])
//!     .from_select(logical_resources, alias("LR"))
//!     .inner_join(
//!         "Patient_RESOURCES",
//!         alias("R"),
//!         on("LR", "CURRENT_RESOURCE_ID").eq(col("R", "RESOURCE_ID")),
//!     )
//!     .order_by(["LR.LOGICAL_RESOURCE_ID"])
//!     .pagination(0, 10)
//!     .build()?;
//!
//! let (sql, _) = render(&data_query, &PostgresTranslator);
//! assert!(sql.ends_with(
//!     "ORDER BY LR.LOGICAL_RESOURCE_ID OFFSET 0 ROWS FETCH FIRST 10 ROWS ONLY"
//! ));
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Building and rendering are pure computations over owned data: distinct
//! statements may be built and rendered concurrently with no locking. The
//! single mutation point, [`Select::set_union_all`], must not race a
//! render of the same statement; callers own that ordering.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bind;
pub mod builder;
pub mod error;
pub mod expression;
pub mod fragment;
pub mod render;
pub mod select;
pub mod translator;

pub use bind::{BindMarker, BindMarkerVisitor, BindValue};
pub use builder::{on, OnClause, OnCondition, SelectBuilder, WhereBuilder};
pub use error::{DataAccessError, DatabaseError, QueryBuildError};
pub use expression::{
    bind, coalesce, col, literal, CompareOp, ExpNode, Literal, LogicalOp, Operator,
};
pub use fragment::WhereFragment;
pub use render::{render, render_expression};
pub use select::{alias, Alias, FromClause, FromSource, Join, Pagination, Select};
pub use translator::{
    ConnectionProperties, DatabaseTranslator, PostgresTranslator, SqliteTranslator,
};
