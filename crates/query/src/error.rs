//! Error types for the query model.
//!
//! Two taxonomies live here: [`QueryBuildError`] covers construction-time
//! programmer errors raised by the fluent builders, and [`DataAccessError`]
//! is the taxonomy a [`DatabaseTranslator`](crate::DatabaseTranslator) maps
//! low-level driver failures into. [`DatabaseError`] carries the facts of a
//! driver failure without depending on any driver crate.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Construction-time errors raised while assembling a query.
///
/// These are programmer errors: the offending builder call records the
/// error and it surfaces as `Err` from `expression()` or `build()`, always
/// before any SQL is rendered. They are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryBuildError {
    /// A right parenthesis was closed with no matching open group.
    #[error("right parenthesis without a matching left parenthesis")]
    UnmatchedRightParen,

    /// One or more parenthesis groups were still open at finalization.
    #[error("{open} parenthesis group(s) left unclosed")]
    UnclosedParens { open: usize },

    /// Two predicates appeared without an explicit AND or OR between them.
    #[error("predicates must be joined with an explicit AND or OR")]
    MissingConjunction,

    /// A predicate was started but never completed, or a combinator was
    /// called with nothing to combine.
    #[error("incomplete predicate: {reason}")]
    IncompletePredicate { reason: String },

    /// `escape` may only follow a LIKE predicate, and only once.
    #[error("ESCAPE must immediately follow a LIKE predicate")]
    MisplacedEscape,

    /// The fragment was finalized without any predicate.
    #[error("where fragment contains no predicate")]
    EmptyFragment,

    /// The select statement was built without projection columns.
    #[error("select statement has no projection columns")]
    EmptyProjection,

    /// The select statement was built without a FROM clause.
    #[error("select statement has no FROM clause")]
    MissingFrom,
}

impl QueryBuildError {
    pub(crate) fn incomplete(reason: impl Into<String>) -> Self {
        QueryBuildError::IncompletePredicate {
            reason: reason.into(),
        }
    }
}

/// The facts of a low-level database failure, decoupled from any driver.
///
/// Callers of the persistence layer construct one of these from whatever
/// their driver reported (a rusqlite error code, a PostgreSQL SQLSTATE)
/// and hand it to a translator for classification.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct DatabaseError {
    /// Human-readable message from the driver.
    pub message: String,
    /// Five-character SQLSTATE, where the driver reports one.
    pub sqlstate: Option<String>,
    /// Driver-specific numeric error code, where the driver reports one.
    pub code: Option<i32>,
    /// The original driver error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DatabaseError {
    /// Creates a new error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sqlstate: None,
            code: None,
            source: None,
        }
    }

    /// Attaches a SQLSTATE.
    pub fn with_sqlstate(mut self, sqlstate: impl Into<String>) -> Self {
        self.sqlstate = Some(sqlstate.into());
        self
    }

    /// Attaches a driver-specific error code.
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Attaches the original driver error as the source.
    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Classified database failures, produced by a translator.
///
/// The query model performs no recovery; it only classifies so the caller
/// can distinguish a duplicate-key conflict from a lost connection from a
/// generic failure. The original driver error is preserved as the source.
#[derive(Error, Debug)]
pub enum DataAccessError {
    /// A unique or primary key constraint was violated.
    #[error("duplicate value constraint violated: {message}")]
    Duplicate {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The connection to the database failed or was lost.
    #[error("database connection failure: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Any other database failure.
    #[error("database operation failed: {message}")]
    Database {
        message: String,
        sqlstate: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}
