//! Dialect translators.
//!
//! Almost all of the SQL this crate renders is dialect-independent; a
//! [`DatabaseTranslator`] covers the few points where target databases
//! genuinely diverge (connection details, literal escaping, the
//! pagination clause) and classifies low-level driver failures into the
//! crate's own error taxonomy. A translator is a plain value passed into
//! [`render`](crate::render()); there is no process-wide singleton.

use crate::error::{DataAccessError, DatabaseError};

/// Connection settings consumed by [`DatabaseTranslator::connection_url`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionProperties {
    /// Database name, or file path for embedded databases.
    pub database: String,
    /// Server host; ignored by embedded databases.
    pub host: Option<String>,
    /// Server port; ignored by embedded databases.
    pub port: Option<u16>,
    /// User name.
    pub user: Option<String>,
    /// Password.
    pub password: Option<String>,
}

impl ConnectionProperties {
    /// Creates properties for the given database name or file path.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }
}

/// The capability isolating dialect-specific behavior.
pub trait DatabaseTranslator {
    /// The driver crate this dialect is executed through.
    fn driver_name(&self) -> &'static str;

    /// Builds the connection string the driver expects.
    fn connection_url(&self, properties: &ConnectionProperties) -> String;

    /// Escapes a string for embedding in a single-quoted SQL literal.
    fn escape_string_literal(&self, value: &str) -> String {
        value.replace('\'', "''")
    }

    /// The dialect's row-offset/page-size clause.
    fn pagination_clause(&self, offset: u64, rows_per_page: u64) -> String;

    /// Whether the error reports a unique or primary key violation.
    fn is_duplicate(&self, error: &DatabaseError) -> bool;

    /// Classifies a driver failure into the crate's error taxonomy,
    /// preserving the original error as the source.
    fn translate(&self, error: DatabaseError) -> DataAccessError;
}

/// Translator for SQLite, executed through rusqlite.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteTranslator;

// SQLite extended result codes for unique/primary key violations.
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;
const SQLITE_CANTOPEN: i32 = 14;

impl DatabaseTranslator for SqliteTranslator {
    fn driver_name(&self) -> &'static str {
        "rusqlite"
    }

    /// The database path (or `:memory:`) as-is; rusqlite opens paths
    /// directly rather than URLs.
    fn connection_url(&self, properties: &ConnectionProperties) -> String {
        properties.database.clone()
    }

    fn pagination_clause(&self, offset: u64, rows_per_page: u64) -> String {
        format!("LIMIT {} OFFSET {}", rows_per_page, offset)
    }

    fn is_duplicate(&self, error: &DatabaseError) -> bool {
        matches!(
            error.code,
            Some(SQLITE_CONSTRAINT_PRIMARYKEY) | Some(SQLITE_CONSTRAINT_UNIQUE)
        ) || error.message.contains("UNIQUE constraint failed")
    }

    fn translate(&self, error: DatabaseError) -> DataAccessError {
        if self.is_duplicate(&error) {
            DataAccessError::Duplicate {
                message: error.message,
                source: error.source,
            }
        } else if error.code == Some(SQLITE_CANTOPEN) {
            DataAccessError::Connection {
                message: error.message,
                source: error.source,
            }
        } else {
            DataAccessError::Database {
                message: error.message,
                sqlstate: error.sqlstate,
                source: error.source,
            }
        }
    }
}

/// Translator for PostgreSQL, executed through tokio-postgres.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresTranslator;

const PG_UNIQUE_VIOLATION: &str = "23505";

impl DatabaseTranslator for PostgresTranslator {
    fn driver_name(&self) -> &'static str {
        "tokio-postgres"
    }

    fn connection_url(&self, properties: &ConnectionProperties) -> String {
        let host = properties.host.as_deref().unwrap_or("localhost");
        let port = properties.port.unwrap_or(5432);
        let mut url = String::from("postgresql://");
        if let Some(user) = &properties.user {
            url.push_str(user);
            if let Some(password) = &properties.password {
                url.push(':');
                url.push_str(password);
            }
            url.push('@');
        }
        url.push_str(&format!("{}:{}/{}", host, port, properties.database));
        url
    }

    fn pagination_clause(&self, offset: u64, rows_per_page: u64) -> String {
        format!("OFFSET {} ROWS FETCH FIRST {} ROWS ONLY", offset, rows_per_page)
    }

    fn is_duplicate(&self, error: &DatabaseError) -> bool {
        error.sqlstate.as_deref() == Some(PG_UNIQUE_VIOLATION)
    }

    fn translate(&self, error: DatabaseError) -> DataAccessError {
        if self.is_duplicate(&error) {
            DataAccessError::Duplicate {
                message: error.message,
                source: error.source,
            }
        } else if error
            .sqlstate
            .as_deref()
            .is_some_and(|state| state.starts_with("08"))
        {
            DataAccessError::Connection {
                message: error.message,
                source: error.source,
            }
        } else {
            DataAccessError::Database {
                message: error.message,
                sqlstate: error.sqlstate,
                source: error.source,
            }
        }
    }
}
