//! Bind values and bind markers.
//!
//! A [`BindMarker`] is a `?` placeholder in rendered SQL together with the
//! typed value that will be bound to it. The renderer guarantees that the
//! order of markers in its output list matches the left-to-right order of
//! `?` occurrences in the text, so callers can bind positionally.
//!
//! [`BindMarkerVisitor`] keeps the query model ignorant of any particular
//! driver's parameter API: a backend implements one method per value kind
//! and dispatches each captured marker through [`BindMarker::accept`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// The closed set of bindable scalar kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// Text value.
    String(String),
    /// 32-bit integer value.
    Int(i32),
    /// 64-bit integer value.
    Long(i64),
    /// Double-precision floating point value.
    Double(f64),
    /// Arbitrary-precision decimal value.
    Decimal(Decimal),
    /// UTC timestamp value.
    Instant(DateTime<Utc>),
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::String(value.to_string())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::String(value)
    }
}

impl From<i32> for BindValue {
    fn from(value: i32) -> Self {
        BindValue::Int(value)
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Long(value)
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        BindValue::Double(value)
    }
}

impl From<Decimal> for BindValue {
    fn from(value: Decimal) -> Self {
        BindValue::Decimal(value)
    }
}

impl From<DateTime<Utc>> for BindValue {
    fn from(value: DateTime<Utc>) -> Self {
        BindValue::Instant(value)
    }
}

/// A `?` placeholder paired with its owned, typed value.
///
/// Identity matters: the position at which a marker appears in the
/// rendered text is its bind position.
#[derive(Debug, Clone, PartialEq)]
pub struct BindMarker {
    value: BindValue,
}

impl BindMarker {
    /// Creates a marker owning the given value.
    pub fn new(value: BindValue) -> Self {
        Self { value }
    }

    /// The value to be bound at this marker's position.
    pub fn value(&self) -> &BindValue {
        &self.value
    }

    /// Dispatches this marker's value to the kind-specific visitor method.
    pub fn accept<V: BindMarkerVisitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match &self.value {
            BindValue::String(v) => visitor.bind_string(v),
            BindValue::Int(v) => visitor.bind_int(*v),
            BindValue::Long(v) => visitor.bind_long(*v),
            BindValue::Double(v) => visitor.bind_double(*v),
            BindValue::Decimal(v) => visitor.bind_decimal(v),
            BindValue::Instant(v) => visitor.bind_instant(v),
        }
    }
}

/// Capability for binding captured markers to a prepared statement.
///
/// Implemented by backend code that knows a concrete driver; the query
/// model only exposes "here is the i-th value and its kind".
pub trait BindMarkerVisitor {
    /// Error reported by the underlying driver.
    type Error;

    /// Binds a text value.
    fn bind_string(&mut self, value: &str) -> Result<(), Self::Error>;
    /// Binds a 32-bit integer value.
    fn bind_int(&mut self, value: i32) -> Result<(), Self::Error>;
    /// Binds a 64-bit integer value.
    fn bind_long(&mut self, value: i64) -> Result<(), Self::Error>;
    /// Binds a double-precision value.
    fn bind_double(&mut self, value: f64) -> Result<(), Self::Error>;
    /// Binds a decimal value.
    fn bind_decimal(&mut self, value: &Decimal) -> Result<(), Self::Error>;
    /// Binds a UTC timestamp value.
    fn bind_instant(&mut self, value: &DateTime<Utc>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Collector {
        bound: Vec<String>,
    }

    impl BindMarkerVisitor for Collector {
        type Error = std::convert::Infallible;

        fn bind_string(&mut self, value: &str) -> Result<(), Self::Error> {
            self.bound.push(format!("string:{}", value));
            Ok(())
        }

        fn bind_int(&mut self, value: i32) -> Result<(), Self::Error> {
            self.bound.push(format!("int:{}", value));
            Ok(())
        }

        fn bind_long(&mut self, value: i64) -> Result<(), Self::Error> {
            self.bound.push(format!("long:{}", value));
            Ok(())
        }

        fn bind_double(&mut self, value: f64) -> Result<(), Self::Error> {
            self.bound.push(format!("double:{}", value));
            Ok(())
        }

        fn bind_decimal(&mut self, value: &Decimal) -> Result<(), Self::Error> {
            self.bound.push(format!("decimal:{}", value));
            Ok(())
        }

        fn bind_instant(&mut self, value: &DateTime<Utc>) -> Result<(), Self::Error> {
            self.bound.push(format!("instant:{}", value.to_rfc3339()));
            Ok(())
        }
    }

    #[test]
    fn test_accept_dispatches_by_kind() {
        let mut visitor = Collector { bound: Vec::new() };
        let markers = [
            BindMarker::new(BindValue::from("smith")),
            BindMarker::new(BindValue::from(42i32)),
            BindMarker::new(BindValue::from(1274i64)),
            BindMarker::new(BindValue::from(98.6f64)),
        ];
        for marker in &markers {
            marker.accept(&mut visitor).unwrap();
        }
        assert_eq!(
            visitor.bound,
            vec!["string:smith", "int:42", "long:1274", "double:98.6"]
        );
    }

    #[test]
    fn test_value_accessor() {
        let marker = BindMarker::new(BindValue::from("hello%"));
        assert_eq!(marker.value(), &BindValue::String("hello%".to_string()));
    }
}
