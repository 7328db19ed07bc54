//! Runtime value representation for converter chains and literal rendering.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::model::types::LogicalType;

/// A runtime value flowing through a converter chain.
///
/// This is the owned counterpart of a store cell: converters transform
/// one `Value` into another, and [`TypeMapping::literal`] renders one as
/// a store literal.
///
/// [`TypeMapping::literal`]: crate::storage::mapping::TypeMapping::literal
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    UInt8(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    /// Exact decimal with arbitrary precision.
    Decimal(Decimal),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    /// Timestamp without timezone.
    DateTime(NaiveDateTime),
    /// Timestamp with timezone offset.
    DateTimeOffset(DateTime<FixedOffset>),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl Value {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The logical type this value inhabits, or `None` for NULL.
    #[must_use]
    pub fn logical_type(&self) -> Option<LogicalType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(LogicalType::Bool),
            Value::UInt8(_) => Some(LogicalType::UInt8),
            Value::Int16(_) => Some(LogicalType::Int16),
            Value::Int32(_) => Some(LogicalType::Int32),
            Value::Int64(_) => Some(LogicalType::Int64),
            Value::Float32(_) => Some(LogicalType::Float32),
            Value::Float64(_) => Some(LogicalType::Float64),
            Value::Decimal(_) => Some(LogicalType::Decimal),
            Value::Text(_) => Some(LogicalType::String),
            Value::Bytes(_) => Some(LogicalType::Bytes),
            Value::Uuid(_) => Some(LogicalType::Uuid),
            Value::DateTime(_) => Some(LogicalType::DateTime),
            Value::DateTimeOffset(_) => Some(LogicalType::DateTimeOffset),
            Value::Date(_) => Some(LogicalType::Date),
            Value::Time(_) => Some(LogicalType::Time),
        }
    }
}
