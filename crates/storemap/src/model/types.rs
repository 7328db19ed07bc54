//! Logical (runtime) type descriptors.
//!
//! A [`LogicalType`] describes the shape of a value as the application sees
//! it, independent of any store. It is the hub the whole engine pivots on:
//! mapping keys are built from it, converters bridge between two of them,
//! and providers map the primitive ones to concrete store types.

use serde::{Deserialize, Serialize};

/// Logical type of a modeled value.
///
/// Primitive variants map directly to store types via a provider.
/// `Optional` and `Sequence` wrap another type; `Structural` and
/// `Interface` name model-level types that never map to a primitive
/// and are handled by model validation instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    Bool,
    UInt8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Exact decimal; precision and scale come from facets, not the type.
    Decimal,
    /// Single character.
    Char,
    String,
    Bytes,
    /// Timestamp without timezone.
    DateTime,
    /// Timestamp with timezone offset.
    DateTimeOffset,
    Date,
    Time,
    Uuid,
    /// Nullable wrapper around another type.
    Optional(Box<LogicalType>),
    /// Ordered collection of another type.
    Sequence(Box<LogicalType>),
    /// A named structural (entity-like) model type.
    Structural(String),
    /// A named interface type.
    Interface(String),
}

impl LogicalType {
    /// Strip any `Optional` wrapping, yielding the underlying type.
    pub fn unwrap_optional(&self) -> &LogicalType {
        let mut ty = self;
        while let LogicalType::Optional(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Whether this type is wrapped in `Optional`.
    pub fn is_optional(&self) -> bool {
        matches!(self, LogicalType::Optional(_))
    }

    /// Element type if this (after unwrapping `Optional`) is a `Sequence`.
    pub fn sequence_element(&self) -> Option<&LogicalType> {
        match self.unwrap_optional() {
            LogicalType::Sequence(elem) => Some(elem),
            _ => None,
        }
    }

    /// Whether this (after unwrapping `Optional`) is an interface type.
    pub fn is_interface(&self) -> bool {
        matches!(self.unwrap_optional(), LogicalType::Interface(_))
    }

    /// Name of the structural type this refers to, if any.
    pub fn structural_name(&self) -> Option<&str> {
        match self.unwrap_optional() {
            LogicalType::Structural(name) => Some(name),
            _ => None,
        }
    }

    /// Wrap this type in `Optional`.
    pub fn optional(self) -> LogicalType {
        LogicalType::Optional(Box::new(self))
    }

    /// Wrap this type in `Sequence`.
    pub fn sequence(self) -> LogicalType {
        LogicalType::Sequence(Box::new(self))
    }
}

impl std::fmt::Display for LogicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalType::Bool => write!(f, "Bool"),
            LogicalType::UInt8 => write!(f, "UInt8"),
            LogicalType::Int16 => write!(f, "Int16"),
            LogicalType::Int32 => write!(f, "Int32"),
            LogicalType::Int64 => write!(f, "Int64"),
            LogicalType::Float32 => write!(f, "Float32"),
            LogicalType::Float64 => write!(f, "Float64"),
            LogicalType::Decimal => write!(f, "Decimal"),
            LogicalType::Char => write!(f, "Char"),
            LogicalType::String => write!(f, "String"),
            LogicalType::Bytes => write!(f, "Bytes"),
            LogicalType::DateTime => write!(f, "DateTime"),
            LogicalType::DateTimeOffset => write!(f, "DateTimeOffset"),
            LogicalType::Date => write!(f, "Date"),
            LogicalType::Time => write!(f, "Time"),
            LogicalType::Uuid => write!(f, "Uuid"),
            LogicalType::Optional(inner) => write!(f, "Optional({inner})"),
            LogicalType::Sequence(elem) => write!(f, "Sequence({elem})"),
            LogicalType::Structural(name) => write!(f, "{name}"),
            LogicalType::Interface(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_optional() {
        let ty = LogicalType::Int32.optional();
        assert_eq!(ty.unwrap_optional(), &LogicalType::Int32);
        assert_eq!(LogicalType::Int32.unwrap_optional(), &LogicalType::Int32);

        // Nested wrapping still unwraps fully.
        let nested = LogicalType::Optional(Box::new(LogicalType::String.optional()));
        assert_eq!(nested.unwrap_optional(), &LogicalType::String);
    }

    #[test]
    fn test_sequence_element() {
        let ty = LogicalType::Interface("IReadOnlyList".into()).sequence();
        assert!(ty.sequence_element().unwrap().is_interface());
        assert!(LogicalType::Int32.sequence_element().is_none());
    }

    #[test]
    fn test_structural_name() {
        let ty = LogicalType::Structural("Order".into()).optional();
        assert_eq!(ty.structural_name(), Some("Order"));
        assert_eq!(LogicalType::String.structural_name(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(LogicalType::Int32.to_string(), "Int32");
        assert_eq!(
            LogicalType::Sequence(Box::new(LogicalType::Structural("Order".into()))).to_string(),
            "Sequence(Order)"
        );
        assert_eq!(LogicalType::String.optional().to_string(), "Optional(String)");
    }
}
