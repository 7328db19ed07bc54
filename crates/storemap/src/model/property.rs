//! Property and member descriptors, including frozen principal chains.

use crate::model::types::LogicalType;
use crate::storage::converter::ValueConverter;

/// Overrides a principal chain entry exposes to the resolver.
///
/// Principal chains are resolved once at model-build time into this
/// immutable form; the resolver never re-walks live model metadata.
#[derive(Debug, Clone, Default)]
pub struct PrincipalEntry {
    /// Explicit converter declared on the chain entry, if any.
    pub converter: Option<ValueConverter>,
    /// Explicit provider-type override declared on the entry, if any.
    pub provider_type: Option<LogicalType>,
}

/// A declared property of a structural type.
///
/// Carries the logical type, storage facet overrides, and the frozen
/// principal chain (declaration order, this property first). Properties
/// sharing a mapping — a foreign key and its referenced key, say —
/// appear on each other's chains so the first declared converter and
/// the first declared provider type win consistently.
#[derive(Debug, Clone)]
pub struct Property {
    pub declaring_type: String,
    pub name: String,
    pub logical_type: LogicalType,
    pub nullable: bool,

    /// Explicit converter declared on this property.
    pub converter: Option<ValueConverter>,
    /// Explicit provider-type override declared on this property.
    pub provider_type: Option<LogicalType>,

    // Facet overrides.
    pub store_type: Option<String>,
    pub key_or_index: bool,
    pub unicode: Option<bool>,
    pub size: Option<i32>,
    pub row_version: Option<bool>,
    pub fixed_length: Option<bool>,
    pub precision: Option<i32>,
    pub scale: Option<i32>,

    /// Frozen principal chain entries for *other* chain members, in
    /// declaration order after this property.
    pub principals: Vec<PrincipalEntry>,
}

impl Property {
    /// Create a property with no overrides.
    pub fn new(
        declaring_type: impl Into<String>,
        name: impl Into<String>,
        logical_type: LogicalType,
    ) -> Self {
        let nullable = logical_type.is_optional();
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
            logical_type,
            nullable,
            converter: None,
            provider_type: None,
            store_type: None,
            key_or_index: false,
            unicode: None,
            size: None,
            row_version: None,
            fixed_length: None,
            precision: None,
            scale: None,
            principals: Vec::new(),
        }
    }

    /// Declare an explicit converter on this property.
    #[must_use]
    pub fn with_converter(mut self, converter: ValueConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Declare an explicit provider-type override on this property.
    #[must_use]
    pub fn with_provider_type(mut self, provider_type: LogicalType) -> Self {
        self.provider_type = Some(provider_type);
        self
    }

    /// Declare an explicit store type name.
    #[must_use]
    pub fn with_store_type(mut self, store_type: impl Into<String>) -> Self {
        self.store_type = Some(store_type.into());
        self
    }

    /// Mark this property as participating in a key or index.
    #[must_use]
    pub fn as_key_or_index(mut self) -> Self {
        self.key_or_index = true;
        self
    }

    /// Set the size facet.
    #[must_use]
    pub fn with_size(mut self, size: i32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the unicode facet.
    #[must_use]
    pub fn with_unicode(mut self, unicode: bool) -> Self {
        self.unicode = Some(unicode);
        self
    }

    /// Set precision and scale facets.
    #[must_use]
    pub fn with_precision(mut self, precision: i32, scale: i32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Append another chain member's overrides to the frozen chain.
    ///
    /// Call in declaration order at model-build time.
    #[must_use]
    pub fn with_principal(mut self, principal: &Property) -> Self {
        self.principals.push(PrincipalEntry {
            converter: principal.converter.clone(),
            provider_type: principal.provider_type.clone(),
        });
        self
    }

    /// First explicit converter along the chain, this property first.
    pub fn chain_converter(&self) -> Option<&ValueConverter> {
        self.converter
            .as_ref()
            .or_else(|| self.principals.iter().find_map(|p| p.converter.as_ref()))
    }

    /// First explicit provider-type override along the chain, this
    /// property first. Independent of [`chain_converter`]: the two need
    /// not come from the same entry.
    ///
    /// [`chain_converter`]: Self::chain_converter
    pub fn chain_provider_type(&self) -> Option<&LogicalType> {
        self.provider_type
            .as_ref()
            .or_else(|| {
                self.principals
                    .iter()
                    .find_map(|p| p.provider_type.as_ref())
            })
            .map(LogicalType::unwrap_optional)
    }
}

/// A declared member of a runtime type: the by-member request shape for
/// callers that have a field but no configured [`Property`].
#[derive(Debug, Clone)]
pub struct Member {
    pub declaring_type: String,
    pub name: String,
    pub logical_type: LogicalType,
}

impl Member {
    pub fn new(
        declaring_type: impl Into<String>,
        name: impl Into<String>,
        logical_type: LogicalType,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
            logical_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::value::Value;

    use super::*;

    fn noop_converter(source: LogicalType, target: LogicalType) -> ValueConverter {
        ValueConverter::new(source, target, Value::clone, Value::clone)
    }

    #[test]
    fn test_nullability_from_type() {
        let p = Property::new("Order", "Total", LogicalType::Decimal.optional());
        assert!(p.nullable);
        let q = Property::new("Order", "Id", LogicalType::Int32);
        assert!(!q.nullable);
    }

    #[test]
    fn test_chain_converter_first_entry_wins() {
        let principal = Property::new("Customer", "Id", LogicalType::Int32)
            .with_converter(noop_converter(LogicalType::Int32, LogicalType::Int64));
        let dependent = Property::new("Order", "CustomerId", LogicalType::Int32)
            .with_principal(&principal);

        // The dependent declares no converter, so the principal's wins.
        let found = dependent.chain_converter().unwrap();
        assert_eq!(found.target(), &LogicalType::Int64);

        // A converter on the dependent itself takes precedence.
        let overridden = Property::new("Order", "CustomerId", LogicalType::Int32)
            .with_converter(noop_converter(LogicalType::Int32, LogicalType::String))
            .with_principal(&principal);
        assert_eq!(
            overridden.chain_converter().unwrap().target(),
            &LogicalType::String
        );
    }

    #[test]
    fn test_chain_overrides_are_independent() {
        // Converter from one entry, provider type from another.
        let first = Property::new("Customer", "Id", LogicalType::Int32)
            .with_converter(noop_converter(LogicalType::Int32, LogicalType::Int64));
        let second = Property::new("Region", "Id", LogicalType::Int32)
            .with_provider_type(LogicalType::String);
        let dependent = Property::new("Order", "CustomerId", LogicalType::Int32)
            .with_principal(&first)
            .with_principal(&second);

        assert_eq!(
            dependent.chain_converter().unwrap().target(),
            &LogicalType::Int64
        );
        assert_eq!(dependent.chain_provider_type(), Some(&LogicalType::String));
    }

    #[test]
    fn test_chain_provider_type_unwraps_optional() {
        let p = Property::new("Order", "Code", LogicalType::String)
            .with_provider_type(LogicalType::Int32.optional());
        assert_eq!(p.chain_provider_type(), Some(&LogicalType::Int32));
    }
}
