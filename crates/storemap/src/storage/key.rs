//! Mapping request keys.

use crate::model::property::{Member, Property};
use crate::model::types::LogicalType;

use super::converter::ConverterCandidate;

/// Immutable value identifying a mapping request.
///
/// Structural equality over every field: two keys differing in a single
/// facet are distinct requests. Used for cache identity and for driving
/// the provider's direct primitive lookup.
///
/// Note the key carries no converter identity. Two property contexts
/// with identical facets but different explicit converters therefore
/// share a cache entry, and the first context to resolve determines the
/// shared result. This narrowing is deliberate; DESIGN.md records the
/// trade-off.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MappingKey {
    pub logical_type: Option<LogicalType>,
    pub store_type_name: Option<String>,
    pub key_or_index: bool,
    pub unicode: Option<bool>,
    pub size: Option<i32>,
    pub row_version: Option<bool>,
    pub fixed_length: Option<bool>,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
}

impl MappingKey {
    /// Key for a bare logical type with no facets.
    pub fn for_type(ty: &LogicalType) -> Self {
        Self {
            logical_type: Some(ty.unwrap_optional().clone()),
            ..Self::default()
        }
    }

    /// Key for a property, capturing its declared facet overrides.
    pub fn for_property(property: &Property) -> Self {
        Self {
            logical_type: Some(property.logical_type.unwrap_optional().clone()),
            store_type_name: property.store_type.clone(),
            key_or_index: property.key_or_index,
            unicode: property.unicode,
            size: property.size,
            row_version: property.row_version,
            fixed_length: property.fixed_length,
            precision: property.precision,
            scale: property.scale,
        }
    }

    /// Key for a member of a runtime type.
    pub fn for_member(member: &Member) -> Self {
        Self::for_type(&member.logical_type)
    }

    /// Key for a store-name-first lookup.
    pub fn for_store_type(store_type_name: &str) -> Self {
        Self {
            store_type_name: Some(store_type_name.to_string()),
            ..Self::default()
        }
    }

    /// Key for an explicit type-plus-facets request.
    #[allow(clippy::too_many_arguments)]
    pub fn with_facets(
        ty: &LogicalType,
        store_type_name: Option<&str>,
        key_or_index: bool,
        unicode: Option<bool>,
        size: Option<i32>,
        row_version: Option<bool>,
        fixed_length: Option<bool>,
        precision: Option<i32>,
        scale: Option<i32>,
    ) -> Self {
        Self {
            logical_type: Some(ty.unwrap_optional().clone()),
            store_type_name: store_type_name.map(str::to_string),
            key_or_index,
            unicode,
            size,
            row_version,
            fixed_length,
            precision,
            scale,
        }
    }

    /// Rebase this key on a converter candidate's target type.
    ///
    /// The request then asks the provider for the *converted*
    /// representation. Facets already present win over the candidate's
    /// hints; the store type name is dropped since it described the
    /// pre-conversion request.
    #[must_use]
    pub fn with_converter(&self, candidate: &ConverterCandidate) -> Self {
        Self {
            logical_type: Some(candidate.target().clone()),
            store_type_name: None,
            key_or_index: self.key_or_index,
            unicode: self.unicode,
            size: self.size.or_else(|| candidate.size_hint()),
            row_version: self.row_version,
            fixed_length: self.fixed_length,
            precision: self.precision.or_else(|| candidate.precision_hint()),
            scale: self.scale.or_else(|| candidate.scale_hint()),
        }
    }
}
