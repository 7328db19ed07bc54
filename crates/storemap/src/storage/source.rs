//! The type-mapping resolver.
//!
//! [`TypeMappingSource`] orchestrates direct provider lookup, converter
//! search with two levels of fallback, converter composition, memoized
//! caching, and post-hoc validation against a property's declared type.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::config::ProviderConfig;
use crate::error::{Result, StoremapError};
use crate::model::property::{Member, Property};
use crate::model::types::LogicalType;

use super::converter::{ConverterSelector, DefaultConverterSelector};
use super::key::MappingKey;
use super::mapping::TypeMapping;
use super::provider::{MappingProvider, SqlProvider};

/// A mapping request, one of the five supported shapes.
///
/// All entry points funnel through this tagged form so resolution has a
/// single code path regardless of what the caller holds.
#[derive(Debug)]
pub enum MappingRequest<'a> {
    Property(&'a Property),
    Type(&'a LogicalType),
    Member(&'a Member),
    StoreType(&'a str),
    Facets {
        logical_type: &'a LogicalType,
        store_type: Option<&'a str>,
        key_or_index: bool,
        unicode: Option<bool>,
        size: Option<i32>,
        row_version: Option<bool>,
        fixed_length: Option<bool>,
        precision: Option<i32>,
        scale: Option<i32>,
    },
}

impl MappingRequest<'_> {
    fn key(&self) -> MappingKey {
        match self {
            MappingRequest::Property(p) => MappingKey::for_property(p),
            MappingRequest::Type(t) => MappingKey::for_type(t),
            MappingRequest::Member(m) => MappingKey::for_member(m),
            MappingRequest::StoreType(name) => MappingKey::for_store_type(name),
            MappingRequest::Facets {
                logical_type,
                store_type,
                key_or_index,
                unicode,
                size,
                row_version,
                fixed_length,
                precision,
                scale,
            } => MappingKey::with_facets(
                logical_type,
                *store_type,
                *key_or_index,
                *unicode,
                *size,
                *row_version,
                *fixed_length,
                *precision,
                *scale,
            ),
        }
    }

    fn property(&self) -> Option<&Property> {
        match self {
            MappingRequest::Property(p) => Some(p),
            _ => None,
        }
    }
}

/// Memoizing resolver from mapping requests to [`TypeMapping`]s.
///
/// Resolution is synchronous, CPU-only, and side-effect-free beyond
/// cache insertion. The cache is safe for unsynchronized concurrent use;
/// first-time resolution of the same key may race, in which case each
/// caller computes independently and only one result is retained. That
/// is acceptable because resolution is a deterministic pure function of
/// the key — duplicate work is wasted effort, never a correctness
/// hazard.
pub struct TypeMappingSource {
    provider: Arc<dyn MappingProvider>,
    selector: Arc<dyn ConverterSelector>,
    // Keyed by type and facets only: explicit-converter identity is
    // deliberately not part of the key (see MappingKey docs).
    cache: DashMap<MappingKey, Option<TypeMapping>>,
}

impl TypeMappingSource {
    /// Create a source over the given provider and selector.
    pub fn new(provider: Arc<dyn MappingProvider>, selector: Arc<dyn ConverterSelector>) -> Self {
        Self {
            provider,
            selector,
            cache: DashMap::new(),
        }
    }

    /// Create a source over the built-in SQL provider and the default
    /// converter selector.
    pub fn with_defaults(config: ProviderConfig) -> Self {
        Self::new(
            Arc::new(SqlProvider::new(config)),
            Arc::new(DefaultConverterSelector::default()),
        )
    }

    /// Resolve a mapping for a property, consulting its principal chain
    /// for overrides and validating the result against the declared
    /// type.
    pub fn find_mapping_for_property(&self, property: &Property) -> Result<Option<TypeMapping>> {
        self.find_mapping(MappingRequest::Property(property))
    }

    /// Resolve a mapping for a bare logical type.
    pub fn find_mapping_for_type(&self, ty: &LogicalType) -> Option<TypeMapping> {
        self.resolve_cached(MappingRequest::Type(ty).key(), None)
    }

    /// Resolve a mapping for a member with no configured property.
    pub fn find_mapping_for_member(&self, member: &Member) -> Option<TypeMapping> {
        self.resolve_cached(MappingRequest::Member(member).key(), None)
    }

    /// Resolve a mapping from a store type name alone.
    pub fn find_mapping_for_store_type(&self, store_type: &str) -> Option<TypeMapping> {
        self.resolve_cached(MappingRequest::StoreType(store_type).key(), None)
    }

    /// Resolve a mapping for a type plus explicit facets.
    #[allow(clippy::too_many_arguments)]
    pub fn find_mapping_with_facets(
        &self,
        ty: &LogicalType,
        store_type: Option<&str>,
        key_or_index: bool,
        unicode: Option<bool>,
        size: Option<i32>,
        row_version: Option<bool>,
        fixed_length: Option<bool>,
        precision: Option<i32>,
        scale: Option<i32>,
    ) -> Option<TypeMapping> {
        let request = MappingRequest::Facets {
            logical_type: ty,
            store_type,
            key_or_index,
            unicode,
            size,
            row_version,
            fixed_length,
            precision,
            scale,
        };
        self.resolve_cached(request.key(), None)
    }

    /// Single resolution entry point for all request shapes.
    ///
    /// Returns `Ok(None)` on a resolution miss; that is not an error by
    /// itself. `Err` only arises when a property context is present and
    /// the resolved mapping contradicts the declared type.
    pub fn find_mapping(&self, request: MappingRequest<'_>) -> Result<Option<TypeMapping>> {
        let property = request.property();
        let resolved = self.resolve_cached(request.key(), property);
        self.validate_mapping(resolved.as_ref(), property)?;
        Ok(resolved)
    }

    /// Cache lookup with compute-then-insert-if-absent on a miss: a
    /// racing caller's entry wins and the local computation is
    /// discarded.
    fn resolve_cached(&self, key: MappingKey, property: Option<&Property>) -> Option<TypeMapping> {
        if let Some(hit) = self.cache.get(&key) {
            return hit.value().clone();
        }
        trace!(?key, "type mapping cache miss");
        let computed = self.resolve(&key, property);
        self.cache.entry(key).or_insert(computed).value().clone()
    }

    /// The core algorithm: direct lookup, then the two-level converter
    /// search, then the explicit custom converter stacked on top.
    fn resolve(&self, key: &MappingKey, property: Option<&Property>) -> Option<TypeMapping> {
        let custom_converter = property.and_then(Property::chain_converter);
        let provider_type = property.and_then(Property::chain_provider_type);

        // Direct primitive lookup, unless an override redirects the
        // request to a different provider type.
        let mut mapping = match provider_type {
            None => self.provider.find_mapping(key),
            Some(pt) if Some(pt) == key.logical_type.as_ref() => self.provider.find_mapping(key),
            Some(_) => None,
        };

        if mapping.is_none() {
            if let Some(source_type) = &key.logical_type {
                mapping = self.search_converters(key, source_type, provider_type);
            }
        }

        // The declared custom converter stacks unconditionally on top of
        // whatever was discovered.
        if let Some(custom) = custom_converter {
            mapping = mapping.map(|found| found.with_converter(custom.clone()));
        }

        match &mapping {
            Some(found) => debug!(
                store_type = found.store_type(),
                converters = found.converters().len(),
                "resolved type mapping"
            ),
            None => debug!(?key, "no type mapping found"),
        }
        mapping
    }

    /// Ordered converter search. First level: candidates from the source
    /// type, rebasing the lookup on each candidate's target. Second
    /// level (only when a provider type is known): source-agnostic
    /// candidates into the provider type, bridging the first candidate's
    /// target to a primitive the provider recognizes.
    fn search_converters(
        &self,
        key: &MappingKey,
        source_type: &LogicalType,
        provider_type: Option<&LogicalType>,
    ) -> Option<TypeMapping> {
        for first in self.selector.select(Some(source_type), provider_type) {
            trace!(candidate = ?first, "trying converter candidate");
            let rebased = key.with_converter(&first);
            let mut found = self.provider.find_mapping(&rebased);

            if found.is_none() {
                if let Some(pt) = provider_type {
                    for second in self.selector.select(None, Some(pt)) {
                        // The bridge must continue where the first
                        // candidate left off.
                        if second.source() != first.target() {
                            continue;
                        }
                        let bridged = rebased.with_converter(&second);
                        if let Some(inner) = self.provider.find_mapping(&bridged) {
                            trace!(candidate = ?second, "second-level candidate matched");
                            found = Some(inner.with_converter(second.build()));
                            break;
                        }
                    }
                }
            }

            if let Some(inner) = found {
                return Some(inner.with_converter(first.build()));
            }
        }
        None
    }

    /// A resolved mapping must expose the property's declared type after
    /// optional unwrapping; anything else is a configuration error.
    fn validate_mapping(
        &self,
        mapping: Option<&TypeMapping>,
        property: Option<&Property>,
    ) -> Result<()> {
        let (Some(mapping), Some(property)) = (mapping, property) else {
            return Ok(());
        };
        let declared = property.logical_type.unwrap_optional();
        if declared != mapping.logical_type() {
            return Err(StoremapError::ConverterMismatch {
                structural_type: property.declaring_type.clone(),
                property: property.name.clone(),
                property_type: declared.to_string(),
                mapping_type: mapping.logical_type().to_string(),
            });
        }
        Ok(())
    }
}
