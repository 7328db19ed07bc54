//! # storemap
//!
//! Type-mapping resolution engine for relational storage providers.
//!
//! Given a value's logical type plus optional storage facets (store type
//! name, size, precision, scale, unicode/fixed-length flags, key-or-index
//! usage) and optional property context, the engine produces an immutable
//! [`TypeMapping`] describing how to encode, decode, and render that
//! value for a concrete store, composing reversible converters when no
//! direct mapping exists:
//!
//! - **Direct lookup** against a provider's native primitive types
//! - **Converter-chain search** with two levels of fallback
//! - **Memoized concurrent caching** keyed by type and facets
//! - **Model validation** escalating unmapped members to configuration errors
//!
//! ## Example
//!
//! ```rust
//! use storemap::{LogicalType, ProviderConfig, TypeMappingSource, Value};
//!
//! let source = TypeMappingSource::with_defaults(ProviderConfig::default());
//! let mapping = source.find_mapping_for_type(&LogicalType::Int32).unwrap();
//! assert_eq!(mapping.store_type(), "int");
//! assert_eq!(mapping.literal(&Value::Int32(42)), "42");
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod validation;

// Re-exports for convenient access
pub use config::ProviderConfig;
pub use error::{Result, StoremapError};
pub use model::{LogicalType, Member, Model, Navigation, Property, StructuralType};
pub use storage::{
    ConverterCandidate, ConverterSelector, DefaultConverterSelector, LiteralFormat,
    MappingKey, MappingProvider, MappingRequest, SqlProvider, TypeMapping, TypeMappingSource,
    Value, ValueConverter,
};
pub use validation::validate_model;
