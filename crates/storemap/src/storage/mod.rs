//! The type-mapping engine.
//!
//! - [`value`]: runtime values flowing through converter chains
//! - [`converter`]: reversible converters and the selection strategy
//! - [`key`]: structural-equality mapping request keys
//! - [`mapping`]: immutable type-mapping descriptors
//! - [`provider`]: provider-specific direct primitive lookup
//! - [`source`]: the memoizing resolver tying it all together
//!
//! # Architecture
//!
//! The resolver is generic; everything store-specific hides behind two
//! strategy traits. [`MappingProvider`] answers direct primitive
//! lookups for one concrete store, and [`ConverterSelector`] offers
//! ordered converter candidates when no direct mapping exists. New
//! stores plug in without touching resolution logic.

pub mod converter;
pub mod key;
pub mod mapping;
pub mod provider;
pub mod source;
pub mod value;

pub use converter::{ConverterCandidate, ConverterSelector, DefaultConverterSelector, ValueConverter};
pub use key::MappingKey;
pub use mapping::{LiteralFormat, TypeMapping};
pub use provider::{MappingProvider, SqlProvider};
pub use source::{MappingRequest, TypeMappingSource};
pub use value::Value;
