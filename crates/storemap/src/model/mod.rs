//! Modeling-layer metadata consumed by the mapping engine.
//!
//! The engine does not build object-relational models; it consumes a
//! frozen snapshot of one:
//!
//! - [`types`]: logical (runtime) type descriptors
//! - [`property`]: property and member descriptors with principal chains
//! - [`structural`]: structural types and the model registry

pub mod property;
pub mod structural;
pub mod types;

pub use property::{Member, PrincipalEntry, Property};
pub use structural::{Model, Navigation, StructuralType};
pub use types::LogicalType;
