//! Error types for the mapping engine.

use thiserror::Error;

/// Main error type for type-mapping and model-validation operations.
///
/// Resolution misses are *not* errors: `find_mapping_*` returns `None`
/// for an unmappable request and lets the caller decide significance.
/// Only model validation escalates misses into configuration errors.
/// All variants here describe static configuration; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoremapError {
    /// Configuration error (invalid YAML, out-of-range knob, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configured property has no resolvable type mapping.
    #[error(
        "The property '{structural_type}.{property}' of type '{property_type}' could not be \
         mapped to a store type. Configure a value converter or a supported provider type."
    )]
    PropertyNotMapped {
        structural_type: String,
        property: String,
        property_type: String,
    },

    /// A member targets a structural type but no navigation was configured.
    #[error(
        "The member '{structural_type}.{property}' of type '{property_type}' targets a \
         structural type but no navigation was configured for it. Add a navigation or \
         ignore the member."
    )]
    NavigationNotAdded {
        structural_type: String,
        property: String,
        property_type: String,
    },

    /// A member is typed as an interface and cannot be configured by convention.
    #[error(
        "The member '{structural_type}.{property}' is of interface type '{property_type}'. \
         Interface members must be configured explicitly or ignored."
    )]
    InterfacePropertyNotAdded {
        structural_type: String,
        property: String,
        property_type: String,
    },

    /// A member was neither mapped as a property nor configured as anything else.
    #[error(
        "The member '{structural_type}.{property}' of type '{property_type}' was not added \
         to the model. Map it as a property, configure it explicitly, or ignore it."
    )]
    PropertyNotAdded {
        structural_type: String,
        property: String,
        property_type: String,
    },

    /// A resolved mapping's exposed type does not match the property's declared type.
    #[error(
        "The resolved mapping for '{structural_type}.{property}' exposes type \
         '{mapping_type}' but the property is declared as '{property_type}'."
    )]
    ConverterMismatch {
        structural_type: String,
        property: String,
        property_type: String,
        mapping_type: String,
    },

    /// IO error (config file operations)
    #[error("IO error: {0}")]
    Io(String),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(String),
}

impl From<std::io::Error> for StoremapError {
    fn from(err: std::io::Error) -> Self {
        StoremapError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for StoremapError {
    fn from(err: serde_yaml::Error) -> Self {
        StoremapError::Yaml(err.to_string())
    }
}

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, StoremapError>;
