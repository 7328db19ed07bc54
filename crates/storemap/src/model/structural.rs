//! Structural-type and model metadata.
//!
//! This is the boundary with the (external) modeling layer: just enough
//! metadata for the resolver and the validation convention to consume.

use std::collections::{BTreeMap, BTreeSet};

use super::property::{Member, Property};

/// A relationship member pointing at another structural type.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub name: String,
    /// Name of the target structural type.
    pub target: String,
}

impl Navigation {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
        }
    }
}

/// A modeled entity-like type with declared properties, navigations, and
/// service properties.
#[derive(Debug, Clone, Default)]
pub struct StructuralType {
    pub name: String,
    /// Configured primitive-mapped properties.
    pub properties: Vec<Property>,
    /// Configured relationships.
    pub navigations: Vec<Navigation>,
    /// Members injected by infrastructure (loaders, contexts); never
    /// mapped to the store.
    pub service_properties: Vec<String>,
    /// Declared runtime members not configured as anything yet. The
    /// validation convention classifies these.
    pub members: Vec<Member>,
    /// Names of structural types deriving from this one.
    pub derived: Vec<String>,
    /// Member names explicitly excluded from the model.
    pub ignored_members: BTreeSet<String>,
}

impl StructuralType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn with_navigation(mut self, navigation: Navigation) -> Self {
        self.navigations.push(navigation);
        self
    }

    #[must_use]
    pub fn with_service_property(mut self, name: impl Into<String>) -> Self {
        self.service_properties.push(name.into());
        self
    }

    #[must_use]
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    #[must_use]
    pub fn with_derived(mut self, name: impl Into<String>) -> Self {
        self.derived.push(name.into());
        self
    }

    #[must_use]
    pub fn ignore_member(mut self, name: impl Into<String>) -> Self {
        self.ignored_members.insert(name.into());
        self
    }

    /// Whether `name` is configured as a property, navigation, service
    /// property, or explicitly ignored.
    pub fn is_configured(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
            || self.navigations.iter().any(|n| n.name == name)
            || self.service_properties.iter().any(|s| s == name)
            || self.ignored_members.contains(name)
    }
}

/// The set of registered structural types plus model-level predicates.
#[derive(Debug, Clone, Default)]
pub struct Model {
    types: BTreeMap<String, StructuralType>,
    owned: BTreeSet<String>,
    ignored: BTreeSet<String>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a structural type.
    pub fn add_type(&mut self, ty: StructuralType) {
        self.types.insert(ty.name.clone(), ty);
    }

    /// Mark a type name as owned (weak): it shares its owner's lifetime
    /// and still counts as a navigation target.
    pub fn mark_owned(&mut self, name: impl Into<String>) {
        self.owned.insert(name.into());
    }

    /// Exclude a type name from the model entirely.
    pub fn ignore_type(&mut self, name: impl Into<String>) {
        self.ignored.insert(name.into());
    }

    pub fn find_type(&self, name: &str) -> Option<&StructuralType> {
        self.types.get(name)
    }

    pub fn is_owned(&self, name: &str) -> bool {
        self.owned.contains(name)
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.contains(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &StructuralType> {
        self.types.values()
    }
}
