//! Model validation against the type-mapping engine.
//!
//! Runs once after the full set of structural types is known. Every
//! configured property must resolve to a mapping, and every declared
//! member that was never configured is classified into one of three
//! fatal configuration errors. Nothing here is retried: the inputs are
//! static configuration.

use tracing::debug;

use crate::error::{Result, StoremapError};
use crate::model::property::Member;
use crate::model::structural::{Model, StructuralType};
use crate::model::types::LogicalType;
use crate::storage::source::TypeMappingSource;

/// Validate the model; returns the first configuration error found.
pub fn validate_model(model: &Model, source: &TypeMappingSource) -> Result<()> {
    for structural in model.types() {
        debug!(structural_type = %structural.name, "validating structural type");
        validate_properties(structural, source)?;
        validate_members(model, structural)?;
    }
    Ok(())
}

/// Every configured, non-ignored property must be mapped to a primitive.
fn validate_properties(structural: &StructuralType, source: &TypeMappingSource) -> Result<()> {
    for property in &structural.properties {
        if structural.ignored_members.contains(&property.name) {
            continue;
        }
        if source.find_mapping_for_property(property)?.is_none() {
            return Err(StoremapError::PropertyNotMapped {
                structural_type: structural.name.clone(),
                property: property.name.clone(),
                property_type: property.logical_type.to_string(),
            });
        }
    }
    Ok(())
}

/// Classify declared members that were never configured as anything.
fn validate_members(model: &Model, structural: &StructuralType) -> Result<()> {
    for member in &structural.members {
        if structural.is_configured(&member.name) {
            continue;
        }
        let ty = member.logical_type.unwrap_optional();
        if type_is_ignored(model, ty) {
            continue;
        }

        if let Some(target) = candidate_navigation_target(ty) {
            if navigation_qualifies(model, target) {
                // A navigation declared on a derived type shadows the
                // member here.
                let declared_on_derived = structural
                    .derived
                    .iter()
                    .filter_map(|name| model.find_type(name))
                    .any(|derived| derived.navigations.iter().any(|n| n.name == member.name));
                if declared_on_derived {
                    continue;
                }
                return Err(StoremapError::NavigationNotAdded {
                    structural_type: structural.name.clone(),
                    property: member.name.clone(),
                    property_type: member.logical_type.to_string(),
                });
            }
        }

        if is_interface_shaped(ty) {
            return Err(StoremapError::InterfacePropertyNotAdded {
                structural_type: structural.name.clone(),
                property: member.name.clone(),
                property_type: member.logical_type.to_string(),
            });
        }

        return Err(StoremapError::PropertyNotAdded {
            structural_type: structural.name.clone(),
            property: member.name.clone(),
            property_type: member.logical_type.to_string(),
        });
    }
    Ok(())
}

fn type_is_ignored(model: &Model, ty: &LogicalType) -> bool {
    let name = match ty {
        LogicalType::Structural(name) | LogicalType::Interface(name) => Some(name.as_str()),
        _ => None,
    };
    if name.is_some_and(|n| model.is_ignored(n)) {
        return true;
    }
    ty.sequence_element()
        .is_some_and(|elem| type_is_ignored(model, elem))
}

/// The structural type a member of this type would navigate to, looking
/// through one level of sequence for collection navigations.
fn candidate_navigation_target(ty: &LogicalType) -> Option<&str> {
    match ty.unwrap_optional() {
        LogicalType::Structural(name) => Some(name),
        LogicalType::Sequence(elem) => match elem.unwrap_optional() {
            LogicalType::Structural(name) => Some(name),
            _ => None,
        },
        _ => None,
    }
}

/// A target qualifies when it is registered in the model or marked
/// owned. Unregistered targets contribute no candidate properties and
/// fall through to the catch-all classification.
fn navigation_qualifies(model: &Model, target: &str) -> bool {
    model.find_type(target).is_some() || model.is_owned(target)
}

fn is_interface_shaped(ty: &LogicalType) -> bool {
    ty.is_interface()
        || ty
            .sequence_element()
            .is_some_and(|elem| elem.is_interface())
}

#[cfg(test)]
mod tests {
    use crate::config::ProviderConfig;
    use crate::model::property::Property;
    use crate::model::structural::Navigation;

    use super::*;

    fn source() -> TypeMappingSource {
        TypeMappingSource::with_defaults(ProviderConfig::default())
    }

    fn model_with(structural: StructuralType) -> Model {
        let mut model = Model::new();
        model.add_type(structural);
        model
    }

    #[test]
    fn test_valid_model_passes() {
        let order = StructuralType::new("Order")
            .with_property(Property::new("Order", "Id", LogicalType::Int32))
            .with_property(Property::new(
                "Order",
                "PlacedAt",
                LogicalType::DateTime.optional(),
            ));
        assert!(validate_model(&model_with(order), &source()).is_ok());
    }

    #[test]
    fn test_property_not_mapped() {
        let order = StructuralType::new("Order").with_property(Property::new(
            "Order",
            "Total",
            LogicalType::Structural("Money".into()),
        ));
        let err = validate_model(&model_with(order), &source()).unwrap_err();
        assert!(matches!(err, StoremapError::PropertyNotMapped { .. }));
    }

    #[test]
    fn test_navigation_not_added() {
        let mut model = Model::new();
        model.add_type(StructuralType::new("Customer"));
        model.add_type(StructuralType::new("Order").with_member(Member::new(
            "Order",
            "Customer",
            LogicalType::Structural("Customer".into()),
        )));
        let err = validate_model(&model, &source()).unwrap_err();
        assert!(matches!(err, StoremapError::NavigationNotAdded { .. }));
    }

    #[test]
    fn test_collection_navigation_not_added() {
        let mut model = Model::new();
        model.add_type(StructuralType::new("Order"));
        model.add_type(StructuralType::new("Customer").with_member(Member::new(
            "Customer",
            "Orders",
            LogicalType::Structural("Order".into()).sequence(),
        )));
        let err = validate_model(&model, &source()).unwrap_err();
        assert!(matches!(err, StoremapError::NavigationNotAdded { .. }));
    }

    #[test]
    fn test_interface_property_not_added() {
        let order = StructuralType::new("Order").with_member(Member::new(
            "Order",
            "Tags",
            LogicalType::Interface("ITagSet".into()),
        ));
        let err = validate_model(&model_with(order), &source()).unwrap_err();
        assert!(matches!(
            err,
            StoremapError::InterfacePropertyNotAdded { .. }
        ));
    }

    #[test]
    fn test_interface_sequence_property_not_added() {
        let order = StructuralType::new("Order").with_member(Member::new(
            "Order",
            "Tags",
            LogicalType::Interface("ITag".into()).sequence(),
        ));
        let err = validate_model(&model_with(order), &source()).unwrap_err();
        assert!(matches!(
            err,
            StoremapError::InterfacePropertyNotAdded { .. }
        ));
    }

    #[test]
    fn test_property_not_added_for_unmappable_primitive() {
        // A sequence of primitives is neither a navigation candidate nor
        // an interface; it falls through to the catch-all error.
        let order = StructuralType::new("Order").with_member(Member::new(
            "Order",
            "Scores",
            LogicalType::Int32.sequence(),
        ));
        let err = validate_model(&model_with(order), &source()).unwrap_err();
        assert!(matches!(err, StoremapError::PropertyNotAdded { .. }));
    }

    #[test]
    fn test_configured_members_are_skipped() {
        let mut model = Model::new();
        model.add_type(StructuralType::new("Customer"));
        model.add_type(
            StructuralType::new("Order")
                .with_navigation(Navigation::new("Customer", "Customer"))
                .with_member(Member::new(
                    "Order",
                    "Customer",
                    LogicalType::Structural("Customer".into()),
                )),
        );
        assert!(validate_model(&model, &source()).is_ok());
    }

    #[test]
    fn test_ignored_member_is_skipped() {
        let order = StructuralType::new("Order")
            .with_member(Member::new(
                "Order",
                "Audit",
                LogicalType::Interface("IAudit".into()),
            ))
            .ignore_member("Audit");
        assert!(validate_model(&model_with(order), &source()).is_ok());
    }

    #[test]
    fn test_ignored_type_is_skipped() {
        let mut model = Model::new();
        model.ignore_type("Diagnostics");
        model.add_type(StructuralType::new("Order").with_member(Member::new(
            "Order",
            "Diag",
            LogicalType::Structural("Diagnostics".into()),
        )));
        assert!(validate_model(&model, &source()).is_ok());
    }

    #[test]
    fn test_derived_navigation_shadows_member() {
        let mut model = Model::new();
        model.add_type(StructuralType::new("Customer"));
        model.add_type(
            StructuralType::new("Order")
                .with_derived("RushOrder")
                .with_member(Member::new(
                    "Order",
                    "Customer",
                    LogicalType::Structural("Customer".into()),
                )),
        );
        model.add_type(
            StructuralType::new("RushOrder").with_navigation(Navigation::new(
                "Customer", "Customer",
            )),
        );
        assert!(validate_model(&model, &source()).is_ok());
    }

    #[test]
    fn test_unregistered_target_falls_through_to_property_not_added() {
        // Neither registered nor owned: not a navigation candidate, so
        // the member lands in the catch-all error.
        let order = StructuralType::new("Order").with_member(Member::new(
            "Order",
            "Snapshot",
            LogicalType::Structural("AuditSnapshot".into()),
        ));
        let err = validate_model(&model_with(order), &source()).unwrap_err();
        assert!(matches!(err, StoremapError::PropertyNotAdded { .. }));
    }

    #[test]
    fn test_owned_type_counts_as_navigation_target() {
        let mut model = Model::new();
        model.mark_owned("Address");
        model.add_type(StructuralType::new("Customer").with_member(Member::new(
            "Customer",
            "Home",
            LogicalType::Structural("Address".into()),
        )));
        let err = validate_model(&model, &source()).unwrap_err();
        assert!(matches!(err, StoremapError::NavigationNotAdded { .. }));
    }
}
