use proptest::prelude::*;
use vdyp_tables::species::known_species;
use vdyp_tables::{
    basal_area_coefficients, group_for, region_of, DerivedBy, ProjectionType, Region, SPECIES_GROUPS,
};

/// Tenet: every known species code resolves to a group with a coefficient entry.
#[test]
fn known_species_have_coefficients() {
    for code in known_species() {
        let group = group_for(code).unwrap();
        assert!(SPECIES_GROUPS.contains(&group), "{code} -> {group}");
        assert!(basal_area_coefficients(group, Region::Coastal).is_some());
        assert!(basal_area_coefficients(group, Region::Interior).is_some());
    }
}

#[test]
fn derived_by_wire_labels() {
    assert_eq!(serde_json::to_string(&DerivedBy::BasalArea).unwrap(), "\"Basal Area\"");
    assert_eq!(serde_json::to_string(&ProjectionType::CfsBiomass).unwrap(), "\"CFS Biomass\"");
}

proptest! {
    /// Tenet: group lookup is case-insensitive.
    #[test]
    fn prop_group_lookup_ignores_case(idx in 0usize..16) {
        let group = SPECIES_GROUPS[idx];
        prop_assert_eq!(group_for(&group.to_lowercase()), Some(group));
    }

    /// Tenet: random codes that are not zones never classify as a region.
    #[test]
    fn prop_unknown_zones_have_no_region(code in "[0-9]{1,4}") {
        prop_assert!(region_of(&code).is_none());
    }
}
