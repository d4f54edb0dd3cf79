use pretty_assertions::assert_eq;
use proptest::prelude::*;
use vdyp_validation::prelude::*;
use vdyp_validation::{
    basal_area_limit, trees_per_hectare_bounds, validate_basal_area_against_limit,
    validate_quadratic_mean_diameter, validate_range, validate_trees_per_hectare_against_limits, Finding,
    SpeciesSlot,
};

/// Tenet: the basal-area formula is reproduced literally.
#[test]
fn basal_area_hemlock_coastal_regression() {
    let expected = 140.0 * (-11.5_f64 / (8.0 - 1.3)).exp() + 5.0;
    let limit = basal_area_limit("H", true, 8.0).unwrap();
    assert!((limit - expected).abs() < 1e-12);
    assert!(!validate_basal_area_against_limit("H", true, Some(50.0), Some(8.0)));
}

/// Tenet: QMD below the minimum-DBH threshold is flagged.
#[test]
fn qmd_regression_message() {
    let advisory = validate_quadratic_mean_diameter(Some(4.0), Some(1000.0), Some("7.5cm+")).unwrap();
    let finding = Finding::from(&advisory);
    assert_eq!(finding.title, DialogTitle::Confirm);
    assert_eq!(
        finding.message,
        "Quadratic Mean Diameter of 2.3 cm is less than the required diameter of 7.5 cm for the selected Minimum DBH Limit. Do you wish to proceed?"
    );
}

#[test]
fn trees_per_hectare_below_minimum() {
    let advisory = validate_trees_per_hectare_against_limits("AC", true, Some(25.0), Some(50.0), Some(10.0));
    let Some(Advisory::TreesPerHectareBelowMinimum { minimum }) = advisory else {
        panic!("expected below-minimum advisory, got {advisory:?}");
    };
    assert!((minimum - 353.68).abs() < 0.1);
}

#[test]
fn species_panel_full_flow() {
    let v = SpeciesValidator::new();
    let slots = [
        SpeciesSlot::new(Some("PL"), Some("30.0")),
        SpeciesSlot::new(Some("AC"), Some("30.0")),
        SpeciesSlot::new(Some("H"), Some("30.0")),
        SpeciesSlot::new(Some("S"), Some("10.0")),
        SpeciesSlot::default(),
        SpeciesSlot::default(),
    ];
    let result = ValidationResult::from(v.validate(Some(vdyp_tables::DerivedBy::Volume), &slots));
    assert!(result.is_valid);
}

fn species_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("AC"), Just("AT"), Just("H"), Just("PL"), Just("S"), Just("FDI"), Just("CW")]
}

proptest! {
    /// Tenet: a value inside the bounds always passes the range check.
    #[test]
    fn prop_range_inclusive(min in -100.0f64..100.0, span in 0.0f64..100.0, t in 0.0f64..=1.0) {
        let max = min + span;
        prop_assert!(validate_range(Some(min + span * t), min, max));
        prop_assert!(validate_range(None, min, max));
    }

    /// Tenet: the trees-per-hectare minimum never exceeds the maximum.
    #[test]
    fn prop_tph_bounds_ordered(
        species in species_strategy(),
        coastal in any::<bool>(),
        ba in 0.1f64..250.0,
        height in 1.5f64..40.0,
    ) {
        if let Some((min, max)) = trees_per_hectare_bounds(species, coastal, ba, height) {
            prop_assert!(min <= max);
        }
    }

    /// Tenet: a stand at the geometric mean of its bounds never gets a density advisory.
    #[test]
    fn prop_tph_between_bounds_is_clean(
        species in species_strategy(),
        coastal in any::<bool>(),
        ba in 0.1f64..250.0,
        height in 1.5f64..40.0,
    ) {
        if let Some((min, max)) = trees_per_hectare_bounds(species, coastal, ba, height) {
            let tph = (min * max).sqrt();
            prop_assert!(
                validate_trees_per_hectare_against_limits(species, coastal, Some(ba), Some(tph), Some(height)).is_none()
            );
        }
    }

    /// Tenet: non-positive height never fails the basal-area check.
    #[test]
    fn prop_bad_height_is_valid(species in species_strategy(), ba in 0.0f64..1000.0, height in -50.0f64..=0.0) {
        prop_assert!(validate_basal_area_against_limit(species, true, Some(ba), Some(height)));
    }
}
