//! Synthetic record identifiers for generated CSV input

use crate::error::ParamsError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Digits in a generated polygon number
pub const POLYGON_NUMBER_DIGITS: (u32, u32) = (8, 8);
/// Digit range of a generated tree-cover layer id
pub const LAYER_ID_DIGITS: (u32, u32) = (4, 10);

const FEATURE_ID_TIME_MODULUS: i64 = 100_000_000;
const MAX_DIGITS: u32 = 19;

/// Identifiers shared by the polygon and layer records of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticIdentifiers {
    /// FEATURE_ID column
    pub feature_id: String,
    /// POLYGON_NUMBER column
    pub polygon_number: String,
    /// TREE_COVER_LAYER_ESTIMATED_ID column
    pub layer_id: String,
}

/// Random integer with between `min_digits` and `max_digits` digits
///
/// # Errors
///
/// Returns [`ParamsError::InvalidDigitRange`] when `min_digits > max_digits`,
/// `min_digits` is zero, or `max_digits` exceeds what a `u64` holds.
pub fn generate_random_number<R: Rng + ?Sized>(rng: &mut R, min_digits: u32, max_digits: u32) -> Result<u64, ParamsError> {
    if min_digits == 0 || min_digits > max_digits || max_digits > MAX_DIGITS {
        return Err(ParamsError::InvalidDigitRange {
            min: min_digits,
            max: max_digits,
        });
    }
    let low = 10_u64.pow(min_digits - 1);
    let high = 10_u64.pow(max_digits) - 1;
    Ok(rng.random_range(low..=high))
}

/// Feature id: a random prefix (1..=99) followed by the timestamp modulo 10^8
#[must_use]
pub fn generate_feature_id<R: Rng + ?Sized>(rng: &mut R, timestamp_ms: i64) -> String {
    let prefix: u32 = rng.random_range(1..=99);
    format!("{prefix}{}", timestamp_ms.rem_euclid(FEATURE_ID_TIME_MODULUS))
}

/// Fresh identifiers for one run
///
/// # Errors
///
/// Propagates [`ParamsError::InvalidDigitRange`] from the digit constants.
pub fn generate_synthetic_identifiers<R: Rng + ?Sized>(rng: &mut R) -> Result<SyntheticIdentifiers, ParamsError> {
    let timestamp_ms = chrono::Utc::now().timestamp_millis();
    let ids = SyntheticIdentifiers {
        feature_id: generate_feature_id(rng, timestamp_ms),
        polygon_number: generate_random_number(rng, POLYGON_NUMBER_DIGITS.0, POLYGON_NUMBER_DIGITS.1)?.to_string(),
        layer_id: generate_random_number(rng, LAYER_ID_DIGITS.0, LAYER_ID_DIGITS.1)?.to_string(),
    };
    tracing::debug!(feature_id = %ids.feature_id, polygon_number = %ids.polygon_number, "generated identifiers");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_inverted_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = generate_random_number(&mut rng, 5, 4).unwrap_err();
        assert!(matches!(err, ParamsError::InvalidDigitRange { min: 5, max: 4 }));
        assert!(generate_random_number(&mut rng, 0, 3).is_err());
        assert!(generate_random_number(&mut rng, 1, 20).is_err());
    }

    #[test]
    fn polygon_number_has_eight_digits() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let n = generate_random_number(&mut rng, 8, 8).unwrap();
            assert_eq!(n.to_string().len(), 8);
        }
    }

    #[test]
    fn feature_id_ends_with_timestamp() {
        let mut rng = StdRng::seed_from_u64(3);
        let id = generate_feature_id(&mut rng, 1_712_345_678_901);
        assert!(id.ends_with("45678901"), "{id}");
        let prefix: u32 = id.trim_end_matches("45678901").parse().unwrap();
        assert!((1..=99).contains(&prefix));
    }

    #[test]
    fn synthetic_identifiers_are_numeric() {
        let mut rng = StdRng::seed_from_u64(5);
        let ids = generate_synthetic_identifiers(&mut rng).unwrap();
        assert!(ids.feature_id.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(ids.polygon_number.len(), 8);
        assert!((4..=10).contains(&ids.layer_id.len()));
    }

    proptest! {
        /// Tenet: generated numbers always respect the requested digit range.
        #[test]
        fn prop_digit_range(seed in any::<u64>(), min in 1u32..10, extra in 0u32..9) {
            let mut rng = StdRng::seed_from_u64(seed);
            let max = min + extra;
            let n = generate_random_number(&mut rng, min, max).unwrap();
            let digits = u32::try_from(n.to_string().len()).unwrap();
            prop_assert!(digits >= min && digits <= max);
        }
    }
}
