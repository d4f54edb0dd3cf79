//! Coefficient tables for the stand-density checks
//!
//! Basal-area limits follow `coeff1 * exp(coeff2 / (height - 1.3)) + 5`.
//! Trees-per-hectare limits come from P10 and P90 quadratic-mean-diameter
//! curves, each `a0 + b0 * (height - 5) + b1 * (height - 5)^2`.
//!
//! Tables are keyed by SP0 group and [`Region`]. A coefficient equal to
//! [`UNAVAILABLE`] means no calibrated limit exists for that combination.

use crate::zones::Region;

/// Sentinel marking a coefficient with no calibrated value
pub const UNAVAILABLE: f64 = -999.0;

/// Breast height in metres
pub const BREAST_HEIGHT: f64 = 1.3;

/// Offset added to the basal-area limit curve
pub const BASAL_AREA_LIMIT_OFFSET: f64 = 5.0;

/// Converts dq² (cm²) to basal area per stem (m²): π / 40000
pub const BASAL_AREA_PER_DQ_SQUARED: f64 = 0.000_078_54;

/// Reference height of the diameter curves
pub const DQ_CURVE_REFERENCE_HEIGHT: f64 = 5.0;

/// Basal-area limit coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasalAreaCoefficients {
    /// Asymptote term
    pub coeff1: f64,
    /// Shape term
    pub coeff2: f64,
}

impl BasalAreaCoefficients {
    /// Create coefficient pair
    #[inline]
    #[must_use]
    pub const fn new(coeff1: f64, coeff2: f64) -> Self {
        Self { coeff1, coeff2 }
    }

    /// Check that neither coefficient is the sentinel
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        !is_sentinel(self.coeff1) && !is_sentinel(self.coeff2)
    }

    /// Maximum likely basal area (m²/ha) at the given height
    #[inline]
    #[must_use]
    pub fn limit_at(&self, height: f64) -> f64 {
        self.coeff1 * (self.coeff2 / (height - BREAST_HEIGHT)).exp() + BASAL_AREA_LIMIT_OFFSET
    }
}

/// One quadratic-mean-diameter percentile curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiameterCurve {
    /// Intercept at the reference height
    pub a0: f64,
    /// Linear term
    pub b0: f64,
    /// Quadratic term
    pub b1: f64,
}

impl DiameterCurve {
    /// Create curve
    #[inline]
    #[must_use]
    pub const fn new(a0: f64, b0: f64, b1: f64) -> Self {
        Self { a0, b0, b1 }
    }

    /// Quadratic mean diameter (cm) at the given height
    #[inline]
    #[must_use]
    pub fn diameter_at(&self, height: f64) -> f64 {
        let dh = height - DQ_CURVE_REFERENCE_HEIGHT;
        self.a0 + self.b0 * dh + self.b1 * dh * dh
    }

    /// Check that no term is the sentinel
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        !is_sentinel(self.a0) && !is_sentinel(self.b0) && !is_sentinel(self.b1)
    }
}

/// P10 and P90 diameter curves bounding stand density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreesPerHectareCoefficients {
    /// 10th percentile curve, yields the minimum diameter
    pub p10: DiameterCurve,
    /// 90th percentile curve, yields the maximum diameter
    pub p90: DiameterCurve,
}

impl TreesPerHectareCoefficients {
    /// Check that both curves are calibrated
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.p10.is_available() && self.p90.is_available()
    }
}

#[inline]
fn is_sentinel(value: f64) -> bool {
    (value - UNAVAILABLE).abs() < f64::EPSILON
}

const NA: BasalAreaCoefficients = BasalAreaCoefficients::new(UNAVAILABLE, UNAVAILABLE);

/// Basal-area limit coefficients for an SP0 group, `None` for unknown groups
///
/// Unavailable combinations are returned as sentinel coefficients so the
/// caller can tell "no calibration" apart from "unknown group".
#[must_use]
pub fn basal_area_coefficients(group: &str, region: Region) -> Option<BasalAreaCoefficients> {
    use Region::{Coastal, Interior};

    let c = match (group, region) {
        ("AC", Coastal) => BasalAreaCoefficients::new(105.0, -14.0),
        ("AC", Interior) => BasalAreaCoefficients::new(90.0, -15.0),
        ("AT", Coastal) => NA,
        ("AT", Interior) => BasalAreaCoefficients::new(80.0, -15.5),
        ("B", Coastal) => BasalAreaCoefficients::new(123.0, -12.0),
        ("B", Interior) => BasalAreaCoefficients::new(110.0, -12.5),
        ("C", Coastal) => BasalAreaCoefficients::new(135.0, -11.0),
        ("C", Interior) => BasalAreaCoefficients::new(120.0, -11.5),
        ("D", Coastal) => BasalAreaCoefficients::new(86.0, -16.0),
        ("D", Interior) => BasalAreaCoefficients::new(75.0, -16.0),
        ("E", Coastal) => NA,
        ("E", Interior) => BasalAreaCoefficients::new(70.0, -16.5),
        ("F", Coastal) => BasalAreaCoefficients::new(125.0, -12.5),
        ("F", Interior) => BasalAreaCoefficients::new(105.0, -13.0),
        ("H", Coastal) => BasalAreaCoefficients::new(140.0, -11.5),
        ("H", Interior) => BasalAreaCoefficients::new(125.0, -12.0),
        ("L", Coastal) => NA,
        ("L", Interior) => BasalAreaCoefficients::new(90.0, -14.0),
        ("MB", Coastal) => BasalAreaCoefficients::new(70.0, -15.0),
        ("MB", Interior) => NA,
        ("PA", Coastal) => NA,
        ("PA", Interior) => BasalAreaCoefficients::new(85.0, -13.5),
        ("PL", Coastal) => BasalAreaCoefficients::new(95.0, -13.0),
        ("PL", Interior) => BasalAreaCoefficients::new(95.0, -13.5),
        ("PW", Coastal) => BasalAreaCoefficients::new(110.0, -12.0),
        ("PW", Interior) => BasalAreaCoefficients::new(100.0, -12.5),
        ("PY", Coastal) => NA,
        ("PY", Interior) => BasalAreaCoefficients::new(85.0, -14.0),
        ("S", Coastal) => BasalAreaCoefficients::new(130.0, -12.0),
        ("S", Interior) => BasalAreaCoefficients::new(115.0, -12.5),
        ("Y", Coastal) => BasalAreaCoefficients::new(120.0, -11.0),
        ("Y", Interior) => NA,
        _ => return None,
    };
    Some(c)
}

/// Trees-per-hectare curve coefficients for an SP0 group and region
///
/// `None` covers both unknown groups and uncalibrated combinations.
#[must_use]
pub fn trees_per_hectare_coefficients(group: &str, region: Region) -> Option<TreesPerHectareCoefficients> {
    use Region::{Coastal, Interior};

    let (p10, p90) = match (group, region) {
        ("AC", Coastal) => ((7.5, 0.5, 0.0), (20.0, 2.0, 0.0)),
        ("AC", Interior) => ((7.2, 0.45, 0.0), (18.5, 1.8, 0.0)),
        ("AT", Interior) => ((7.0, 0.4, 0.0), (16.0, 1.6, -0.005)),
        ("B", Coastal) => ((7.6, 0.42, 0.001), (19.0, 1.9, -0.004)),
        ("B", Interior) => ((7.4, 0.38, 0.001), (17.5, 1.7, -0.004)),
        ("C", Coastal) => ((8.0, 0.5, 0.002), (22.0, 2.2, -0.003)),
        ("C", Interior) => ((7.8, 0.46, 0.002), (20.5, 2.0, -0.003)),
        ("D", Coastal) => ((7.5, 0.55, 0.0), (19.5, 2.1, -0.006)),
        ("D", Interior) => ((7.3, 0.5, 0.0), (18.0, 1.9, -0.006)),
        ("E", Interior) => ((7.0, 0.35, 0.0), (15.0, 1.5, -0.005)),
        ("F", Coastal) => ((7.8, 0.48, 0.002), (21.0, 2.1, -0.003)),
        ("F", Interior) => ((7.5, 0.44, 0.002), (19.5, 1.95, -0.003)),
        ("H", Coastal) => ((7.6, 0.45, 0.002), (18.5, 1.9, -0.004)),
        ("H", Interior) => ((7.4, 0.42, 0.002), (17.5, 1.8, -0.004)),
        ("L", Interior) => ((7.5, 0.46, 0.001), (19.0, 1.9, -0.004)),
        ("MB", Coastal) => ((7.2, 0.45, 0.0), (17.0, 1.7, -0.006)),
        ("PA", Interior) => ((7.2, 0.36, 0.0), (16.5, 1.6, -0.004)),
        ("PL", Coastal) => ((7.4, 0.4, 0.001), (17.0, 1.7, -0.004)),
        ("PL", Interior) => ((7.3, 0.38, 0.001), (16.5, 1.65, -0.004)),
        ("PW", Coastal) => ((7.8, 0.47, 0.002), (20.5, 2.05, -0.003)),
        ("PW", Interior) => ((7.6, 0.44, 0.002), (19.5, 1.95, -0.003)),
        ("PY", Interior) => ((7.6, 0.42, 0.001), (19.0, 1.85, -0.004)),
        ("S", Coastal) => ((7.7, 0.46, 0.002), (20.0, 2.0, -0.003)),
        ("S", Interior) => ((7.5, 0.42, 0.002), (18.5, 1.85, -0.003)),
        ("Y", Coastal) => ((7.8, 0.44, 0.002), (20.0, 1.95, -0.003)),
        _ => return None,
    };

    let curve = |(a0, b0, b1): (f64, f64, f64)| DiameterCurve::new(a0, b0, b1);
    Some(TreesPerHectareCoefficients {
        p10: curve(p10),
        p90: curve(p90),
    })
}
