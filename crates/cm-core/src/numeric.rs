use crate::CmError;

/// Scalar type for every SI value in the engine.
pub type Real = f64;

/// Absolute and relative bounds for treating two SI values as the same
/// rating input (temperatures in K, flows in m³/s).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Largest difference accepted between `a` and `b`.
    pub fn bound(&self, a: Real, b: Real) -> Real {
        self.abs.max(self.rel * a.abs().max(b.abs()))
    }
}

/// `a` and `b` differ by no more than `tol.bound(a, b)`. NaN is never equal.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    (a - b).abs() <= tol.bound(a, b)
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CmError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CmError::NonFinite { what, value: v })
    }
}

/// `n` evenly spaced samples from `start` to `end`, both included.
///
/// The last sample is exactly `end` (no accumulated rounding), so grid
/// axes built from rated limits reproduce those limits bit-for-bit.
pub fn linspace(start: Real, end: Real, n: usize) -> Result<Vec<Real>, CmError> {
    ensure_finite(start, "linspace start")?;
    ensure_finite(end, "linspace end")?;
    match n {
        0 => Err(CmError::InvalidArg {
            what: "linspace requires at least one sample",
        }),
        1 => Ok(vec![start]),
        _ => {
            let step = (end - start) / (n - 1) as Real;
            let mut values: Vec<Real> = (0..n - 1).map(|i| start + step * i as Real).collect();
            values.push(end);
            Ok(values)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rating_temperatures_compare_relative_to_kelvin() {
        let tol = Tolerances::default();
        // 44 °F twice through different conversions
        assert!(nearly_equal(279.8167, 279.8167 + 1e-8, tol));
        assert!(!nearly_equal(279.8167, 279.8167 + 1e-3, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(Real::NAN, Real::NAN, tol));
        assert_eq!(tol.bound(0.0, 0.0), tol.abs);
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn linspace_hits_endpoints() {
        let v = linspace(3.9, 15.6, 4).unwrap();
        assert_eq!(v.len(), 4);
        assert_eq!(v[0], 3.9);
        assert_eq!(v[3], 15.6);
        assert!((v[1] - 7.8).abs() < 1e-12);
    }

    #[test]
    fn linspace_single_and_empty() {
        assert_eq!(linspace(2.0, 5.0, 1).unwrap(), vec![2.0]);
        assert!(linspace(2.0, 5.0, 0).is_err());
        assert!(linspace(Real::NAN, 5.0, 3).is_err());
    }

    proptest! {
        #[test]
        fn linspace_is_monotonic(start in -100.0..100.0f64, span in 0.1..50.0f64, n in 2usize..20) {
            let v = linspace(start, start + span, n).unwrap();
            prop_assert_eq!(v.len(), n);
            for w in v.windows(2) {
                prop_assert!(w[1] > w[0]);
            }
        }
    }
}
