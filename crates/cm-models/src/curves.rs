//! Polynomial performance curves.
//!
//! ```text
//! biquad(x, y)  = c0 + c1 x + c2 x² + c3 y + c4 y² + c5 x y
//! cubic(x)      = c0 + c1 x + c2 x² + c3 x³
//! bicubic(x, y) = c0 + c1 x + c2 x² + c3 y + c4 y² + c5 x y
//!               + c6 x³ + c7 y³ + c8 x² y + c9 x y²
//! ```
//!
//! Temperatures passed to these curves are in °C.

use crate::error::ModelError;

#[inline]
pub fn biquad(c: &[f64; 6], x: f64, y: f64) -> f64 {
    c[0] + c[1] * x + c[2] * x * x + c[3] * y + c[4] * y * y + c[5] * x * y
}

#[inline]
pub fn cubic(c: &[f64; 4], x: f64) -> f64 {
    c[0] + c[1] * x + c[2] * x * x + c[3] * x * x * x
}

#[inline]
pub fn bicubic(c: &[f64; 10], x: f64, y: f64) -> f64 {
    c[0] + c[1] * x
        + c[2] * x * x
        + c[3] * y
        + c[4] * y * y
        + c[5] * x * y
        + c[6] * x * x * x
        + c[7] * y * y * y
        + c[8] * x * x * y
        + c[9] * x * y * y
}

macro_rules! curve_type {
    ($name:ident, $n:literal, $label:literal) => {
        #[derive(Clone, Copy, Debug, PartialEq)]
        pub struct $name(pub [f64; $n]);

        impl $name {
            pub fn coefficients(&self) -> &[f64; $n] {
                &self.0
            }
        }

        impl TryFrom<&[f64]> for $name {
            type Error = ModelError;

            fn try_from(c: &[f64]) -> Result<Self, Self::Error> {
                let arr: [f64; $n] = c.try_into().map_err(|_| ModelError::CurveArity {
                    curve: $label,
                    expected: $n,
                    found: c.len(),
                })?;
                if arr.iter().any(|v| !v.is_finite()) {
                    return Err(ModelError::configuration(concat!(
                        $label,
                        " coefficients must be finite"
                    )));
                }
                Ok(Self(arr))
            }
        }
    };
}

curve_type!(Biquad, 6, "biquad");
curve_type!(Cubic, 4, "cubic");
curve_type!(Bicubic, 10, "bicubic");

impl Biquad {
    /// Constant 1.0.
    pub const UNITY: Biquad = Biquad([1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        biquad(&self.0, x, y)
    }
}

impl Cubic {
    /// Identity `f(x) = x`.
    pub const LINEAR: Cubic = Cubic([0.0, 1.0, 0.0, 0.0]);

    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        cubic(&self.0, x)
    }
}

impl Bicubic {
    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        bicubic(&self.0, x, y)
    }
}
