//! Moist-air relations (ASHRAE Handbook Fundamentals, chapter 1, SI).
//!
//! Plain-`f64` functions: dry-bulb, wet-bulb and dew-point temperatures in °C,
//! pressures in Pa, humidity ratio in kg water / kg dry air, relative
//! humidity as a fraction, enthalpy in J/kg dry air.

use crate::error::{FluidError, FluidResult};
use tracing::warn;

/// Ratio of the molecular masses of water vapour and dry air.
const MOLAR_MASS_RATIO: f64 = 0.621_945;

/// Lower bound applied to humidity ratios to keep logarithms finite.
pub const MIN_HUMIDITY_RATIO: f64 = 1e-7;

/// Triple point of water [°C]; switch between ice and liquid saturation.
const TRIPLE_POINT_C: f64 = 0.01;

const T_MIN_C: f64 = -100.0;
const T_MAX_C: f64 = 200.0;

const MAX_ITER: usize = 100;
const TEMPERATURE_TOL_C: f64 = 0.001;

/// Dry-air gas constant [J/(kg·K)].
const R_DA: f64 = 287.042;

fn check_temperature(t_c: f64) -> FluidResult<()> {
    if !t_c.is_finite() || !(T_MIN_C..=T_MAX_C).contains(&t_c) {
        return Err(FluidError::OutOfRange {
            what: "moist-air temperature (-100-200 °C)",
        });
    }
    Ok(())
}

fn check_pressure(p: f64) -> FluidResult<()> {
    if !p.is_finite() || p <= 0.0 {
        return Err(FluidError::NonPhysical {
            what: "pressure must be positive and finite",
        });
    }
    Ok(())
}

fn check_humidity_ratio(w: f64) -> FluidResult<()> {
    if !w.is_finite() || w < 0.0 {
        return Err(FluidError::NonPhysical {
            what: "humidity ratio must be non-negative and finite",
        });
    }
    Ok(())
}

/// Saturation vapour pressure [Pa] over ice (below the triple point) or
/// liquid water (Hyland & Wexler 1983).
pub fn saturation_vapor_pressure(t_c: f64) -> FluidResult<f64> {
    check_temperature(t_c)?;
    let t = t_c + 273.15;
    let ln_pws = if t_c < TRIPLE_POINT_C {
        -5.674_535_9e3 / t + 6.392_524_7 - 9.677_843e-3 * t + 6.221_570_1e-7 * t * t
            + 2.074_782_5e-9 * t.powi(3)
            - 9.484_024e-13 * t.powi(4)
            + 4.163_501_9 * t.ln()
    } else {
        -5.800_220_6e3 / t + 1.391_499_3 - 4.864_023_9e-2 * t + 4.176_476_8e-5 * t * t
            - 1.445_209_3e-8 * t.powi(3)
            + 6.545_967_3 * t.ln()
    };
    Ok(ln_pws.exp())
}

pub fn humidity_ratio_from_vapor_pressure(pw: f64, p: f64) -> FluidResult<f64> {
    check_pressure(p)?;
    if !pw.is_finite() || pw < 0.0 || pw >= p {
        return Err(FluidError::OutOfRange {
            what: "vapour pressure must lie in [0, total pressure)",
        });
    }
    Ok((MOLAR_MASS_RATIO * pw / (p - pw)).max(MIN_HUMIDITY_RATIO))
}

pub fn vapor_pressure_from_humidity_ratio(w: f64, p: f64) -> FluidResult<f64> {
    check_humidity_ratio(w)?;
    check_pressure(p)?;
    let w = w.max(MIN_HUMIDITY_RATIO);
    Ok(p * w / (MOLAR_MASS_RATIO + w))
}

/// Humidity ratio of saturated air at `t_c`.
pub fn saturation_humidity_ratio(t_c: f64, p: f64) -> FluidResult<f64> {
    let pws = saturation_vapor_pressure(t_c)?;
    humidity_ratio_from_vapor_pressure(pws, p)
}

pub fn humidity_ratio_from_wet_bulb(t_db: f64, t_wb: f64, p: f64) -> FluidResult<f64> {
    check_temperature(t_db)?;
    if t_wb > t_db {
        return Err(FluidError::InvalidArg {
            what: "wet-bulb temperature above dry-bulb temperature",
        });
    }
    let ws_star = saturation_humidity_ratio(t_wb, p)?;
    let w = if t_wb >= 0.0 {
        ((2_501.0 - 2.326 * t_wb) * ws_star - 1.006 * (t_db - t_wb))
            / (2_501.0 + 1.86 * t_db - 4.186 * t_wb)
    } else {
        ((2_830.0 - 0.24 * t_wb) * ws_star - 1.006 * (t_db - t_wb))
            / (2_830.0 + 1.86 * t_db - 2.1 * t_wb)
    };
    Ok(w.max(MIN_HUMIDITY_RATIO))
}

pub fn humidity_ratio_from_relative_humidity(t_db: f64, rh: f64, p: f64) -> FluidResult<f64> {
    if !rh.is_finite() || !(0.0..=1.0).contains(&rh) {
        return Err(FluidError::OutOfRange {
            what: "relative humidity must lie in [0, 1]",
        });
    }
    let pw = rh * saturation_vapor_pressure(t_db)?;
    humidity_ratio_from_vapor_pressure(pw, p)
}

pub fn humidity_ratio_from_enthalpy(h: f64, t_db: f64) -> FluidResult<f64> {
    check_temperature(t_db)?;
    if !h.is_finite() {
        return Err(FluidError::NonPhysical {
            what: "enthalpy must be finite",
        });
    }
    let w = (h / 1_000.0 - 1.006 * t_db) / (2_501.0 + 1.86 * t_db);
    Ok(w.max(MIN_HUMIDITY_RATIO))
}

pub fn relative_humidity_from_humidity_ratio(t_db: f64, w: f64, p: f64) -> FluidResult<f64> {
    let pw = vapor_pressure_from_humidity_ratio(w, p)?;
    Ok(pw / saturation_vapor_pressure(t_db)?)
}

/// Dew-point temperature [°C] by bisection on the saturation curve.
pub fn dew_point_from_humidity_ratio(t_db: f64, w: f64, p: f64) -> FluidResult<f64> {
    let pw = vapor_pressure_from_humidity_ratio(w, p)?;
    if pw > saturation_vapor_pressure(t_db)? * (1.0 + 1e-9) {
        return Err(FluidError::OutOfRange {
            what: "humidity ratio above saturation",
        });
    }
    let (mut lo, mut hi) = (T_MIN_C, t_db);
    for _ in 0..MAX_ITER {
        let mid = 0.5 * (lo + hi);
        if saturation_vapor_pressure(mid)? > pw {
            hi = mid;
        } else {
            lo = mid;
        }
        if hi - lo < TEMPERATURE_TOL_C {
            return Ok(0.5 * (lo + hi));
        }
    }
    Err(FluidError::ConvergenceFailed { what: "dew point" })
}

/// Wet-bulb temperature [°C] by bisection between dew point and dry-bulb.
pub fn wet_bulb_from_humidity_ratio(t_db: f64, w: f64, p: f64) -> FluidResult<f64> {
    let mut lo = dew_point_from_humidity_ratio(t_db, w, p)?;
    let mut hi = t_db;
    let mut t_wb = 0.5 * (lo + hi);
    for _ in 0..MAX_ITER {
        if hi - lo <= TEMPERATURE_TOL_C {
            return Ok(t_wb);
        }
        if humidity_ratio_from_wet_bulb(t_db, t_wb, p)? > w {
            hi = t_wb;
        } else {
            lo = t_wb;
        }
        t_wb = 0.5 * (lo + hi);
    }
    warn!(t_db, w, p, bracket = hi - lo, "wet-bulb bisection did not converge");
    Err(FluidError::ConvergenceFailed { what: "wet bulb" })
}

/// Moist-air enthalpy [J/kg dry air].
pub fn moist_air_enthalpy(t_db: f64, w: f64) -> FluidResult<f64> {
    check_temperature(t_db)?;
    check_humidity_ratio(w)?;
    Ok((1.006 * t_db + w * (2_501.0 + 1.86 * t_db)) * 1_000.0)
}

/// Specific volume [m³/kg dry air].
pub fn moist_air_specific_volume(t_db: f64, w: f64, p: f64) -> FluidResult<f64> {
    check_temperature(t_db)?;
    check_humidity_ratio(w)?;
    check_pressure(p)?;
    let w = w.max(MIN_HUMIDITY_RATIO);
    Ok(R_DA * (t_db + 273.15) * (1.0 + 1.607_858 * w) / p)
}

/// Moist-air density [kg moist air/m³].
pub fn moist_air_density(t_db: f64, w: f64, p: f64) -> FluidResult<f64> {
    let v = moist_air_specific_volume(t_db, w, p)?;
    Ok((1.0 + w.max(MIN_HUMIDITY_RATIO)) / v)
}
