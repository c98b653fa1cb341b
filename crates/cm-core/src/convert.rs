//! String-labelled unit conversion.
//!
//! Project files carry quantities as `{ value, unit }` pairs and the curve
//! fits are expressed in °C, so the rest of the workspace converts through
//! [`convert`] rather than hard-coding factors at each call site.
//!
//! Every unit is described by its dimension plus an affine map to the SI base
//! unit: `si = value * scale + offset`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Incompatible units: cannot convert {from} to {to}")]
    IncompatibleUnits { from: String, to: String },

    #[error("Non-finite value for conversion: {0}")]
    NonFinite(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dimension {
    Temperature,
    TemperatureDifference,
    Pressure,
    Power,
    VolumeRate,
    MassRate,
    Density,
    SpecificEnergy,
    SpecificHeat,
    EnergyEfficiency,
    InverseEfficiency,
    Dimensionless,
}

#[derive(Clone, Copy, Debug)]
struct UnitDef {
    dimension: Dimension,
    scale: f64,
    offset: f64,
}

const fn linear(dimension: Dimension, scale: f64) -> UnitDef {
    UnitDef {
        dimension,
        scale,
        offset: 0.0,
    }
}

const BTU_PER_HOUR_W: f64 = 0.293_071_070_172_222_2;
const TON_REF_W: f64 = crate::units::constants::TON_REF_W;

fn lookup(unit: &str) -> Option<UnitDef> {
    use Dimension::*;
    let def = match unit.trim() {
        "K" => linear(Temperature, 1.0),
        "°C" | "degC" | "C" => UnitDef {
            dimension: Temperature,
            scale: 1.0,
            offset: 273.15,
        },
        "°F" | "degF" | "F" => UnitDef {
            dimension: Temperature,
            scale: 5.0 / 9.0,
            offset: 273.15 - 32.0 * 5.0 / 9.0,
        },
        "°R" | "degR" | "R" => linear(Temperature, 5.0 / 9.0),
        "delta_K" | "ΔK" | "delta_degC" | "ΔC" => linear(TemperatureDifference, 1.0),
        "delta_degF" | "ΔF" | "delta_degR" => linear(TemperatureDifference, 5.0 / 9.0),

        "Pa" => linear(Pressure, 1.0),
        "kPa" => linear(Pressure, 1e3),
        "MPa" => linear(Pressure, 1e6),
        "bar" => linear(Pressure, 1e5),
        "atm" => linear(Pressure, crate::units::constants::STANDARD_ATMOSPHERE_PA),
        "psi" => linear(Pressure, 6_894.757_293_168_361),
        "inHg" => linear(Pressure, 3_386.389),

        "W" => linear(Power, 1.0),
        "kW" => linear(Power, 1e3),
        "MW" => linear(Power, 1e6),
        "ton_ref" | "ton" => linear(Power, TON_REF_W),
        "Btu/h" | "Btu/hr" => linear(Power, BTU_PER_HOUR_W),
        "MBtu/h" => linear(Power, 1e3 * BTU_PER_HOUR_W),

        "m3/s" | "m^3/s" => linear(VolumeRate, 1.0),
        "m3/h" | "m^3/h" => linear(VolumeRate, 1.0 / 3_600.0),
        "L/s" => linear(VolumeRate, 1e-3),
        "gpm" | "gal/min" => linear(VolumeRate, 6.309_019_64e-5),
        "cfm" | "ft3/min" => linear(VolumeRate, 4.719_474_432e-4),

        "kg/s" => linear(MassRate, 1.0),
        "kg/h" => linear(MassRate, 1.0 / 3_600.0),
        "lb/h" | "lb/hr" => linear(MassRate, 0.453_592_37 / 3_600.0),

        "kg/m3" | "kg/m^3" => linear(Density, 1.0),
        "lb/ft3" | "lb/ft^3" => linear(Density, 16.018_463_373_960_14),

        "J/kg" => linear(SpecificEnergy, 1.0),
        "kJ/kg" => linear(SpecificEnergy, 1e3),
        "Btu/lb" => linear(SpecificEnergy, 2_326.0),

        "J/kg/K" | "J/(kg*K)" | "J/(kg-K)" => linear(SpecificHeat, 1.0),
        "kJ/kg/K" | "kJ/(kg*K)" | "kJ/(kg-K)" => linear(SpecificHeat, 1e3),

        "W/W" => linear(EnergyEfficiency, 1.0),
        "Btu/(W*h)" | "Btu/Wh" => linear(EnergyEfficiency, BTU_PER_HOUR_W),

        "kW/ton_ref" | "kW/ton" => linear(InverseEfficiency, 1e3 / TON_REF_W),

        "-" | "ratio" | "fraction" | "" => linear(Dimensionless, 1.0),
        "%" => linear(Dimensionless, 0.01),

        _ => return None,
    };
    Some(def)
}

/// Convert `value` expressed in `from` into `to`.
///
/// ```
/// let c = cm_core::convert(85.0, "°F", "°C").unwrap();
/// assert!((c - 29.444_444).abs() < 1e-5);
/// ```
pub fn convert(value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    if !value.is_finite() {
        return Err(UnitError::NonFinite(value));
    }
    let src = lookup(from).ok_or_else(|| UnitError::UnknownUnit(from.to_string()))?;
    let dst = lookup(to).ok_or_else(|| UnitError::UnknownUnit(to.to_string()))?;
    if src.dimension != dst.dimension {
        return Err(UnitError::IncompatibleUnits {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    let si = value * src.scale + src.offset;
    Ok((si - dst.offset) / dst.scale)
}

/// Convert into the SI base unit of `from`'s dimension.
pub fn to_si(value: f64, from: &str) -> Result<f64, UnitError> {
    if !value.is_finite() {
        return Err(UnitError::NonFinite(value));
    }
    let src = lookup(from).ok_or_else(|| UnitError::UnknownUnit(from.to_string()))?;
    Ok(value * src.scale + src.offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn ahri_temperatures() {
        assert_relative_eq!(convert(44.0, "°F", "°C").unwrap(), 6.666_666_7, epsilon = 1e-6);
        assert_relative_eq!(convert(85.0, "°F", "K").unwrap(), 302.594_444_4, epsilon = 1e-6);
        assert_relative_eq!(convert(0.0, "°C", "°F").unwrap(), 32.0, epsilon = 1e-12);
    }

    #[test]
    fn refrigeration_tons() {
        assert_relative_eq!(convert(100.0, "ton_ref", "kW").unwrap(), 351.685_284_2, epsilon = 1e-6);
        assert_relative_eq!(convert(12_000.0, "Btu/h", "ton_ref").unwrap(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(convert(15.0, "kPa", "Pa").unwrap(), 15_000.0);
        assert_relative_eq!(convert(18.0, "delta_degF", "delta_K").unwrap(), 10.0, epsilon = 1e-12);
        assert!(convert(10.0, "delta_K", "K").is_err());
    }

    #[test]
    fn efficiency_units() {
        // COP 2.0 ~ 1.758 kW/ton
        let kw_per_ton = 1.0 / 2.0;
        let si = to_si(1.758_426, "kW/ton_ref").unwrap();
        assert_relative_eq!(si, kw_per_ton, epsilon = 1e-5);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(convert(1.0, "furlong", "m"), Err(UnitError::UnknownUnit(_))));
        assert!(matches!(
            convert(1.0, "kW", "°C"),
            Err(UnitError::IncompatibleUnits { .. })
        ));
        assert!(matches!(convert(f64::NAN, "kW", "W"), Err(UnitError::NonFinite(_))));
    }

    proptest! {
        #[test]
        fn round_trip(v in -500.0..500.0f64) {
            let f = convert(v, "°C", "°F").unwrap();
            let back = convert(f, "°F", "°C").unwrap();
            prop_assert!((back - v).abs() < 1e-9);
        }
    }
}
