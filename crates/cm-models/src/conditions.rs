//! Operating conditions and the AHRI 550/590 rating points.

use cm_fluids::FluidState;

/// One grid point or rating point: entering condenser stream, leaving
/// evaporator stream and compressor speed index (0 = full load).
#[derive(Clone, Debug)]
pub struct OperatingConditions {
    pub condenser_inlet: FluidState,
    pub evaporator_outlet: FluidState,
    pub compressor_speed: usize,
}

impl OperatingConditions {
    pub fn new(
        condenser_inlet: FluidState,
        evaporator_outlet: FluidState,
        compressor_speed: usize,
    ) -> Self {
        Self {
            condenser_inlet,
            evaporator_outlet,
            compressor_speed,
        }
    }

    /// Same streams at another compressor speed.
    pub fn at_speed(&self, compressor_speed: usize) -> Self {
        Self {
            compressor_speed,
            ..self.clone()
        }
    }
}

/// AHRI 550/590 standard rating temperatures [°F].
pub mod ahri_550_590 {
    pub const EVAPORATOR_LEAVING_F: f64 = 44.0;
    pub const EVAPORATOR_ENTERING_F: f64 = 54.0;
    pub const CONDENSER_LIQUID_ENTERING_F: f64 = 85.0;
    pub const CONDENSER_LIQUID_LEAVING_F: f64 = 94.3;
    pub const CONDENSER_AIR_ENTERING_F: f64 = 95.0;
    pub const CONDENSER_AIR_RELATIVE_HUMIDITY: f64 = 0.4;
}
