//! Discrete compressor staging.
//!
//! Speed index 0 is full load and higher indices unload the compressor.
//! Indices `0..=minimum_speed` interpolate linearly between 1.0 and the
//! minimum unloading ratio. When the minimum part-load ratio is below the
//! minimum unloading ratio an extra hot-gas-bypass stage follows, running at
//! the minimum part-load ratio.

use crate::error::{ModelError, ModelResult};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StagingPolicy {
    stages: usize,
    minimum_part_load_ratio: f64,
    minimum_unloading_ratio: f64,
}

impl StagingPolicy {
    /// `stages` overrides the derived count (5 with a bypass stage, else 4).
    pub fn new(
        minimum_part_load_ratio: f64,
        minimum_unloading_ratio: f64,
        stages: Option<usize>,
    ) -> ModelResult<Self> {
        for (value, what) in [
            (minimum_part_load_ratio, "minimum part-load ratio"),
            (minimum_unloading_ratio, "minimum unloading ratio"),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(ModelError::configuration(format!(
                    "{what} must lie in (0, 1], got {value}"
                )));
            }
        }
        if minimum_unloading_ratio < minimum_part_load_ratio {
            return Err(ModelError::InvalidStaging {
                minimum_part_load_ratio,
                minimum_unloading_ratio,
            });
        }

        let has_bypass = minimum_unloading_ratio > minimum_part_load_ratio;
        let minimum = if has_bypass { 3 } else { 2 };
        let stages = match stages {
            Some(n) if n < minimum => return Err(ModelError::StageCount { stages: n, minimum }),
            Some(n) => n,
            None if has_bypass => 5,
            None => 4,
        };

        Ok(Self {
            stages,
            minimum_part_load_ratio,
            minimum_unloading_ratio,
        })
    }

    pub fn stages(&self) -> usize {
        self.stages
    }

    pub fn minimum_part_load_ratio(&self) -> f64 {
        self.minimum_part_load_ratio
    }

    pub fn minimum_unloading_ratio(&self) -> f64 {
        self.minimum_unloading_ratio
    }

    pub fn has_bypass_stage(&self) -> bool {
        self.minimum_part_load_ratio < self.minimum_unloading_ratio
    }

    /// Highest speed index that still runs without bypass.
    pub fn minimum_speed(&self) -> usize {
        if self.has_bypass_stage() {
            self.stages - 2
        } else {
            self.stages - 1
        }
    }

    pub fn part_load_ratio(&self, speed: usize) -> ModelResult<f64> {
        if speed >= self.stages {
            return Err(ModelError::InvalidSpeed {
                speed,
                stages: self.stages,
            });
        }
        let minimum_speed = self.minimum_speed();
        if speed > minimum_speed {
            return Ok(self.minimum_part_load_ratio);
        }
        let unloading = self.minimum_unloading_ratio;
        Ok(unloading
            + (1.0 - unloading) * (minimum_speed - speed) as f64 / minimum_speed as f64)
    }

    /// Part-load ratio clamped to the minimum unloading ratio; the ratio
    /// the EIR part-load curves are evaluated at.
    pub fn effective_part_load_ratio(&self, speed: usize) -> ModelResult<f64> {
        Ok(self
            .part_load_ratio(speed)?
            .max(self.minimum_unloading_ratio))
    }

    /// `(sequence_number, speed)` pairs in map order: sequence 1 is the
    /// lowest-capacity stage, sequence N is full load.
    pub fn sequence(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..=self.stages).map(move |n| (n, self.stages - n))
    }
}
