// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::{bounds::Bounds, Axis, Error, Result};
use strum::IntoEnumIterator;

/// Travel ranges for each axis of the machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisBounds {
    pub x: Bounds,
    pub y: Bounds,
    pub z: Bounds,
}
impl AxisBounds {
    pub fn get(&self, axis: Axis) -> &Bounds {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

/// Motor calibration for each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepsPerUnit {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}
impl StepsPerUnit {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// The fixed instructions that get the machine ready before the song starts:
/// home, lift to a safe height, and offset the origin. The travel to the start
/// position that follows is derived from the bounds and margin, see
/// [MachineConfig::start_position].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preamble {
    pub safe_height: f64,
    pub safe_height_feed: f64,
    pub origin_offset_x: f64,
    pub origin_offset_y: f64,
}
impl Default for Preamble {
    fn default() -> Self {
        Self {
            safe_height: 10.0,
            safe_height_feed: 5000.0,
            origin_offset_x: -52.0,
            origin_offset_y: -30.0,
        }
    }
}

/// Everything the planner needs to know about the machine. Built once, never
/// changed during a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MachineConfig {
    pub bounds: AxisBounds,
    pub steps_per_unit: StepsPerUnit,

    /// Inset from each end of an axis's bounds. Travel reverses when it would
    /// cross into the margin.
    pub safety_margin: f64,

    /// Multiplier from elapsed ticks to the dwell instruction's duration.
    pub dwell_scale: f64,

    pub preamble: Preamble,
}
impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            bounds: AxisBounds {
                x: Bounds::from_raw(0.0, 190.0),
                y: Bounds::from_raw(0.0, 190.0),
                z: Bounds::from_raw(0.0, 100.0),
            },
            steps_per_unit: StepsPerUnit {
                x: 160.0,
                y: 160.0,
                z: 8000.0,
            },
            safety_margin: 10.0,
            dwell_scale: Self::DEFAULT_DWELL_SCALE,
            preamble: Preamble::default(),
        }
    }
}
impl MachineConfig {
    pub const DEFAULT_DWELL_SCALE: f64 = 10.0;

    /// Checks that the planner can work with this configuration.
    pub fn validate(&self) -> Result<()> {
        if self.safety_margin.is_nan() || self.safety_margin < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "safety margin must not be negative (got {})",
                self.safety_margin
            )));
        }
        for axis in Axis::DRIVEN {
            self.envelope(axis)?;
        }
        for axis in Axis::iter() {
            let steps = self.steps_per_unit.get(axis);
            if steps.is_nan() || steps <= 0.0 {
                return Err(Error::InvalidConfiguration(format!(
                    "steps per unit for axis {axis} must be positive (got {steps})"
                )));
            }
        }
        if !self.dwell_scale.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "dwell scale must be finite (got {})",
                self.dwell_scale
            )));
        }
        Ok(())
    }

    /// The part of an axis's travel the planner is allowed to use.
    pub fn envelope(&self, axis: Axis) -> Result<Bounds> {
        self.bounds.get(axis).inset(self.safety_margin)
    }

    /// Where an axis sits when the song begins. The preamble travels here, and
    /// the planner starts counting from here.
    pub fn start_position(&self, axis: Axis) -> f64 {
        self.bounds.get(axis).min() + self.safety_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_machine() {
        let config = MachineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bounds.x.max(), 190.0);
        assert_eq!(config.bounds.y.max(), 190.0);
        assert_eq!(config.bounds.z.max(), 100.0);
        assert_eq!(config.steps_per_unit.get(Axis::Z), 8000.0);
        assert_eq!(config.safety_margin, 10.0);
        assert_eq!(config.dwell_scale, MachineConfig::DEFAULT_DWELL_SCALE);
        assert_eq!(config.start_position(Axis::X), 10.0);
        assert_eq!(config.start_position(Axis::Y), 10.0);

        let envelope = config.envelope(Axis::X).unwrap();
        assert_eq!(envelope.min(), 10.0);
        assert_eq!(envelope.max(), 180.0);
    }

    #[test]
    fn validate_catches_bad_values() {
        let mut config = MachineConfig::default();
        config.steps_per_unit.y = 0.0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));

        let mut config = MachineConfig::default();
        config.safety_margin = 100.0;
        assert!(
            config.validate().is_err(),
            "a margin that swallows the whole axis should be rejected"
        );

        let mut config = MachineConfig::default();
        config.safety_margin = -1.0;
        assert!(config.validate().is_err());

        let mut config = MachineConfig::default();
        config.dwell_scale = f64::INFINITY;
        assert!(config.validate().is_err());
    }
}
