// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The `motorsong-settings` crate manages serialization of machine
//! descriptions. Keeping these serialized structs separate from
//! [MachineConfig] lets the file format stay stable while the engine's
//! structs change. Every field is optional; anything missing takes the
//! reference machine's value.

use anyhow::{Context, Result};
use motorsong_core::{bounds::Bounds, AxisBounds, MachineConfig, Preamble, StepsPerUnit};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RangeSettings {
    pub min: f64,
    pub max: f64,
}
impl RangeSettings {
    fn into_bounds(self) -> Result<Bounds> {
        Ok(Bounds::new_with(self.min, self.max)?)
    }
}
impl From<&Bounds> for RangeSettings {
    fn from(value: &Bounds) -> Self {
        Self {
            min: value.min(),
            max: value.max(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildVolumeSettings {
    pub x: RangeSettings,
    pub y: RangeSettings,
    pub z: RangeSettings,
}
impl Default for BuildVolumeSettings {
    fn default() -> Self {
        Self::from(&MachineConfig::default().bounds)
    }
}
impl From<&AxisBounds> for BuildVolumeSettings {
    fn from(value: &AxisBounds) -> Self {
        Self {
            x: RangeSettings::from(&value.x),
            y: RangeSettings::from(&value.y),
            z: RangeSettings::from(&value.z),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StepsPerUnitSettings {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}
impl Default for StepsPerUnitSettings {
    fn default() -> Self {
        let steps = MachineConfig::default().steps_per_unit;
        Self {
            x: steps.x,
            y: steps.y,
            z: steps.z,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PreambleSettings {
    /// Height the head lifts to before the song starts
    pub safe_height: f64,

    /// Feed rate for that lift
    pub safe_height_feed: f64,

    /// Coordinates assigned to the homed position
    pub origin_offset: [f64; 2],
}
impl Default for PreambleSettings {
    fn default() -> Self {
        let p = Preamble::default();
        Self {
            safe_height: p.safe_height,
            safe_height_feed: p.safe_height_feed,
            origin_offset: [p.origin_offset_x, p.origin_offset_y],
        }
    }
}
#[allow(clippy::from_over_into)]
impl Into<Preamble> for PreambleSettings {
    fn into(self) -> Preamble {
        Preamble {
            safe_height: self.safe_height,
            safe_height_feed: self.safe_height_feed,
            origin_offset_x: self.origin_offset[0],
            origin_offset_y: self.origin_offset[1],
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MachineSettings {
    /// Physical travel range of each axis
    pub build_volume: BuildVolumeSettings,

    /// Motor calibration of each axis
    pub steps_per_unit: StepsPerUnitSettings,

    /// Inset from each end of the X and Y travel ranges
    pub safety_margin: f64,

    /// Multiplier from elapsed MIDI ticks to dwell duration
    pub dwell_scale: f64,

    /// Setup that runs before the song
    pub preamble: PreambleSettings,
}
impl Default for MachineSettings {
    fn default() -> Self {
        Self::from(&MachineConfig::default())
    }
}
impl From<&MachineConfig> for MachineSettings {
    fn from(value: &MachineConfig) -> Self {
        let p = &value.preamble;
        Self {
            build_volume: BuildVolumeSettings::from(&value.bounds),
            steps_per_unit: StepsPerUnitSettings {
                x: value.steps_per_unit.x,
                y: value.steps_per_unit.y,
                z: value.steps_per_unit.z,
            },
            safety_margin: value.safety_margin,
            dwell_scale: value.dwell_scale,
            preamble: PreambleSettings {
                safe_height: p.safe_height,
                safe_height_feed: p.safe_height_feed,
                origin_offset: [p.origin_offset_x, p.origin_offset_y],
            },
        }
    }
}

impl MachineSettings {
    pub fn new_from_yaml_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("couldn't read settings file {}", path.display()))?;
        Self::new_from_yaml(&yaml)
            .with_context(|| format!("couldn't parse settings file {}", path.display()))
    }

    pub fn new_from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Builds the engine's view of the machine, failing if the values don't
    /// describe a machine that can be planned against.
    pub fn into_config(&self) -> Result<MachineConfig> {
        let config = MachineConfig {
            bounds: AxisBounds {
                x: self.build_volume.x.into_bounds().context("X bounds")?,
                y: self.build_volume.y.into_bounds().context("Y bounds")?,
                z: self.build_volume.z.into_bounds().context("Z bounds")?,
            },
            steps_per_unit: StepsPerUnit {
                x: self.steps_per_unit.x,
                y: self.steps_per_unit.y,
                z: self.steps_per_unit.z,
            },
            safety_margin: self.safety_margin,
            dwell_scale: self.dwell_scale,
            preamble: self.preamble.into(),
        };
        config.validate()?;
        Ok(config)
    }
}
