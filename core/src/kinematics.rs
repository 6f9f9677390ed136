// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::{midi::MidiUtils, time::MidiTicks, Axis, MachineConfig};

/// Commanded speed for an axis playing `pitch`. The note's frequency, in
/// cycles per second, becomes a per-minute rate scaled down by the axis's
/// steps-per-unit calibration, so the stepper motor turns at the note's pitch.
pub fn feed_rate(pitch: u8, axis: Axis, config: &MachineConfig) -> f64 {
    MidiUtils::note_to_frequency(pitch) * 60.0 / config.steps_per_unit.get(axis)
}

/// How far an axis playing `pitch` travels over `elapsed`. This is always
/// non-negative; the caller applies the direction of travel.
pub fn distance(elapsed: MidiTicks, pitch: u8) -> f64 {
    MidiUtils::note_to_frequency(pitch) / 60.0 * elapsed.as_f64()
}
