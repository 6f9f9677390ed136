// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Fundamental structs and the note-to-motion engine.
//!
//! A song arrives as a stream of timestamped MIDI messages. The [timeline]
//! module groups the note events by tick, and the [planner] module walks those
//! groups, assigning up to two sounding notes to the X and Y axes and moving
//! each axis at a speed proportional to its note's pitch. The result is a
//! [gcode::GcodeProgram] that a motion stage can "play."

pub use config::{AxisBounds, MachineConfig, Preamble, StepsPerUnit};
pub use error::{Error, Result};

/// The [bounds] module describes inclusive travel ranges.
pub mod bounds;
/// The [config] module holds the machine description used for planning.
pub mod config;
/// The [error] module lists everything that can go wrong during a conversion.
pub mod error;
/// The [gcode] module knows how to spell motion-control instructions.
pub mod gcode;
/// The [kinematics] module turns pitch and elapsed time into distance and speed.
pub mod kinematics;
/// The [midi] module knows about [MIDI](https://en.wikipedia.org/wiki/MIDI).
pub mod midi;
/// The [planner] module is the stateful note-to-motion translator.
pub mod planner;
/// The [time] module handles musical time.
pub mod time;
/// The [timeline] module groups note events by the tick they happen on.
pub mod timeline;

use strum_macros::{Display, EnumIter};

/// A spatial axis of the motion stage. Only [Axis::X] and [Axis::Y] are driven
/// by notes; [Axis::Z] stays at a fixed height.
#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq)]
pub enum Axis {
    X,
    Y,
    Z,
}
impl Axis {
    /// The axes that notes can be assigned to, in assignment order.
    pub const DRIVEN: [Axis; 2] = [Axis::X, Axis::Y];
}
