// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Plays a song on a motion stage. A Standard MIDI File goes in, and a G-code
//! program comes out in which each of the X and Y axes moves at a speed
//! proportional to the pitch of the note it's playing.
//!
//! [Converter] runs the whole pipeline: read, group, plan, write.

pub use crate::converter::Converter;
pub use crate::helpers::IOHelper;
pub use motorsong_core::{
    gcode::{GcodeProgram, Instruction},
    MachineConfig,
};
pub use motorsong_settings::MachineSettings;

pub(crate) mod converter;
pub(crate) mod helpers;

