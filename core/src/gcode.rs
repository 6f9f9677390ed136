// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::{Axis, MachineConfig, Result};
use std::{
    fmt::Display,
    io::{BufWriter, Write},
};

/// One motion-control command. [Display] spells it the way the firmware
/// expects, without a line terminator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Instruction {
    /// Home all axes.
    Home,

    /// Raise the head to height `z` at a fixed feed rate.
    Lift { z: f64, feed: f64 },

    /// Declare the current position to be (`x`, `y`).
    SetOrigin { x: f64, y: f64 },

    /// Rapid travel to (`x`, `y`).
    Travel { x: f64, y: f64 },

    /// A note-driven linear move. At least one of `x` and `y` is present.
    Move {
        x: Option<f64>,
        y: Option<f64>,
        feed: f64,
    },

    /// Pause without moving.
    Dwell { duration: f64 },
}
impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Home => write!(f, "G28"),
            Instruction::Lift { z, feed } => write!(f, "G1 Z{z} F{feed}"),
            Instruction::SetOrigin { x, y } => write!(f, "G92 X{x} Y{y}"),
            Instruction::Travel { x, y } => write!(f, "G0 X{x} Y{y}"),
            Instruction::Move { x, y, feed } => {
                write!(f, "G1")?;
                if let Some(x) = x {
                    write!(f, " X{x:.10}")?;
                }
                if let Some(y) = y {
                    write!(f, " Y{y:.10}")?;
                }
                write!(f, " F{feed:.10}")
            }
            Instruction::Dwell { duration } => write!(f, "G4 P{duration:.4}"),
        }
    }
}

/// The ordered output of a conversion. Instructions are only ever appended.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GcodeProgram {
    instructions: Vec<Instruction>,
}
impl GcodeProgram {
    /// The four setup instructions that precede every song.
    pub fn preamble(config: &MachineConfig) -> [Instruction; 4] {
        let p = &config.preamble;
        [
            Instruction::Home,
            Instruction::Lift {
                z: p.safe_height,
                feed: p.safe_height_feed,
            },
            Instruction::SetOrigin {
                x: p.origin_offset_x,
                y: p.origin_offset_y,
            },
            Instruction::Travel {
                x: config.start_position(Axis::X),
                y: config.start_position(Axis::Y),
            },
        ]
    }

    /// Returns a program that already holds the preamble.
    pub fn new_with_preamble(config: &MachineConfig) -> Self {
        let mut r = Self::default();
        for instruction in Self::preamble(config) {
            r.push(instruction);
        }
        r
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.instructions.iter().map(|i| i.to_string())
    }

    /// Writes one instruction per line. Everything is flushed before this
    /// returns.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        for instruction in &self.instructions {
            writeln!(writer, "{instruction}")?;
        }
        writer.flush()?;
        Ok(())
    }
}
impl<'a> IntoIterator for &'a GcodeProgram {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_spelling() {
        assert_eq!(Instruction::Home.to_string(), "G28");
        assert_eq!(
            Instruction::Lift {
                z: 10.0,
                feed: 5000.0
            }
            .to_string(),
            "G1 Z10 F5000"
        );
        assert_eq!(
            Instruction::SetOrigin { x: -52.0, y: -30.0 }.to_string(),
            "G92 X-52 Y-30"
        );
        assert_eq!(
            Instruction::Travel { x: 10.0, y: 10.0 }.to_string(),
            "G0 X10 Y10"
        );
        assert_eq!(
            Instruction::Move {
                x: Some(12.5),
                y: Some(-3.25),
                feed: 165.0
            }
            .to_string(),
            "G1 X12.5000000000 Y-3.2500000000 F165.0000000000"
        );
        assert_eq!(
            Instruction::Move {
                x: None,
                y: Some(1.0),
                feed: 2.0
            }
            .to_string(),
            "G1 Y1.0000000000 F2.0000000000"
        );
        assert_eq!(
            Instruction::Dwell { duration: 4800.0 }.to_string(),
            "G4 P4800.0000"
        );
    }

    #[test]
    fn preamble_is_four_setup_lines() {
        let program = GcodeProgram::new_with_preamble(&MachineConfig::default());
        assert_eq!(
            program.lines().collect::<Vec<String>>(),
            vec!["G28", "G1 Z10 F5000", "G92 X-52 Y-30", "G0 X10 Y10"]
        );
    }

    #[test]
    fn preamble_travels_to_the_planner_start() {
        let mut config = MachineConfig::default();
        config.safety_margin = 25.0;
        assert_eq!(
            GcodeProgram::preamble(&config)[3],
            Instruction::Travel { x: 25.0, y: 25.0 }
        );
    }

    #[test]
    fn program_is_append_only_and_ordered() {
        let mut program = GcodeProgram::default();
        assert!(program.is_empty());
        program.push(Instruction::Dwell { duration: 1.0 });
        program.push(Instruction::Dwell { duration: 1.0 });
        program.push(Instruction::Home);
        assert_eq!(program.len(), 3, "duplicates should be kept");
        assert_eq!(program.instructions()[2], Instruction::Home);

        let mut buffer: Vec<u8> = Vec::default();
        program.write_to(&mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "G4 P1.0000\nG4 P1.0000\nG28\n"
        );
    }
}
