// Copyright (c) 2023 Mike Tsao. All rights reserved.

use anyhow::{Context, Result};
use motorsong_core::{gcode::GcodeProgram, MachineConfig};
use motorsong_midi::{MidiSmfReader, SmfSequence};
use motorsong_settings::MachineSettings;
use std::{fs::File, path::Path};

/// File plumbing for the pipeline. Every handle opened here is closed before
/// the function that opened it returns.
pub struct IOHelper {}

impl IOHelper {
    pub fn smf_sequence_from_file(path: &Path) -> Result<SmfSequence> {
        MidiSmfReader::read_file(path)
    }

    /// Loads a YAML machine description, or returns the reference machine if
    /// there isn't one.
    pub fn machine_config_from_yaml_file(path: Option<&Path>) -> Result<MachineConfig> {
        match path {
            Some(path) => MachineSettings::new_from_yaml_file(path)?.into_config(),
            None => MachineSettings::default().into_config(),
        }
    }

    pub fn write_program_to_file(program: &GcodeProgram, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("couldn't create output file {}", path.display()))?;
        program
            .write_to(file)
            .with_context(|| format!("couldn't write output file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motorsong_core::gcode::Instruction;

    #[test]
    fn write_program_to_file_writes_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gcode");
        let mut program = GcodeProgram::new_with_preamble(&MachineConfig::default());
        program.push(Instruction::Dwell { duration: 10.0 });
        IOHelper::write_program_to_file(&program, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "G28\nG1 Z10 F5000\nG92 X-52 Y-30\nG0 X10 Y10\nG4 P10.0000\n"
        );
    }

    #[test]
    fn unwritable_output_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.gcode");
        assert!(IOHelper::write_program_to_file(&GcodeProgram::default(), &path).is_err());
    }

    #[test]
    fn missing_config_path_means_defaults() {
        assert_eq!(
            IOHelper::machine_config_from_yaml_file(None).unwrap(),
            MachineConfig::default()
        );
    }
}
