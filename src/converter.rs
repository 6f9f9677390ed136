// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::helpers::IOHelper;
use anyhow::{Context, Result};
use motorsong_core::{
    gcode::GcodeProgram, midi::SequenceEvent, planner::MotionPlanner,
    timeline::GroupedTimeline, MachineConfig,
};
use motorsong_midi::MidiSmfReader;
use std::path::Path;

/// Runs the read, group, plan, and write stages against one machine
/// configuration. A run either completes or fails as a whole.
#[derive(Clone, Debug, Default)]
pub struct Converter {
    config: MachineConfig,
}
impl Converter {
    pub fn new_with(config: MachineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn convert_events(&self, events: &[SequenceEvent]) -> motorsong_core::Result<GcodeProgram> {
        let timeline = GroupedTimeline::new_from_events(events);
        log::debug!(
            "{} note events in {} groups",
            timeline.event_count(),
            timeline.len()
        );
        MotionPlanner::new_with(&self.config)?.plan(&timeline)
    }

    pub fn convert_smf(&self, data: &[u8]) -> Result<GcodeProgram> {
        let sequence = MidiSmfReader::read(data)?;
        Ok(self.convert_events(&sequence.events)?)
    }

    /// Converts the MIDI file at `input` and writes the program to `output`.
    /// Nothing is written if conversion fails.
    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<GcodeProgram> {
        let sequence = IOHelper::smf_sequence_from_file(input)?;
        log::info!(
            "{}: {} tracks, {} channel events, {} ticks per quarter-note",
            input.display(),
            sequence.track_count,
            sequence.events.len(),
            sequence
                .ticks_per_quarter_note
                .map_or_else(|| "unknown".to_string(), |t| t.to_string())
        );
        let program = self
            .convert_events(&sequence.events)
            .with_context(|| format!("couldn't convert {}", input.display()))?;
        IOHelper::write_program_to_file(&program, output)?;
        log::info!(
            "Wrote {} instructions to {}",
            program.len(),
            output.display()
        );
        Ok(program)
    }
}
