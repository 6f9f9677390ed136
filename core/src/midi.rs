// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::time::MidiTicks;
pub use midly::{
    num::{u4, u7},
    MidiMessage,
};

pub type MidiChannel = u8;

pub struct MidiUtils {}

impl MidiUtils {
    /// Equal-tempered frequency in Hz, with A4 (key 69) at 440 Hz.
    pub fn note_to_frequency(note: u8) -> f64 {
        2.0_f64.powf((note as f64 - 69.0) / 12.0) * 440.0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoteEventKind {
    On,
    Off,
}

/// A single key going down or coming up at a point in time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NoteEvent {
    pub kind: NoteEventKind,
    pub pitch: u8,
    pub time: MidiTicks,
}
impl NoteEvent {
    pub fn new_note_on(pitch: u8, time: MidiTicks) -> Self {
        Self {
            kind: NoteEventKind::On,
            pitch,
            time,
        }
    }

    pub fn new_note_off(pitch: u8, time: MidiTicks) -> Self {
        Self {
            kind: NoteEventKind::Off,
            pitch,
            time,
        }
    }
}

/// A channel message stamped with its absolute time from the start of the
/// sequence. This is what a file reader hands to the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SequenceEvent {
    pub time: MidiTicks,
    pub channel: MidiChannel,
    pub message: MidiMessage,
}
impl SequenceEvent {
    pub fn new_with(time: MidiTicks, channel: MidiChannel, message: MidiMessage) -> Self {
        Self {
            time,
            channel,
            message,
        }
    }

    /// Returns the note event this message represents, if any. A Note-On with
    /// zero velocity is a Note-Off.
    pub fn as_note_event(&self) -> Option<NoteEvent> {
        match self.message {
            MidiMessage::NoteOn { key, vel } => {
                if vel.as_int() == 0 {
                    Some(NoteEvent::new_note_off(key.as_int(), self.time))
                } else {
                    Some(NoteEvent::new_note_on(key.as_int(), self.time))
                }
            }
            MidiMessage::NoteOff { key, .. } => {
                Some(NoteEvent::new_note_off(key.as_int(), self.time))
            }
            MidiMessage::Aftertouch { .. }
            | MidiMessage::Controller { .. }
            | MidiMessage::ProgramChange { .. }
            | MidiMessage::ChannelAftertouch { .. }
            | MidiMessage::PitchBend { .. } => None,
        }
    }
}
