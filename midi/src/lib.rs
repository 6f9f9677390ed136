// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! This crate reads Standard MIDI Files. [MidiSmfReader] flattens every track
//! into one list of [SequenceEvent]s stamped with absolute ticks, which is all
//! the engine in `motorsong-core` needs to know about a song.

use anyhow::{Context, Result};
use midly::{MetaMessage, Smf, Timing, TrackEventKind};
use motorsong_core::{midi::SequenceEvent, time::MidiTicks};
use std::path::Path;

/// What a file said about itself, plus its channel events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SmfSequence {
    /// Pulses per quarter-note, if the file uses metrical timing.
    pub ticks_per_quarter_note: Option<u32>,

    /// Microseconds per quarter-note from the first tempo event, if any.
    pub tempo: Option<u32>,

    /// Time signature as (numerator, denominator), if any.
    pub time_signature: Option<(u32, u32)>,

    pub track_count: usize,

    /// Every channel message in the file, track by track.
    pub events: Vec<SequenceEvent>,
}

pub struct MidiSmfReader {}

impl MidiSmfReader {
    pub fn read_file(path: &Path) -> Result<SmfSequence> {
        let data = std::fs::read(path)
            .with_context(|| format!("couldn't read MIDI file {}", path.display()))?;
        Self::read(&data).with_context(|| format!("couldn't parse MIDI file {}", path.display()))
    }

    pub fn read(data: &[u8]) -> Result<SmfSequence> {
        let smf = Smf::parse(data)?;
        let mut r = SmfSequence {
            ticks_per_quarter_note: match smf.header.timing {
                Timing::Metrical(ticks_per_beat) => Some(ticks_per_beat.as_int() as u32),
                Timing::Timecode(..) => None,
            },
            track_count: smf.tracks.len(),
            ..Default::default()
        };

        for (track_number, track) in smf.tracks.iter().enumerate() {
            log::debug!("Processing track {track_number}");
            // The relative time references start over at zero with each track.
            let mut track_time_ticks: usize = 0;

            for t in track.iter() {
                track_time_ticks += t.delta.as_int() as usize;
                match t.kind {
                    TrackEventKind::Midi { channel, message } => {
                        r.events.push(SequenceEvent::new_with(
                            MidiTicks(track_time_ticks),
                            channel.as_int(),
                            message,
                        ));
                    }
                    TrackEventKind::Meta(meta_message) => match meta_message {
                        MetaMessage::TimeSignature(numerator, denominator_exp, _cc, _bb) => {
                            // https://en.wikipedia.org/wiki/Time_signature
                            if let Some(denominator) = 2_u32.checked_pow(denominator_exp.into()) {
                                let time_signature = (numerator as u32, denominator);
                                log::debug!("time signature {time_signature:?}");
                                r.time_signature.get_or_insert(time_signature);
                            } else {
                                log::warn!(
                                    "ignoring time signature with denominator 2^{denominator_exp}"
                                );
                            }
                        }
                        MetaMessage::Tempo(tempo) => {
                            log::debug!("tempo {} usec/quarter-note", tempo.as_int());
                            r.tempo.get_or_insert(tempo.as_int());
                        }
                        MetaMessage::EndOfTrack => {
                            log::debug!("end of track {track_number} at tick {track_time_ticks}");
                        }
                        _ => {}
                    },
                    TrackEventKind::SysEx(_) | TrackEventKind::Escape(_) => {}
                }
            }
        }
        log::debug!(
            "Done processing MIDI file: {} tracks, {} channel events",
            r.track_count,
            r.events.len()
        );
        Ok(r)
    }
}
