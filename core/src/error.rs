// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::time::MidiTicks;
use thiserror::Error;

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a song from turning into motion. None of these
/// are retried; any of them ends the run.
#[derive(Debug, Error)]
pub enum Error {
    /// A timeline's groups weren't in strictly increasing tick order.
    #[error("malformed timeline: group at tick {time} doesn't follow group at tick {previous}")]
    MalformedTimeline { time: MidiTicks, previous: MidiTicks },

    /// A Note-Off arrived for a pitch that wasn't sounding.
    #[error("note {pitch} was turned off at tick {time}, but it was never on")]
    InvalidNoteTransition { pitch: u8, time: MidiTicks },

    /// The machine description can't be used for planning.
    #[error("invalid machine configuration: {0}")]
    InvalidConfiguration(String),

    /// Reading or writing failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
