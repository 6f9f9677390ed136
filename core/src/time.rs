// Copyright (c) 2023 Mike Tsao. All rights reserved.

use std::{fmt::Display, ops::Sub};

/// A point in (or span of) musical time, measured in MIDI ticks since the
/// start of the sequence.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MidiTicks(pub usize);

impl MidiTicks {
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl Display for MidiTicks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
// Saturates, because a negative span of musical time doesn't mean anything.
impl Sub for MidiTicks {
    type Output = MidiTicks;
    fn sub(self, rhs: Self) -> Self::Output {
        MidiTicks(self.0.saturating_sub(rhs.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midi_ticks_math() {
        assert_eq!(MidiTicks(960) - MidiTicks(480), MidiTicks(480));
        assert_eq!(
            MidiTicks(1) - MidiTicks(2),
            MidiTicks(0),
            "Subtraction should saturate at zero"
        );
    }

    #[test]
    fn midi_ticks_order() {
        assert!(MidiTicks(0) < MidiTicks(1));
        assert_eq!(MidiTicks(7).as_f64(), 7.0);
        assert_eq!(format!("{}", MidiTicks(480)), "480");
    }
}
