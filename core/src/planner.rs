// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::{
    bounds::Bounds,
    gcode::{GcodeProgram, Instruction},
    kinematics,
    midi::{NoteEvent, NoteEventKind},
    time::MidiTicks,
    timeline::{GroupedTimeline, TimelineGroup},
    Axis, Error, MachineConfig, Result,
};
use std::cmp::Ordering;

/// Which way an axis is currently travelling.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}
impl Direction {
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// True if moving to `position` in this direction would leave `envelope`
    /// through the far end.
    fn overshoots(&self, envelope: &Bounds, position: f64) -> bool {
        match self {
            Direction::Forward => position > envelope.max(),
            Direction::Reverse => position < envelope.min(),
        }
    }
}

/// Counters describing what a planning run did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PlanSummary {
    pub groups: usize,
    pub moves: usize,
    pub dwells: usize,
    pub dropped_voices: usize,
}

/// Walks a [GroupedTimeline] and turns it into motion.
///
/// At most two notes sound at once, one on X and one on Y. Whenever time
/// advances, each sounding axis travels a distance proportional to its note's
/// pitch, turning around when it runs into the safety margin, and the planner
/// emits one [Instruction] covering that interval. Then the group's own
/// Note-On/Note-Off events update which notes are sounding for the next
/// interval.
///
/// Reflection policy: the move is always committed in full. If the position
/// after the move lies past the envelope edge it was heading toward, the axis
/// turns around for the *next* interval.
#[derive(Debug)]
pub struct MotionPlanner<'a> {
    config: &'a MachineConfig,
    envelopes: [Bounds; 2],

    active: [Option<NoteEvent>; 2],
    position: [f64; 2],
    direction: [Direction; 2],

    // None until the first group is processed.
    last_time: Option<MidiTicks>,

    program: GcodeProgram,
    summary: PlanSummary,
}
impl<'a> MotionPlanner<'a> {
    /// Fails if `config` can't be planned against. The returned planner's
    /// program already holds the preamble.
    pub fn new_with(config: &'a MachineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            envelopes: [config.envelope(Axis::X)?, config.envelope(Axis::Y)?],
            active: Default::default(),
            position: [
                config.start_position(Axis::X),
                config.start_position(Axis::Y),
            ],
            direction: Default::default(),
            last_time: None,
            program: GcodeProgram::new_with_preamble(config),
            summary: PlanSummary::default(),
        })
    }

    /// Runs the whole timeline and returns the finished program.
    pub fn plan(mut self, timeline: &GroupedTimeline) -> Result<GcodeProgram> {
        for group in timeline {
            self.process_group(group)?;
        }
        let summary = self.summary;
        log::info!(
            "Planned {} groups: {} moves, {} dwells, {} dropped voices",
            summary.groups,
            summary.moves,
            summary.dwells,
            summary.dropped_voices
        );
        Ok(self.program)
    }

    /// Handles one tick's worth of events. If time has advanced since the
    /// previous group, the elapsed interval is played first.
    pub fn process_group(&mut self, group: &TimelineGroup) -> Result<()> {
        log::debug!("tick {}: {:?}", group.time, group.events);
        match self.last_time {
            Some(previous) if group.time < previous => {
                return Err(Error::MalformedTimeline {
                    time: group.time,
                    previous,
                });
            }
            Some(previous) if group.time > previous => {
                self.advance(group.time - previous);
            }
            _ => {}
        }
        self.apply_transitions(group)?;
        self.last_time = Some(group.time);
        self.summary.groups += 1;
        Ok(())
    }

    fn advance(&mut self, elapsed: MidiTicks) {
        let mut move_distance = [0.0; 2];
        let mut feed = [0.0; 2];
        for (i, axis) in Axis::DRIVEN.into_iter().enumerate() {
            let Some(note) = self.active[i] else {
                continue;
            };
            let raw = kinematics::distance(elapsed, note.pitch) * self.direction[i].sign();
            let tentative = self.position[i] + raw;
            if self.direction[i].overshoots(&self.envelopes[i], tentative) {
                self.direction[i] = self.direction[i].reversed();
                log::debug!(
                    "axis {axis} reverses at {tentative:.4}, now {:?}",
                    self.direction[i]
                );
            }
            self.position[i] = tentative;
            move_distance[i] = raw;
            feed[i] = kinematics::feed_rate(note.pitch, axis, self.config);
        }

        let [dx, dy] = move_distance;
        let combined_speed = feed[0].hypot(feed[1]);
        log::debug!(
            "{} ticks elapsed, travel {:.4} at {:.4}",
            elapsed,
            dx.hypot(dy),
            combined_speed
        );

        let x = (dx != 0.0).then_some(self.position[0]);
        let y = (dy != 0.0).then_some(self.position[1]);
        let instruction = if x.is_none() && y.is_none() {
            self.summary.dwells += 1;
            Instruction::Dwell {
                duration: elapsed.as_f64() * self.config.dwell_scale,
            }
        } else {
            self.summary.moves += 1;
            Instruction::Move {
                x,
                y,
                feed: combined_speed,
            }
        };
        self.program.push(instruction);
    }

    fn apply_transitions(&mut self, group: &TimelineGroup) -> Result<()> {
        let mut events = group.events.clone();
        // Highest pitch first. A Note-Off sorts ahead of a Note-On of the
        // same pitch so that a re-struck note keeps sounding.
        events.sort_by(|a, b| {
            b.pitch.cmp(&a.pitch).then_with(|| match (a.kind, b.kind) {
                (NoteEventKind::Off, NoteEventKind::On) => Ordering::Less,
                (NoteEventKind::On, NoteEventKind::Off) => Ordering::Greater,
                _ => Ordering::Equal,
            })
        });

        for event in events {
            match event.kind {
                NoteEventKind::On => self.note_on(event),
                NoteEventKind::Off => self.note_off(event, group.time)?,
            }
        }
        Ok(())
    }

    fn note_on(&mut self, event: NoteEvent) {
        if let Some(slot) = self.active.iter().position(Option::is_none) {
            log::debug!("note {} on axis {}", event.pitch, Axis::DRIVEN[slot]);
            self.active[slot] = Some(event);
        } else {
            log::warn!(
                "dropping note {} at tick {}: both axes are busy",
                event.pitch,
                event.time
            );
            self.summary.dropped_voices += 1;
        }
    }

    fn note_off(&mut self, event: NoteEvent, time: MidiTicks) -> Result<()> {
        let mut matched = false;
        // A Note-Off is only valid for a note that's sounding on some axis.
        for slot in self.active.iter_mut() {
            if slot.is_some_and(|active| active.pitch == event.pitch) {
                *slot = None;
                matched = true;
            }
        }
        if matched {
            log::debug!("note {} off", event.pitch);
            return Ok(());
        }
        Err(Error::InvalidNoteTransition {
            pitch: event.pitch,
            time,
        })
    }

    fn slot(axis: Axis) -> Option<usize> {
        Axis::DRIVEN.iter().position(|a| *a == axis)
    }

    /// The note currently assigned to `axis`, if any.
    pub fn active_note(&self, axis: Axis) -> Option<NoteEvent> {
        Self::slot(axis).and_then(|i| self.active[i])
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().flatten().count()
    }

    pub fn position(&self, axis: Axis) -> Option<f64> {
        Self::slot(axis).map(|i| self.position[i])
    }

    pub fn direction(&self, axis: Axis) -> Option<Direction> {
        Self::slot(axis).map(|i| self.direction[i])
    }

    pub fn last_time(&self) -> Option<MidiTicks> {
        self.last_time
    }

    pub fn summary(&self) -> &PlanSummary {
        &self.summary
    }

    pub fn program(&self) -> &GcodeProgram {
        &self.program
    }
}

/// Plans `timeline` against `config` in one call.
pub fn plan(timeline: &GroupedTimeline, config: &MachineConfig) -> Result<GcodeProgram> {
    MotionPlanner::new_with(config)?.plan(timeline)
}
