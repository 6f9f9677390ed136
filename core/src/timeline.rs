// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::{
    midi::{NoteEvent, SequenceEvent},
    time::MidiTicks,
    Error, Result,
};
use std::collections::BTreeMap;

/// All the note events that happen on one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineGroup {
    pub time: MidiTicks,
    pub events: Vec<NoteEvent>,
}

/// Note events bucketed by tick, in strictly increasing tick order. Built once
/// and then only read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupedTimeline {
    groups: Vec<TimelineGroup>,
}
impl GroupedTimeline {
    /// Groups the note events in `events` by tick. The input may be in any
    /// order. Events on the same tick keep their relative input order.
    /// Anything that isn't a Note-On or Note-Off is discarded.
    pub fn new_from_events(events: &[SequenceEvent]) -> Self {
        let mut notes: Vec<NoteEvent> = events
            .iter()
            .filter_map(SequenceEvent::as_note_event)
            .collect();
        Self::new_from_note_events(&mut notes)
    }

    /// Like [GroupedTimeline::new_from_events], but for events that are
    /// already known to be notes.
    pub fn new_from_note_events(notes: &mut [NoteEvent]) -> Self {
        // sort_by_key is stable, which is what keeps same-tick order intact.
        notes.sort_by_key(|note| note.time);
        let mut buckets: BTreeMap<MidiTicks, Vec<NoteEvent>> = BTreeMap::default();
        for note in notes.iter() {
            buckets.entry(note.time).or_default().push(*note);
        }
        Self {
            groups: buckets
                .into_iter()
                .map(|(time, events)| TimelineGroup { time, events })
                .collect(),
        }
    }

    /// Builds a timeline from groups that someone else already assembled.
    /// Fails unless the groups' ticks strictly increase.
    pub fn from_groups(groups: Vec<TimelineGroup>) -> Result<Self> {
        for pair in groups.windows(2) {
            if pair[1].time <= pair[0].time {
                return Err(Error::MalformedTimeline {
                    time: pair[1].time,
                    previous: pair[0].time,
                });
            }
        }
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[TimelineGroup] {
        &self.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimelineGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.groups.iter().map(|g| g.events.len()).sum()
    }
}
impl<'a> IntoIterator for &'a GroupedTimeline {
    type Item = &'a TimelineGroup;
    type IntoIter = std::slice::Iter<'a, TimelineGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::{u7, MidiMessage, NoteEventKind};
    use more_asserts::assert_lt;

    fn note_on(time: usize, key: u8) -> SequenceEvent {
        SequenceEvent::new_with(
            MidiTicks(time),
            0,
            MidiMessage::NoteOn {
                key: u7::new(key),
                vel: u7::new(100),
            },
        )
    }

    fn note_off(time: usize, key: u8) -> SequenceEvent {
        SequenceEvent::new_with(
            MidiTicks(time),
            0,
            MidiMessage::NoteOff {
                key: u7::new(key),
                vel: u7::new(0),
            },
        )
    }

    fn controller(time: usize) -> SequenceEvent {
        SequenceEvent::new_with(
            MidiTicks(time),
            0,
            MidiMessage::Controller {
                controller: u7::new(7),
                value: u7::new(100),
            },
        )
    }

    #[test]
    fn empty_input_gives_empty_timeline() {
        let timeline = GroupedTimeline::new_from_events(&[]);
        assert!(timeline.is_empty());
        assert_eq!(timeline.event_count(), 0);
    }

    #[test]
    fn groups_are_sorted_and_bucketed() {
        let events = vec![
            note_off(960, 60),
            note_on(0, 60),
            controller(0),
            note_on(480, 64),
            note_off(960, 64),
            controller(1200),
        ];
        let timeline = GroupedTimeline::new_from_events(&events);

        let times: Vec<MidiTicks> = timeline.iter().map(|g| g.time).collect();
        assert_eq!(times, vec![MidiTicks(0), MidiTicks(480), MidiTicks(960)]);
        for pair in timeline.groups().windows(2) {
            assert_lt!(pair[0].time, pair[1].time);
        }

        assert_eq!(
            timeline.event_count(),
            5,
            "only the controller messages should be dropped"
        );
        let last = &timeline.groups()[2];
        assert_eq!(
            last.events,
            vec![
                NoteEvent::new_note_off(60, MidiTicks(960)),
                NoteEvent::new_note_off(64, MidiTicks(960)),
            ],
            "same-tick events should keep their input order"
        );
    }

    #[test]
    fn no_events_lost_or_duplicated() {
        let events: Vec<SequenceEvent> = (0..40)
            .map(|i| {
                let time = (i * 7919) % 13 * 120;
                if i % 2 == 0 {
                    note_on(time, 40 + i as u8)
                } else {
                    note_off(time, 40 + i as u8)
                }
            })
            .collect();
        let timeline = GroupedTimeline::new_from_events(&events);
        assert_eq!(timeline.event_count(), events.len());

        let mut expected: Vec<NoteEvent> =
            events.iter().filter_map(|e| e.as_note_event()).collect();
        let mut actual: Vec<NoteEvent> = timeline
            .iter()
            .flat_map(|g| g.events.iter().copied())
            .collect();
        let key = |e: &NoteEvent| (e.time, e.pitch, e.kind == NoteEventKind::On);
        expected.sort_by_key(key);
        actual.sort_by_key(key);
        assert_eq!(expected, actual);

        for group in timeline.iter() {
            assert!(group.events.iter().all(|e| e.time == group.time));
        }
    }

    #[test]
    fn from_groups_rejects_unordered_ticks() {
        let ok = GroupedTimeline::from_groups(vec![
            TimelineGroup {
                time: MidiTicks(0),
                events: vec![NoteEvent::new_note_on(60, MidiTicks(0))],
            },
            TimelineGroup {
                time: MidiTicks(10),
                events: vec![NoteEvent::new_note_off(60, MidiTicks(10))],
            },
        ]);
        assert_eq!(ok.map(|t| t.len()).ok(), Some(2));

        let repeated = GroupedTimeline::from_groups(vec![
            TimelineGroup {
                time: MidiTicks(10),
                events: vec![],
            },
            TimelineGroup {
                time: MidiTicks(10),
                events: vec![],
            },
        ]);
        assert!(matches!(
            repeated,
            Err(Error::MalformedTimeline {
                time: MidiTicks(10),
                previous: MidiTicks(10)
            })
        ));
    }
}
