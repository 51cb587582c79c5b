//! Collaborator traits so `ollie-core` stays free of input and presentation concerns.

use std::collections::VecDeque;

use crossbeam_channel::{Receiver, Sender};
use ollie_core::{DurationTable, Event, Matcher, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// One analog reading plus the time since the previous one.
///
/// Deserializes from `{ "x": .., "y": .., "dt": .. }` or `[x, y, dt]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    pub dt: f32,
}

impl Sample {
    pub fn new(position: Vec2, dt: f32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            dt,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Supplies stick samples, one per step.
pub trait SampleSource: Send {
    /// `Ok(None)` once the source is exhausted.
    fn next_sample(&mut self) -> Result<Option<Sample>>;
}

/// Receives matcher output for display or animation.
pub trait EventSink: Send {
    fn handle(&mut self, event: &Event) -> Result<()>;
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Replays a fixed list of samples.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    samples: VecDeque<Sample>,
}

impl ScriptedSource {
    pub fn new(samples: impl IntoIterator<Item = Sample>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl SampleSource for ScriptedSource {
    fn next_sample(&mut self) -> Result<Option<Sample>> {
        Ok(self.samples.pop_front())
    }
}

/// Keeps every event in memory; handy for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<Event>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl EventSink for RecordingSink {
    fn handle(&mut self, event: &Event) -> Result<()> {
        self.events.push(*event);
        Ok(())
    }
}

/// Forwards events to another thread, e.g. a UI that polls the receiver.
pub struct ChannelSink {
    sender: Sender<Event>,
}

impl ChannelSink {
    pub fn new(sender: Sender<Event>) -> Self {
        Self { sender }
    }
}

/// Unbounded channel pair: the sink for the matcher side, the receiver for the presenter.
pub fn channel_sink() -> (ChannelSink, Receiver<Event>) {
    let (sender, receiver) = crossbeam_channel::unbounded::<Event>();
    (ChannelSink::new(sender), receiver)
}

impl EventSink for ChannelSink {
    fn handle(&mut self, event: &Event) -> Result<()> {
        if self.sender.send(*event).is_err() {
            warn!("event channel closed; dropping event");
        }
        Ok(())
    }
}

/// Pumps `source` through `matcher` until it runs dry, forwarding every event.
/// Returns the number of steps taken.
pub fn drive<D, S, K>(matcher: &mut Matcher<D>, source: &mut S, sink: &mut K) -> Result<usize>
where
    D: DurationTable,
    S: SampleSource + ?Sized,
    K: EventSink + ?Sized,
{
    let mut steps = 0;
    while let Some(sample) = source.next_sample()? {
        for event in matcher.step(sample.position(), sample.dt) {
            sink.handle(&event)?;
        }
        steps += 1;
    }
    sink.flush()?;
    debug!(steps, "sample source exhausted");
    Ok(steps)
}
