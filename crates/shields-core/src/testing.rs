//! Test doubles shared by the unit tests.

use anyhow::Result;
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::analytics::{AnalyticsClient, ClientFactory};
use crate::telemetry::{Clock, TelemetryEmitter};

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;
pub const NOW_MS: i64 = 1_717_200_000_000;

#[derive(Debug, Default)]
pub struct Recorded {
    pub created: usize,
    pub resets: usize,
    pub events: Vec<(String, Option<Map<String, Value>>)>,
    pub fail_track: bool,
}

/// Records every client interaction into shared state
#[derive(Clone, Default)]
pub struct Recorder(pub Rc<RefCell<Recorded>>);

impl Recorder {
    pub fn created(&self) -> usize {
        self.0.borrow().created
    }

    pub fn resets(&self) -> usize {
        self.0.borrow().resets
    }

    pub fn events(&self) -> Vec<(String, Option<Map<String, Value>>)> {
        self.0.borrow().events.clone()
    }
}

struct RecordingClient {
    recorder: Recorder,
    distinct_id: String,
}

impl AnalyticsClient for RecordingClient {
    fn distinct_id(&self) -> &str {
        &self.distinct_id
    }

    fn reset(&mut self) {
        let mut recorded = self.recorder.0.borrow_mut();
        recorded.resets += 1;
        self.distinct_id = format!("id-{}", recorded.resets);
    }

    fn track(&mut self, event: &str, properties: Option<&Map<String, Value>>) -> Result<()> {
        let mut recorded = self.recorder.0.borrow_mut();
        if recorded.fail_track {
            anyhow::bail!("upload rejected");
        }
        recorded
            .events
            .push((event.to_string(), properties.cloned()));
        Ok(())
    }
}

impl ClientFactory for Recorder {
    fn create(&self, _token: &str) -> Result<Box<dyn AnalyticsClient>> {
        self.0.borrow_mut().created += 1;
        Ok(Box::new(RecordingClient {
            recorder: self.clone(),
            distinct_id: "id-0".to_string(),
        }))
    }
}

/// A clock tests can move
#[derive(Clone)]
pub struct ManualClock(pub Rc<Cell<i64>>);

impl ManualClock {
    pub fn at(now: i64) -> Self {
        Self(Rc::new(Cell::new(now)))
    }

    pub fn set(&self, now: i64) {
        self.0.set(now);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.get()
    }
}

/// An emitter with a token, a recording client and a clock fixed at [`NOW_MS`]
pub fn emitter() -> (TelemetryEmitter, Recorder, ManualClock) {
    let recorder = Recorder::default();
    let clock = ManualClock::at(NOW_MS);
    let emitter = TelemetryEmitter::new(
        Some("test-token".to_string()),
        Box::new(recorder.clone()),
        Box::new(clock.clone()),
    );
    (emitter, recorder, clock)
}
