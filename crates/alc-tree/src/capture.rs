//! Test support: capture emitted audit records in memory.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One captured audit record.
#[derive(Clone, Debug)]
pub struct Record {
    pub level: Level,
    pub channel: String,
    pub message: String,
}

/// A `tracing` layer that collects every event it sees.
#[derive(Clone, Default)]
pub struct Capture {
    records: Arc<Mutex<Vec<Record>>>,
}

impl Capture {
    /// Install this capture as the thread-default subscriber for the
    /// lifetime of the returned guard.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    /// Snapshot of the captured records, in emission order.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    /// Number of captured records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        self.records.lock().unwrap().push(Record {
            level: *event.metadata().level(),
            channel: fields.channel,
            message: fields.message,
        });
    }
}

#[derive(Default)]
struct FieldCollector {
    channel: String,
    message: String,
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "channel" => self.channel = format!("{value:?}"),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "channel" {
            self.channel = value.to_string();
        }
    }
}
