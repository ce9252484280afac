//! In-memory event recording for tests
//!
//! Every level is recorded, trace included, so selector and cycle-guard
//! decisions can be asserted on as well as entry-point lifecycles. Each
//! capture is the default subscriber of the thread that created it, for as
//! long as the handle lives: tests running in parallel never see each other's
//! events, and a global subscriber installed by `init` does not intercept
//! them.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::dispatcher::{self, DefaultGuard};
use tracing::field::{Field, Visit};
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use crate::schema::{FIELD_DECISION, FIELD_EVENT, FIELD_TYPE_NAME};

/// One recorded event, every field rendered to text
///
/// Integers keep their decimal form, strings are unquoted, and anything
/// recorded through `Debug` (such as `err.kind`) keeps its `Debug` form.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    /// `exclude` or `reenter` on trace events, absent otherwise
    pub decision: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn from_event(event: &Event<'_>) -> Self {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let mut fields = fields.0;
        Self {
            level: *event.metadata().level(),
            component: fields.remove("component"),
            op: fields.get("op").cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            decision: fields.get(FIELD_DECISION).cloned(),
            fields,
        }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Type the event is about, when it names one
    pub fn type_name(&self) -> Option<&str> {
        self.field(FIELD_TYPE_NAME)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

#[derive(Default)]
struct Fields(HashMap<String, String>);

impl Fields {
    fn put(&mut self, field: &Field, text: String) {
        self.0.insert(field.name().to_string(), text);
    }
}

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }
}

type Shared = Arc<Mutex<Vec<CapturedEvent>>>;

struct Recorder(Shared);

impl<S: Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let captured = CapturedEvent::from_event(event);
        if let Ok(mut events) = self.0.lock() {
            events.push(captured);
        }
    }
}

/// Read side of the recorder; recording stops when it is dropped
#[must_use = "events are only recorded while the capture is alive"]
pub struct TestCapture {
    events: Shared,
    _scope: DefaultGuard,
}

impl TestCapture {
    /// Snapshot of everything recorded so far, oldest first
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.filtered(|_| true)
    }

    fn filtered(&self, keep: impl Fn(&CapturedEvent) -> bool) -> Vec<CapturedEvent> {
        match self.events.lock() {
            Ok(events) => events.iter().filter(|e| keep(e)).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Lifecycle events of one operation, oldest first
    pub fn events_for(&self, op: &str) -> Vec<CapturedEvent> {
        self.filtered(|e| e.op.as_deref() == Some(op))
    }

    /// Trace-level decisions of one kind, see `schema::DECISION_*`
    pub fn decisions(&self, decision: &str) -> Vec<CapturedEvent> {
        self.filtered(|e| e.level == Level::TRACE && e.decision.as_deref() == Some(decision))
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.filtered(predicate).len()
    }

    /// # Panics
    ///
    /// Panics when no `event` was recorded for `op`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let seen = self.events_for(op);
        assert!(
            seen.iter().any(|e| e.is(op, event)),
            "Expected event op={op} event={event}; saw {:?}",
            seen.iter().map(|e| e.event.as_deref()).collect::<Vec<_>>()
        );
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

/// Record every event emitted on the current thread until the returned
/// handle is dropped
///
/// ```
/// use refract_core::log_op_start;
/// use refract_core::logging_facility::init_test_capture;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_probe");
/// capture.assert_event_exists("doc_probe", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    let events = Shared::default();
    let recorder = tracing_subscriber::registry().with(Recorder(Arc::clone(&events)));
    let scope = dispatcher::set_default(&Dispatch::new(recorder));
    TestCapture {
        events,
        _scope: scope,
    }
}
