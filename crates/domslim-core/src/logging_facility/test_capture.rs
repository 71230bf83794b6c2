//! In-memory capture of tracing events for tests
//!
//! Events are recorded together with the `run_id` of the enclosing
//! `simplify` span, so assertions can tell passes apart even when tests run
//! in parallel against the one global subscriber.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use domslim_core_types::schema::{
    EVENT_RULE_MATCH, FIELD_EVENT, FIELD_OP, FIELD_PHASE, FIELD_RULE, FIELD_RUN_ID,
};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    pub rule: Option<String>,
    pub phase: Option<String>,
    /// `run_id` of the innermost enclosing span that carries one
    pub run_id: Option<String>,
    pub fields: HashMap<String, String>,
}

#[derive(Default)]
struct Fields(HashMap<String, String>);

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

/// Stored in span extensions by [`CaptureLayer::on_new_span`]
struct SpanRunId(String);

struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        attrs.record(&mut fields);
        if let (Some(run_id), Some(span)) = (fields.0.remove(FIELD_RUN_ID), ctx.span(id)) {
            span.extensions_mut().insert(SpanRunId(run_id));
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);

        let run_id = ctx.event_scope(event).and_then(|scope| {
            scope
                .into_iter()
                .find_map(|span| span.extensions().get::<SpanRunId>().map(|r| r.0.clone()))
        });
        let get = |key: &str| fields.0.get(key).cloned();
        let captured = CapturedEvent {
            level: *event.metadata().level(),
            op: get(FIELD_OP),
            event: get(FIELD_EVENT),
            rule: get(FIELD_RULE),
            phase: get(FIELD_PHASE),
            run_id,
            fields: fields.0,
        };

        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

/// Handle onto the captured events
#[derive(Clone)]
pub struct TestCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// # Panics
    ///
    /// Panics if no event has the given `op` and `event` fields
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events
                .iter()
                .any(|e| e.op.as_deref() == Some(op) && e.event.as_deref() == Some(event)),
            "no event op={op} event={event} among {} captured",
            events.len()
        );
    }

    /// Rule-match events recorded for `rule`, oldest first
    pub fn rule_matches(&self, rule: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| {
                e.rule.as_deref() == Some(rule) && e.event.as_deref() == Some(EVENT_RULE_MATCH)
            })
            .collect()
    }

    /// Every event emitted inside the pass with this run id
    pub fn events_for_run(&self, run_id: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.run_id.as_deref() == Some(run_id))
            .collect()
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture subscriber (once per process) and return its handle
///
/// Tests share the handle, so assertions should filter on names unique to
/// the test.
///
/// ```
/// use domslim_core::logging_facility::test_capture::init_test_capture;
/// use domslim_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_example");
/// capture.assert_event_exists("doc_capture_example", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let events = Arc::new(Mutex::new(Vec::new()));
            let layer = CaptureLayer {
                events: Arc::clone(&events),
            };
            tracing_subscriber::registry().with(layer).init();
            TestCapture { events }
        })
        .clone()
}
