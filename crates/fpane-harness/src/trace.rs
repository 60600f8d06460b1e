#![forbid(unsafe_code)]

//! Tracing capture for assertions on log output.
//!
//! [`capture`] runs a closure under a subscriber that records every event
//! with its target, level, fields and enclosing span.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

/// One recorded log event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub target: String,
    pub level: tracing::Level,
    pub message: Option<String>,
    pub fields: HashMap<String, String>,
    pub span: Option<String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S> tracing_subscriber::Layer<S> for CaptureLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);

        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned();
        let span = ctx.event_span(event).map(|span| span.name().to_string());

        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedEvent {
                target: event.metadata().target().to_string(),
                level: *event.metadata().level(),
                message,
                fields,
                span,
            });
    }
}

/// Run `f` with every tracing event captured, returning its output and the
/// events in emission order.
pub fn capture<F, R>(f: F) -> (R, Vec<CapturedEvent>)
where
    F: FnOnce() -> R,
{
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = CaptureLayer {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(layer);
    let out = tracing::subscriber::with_default(subscriber, f);
    let captured = events
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    (out, captured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_target_fields_and_span() {
        let ((), events) = capture(|| {
            let _span = tracing::debug_span!("outer").entered();
            tracing::warn!(target: "fpane.test", pane = "menu", count = 3u64, "hello");
        });
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.target, "fpane.test");
        assert_eq!(event.level, tracing::Level::WARN);
        assert_eq!(event.field("pane"), Some("menu"));
        assert_eq!(event.field("count"), Some("3"));
        assert_eq!(event.span.as_deref(), Some("outer"));
    }
}
