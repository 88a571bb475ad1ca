use std::sync::OnceLock;

use tracing::{field::Visit, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static IGNORE_PATTERNS: OnceLock<Vec<regex::Regex>> = OnceLock::new();

/// Install the global subscriber: `RUST_LOG` (or `default_directives`) plus a
/// fmt layer behind [`LogIgnoreFilter`].
pub fn init(default_directives: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives.into()))
        .with(tracing_subscriber::fmt::layer().with_filter(LogIgnoreFilter))
        .init();
}

/// Compile the `[log] ignore` patterns. The first successful call wins.
pub fn set_ignore_patterns(patterns: &[String]) -> Result<(), regex::Error> {
    let compiled = patterns
        .iter()
        .map(|p| regex::Regex::new(p))
        .collect::<Result<Vec<_>, _>>()?;
    let _ = IGNORE_PATTERNS.set(compiled);
    Ok(())
}

/// Drops events whose `"<target>: <message>"` matches an ignore pattern.
///
/// Events bridged from the `log` crate (rusqlite, reqwest) are matched on
/// their original crate target rather than `log`.
pub struct LogIgnoreFilter;

impl<S: Subscriber> tracing_subscriber::layer::Filter<S> for LogIgnoreFilter {
    fn enabled(&self, _meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        true
    }

    fn event_enabled(&self, event: &tracing::Event<'_>, _cx: &Context<'_, S>) -> bool {
        match IGNORE_PATTERNS.get() {
            Some(patterns) if !patterns.is_empty() => {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                let line = visitor.line(event.metadata().target());
                !patterns.iter().any(|p| p.is_match(&line))
            }
            _ => true,
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    log_target: Option<String>,
}

impl MessageVisitor {
    fn line(&self, target: &str) -> String {
        format!("{}: {}", self.log_target.as_deref().unwrap_or(target), self.message)
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "log.target" => self.log_target = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "log.target" => self.log_target = Some(format!("{value:?}")),
            _ => {}
        }
    }
}
