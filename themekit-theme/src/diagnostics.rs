//! # Diagnostics
//!
//! Themes, the registry and the resolver report what they do through an
//! injected [DiagnosticSink] instead of a process-wide logger. The channel is
//! observational only: a sink never sees anything it could use to change a
//! result, and swapping sinks never changes what an operation returns.
//!
//! [LogSink] is the default and forwards to the `log` facade with the
//! component name as the log target, so `RUST_LOG=ThemeRegistry=debug` style
//! filtering works with any `log` backend.
//!
//! ```rust
//! use std::sync::Arc;
//! use themekit_theme::diagnostics::{Component, Diagnostics, MemorySink};
//!
//! let sink = Arc::new(MemorySink::new());
//! let diagnostics = Diagnostics::new(sink.clone());
//!
//! diagnostics.info(Component::ThemeRegistry, "register_theme", "registered", &[("id", "t1")]);
//! assert_eq!(sink.events().len(), 1);
//! ```

use std::fmt;
use std::sync::{Arc, Mutex};

use log::Level;

/// The component that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// The theme registry.
    ThemeRegistry,
    /// A theme entity.
    SegregatedTheme,
    /// The property resolver.
    ThemePropertyResolver,
}

impl Component {
    /// The component name, also used as the log target.
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::ThemeRegistry => "ThemeRegistry",
            Component::SegregatedTheme => "SegregatedTheme",
            Component::ThemePropertyResolver => "ThemePropertyResolver",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured diagnostic event.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticEvent {
    /// Who emitted the event.
    pub component: Component,
    /// The method name.
    pub operation: &'static str,
    /// Severity.
    pub level: Level,
    /// Human-readable message.
    pub message: String,
    /// Key/value context.
    pub context: Vec<(String, String)>,
}

impl DiagnosticEvent {
    /// Look up a context value by key.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Receiver of diagnostic events.
pub trait DiagnosticSink: Send + Sync {
    /// Handle one event.
    fn emit(&self, event: &DiagnosticEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, event: &DiagnosticEvent) {
        if event.context.is_empty() {
            log::log!(
                target: event.component.as_str(),
                event.level,
                "{}: {}",
                event.operation,
                event.message
            );
        } else {
            let context = event
                .context
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" ");
            log::log!(
                target: event.component.as_str(),
                event.level,
                "{}: {} ({})",
                event.operation,
                event.message,
                context
            );
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _event: &DiagnosticEvent) {}
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Recorded events for one operation.
    pub fn events_for(&self, operation: &str) -> Vec<DiagnosticEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.operation == operation)
            .collect()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, event: &DiagnosticEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

/// Cloneable handle to a [DiagnosticSink].
#[derive(Clone)]
pub struct Diagnostics {
    sink: Arc<dyn DiagnosticSink>,
}

impl Diagnostics {
    /// Wrap a sink.
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// A handle that forwards to the `log` crate.
    pub fn log() -> Self {
        Self::new(Arc::new(LogSink))
    }

    /// A handle that drops everything.
    pub fn silent() -> Self {
        Self::new(Arc::new(NullSink))
    }

    /// Emit an event.
    pub fn emit(
        &self,
        component: Component,
        operation: &'static str,
        level: Level,
        message: impl Into<String>,
        context: &[(&str, &str)],
    ) {
        let event = DiagnosticEvent {
            component,
            operation,
            level,
            message: message.into(),
            context: context
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        self.sink.emit(&event);
    }

    /// Emit at debug level.
    pub fn debug(
        &self,
        component: Component,
        operation: &'static str,
        message: impl Into<String>,
        context: &[(&str, &str)],
    ) {
        self.emit(component, operation, Level::Debug, message, context);
    }

    /// Emit at info level.
    pub fn info(
        &self,
        component: Component,
        operation: &'static str,
        message: impl Into<String>,
        context: &[(&str, &str)],
    ) {
        self.emit(component, operation, Level::Info, message, context);
    }

    /// Emit at warn level.
    pub fn warn(
        &self,
        component: Component,
        operation: &'static str,
        message: impl Into<String>,
        context: &[(&str, &str)],
    ) {
        self.emit(component, operation, Level::Warn, message, context);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::log()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_context() {
        let sink = Arc::new(MemorySink::new());
        let diagnostics = Diagnostics::new(sink.clone());

        diagnostics.warn(
            Component::ThemePropertyResolver,
            "resolve_color",
            "using fallback",
            &[("path", "primary.x"), ("fallback", "#000")],
        );

        let events = sink.events_for("resolve_color");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::Warn);
        assert_eq!(events[0].component, Component::ThemePropertyResolver);
        assert_eq!(events[0].context_value("path"), Some("primary.x"));
        assert_eq!(events[0].context_value("missing"), None);

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_cloned_handles_share_sink() {
        let sink = Arc::new(MemorySink::new());
        let first = Diagnostics::new(sink.clone());
        let second = first.clone();

        first.debug(Component::SegregatedTheme, "merge", "a", &[]);
        second.debug(Component::SegregatedTheme, "clone", "b", &[]);
        assert_eq!(sink.events().len(), 2);
    }

    #[test]
    fn test_log_and_null_sinks_accept_events() {
        Diagnostics::log().info(Component::ThemeRegistry, "clear", "cleared", &[("count", "0")]);
        Diagnostics::silent().info(Component::ThemeRegistry, "clear", "cleared", &[]);
    }
}
