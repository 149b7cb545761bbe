//! Observability subsystem
//!
//! Structured JSON log lines for lifecycle, topology and replication events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on replication state
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use nodestat::observability::{log_event_at, log_event_with_fields, Event, Severity};
//!
//! log_event_with_fields(Event::PeerAdded, &[("peer", "2")]);
//! log_event_at(Severity::Warn, Event::VclockRegression, &[("node_id", "3")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

#[cfg(test)]
pub(crate) use logger::capture_log;

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

/// Log an event at an explicit severity
pub fn log_event_at(severity: Severity, event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity, event.as_str(), fields);
}
