use log::Level;
use serde_json::Value;

/// Receives one structured fact per protocol stage (`allocate`, `commit`, `abandon`).
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Receives human-readable messages, e.g. cleanup failures during `Drop`.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// Default sink: discards facts and forwards audit messages to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        log::trace!(target: "safefile::facts", "{subsystem} {event} {decision} {fields}");
    }
}

impl AuditSink for JsonlSink {
    fn log(&self, level: Level, msg: &str) {
        log::log!(target: "safefile", level, "{msg}");
    }
}
