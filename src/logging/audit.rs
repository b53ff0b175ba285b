// Audit helpers that emit one fact per session stage.
//
// Every fact carries a minimal envelope: `schema_version`, `ts`, `session_id`,
// `path`, `stage`, `decision`. Redaction (when enabled by policy) zeroes the
// timestamp and drops volatile fields before the emitter sees the event.
use serde_json::{json, Value};

use crate::constants::{SCHEMA_VERSION, SUBSYSTEM};
use crate::logging::{now_iso, redact_event, FactsEmitter};

/// Per-session emission context.
#[derive(Clone, Copy)]
pub struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub session_id: &'a str,
    pub redact: bool,
}

impl<'a> AuditCtx<'a> {
    pub(crate) fn new(facts: &'a dyn FactsEmitter, session_id: &'a str, redact: bool) -> Self {
        Self {
            facts,
            session_id,
            redact,
        }
    }
}

/// Stage for typed audit emission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Allocate,
    Commit,
    Abandon,
}

impl Stage {
    #[must_use]
    pub const fn as_event(&self) -> &'static str {
        match self {
            Stage::Allocate => "allocate",
            Stage::Commit => "commit",
            Stage::Abandon => "abandon",
        }
    }
}

/// Decision severity for audit events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Success,
    Failure,
    Warn,
}

impl Decision {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
            Decision::Warn => "warn",
        }
    }
}

/// Builder facade over audit emission with centralized envelope+redaction.
pub struct StageLogger<'a> {
    ctx: AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    #[must_use]
    pub fn new(ctx: AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    #[must_use]
    pub fn stage(&self, stage: Stage) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, stage)
    }

    #[must_use]
    pub fn allocate(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Allocate)
    }

    #[must_use]
    pub fn commit(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Commit)
    }

    #[must_use]
    pub fn abandon(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Abandon)
    }
}

pub struct EventBuilder<'a> {
    ctx: AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.fields.insert("path".into(), json!(path.into()));
        self
    }

    #[must_use]
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn emit(mut self, decision: Decision) {
        self.fields
            .entry("decision")
            .or_insert(json!(decision.as_str()));
        self.fields
            .entry("schema_version")
            .or_insert(json!(SCHEMA_VERSION));
        self.fields.entry("ts").or_insert_with(|| json!(now_iso()));
        self.fields
            .entry("session_id")
            .or_insert(json!(self.ctx.session_id));
        self.fields.entry("path").or_insert(json!(""));
        let fields = Value::Object(self.fields);
        let out = if self.ctx.redact {
            redact_event(fields)
        } else {
            fields
        };
        self.ctx
            .facts
            .emit(SUBSYSTEM, self.stage.as_event(), decision.as_str(), out);
    }

    pub fn emit_success(self) {
        self.emit(Decision::Success);
    }

    pub fn emit_failure(self) {
        self.emit(Decision::Failure);
    }

    pub fn emit_warn(self) {
        self.emit(Decision::Warn);
    }
}
