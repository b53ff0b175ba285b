use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

pub fn now_iso() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Zero the timestamp and drop fields that vary from run to run.
///
/// Temporary names embed a random nonce, so `temp_path` is masked too.
pub fn redact_event(mut v: Value) -> Value {
    if let Some(obj) = v.as_object_mut() {
        obj.insert("ts".into(), Value::String(TS_ZERO.to_string()));
        obj.remove("fsync_ms");
        obj.remove("severity");
        obj.remove("after_hash");
        obj.remove("hash_alg");
        obj.remove("session_id");
        if obj.contains_key("temp_path") {
            obj.insert("temp_path".into(), Value::String("***".into()));
        }
    }
    v
}
