use safefile::logging::JsonlSink;
use safefile::policy::Policy;
use safefile::SafeFiles;

use crate::common::{leftover_temps, with_temp_root, TestAudit, TestEmitter};

#[test]
fn write_file_stores_exact_bytes() {
    let td = with_temp_root();
    let name = td.path().join("safefile-test2");
    safefile::write_file(&name, b"Testing WriteFile", 0o666).unwrap();
    assert_eq!(std::fs::read_to_string(&name).unwrap(), "Testing WriteFile");
    assert!(leftover_temps(td.path()).is_empty());
}

#[test]
fn write_file_handles_empty_and_binary_payloads() {
    let td = with_temp_root();
    let empty = td.path().join("empty");
    safefile::write_file(&empty, b"", 0o644).unwrap();
    assert_eq!(std::fs::metadata(&empty).unwrap().len(), 0);

    let binary: Vec<u8> = (0..=255u8).cycle().take(3 * 65_536 + 17).collect();
    let bin = td.path().join("blob");
    let report = safefile::write_file(&bin, &binary, 0o644).unwrap();
    assert_eq!(report.bytes_written, binary.len() as u64);
    assert_eq!(std::fs::read(&bin).unwrap(), binary);
}

#[test]
fn write_file_overwrites_previous_content_completely() {
    let td = with_temp_root();
    let target = td.path().join("save.bin");
    safefile::write_file(&target, b"a much longer first version", 0o644).unwrap();
    safefile::write_file(&target, b"v2", 0o644).unwrap();
    assert_eq!(std::fs::read(&target).unwrap(), b"v2");
}

#[test]
fn temp_path_shares_the_target_directory() {
    let td = with_temp_root();
    let api = SafeFiles::new(JsonlSink, JsonlSink, Policy::default());
    let target = td.path().join("nested");
    std::fs::create_dir(&target).unwrap();
    let f = api.create(target.join("rel.txt"), 0o644).unwrap();
    assert_eq!(f.temp_path().parent(), Some(target.as_path()));
}

#[test]
fn facade_write_file_emits_one_session() {
    let facts = TestEmitter::default();
    let api = SafeFiles::new(facts.clone(), TestAudit::default(), Policy::default());
    let td = with_temp_root();
    api.write_file(td.path().join("one"), "text", 0o644).unwrap();
    let evs = facts.events.lock().unwrap();
    let ids: std::collections::HashSet<_> = evs
        .iter()
        .filter_map(|(_, _, _, f)| f.get("session_id").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(ids.len(), 1);
}
