use std::io::Write;

use safefile::policy::Policy;
use safefile::{ErrorKind, SafeFiles, SessionState};

use crate::common::{leftover_temps, with_temp_root, TestAudit, TestEmitter};

#[test]
fn close_without_commit_leaves_nothing() {
    let td = with_temp_root();
    let name = td.path().join("safefile-test3");
    let mut f = safefile::create(&name, 0o666).unwrap();
    let tmp = f.temp_path().to_path_buf();
    f.close().unwrap();
    assert!(!name.exists());
    assert!(!tmp.exists());
    assert_eq!(f.state(), SessionState::Closed);
}

#[test]
fn abandon_leaves_existing_target_untouched() {
    let td = with_temp_root();
    let target = td.path().join("keep");
    std::fs::write(&target, b"original").unwrap();

    let mut f = safefile::create(&target, 0o644).unwrap();
    f.write_all(b"discard me").unwrap();
    f.abandon().unwrap();
    assert_eq!(std::fs::read(&target).unwrap(), b"original");
    assert!(leftover_temps(td.path()).is_empty());
}

#[test]
fn close_is_idempotent_after_either_terminal_state() {
    let td = with_temp_root();
    let mut committed = safefile::create(td.path().join("a"), 0o644).unwrap();
    committed.commit().unwrap();
    committed.close().unwrap();
    committed.close().unwrap();

    let mut closed = safefile::create(td.path().join("b"), 0o644).unwrap();
    closed.close().unwrap();
    closed.close().unwrap();
    assert_eq!(closed.abandon().unwrap_err().kind, ErrorKind::InvalidState);
    assert_eq!(closed.commit().unwrap_err().kind, ErrorKind::InvalidState);
    assert!(!td.path().join("b").exists());
}

#[test]
fn write_after_close_fails_with_invalid_state() {
    let td = with_temp_root();
    let mut f = safefile::create(td.path().join("w"), 0o644).unwrap();
    f.close().unwrap();
    let err = f.append(b"late").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
    let ioe = f.write_all(b"late").unwrap_err();
    let inner = ioe
        .get_ref()
        .and_then(|e| e.downcast_ref::<safefile::Error>())
        .expect("safefile error inside io::Error");
    assert_eq!(inner.kind, ErrorKind::InvalidState);
}

#[test]
fn dropping_an_open_session_abandons_it() {
    let facts = TestEmitter::default();
    let api = SafeFiles::new(facts.clone(), TestAudit::default(), Policy::default());
    let td = with_temp_root();
    let target = td.path().join("dropped");
    let tmp = {
        let mut f = api.create(&target, 0o644).unwrap();
        f.write_all(b"in flight").unwrap();
        f.temp_path().to_path_buf()
    };
    assert!(!tmp.exists());
    assert!(!target.exists());
    assert_eq!(
        facts.stages().last().cloned(),
        Some(("abandon".to_string(), "success".to_string()))
    );
}

#[test]
fn dropping_after_commit_keeps_the_file() {
    let td = with_temp_root();
    let target = td.path().join("kept");
    {
        let mut f = safefile::create(&target, 0o644).unwrap();
        f.write_all(b"stays").unwrap();
        f.commit().unwrap();
    }
    assert_eq!(std::fs::read(&target).unwrap(), b"stays");
}

#[test]
fn unwinding_through_an_open_session_cleans_up() {
    let td = with_temp_root();
    let target = td.path().join("panicky");
    let dir = td.path().to_path_buf();
    let res = std::panic::catch_unwind(move || {
        let mut f = safefile::create(&target, 0o644).unwrap();
        f.write_all(b"half").unwrap();
        panic!("caller failed mid-write");
    });
    assert!(res.is_err());
    assert!(leftover_temps(&dir).is_empty());
    assert!(!dir.join("panicky").exists());
}
