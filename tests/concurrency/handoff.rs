use std::io::Write;
use std::thread;

use safefile::policy::Policy;
use safefile::{AtomicFile, SafeFiles, SessionState};

use crate::common::{leftover_temps, with_temp_root, TestAudit, TestEmitter};

fn assert_send<T: Send>() {}

#[test]
fn sessions_are_send() {
    assert_send::<AtomicFile<'static>>();
}

#[test]
fn session_commits_on_a_worker_thread() {
    let td = with_temp_root();
    let target = td.path().join("handoff");
    let mut f = safefile::create(&target, 0o644).unwrap();
    f.write_all(b"abc").unwrap();

    let report = thread::spawn(move || {
        let report = f.commit().unwrap();
        assert_eq!(f.state(), SessionState::Committed);
        report
    })
    .join()
    .unwrap();

    assert_eq!(report.bytes_written, 3);
    assert_eq!(std::fs::read(&target).unwrap(), b"abc");
    assert!(leftover_temps(td.path()).is_empty());
}

#[test]
fn borrowed_session_moves_into_scoped_thread() {
    let facts = TestEmitter::default();
    let api = SafeFiles::new(facts.clone(), TestAudit::default(), Policy::default());
    let td = with_temp_root();
    let target = td.path().join("scoped");
    let mut f = api.create(&target, 0o600).unwrap();

    thread::scope(|s| {
        s.spawn(move || {
            f.append(b"from worker").unwrap();
            f.commit().unwrap();
        });
    });

    assert_eq!(std::fs::read(&target).unwrap(), b"from worker");
    assert_eq!(
        facts.stages(),
        [
            ("allocate".to_string(), "success".to_string()),
            ("commit".to_string(), "success".to_string()),
        ]
    );
}
