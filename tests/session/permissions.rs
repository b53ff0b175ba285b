use std::os::unix::fs::PermissionsExt;

use rustix::fs::Mode;
use rustix::process::umask;
use serial_test::serial;

use crate::common::with_temp_root;

// Mode bits are filtered by the process umask, which is process-wide state;
// every test here runs serially so one test's umask never leaks into another.

#[test]
#[serial]
fn committed_file_carries_requested_mode() {
    let td = with_temp_root();
    let target = td.path().join("secret");
    safefile::write_file(&target, b"k", 0o600).unwrap();
    let mode = std::fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
#[serial]
fn commit_replaces_mode_of_previous_file() {
    let td = with_temp_root();
    let target = td.path().join("script");
    std::fs::write(&target, b"old").unwrap();
    std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o644)).unwrap();

    safefile::write_file(&target, b"new", 0o700).unwrap();
    let mode = std::fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o700);
}

#[test]
#[serial]
fn temp_file_is_created_with_mode_before_commit() {
    let td = with_temp_root();
    let f = safefile::create(td.path().join("m"), 0o600).unwrap();
    assert_eq!(f.mode(), 0o600);
    let mode = std::fs::metadata(f.temp_path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
#[serial]
fn process_umask_filters_requested_mode() {
    let prev = umask(Mode::from_bits_truncate(0o077));
    let td = with_temp_root();
    let target = td.path().join("masked");
    let res = safefile::write_file(&target, b"m", 0o666);
    umask(prev);
    res.unwrap();
    let mode = std::fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
