//! Lock file acquisition, contention and release.

use std::thread;
use std::time::{Duration, Instant};

use oskit::{LockFile, LockOptions, OskitError};
use tempfile::tempdir;

#[test]
fn lock_file_exists_while_held_and_gone_after_drop() {
    let td = tempdir().unwrap();
    let path = td.path().join("guard.lock");

    let lock = LockFile::acquire(&path).unwrap();
    assert!(path.exists());
    assert!(lock.path().is_absolute());
    assert!(lock.path().ends_with("guard.lock"));

    drop(lock);
    assert!(!path.exists());
}

#[test]
fn second_acquire_times_out_while_first_held() {
    let td = tempdir().unwrap();
    let path = td.path().join("contended.lock");
    let first = LockFile::acquire(&path).unwrap();

    let options = LockOptions {
        max_wait: Some(Duration::from_millis(120)),
        first_delay: Duration::from_millis(10),
        ..LockOptions::default()
    };
    let started = Instant::now();
    let err = LockFile::acquire_with(&path, options).unwrap_err();
    assert!(matches!(err, OskitError::Timeout(_)));
    assert!(started.elapsed() >= Duration::from_millis(120));

    // Still solely owned by the first instance.
    assert!(path.exists());
    drop(first);
    assert!(!path.exists());
}

#[test]
fn waiter_acquires_after_holder_drops() {
    let td = tempdir().unwrap();
    let path = td.path().join("handoff.lock");
    let first = LockFile::acquire(&path).unwrap();

    let waiter = {
        let path = path.clone();
        thread::spawn(move || {
            let options = LockOptions {
                max_wait: Some(Duration::from_secs(10)),
                first_delay: Duration::from_millis(5),
                ..LockOptions::default()
            };
            LockFile::acquire_with(&path, options).map(|lock| lock.path().to_path_buf())
        })
    };

    thread::sleep(Duration::from_millis(50));
    drop(first);

    let acquired = waiter.join().unwrap().unwrap();
    assert!(acquired.ends_with("handoff.lock"));
}

#[test]
fn try_acquire_reports_contention() {
    let td = tempdir().unwrap();
    let path = td.path().join("try.lock");

    let held = LockFile::acquire(&path).unwrap();
    assert!(LockFile::try_acquire(&path).unwrap().is_none());

    drop(held);
    assert!(LockFile::try_acquire(&path).unwrap().is_some());
}

#[test]
fn reacquire_after_release() {
    let td = tempdir().unwrap();
    let path = td.path().join("serial.lock");

    for _ in 0..3 {
        let lock = LockFile::acquire(&path).unwrap();
        assert!(path.exists());
        drop(lock);
        assert!(!path.exists());
    }
}

#[test]
fn non_contention_errors_propagate_immediately() {
    let td = tempdir().unwrap();

    // A directory cannot be opened as a lock file.
    let started = Instant::now();
    let err = LockFile::acquire_with(
        td.path(),
        LockOptions {
            max_wait: Some(Duration::from_secs(5)),
            ..LockOptions::default()
        },
    )
    .unwrap_err();

    assert!(matches!(err, OskitError::Io(_)));
    // No retry window was consumed.
    assert!(started.elapsed() < Duration::from_secs(1));
}
