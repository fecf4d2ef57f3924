//! Temp file and directory lifecycle.

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use oskit::{OskitError, TempDir, TempFile};

#[test]
fn temp_file_created_then_deleted_on_drop() {
    let path: PathBuf;
    {
        let tf = TempFile::new().unwrap();
        path = tf.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.parent().unwrap(), std::env::temp_dir());
    }
    assert!(!path.exists());
}

#[test]
fn temp_file_handle_is_readable_and_writable() {
    let mut tf = TempFile::new().unwrap();
    tf.file_mut().write_all(b"payload").unwrap();
    tf.file_mut().seek(SeekFrom::Start(0)).unwrap();

    let mut contents = String::new();
    tf.file_mut().read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "payload");
}

#[test]
fn affixes_shape_the_name() {
    let tf = TempFile::with_affixes("report-", "txt").unwrap();
    let name = tf.path().file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("report-"));
    assert!(name.ends_with(".txt"));

    let dotted = TempFile::with_affixes("x", ".log").unwrap();
    let name = dotted.path().file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.ends_with(".log"));
    assert!(!name.ends_with("..log"));
}

#[test]
fn double_dot_affixes_rejected() {
    let err = TempFile::with_affixes("../escape", "").unwrap_err();
    assert!(matches!(err, OskitError::InvalidArgument(_)));

    let err = TempDir::with_prefix("..").unwrap_err();
    assert!(matches!(err, OskitError::InvalidArgument(_)));
}

#[test]
fn temp_file_in_dir() {
    let home = TempDir::new().unwrap();
    let tf = TempFile::in_dir(home.path()).unwrap();
    assert_eq!(tf.path().parent().unwrap(), home.path());

    let affixed = TempFile::in_dir_with_affixes(home.path(), "spool-", "dat").unwrap();
    let name = affixed.path().file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("spool-"));
    assert!(name.ends_with(".dat"));
}

#[test]
fn at_path_owns_and_deletes() {
    let home = TempDir::new().unwrap();
    let target = home.path().join("explicit.bin");
    {
        let _tf = TempFile::at_path(&target).unwrap();
        assert!(target.exists());
    }
    assert!(!target.exists());
}

#[test]
fn temp_dir_created_then_deleted_on_drop() {
    let path: PathBuf;
    {
        let td = TempDir::with_prefix("oskit-test-").unwrap();
        path = td.path().to_path_buf();
        assert!(path.is_dir());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("oskit-test-"));
    }
    assert!(!path.exists());
}

#[test]
fn subdirectories() {
    let td = TempDir::new().unwrap();

    let named = td.create_subdir("alpha/beta").unwrap();
    assert!(named.is_dir());
    assert!(named.starts_with(td.path()));

    let unique = td.create_unique_subdir("work-").unwrap();
    assert!(unique.is_dir());

    let err = td.create_subdir("../outside").unwrap_err();
    assert!(matches!(err, OskitError::InvalidArgument(_)));
}

#[test]
fn adopt_deletes_on_drop() {
    let scratch = tempfile::tempdir().unwrap();
    let dir = scratch.path().join("adopted");
    fs::create_dir(&dir).unwrap();
    {
        let _td = TempDir::adopt(&dir);
    }
    assert!(!dir.exists());
}

#[test]
fn delete_all_files_keeps_directories() {
    let td = TempDir::new().unwrap();
    let sub = td.create_subdir("nested").unwrap();
    fs::write(td.path().join("top.txt"), "top").unwrap();
    fs::write(sub.join("deep.txt"), "deep").unwrap();

    td.delete_all_files().unwrap();

    assert!(td.path().is_dir());
    assert!(sub.is_dir());
    assert!(!td.path().join("top.txt").exists());
    assert!(!sub.join("deep.txt").exists());
}

#[test]
fn unique_temp_paths_differ() {
    let a = oskit::unique_temp_path("probe-");
    let b = oskit::unique_temp_path("probe-");
    assert_ne!(a, b);
    assert!(a.starts_with(std::env::temp_dir()));
}
