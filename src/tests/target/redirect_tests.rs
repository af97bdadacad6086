//! Tests for the redirection state machine.

use std::fs::{self, OpenOptions};
#[cfg(target_os = "linux")]
use std::path::Path;
use std::sync::Arc;

use crate::tests::{line, lines};
use crate::{
    ColorSpec, InMemorySink, LogError, OutputTarget, SharedFile, TargetMode, TargetOptions,
};

fn memory_target(mem: &InMemorySink) -> OutputTarget {
    OutputTarget::new(
        Box::new(mem.clone()),
        TargetOptions::new()
            .with_timestamps(false)
            .with_color(Some(ColorSpec::default_log())),
    )
}

#[test]
fn redirect_to_file_drains_partial_line_to_old_destination() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let mem = InMemorySink::new("mem");
    let target = memory_target(&mem);

    target.append(b"partial");
    target.redirect(&path).unwrap();

    assert_eq!(mem.contents(), line("partial"));
    assert_eq!(target.mode(), TargetMode::OwnedFile);
    assert!(target.owns_handle());
    assert!(!target.supports_color());
    assert_eq!(target.id(), path.to_string_lossy());

    target.append(b"into file");
    target.flush_line();

    assert_eq!(fs::read(&path).unwrap(), line("into file"));
    assert_eq!(mem.contents(), line("partial"));
}

#[test]
fn redirect_with_empty_buffer_writes_nothing_to_old_destination() {
    let dir = tempfile::tempdir().unwrap();
    let mem = InMemorySink::new("mem");
    let target = memory_target(&mem);

    target.redirect(dir.path().join("a.log")).unwrap();

    assert!(mem.contents().is_empty());
}

#[test]
fn redirect_appends_to_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    fs::write(&path, line("earlier run")).unwrap();
    let target = memory_target(&InMemorySink::new("mem"));

    target.redirect(&path).unwrap();
    target.append(b"this run");
    target.flush_line();

    assert_eq!(fs::read(&path).unwrap(), lines(&["earlier run", "this run"]));
}

#[test]
fn failed_redirect_keeps_previous_destination() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("no-such-dir").join("app.log");
    let mem = InMemorySink::terminal("tty");
    let target = memory_target(&mem);

    target.append(b"kept");
    let err = target.redirect(&bad).unwrap_err();

    assert!(matches!(err, LogError::Open { .. }));
    assert_eq!(target.mode(), TargetMode::Colored);
    assert!(mem.contents().is_empty(), "nothing drained on failure");

    target.flush_line();
    assert!(mem.contents_string().contains("kept"));
}

#[test]
fn redirect_between_owned_files() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");
    let target = memory_target(&InMemorySink::new("mem"));

    target.redirect(&first).unwrap();
    target.append(b"one");
    target.flush_line();
    target.append(b"two");
    target.redirect(&second).unwrap();
    target.append(b"three");
    target.flush_line();

    assert_eq!(fs::read(&first).unwrap(), lines(&["one", "two"]));
    assert_eq!(fs::read(&second).unwrap(), line("three"));
}

/// Open descriptors of this process that refer to `path`.
#[cfg(target_os = "linux")]
fn open_descriptors(path: &Path) -> usize {
    let path = path.canonicalize().unwrap();
    fs::read_dir("/proc/self/fd")
        .unwrap()
        .filter_map(|entry| fs::read_link(entry.ok()?.path()).ok())
        .filter(|target| *target == path)
        .count()
}

#[cfg(target_os = "linux")]
#[test]
fn redirect_closes_the_previous_owned_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");
    let target = memory_target(&InMemorySink::new("mem"));

    target.redirect(&first).unwrap();
    assert_eq!(open_descriptors(&first), 1);

    target.redirect(&second).unwrap();
    assert_eq!(open_descriptors(&first), 0);
    assert_eq!(open_descriptors(&second), 1);

    target.redirect_handle(Box::new(InMemorySink::new("other")));
    assert_eq!(open_descriptors(&second), 0);

    drop(target);
    assert_eq!(open_descriptors(&first), 0);
    assert_eq!(open_descriptors(&second), 0);
}

#[cfg(target_os = "linux")]
#[test]
fn dropping_the_target_closes_its_owned_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let target = memory_target(&InMemorySink::new("mem"));

    target.redirect(&path).unwrap();
    target.append(b"last");
    assert_eq!(open_descriptors(&path), 1);
    drop(target);

    assert_eq!(open_descriptors(&path), 0);
    assert_eq!(fs::read(&path).unwrap(), line("last"));
}

#[test]
fn redirect_to_console_handle_restores_color() {
    let dir = tempfile::tempdir().unwrap();
    let tty = InMemorySink::terminal("tty");
    let target = memory_target(&InMemorySink::new("mem"));

    target.redirect(dir.path().join("a.log")).unwrap();
    target.redirect_handle(Box::new(tty.clone()));

    assert_eq!(target.mode(), TargetMode::Colored);
    assert!(!target.owns_handle());

    target.append(b"back");
    target.flush_line();
    assert!(tty.contents().starts_with(b"\x1b["));
}

#[test]
fn redirect_to_shared_file_seeks_to_end_and_leaves_it_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.log");
    fs::write(&path, line("existing")).unwrap();
    let file = Arc::new(OpenOptions::new().write(true).open(&path).unwrap());
    let target = memory_target(&InMemorySink::new("mem"));

    target.redirect_handle(Box::new(SharedFile::new("shared", Arc::clone(&file))));
    assert_eq!(target.mode(), TargetMode::Plain);
    target.append(b"appended");
    target.flush_line();

    target.redirect_handle(Box::new(InMemorySink::new("other")));
    assert_eq!(Arc::strong_count(&file), 1, "target released its reference");
    #[cfg(target_os = "linux")]
    assert_eq!(open_descriptors(&path), 1, "caller's file still open");
    std::io::Write::write_all(&mut &*file, &line("caller")).unwrap();

    assert_eq!(
        fs::read(&path).unwrap(),
        lines(&["existing", "appended", "caller"])
    );
}

#[test]
fn redirect_only_drains_the_calling_threads_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let mem = InMemorySink::new("mem");
    let target = memory_target(&mem);

    let other = target.clone();
    let (started, wait_started) = std::sync::mpsc::channel();
    let (go, wait_go) = std::sync::mpsc::channel::<()>();
    let worker = std::thread::spawn(move || {
        other.append(b"worker line");
        started.send(()).unwrap();
        wait_go.recv().unwrap();
        other.flush_line();
    });

    wait_started.recv().unwrap();
    target.append(b"main line");
    target.redirect(&path).unwrap();
    go.send(()).unwrap();
    worker.join().unwrap();

    assert_eq!(mem.contents(), line("main line"));
    assert_eq!(fs::read(&path).unwrap(), line("worker line"));
}
