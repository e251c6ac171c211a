use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use notify::EventKind;
use notify::event::{
    AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode,
};
use tempfile::TempDir;

use super::debouncer::{Debouncer, TICK};
use super::types::ChangeKind;
use super::{WatchError, watch};
use crate::reload::ChangeHandler;

#[derive(Default)]
struct Counter(AtomicUsize);

impl Counter {
    fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl ChangeHandler for Counter {
    fn on_change(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn wait_until(deadline: Duration, mut check: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    check()
}

#[test]
fn test_change_kind_filters_noise() {
    assert_eq!(
        ChangeKind::from_event(&EventKind::Create(CreateKind::File)),
        Some(ChangeKind::Created)
    );
    assert_eq!(
        ChangeKind::from_event(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
        Some(ChangeKind::Modified)
    );
    assert_eq!(
        ChangeKind::from_event(&EventKind::Modify(ModifyKind::Any)),
        Some(ChangeKind::Modified)
    );
    assert_eq!(
        ChangeKind::from_event(&EventKind::Modify(ModifyKind::Name(RenameMode::From))),
        Some(ChangeKind::Renamed)
    );
    assert_eq!(
        ChangeKind::from_event(&EventKind::Remove(RemoveKind::File)),
        Some(ChangeKind::Removed)
    );
    assert_eq!(
        ChangeKind::from_event(&EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::WriteTime
        ))),
        None
    );
    assert_eq!(ChangeKind::from_event(&EventKind::Access(AccessKind::Any)), None);
}

#[test]
fn test_change_kind_unclassified_counts_as_modified() {
    assert_eq!(ChangeKind::from_event(&EventKind::Any), Some(ChangeKind::Modified));
    assert_eq!(ChangeKind::from_event(&EventKind::Other), Some(ChangeKind::Modified));
}

#[test]
fn test_detaches() {
    assert!(ChangeKind::Removed.detaches());
    assert!(ChangeKind::Renamed.detaches());
    assert!(!ChangeKind::Modified.detaches());
    assert!(!ChangeKind::Created.detaches());
}

#[test]
fn test_debouncer_empty() {
    let debouncer = Debouncer::new(Duration::from_millis(50));
    assert!(!debouncer.is_ready());
    assert_eq!(debouncer.sleep_duration(), TICK);
}

#[test]
fn test_debouncer_passthrough() {
    assert!(Debouncer::new(Duration::ZERO).is_passthrough());
    assert!(!Debouncer::new(Duration::from_millis(1)).is_passthrough());
}

#[test]
fn test_debouncer_coalesces_burst() {
    let mut debouncer = Debouncer::new(Duration::from_millis(30));
    debouncer.add(ChangeKind::Modified);
    debouncer.add(ChangeKind::Modified);
    debouncer.add(ChangeKind::Removed);
    assert!(debouncer.take_if_ready().is_none());
    assert!(debouncer.sleep_duration() <= Duration::from_millis(30));

    std::thread::sleep(Duration::from_millis(40));
    let burst = debouncer.take_if_ready().unwrap();
    assert_eq!(burst.len(), 3);
    assert!(debouncer.take_if_ready().is_none());
}

#[test]
fn test_watch_missing_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.html");
    let result = watch(&path, Arc::new(Counter::default()), Duration::ZERO);
    match result {
        Err(WatchError::Missing(missing)) => assert_eq!(missing, path),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("watching a missing file should fail"),
    }
}

#[test]
fn test_watch_reports_modification() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.html");
    std::fs::write(&path, "<p>one</p>").unwrap();

    let counter = Arc::new(Counter::default());
    let handle = watch(&path, counter.clone(), Duration::ZERO).unwrap();

    std::fs::write(&path, "<p>two</p>").unwrap();
    assert!(wait_until(Duration::from_secs(5), || counter.get() >= 1));
    handle.stop();
}

#[test]
fn test_watch_debounced_burst() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.html");
    std::fs::write(&path, "<p>0</p>").unwrap();

    let counter = Arc::new(Counter::default());
    let handle = watch(&path, counter.clone(), Duration::from_millis(200)).unwrap();

    for i in 1..=5 {
        std::fs::write(&path, format!("<p>{i}</p>")).unwrap();
    }
    assert!(wait_until(Duration::from_secs(5), || counter.get() >= 1));
    std::thread::sleep(Duration::from_millis(400));
    assert_eq!(counter.get(), 1);
    handle.stop();
}

#[test]
fn test_watch_reattaches_after_removal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.html");
    std::fs::write(&path, "<p>one</p>").unwrap();

    let counter = Arc::new(Counter::default());
    let _handle = watch(&path, counter.clone(), Duration::ZERO).unwrap();

    std::fs::remove_file(&path).unwrap();
    assert!(wait_until(Duration::from_secs(5), || counter.get() >= 1));

    let before = counter.get();
    std::fs::write(&path, "<p>back</p>").unwrap();
    assert!(wait_until(Duration::from_secs(5), || counter.get() > before));

    let before = counter.get();
    std::thread::sleep(Duration::from_millis(100));
    std::fs::write(&path, "<p>again</p>").unwrap();
    assert!(wait_until(Duration::from_secs(5), || counter.get() > before));
}
