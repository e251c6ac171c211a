//! File watcher for the served document.
//!
//! Watches exactly one path, non-recursively, on a dedicated thread and
//! calls the change handler for every content-relevant event.
//!
//! ```text
//! notify → std mpsc → watch thread (classify, debounce, re-attach) → on_change
//! ```
//!
//! With the default zero debounce window each notification is delivered on
//! its own, duplicates included. When the file is removed or replaced by a
//! rename the OS-level watch is dropped and re-attached as soon as the path
//! exists again.

mod debouncer;
mod types;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

use crate::logger::{status_error, status_warning};
use crate::reload::ChangeHandler;
use crate::{debug, log};
use debouncer::Debouncer;
use types::ChangeKind;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("cannot watch \"{}\": file does not exist", .0.display())]
    Missing(PathBuf),

    #[error("failed to watch \"{}\"", .path.display())]
    Notify {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("failed to start watch thread")]
    Thread(#[source] std::io::Error),
}

/// Running watch subscription. Dropping it stops the watch thread.
pub struct WatchHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WatchHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start watching `path`, calling `handler` on every change.
///
/// Fails if the path does not exist or the OS refuses the watch. Failures
/// after this returns only degrade live reload and are logged.
pub fn watch(
    path: &Path,
    handler: Arc<dyn ChangeHandler>,
    debounce: Duration,
) -> Result<WatchHandle, WatchError> {
    if !path.exists() {
        return Err(WatchError::Missing(path.to_path_buf()));
    }

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })
    .map_err(|source| notify_error(path, source))?;
    watcher
        .watch(path, RecursiveMode::NonRecursive)
        .map_err(|source| notify_error(path, source))?;

    let stop = Arc::new(AtomicBool::new(false));
    let state = WatchLoop {
        path: path.to_path_buf(),
        watcher,
        attached: true,
        handler,
        debouncer: Debouncer::new(debounce),
        stop: Arc::clone(&stop),
    };
    let thread = std::thread::Builder::new()
        .name("sol-watch".into())
        .spawn(move || state.run(rx))
        .map_err(WatchError::Thread)?;

    Ok(WatchHandle {
        stop,
        thread: Some(thread),
    })
}

fn notify_error(path: &Path, source: notify::Error) -> WatchError {
    WatchError::Notify {
        path: path.to_path_buf(),
        source,
    }
}

struct WatchLoop {
    path: PathBuf,
    /// Kept alive for the life of the thread.
    watcher: RecommendedWatcher,
    attached: bool,
    handler: Arc<dyn ChangeHandler>,
    debouncer: Debouncer,
    stop: Arc<AtomicBool>,
}

impl WatchLoop {
    fn run(mut self, rx: mpsc::Receiver<notify::Result<notify::Event>>) {
        while !self.stop.load(Ordering::SeqCst) {
            match rx.recv_timeout(self.debouncer.sleep_duration()) {
                Ok(Ok(event)) => self.on_event(&event),
                Ok(Err(e)) => status_error("watch error", &e.to_string()),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.maintain();
            if let Some(burst) = self.debouncer.take_if_ready() {
                debug!("watch"; "{} events coalesced", burst.len());
                self.handler.on_change();
            }
        }
        debug!("watch"; "stopped watching {}", self.path.display());
    }

    fn on_event(&mut self, event: &notify::Event) {
        let Some(kind) = ChangeKind::from_event(&event.kind) else {
            return;
        };
        debug!("watch"; "{}: {}", kind.label(), self.path.display());

        if kind.detaches() {
            let _ = self.watcher.unwatch(&self.path);
            self.attached = false;
            if !self.path.exists() {
                status_warning(&format!(
                    "{} was removed, live reload paused until it returns",
                    self.path.display()
                ));
            }
        }

        if self.debouncer.is_passthrough() {
            self.handler.on_change();
        } else {
            self.debouncer.add(kind);
        }
    }

    /// Re-attach the OS watch once the file exists again.
    fn maintain(&mut self) {
        if self.attached || !self.path.exists() {
            return;
        }
        match self.watcher.watch(&self.path, RecursiveMode::NonRecursive) {
            Ok(()) => {
                self.attached = true;
                log!("watch"; "re-attached {}", self.path.display());
                self.handler.on_change();
            }
            Err(e) => debug!("watch"; "re-attach failed: {}", e),
        }
    }
}
