//! Reparse-on-save for a single Markdown file.
//!
//! Events come from the notify crate. Because editors often save through a
//! rename or a burst of writes, the watcher observes the parent directory
//! and reports a change only once the burst has been quiet for the debounce
//! interval.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::document::MarkdownDocument;
use crate::perf;

/// Settles a burst of notifications into one change.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    interval: Duration,
    pending_since: Option<Instant>,
}

impl Debounce {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending_since: None,
        }
    }

    /// Record activity at `now`, restarting the quiet period.
    pub const fn touch(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    pub const fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Whether a change is settled at `now`. Consumes the pending change.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.saturating_duration_since(since) >= self.interval => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}

/// Watches one Markdown file and reparses it after it settles.
pub struct DocumentWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    target: WatchTarget,
    debounce: Debounce,
}

impl DocumentWatcher {
    /// Start watching `path`.
    ///
    /// # Errors
    /// Returns an error if the platform watcher cannot be created or the
    /// parent directory cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        let target = WatchTarget::new(path.as_ref());
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&target.root, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %target.path.display(), "watching document");

        Ok(Self {
            _watcher: watcher,
            rx,
            target,
            debounce: Debounce::new(debounce),
        })
    }

    /// Canonical path of the watched file.
    pub fn path(&self) -> &Path {
        &self.target.path
    }

    /// Drain pending notifications; true once a change has settled.
    pub fn poll_change(&mut self) -> bool {
        let mut relevant = 0u32;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.target.matches(&ev) => relevant += 1,
                Ok(ev) => perf::log_event(
                    "watcher.ignored",
                    format!("kind={:?} paths={:?}", ev.kind, ev.paths),
                ),
                Err(err) => tracing::warn!(%err, "watch error"),
            }
        }
        let now = Instant::now();
        if relevant > 0 {
            perf::log_event("watcher.events", format!("relevant={relevant}"));
            self.debounce.touch(now);
        }
        self.debounce.settle(now)
    }

    /// Block until a change settles, checking every `poll` interval.
    /// Gives up and returns false at `deadline`, if one is set.
    pub fn wait_for_change(&mut self, poll: Duration, deadline: Option<Instant>) -> bool {
        loop {
            if self.poll_change() {
                return true;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return false;
            }
            std::thread::sleep(poll);
        }
    }

    /// Read and parse the watched file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read as UTF-8.
    pub fn reload(&self) -> Result<MarkdownDocument> {
        load_document(&self.target.path)
    }
}

/// Read `path` and parse it.
///
/// # Errors
/// Returns an error if the file cannot be read as UTF-8.
pub fn load_document(path: &Path) -> Result<MarkdownDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(crate::parser::parse(&text))
}

#[derive(Debug, Clone)]
struct WatchTarget {
    path: PathBuf,
    name: Option<OsString>,
    root: PathBuf,
}

impl WatchTarget {
    fn new(path: &Path) -> Self {
        // OS event paths are canonical.
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let name = path.file_name().map(std::ffi::OsStr::to_os_string);
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self { path, name, root }
    }

    /// Some backends only report the directory, so that counts too.
    fn matches(&self, event: &Event) -> bool {
        event.paths.iter().any(|p| {
            p == &self.root
                || p == &self.path
                || self
                    .name
                    .as_ref()
                    .is_some_and(|name| p.file_name() == Some(name.as_os_str()))
        })
    }
}
