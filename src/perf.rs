//! Timing scopes and an optional on-disk event log.
//!
//! Both are off by default. `--perf` turns on scope reporting on stderr and
//! `--debug-log` opens the event log; parse and reconcile passes write into
//! them so a slow edit can be traced back to the stage that caused it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);
static EVENT_LOG: LazyLock<Mutex<EventLog>> = LazyLock::new(|| Mutex::new(EventLog::new()));

/// Reports its own lifetime when dropped.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Scope {
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.elapsed_ms();
        tracing::debug!(scope = self.name, elapsed_ms, "perf scope");
        eprintln!("[perf] {}: {elapsed_ms:.2} ms", self.name);
        log_event("perf", format!("{} {elapsed_ms:.3} ms", self.name));
    }
}

#[derive(Debug)]
struct EventLog {
    start: Instant,
    writer: Option<BufWriter<File>>,
}

impl EventLog {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            writer: None,
        }
    }
}

fn event_log() -> MutexGuard<'static, EventLog> {
    EVENT_LOG.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Start writing events to `path`, or stop when `None`. A failed open
/// leaves the current log untouched.
///
/// # Errors
/// Returns any I/O error from creating the file or writing its banner.
pub fn set_event_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let writer = path.map(open_event_log).transpose()?;
    let previous = {
        let mut log = event_log();
        if writer.is_some() {
            log.start = Instant::now();
        }
        std::mem::replace(&mut log.writer, writer)
    };
    if let Some(mut previous) = previous {
        previous.flush()?;
    }
    Ok(())
}

fn open_event_log(path: &Path) -> std::io::Result<BufWriter<File>> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "mdsync event log start")?;
    writer.flush()?;
    Ok(writer)
}

pub fn is_event_log_enabled() -> bool {
    event_log().writer.is_some()
}

pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut log = event_log();
    let elapsed_ms = log.start.elapsed().as_secs_f64() * 1000.0;
    if let Some(writer) = log.writer.as_mut() {
        // Losing a diagnostic line is preferable to failing the edit.
        let _ = writeln!(
            writer,
            "[{elapsed_ms:>10.3} ms] {name}: {}",
            detail.as_ref()
        );
        let _ = writer.flush();
    }
}
