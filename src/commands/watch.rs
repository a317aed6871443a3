//! Regenerate adapters whenever a service source file is written.
//!
//! Filesystem events and the interrupt handler feed one channel, so shutdown
//! is observed between regenerations and never interrupts a write.

use super::generate::{generate_services, GenerateOptions};
use crate::errors::Result;
use crate::io::is_go_file;
use crate::tooling::check_file_compilable;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Quiet period after the last event before a batch is processed
const SETTLE_DELAY: Duration = Duration::from_millis(150);

enum WatchMessage {
    Fs(notify::Result<Event>),
    Shutdown,
}

/// Watch the services directory until interrupted
pub fn watch_services(options: &GenerateOptions) -> Result<()> {
    let services_dir = options.services_dir();
    let (tx, rx) = mpsc::channel();

    let shutdown_tx = tx.clone();
    ctrlc::set_handler(move || {
        if shutdown_tx.send(WatchMessage::Shutdown).is_err() {
            error!("Unable to deliver shutdown signal to the watcher");
        }
    })?;

    let mut watcher = RecommendedWatcher::new(
        move |result| {
            // The receiver only goes away once the loop has returned
            let _ = tx.send(WatchMessage::Fs(result));
        },
        Config::default(),
    )?;
    watcher.watch(&services_dir, RecursiveMode::Recursive)?;
    info!("Watching for changes in {}", services_dir.display());

    run_event_loop(options, &rx);

    info!("Stopping watcher");
    Ok(())
}

fn run_event_loop(options: &GenerateOptions, rx: &Receiver<WatchMessage>) {
    while let Some(changed) = next_batch(rx) {
        if !changed.is_empty() {
            handle_changes(options, &changed);
        }
    }
}

/// Block for the next event, then gather everything arriving within the settle delay.
///
/// Returns `None` once shutdown was requested or every sender is gone.
fn next_batch(rx: &Receiver<WatchMessage>) -> Option<BTreeSet<PathBuf>> {
    let mut changed = BTreeSet::new();
    let mut message = rx.recv().ok()?;

    loop {
        match message {
            WatchMessage::Shutdown => return None,
            WatchMessage::Fs(Ok(event)) => changed.extend(written_go_files(&event)),
            WatchMessage::Fs(Err(e)) => warn!("Watch error: {}", e),
        }

        message = match rx.recv_timeout(SETTLE_DELAY) {
            Ok(next) => next,
            Err(RecvTimeoutError::Timeout) => return Some(changed),
            Err(RecvTimeoutError::Disconnected) => return None,
        };
    }
}

fn handle_changes(options: &GenerateOptions, changed: &BTreeSet<PathBuf>) {
    for path in changed {
        info!("Modified file: {}", path.display());
        if let Err(e) = check_file_compilable(path) {
            warn!("Skipping regeneration: {}", e);
            return;
        }
    }

    match generate_services(options) {
        Ok(report) => info!(
            "Regenerated {} service(s), {} skipped",
            report.generated.len(),
            report.skipped.len()
        ),
        Err(e) if e.is_source_error() => warn!("Regeneration failed: {}", e),
        Err(e) => error!("Regeneration failed: {}", e),
    }
}

/// Go files whose contents were written by this event.
///
/// Saving by renaming a temporary file into place counts as a write of the
/// destination.
fn written_go_files(event: &Event) -> Vec<PathBuf> {
    let written: &[PathBuf] = match event.kind {
        EventKind::Modify(ModifyKind::Data(_))
        | EventKind::Modify(ModifyKind::Any)
        | EventKind::Modify(ModifyKind::Name(RenameMode::To))
        | EventKind::Create(_) => &event.paths,
        // Paths are [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.last().map(std::slice::from_ref).unwrap_or_default()
        }
        _ => {
            debug!("Ignoring event {:?}", event.kind);
            &[]
        }
    };
    written
        .iter()
        .filter(|path| is_go_file(path))
        .cloned()
        .collect()
}
