//! File system watcher for live re-indexing.
//!
//! Monitors the content directory and re-runs the whole indexer after a
//! burst of changes settles.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     Event Loop                       │
//! │                                                      │
//! │  ┌──────────┐    ┌──────────┐    ┌────────────────┐  │
//! │  │ notify   │───▶│ Debouncer│───▶│ indexer::run() │  │
//! │  │ events   │    │ (300ms)  │    │  (full rerun)  │  │
//! │  └──────────┘    └──────────┘    └────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```

use crate::{config::SiteConfig, indexer, log};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::mpsc::{Receiver, RecvTimeoutError},
    time::{Duration, Instant},
};

// =============================================================================
// Constants
// =============================================================================

const DEBOUNCE_MS: u64 = 300;

// =============================================================================
// Path Utilities
// =============================================================================

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// A file the indexer would pick up: directly in `content_dir`, with the
/// content extension.
fn is_content_file(path: &Path, content_dir: &Path, extension: &str) -> bool {
    !is_temp_file(path)
        && path.parent() == Some(content_dir)
        && path.extension().is_some_and(|ext| ext == extension)
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing.
///
/// Only content files reach the debouncer, so the artifacts a re-index
/// writes never trigger another one. Every accepted event is indexed.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
        }
    }

    fn add(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        let before = self.pending.len();
        self.pending.extend(paths);
        if self.pending.len() > before {
            self.last_event = Some(Instant::now());
        }
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        let mut paths: Vec<_> = self.pending.drain().collect();
        paths.sort();
        paths
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Event Handler
// =============================================================================

/// Re-run the indexer for a batch of changed files.
/// Returns true if the run succeeded.
fn handle_changes(paths: &[PathBuf], config: &SiteConfig) -> bool {
    if paths.is_empty() {
        return false;
    }

    let names: Vec<_> = paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy())
        .collect();
    log!("watch"; "{} changed, re-indexing...", names.join(", "));

    match indexer::run(config) {
        Ok(_) => true,
        Err(e) => {
            log!("error"; "{e:#}");
            false
        }
    }
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

// =============================================================================
// Public API
// =============================================================================

/// Start blocking file watcher with debouncing and live re-indexing.
pub fn watch_for_changes_blocking(config: &SiteConfig) -> Result<()> {
    if !config.serve.watch {
        return Ok(());
    }

    let content_dir = &config.build.content;
    let extension = &config.build.extension;

    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    watcher
        .watch(content_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", content_dir.display()))?;

    let rel = content_dir
        .strip_prefix(config.get_root())
        .unwrap_or(content_dir);
    log!("watch"; "{}/*.{}", rel.display(), extension);

    event_loop(&rx, config);
    Ok(())
}

/// Debounce events from `rx` and re-index until the sender goes away.
///
/// Changes still pending when the channel closes are indexed before
/// returning.
fn event_loop(rx: &Receiver<notify::Result<Event>>, config: &SiteConfig) {
    let content_dir = &config.build.content;
    let extension = &config.build.extension;
    let mut debouncer = Debouncer::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) => {
                debouncer.add(
                    event
                        .paths
                        .into_iter()
                        .filter(|p| is_content_file(p, content_dir, extension)),
                );
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(RecvTimeoutError::Timeout) if debouncer.ready() => {
                handle_changes(&debouncer.take(), config);
            }
            Err(RecvTimeoutError::Disconnected) => {
                handle_changes(&debouncer.take(), config);
                break;
            }
            // Other cases: irrelevant events, timeout without ready, etc.
            _ => {}
        }
    }
}
