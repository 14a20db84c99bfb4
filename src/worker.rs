//! Background scan worker.
//!
//! Detection runs on one named thread. Everything the foreground learns about
//! the scan arrives as [`ScanEvent`]s over a bounded crossbeam channel with a
//! single producer and a single consumer, so events are observed in exactly
//! the order the worker emitted them.
//!
//! The worker never shares the [`ScanResult`] it builds. Each pair travels as
//! a [`ScanEvent::PairFound`] and [`ScanHandle::wait`] reassembles the result
//! on the consumer side, which then owns it outright.
//!
//! ```no_run
//! use dupes2trash::duplicates::FinderConfig;
//! use dupes2trash::worker::{start_scan, ScanEvent};
//! use std::path::PathBuf;
//!
//! let handle = start_scan(PathBuf::from("."), FinderConfig::default()).unwrap();
//! let (result, summary) = handle
//!     .wait(|event| {
//!         if let ScanEvent::Progress { processed, total } = event {
//!             eprintln!("{processed}/{total}");
//!         }
//!     })
//!     .unwrap();
//! println!("{} pairs in {:?}", result.len(), summary.scan_duration);
//! ```

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::duplicates::{
    DuplicateFinder, DuplicatePair, FinderConfig, FinderError, ScanResult, ScanSummary,
};
use crate::progress::{ProgressCallback, PHASE_COMPARE};

/// Maximum number of events that may queue up before the worker blocks.
pub const EVENT_CHANNEL_CAPACITY: usize = 1_024;

/// Name of the worker thread.
pub const WORKER_THREAD_NAME: &str = "dupes2trash-scanner";

/// Messages sent from the worker to the foreground.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// The worker accepted the root and started walking.
    Started {
        /// Root directory being scanned.
        root: PathBuf,
    },
    /// The walk discovered another regular file.
    Discovered {
        /// Files discovered so far.
        files: usize,
    },
    /// Pairwise comparison is about to begin.
    Comparing {
        /// Files that will be compared.
        total: usize,
    },
    /// Another comparison source has been fully processed.
    Progress {
        /// Files processed so far.
        processed: usize,
        /// Files that will be compared in total.
        total: usize,
    },
    /// A new duplicate pair was confirmed.
    PairFound(DuplicatePair),
    /// The scan ended, normally or through cancellation.
    Finished(ScanSummary),
    /// The scan could not start.
    Failed(FinderError),
}

impl ScanEvent {
    /// Whether no further events will follow this one.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_) | Self::Failed(_))
    }
}

/// Errors surfaced by [`ScanHandle::wait`].
#[derive(thiserror::Error, Debug)]
pub enum WorkerError {
    /// The finder rejected the root directory.
    #[error(transparent)]
    Finder(#[from] FinderError),

    /// The worker stopped without reporting a result.
    #[error("scan worker exited without reporting a result")]
    Disconnected,
}

/// Forwards pipeline callbacks into the event channel.
struct ChannelReporter {
    tx: Sender<ScanEvent>,
    compare_total: AtomicUsize,
}

impl ChannelReporter {
    fn send(&self, event: ScanEvent) {
        // A closed channel means the consumer is gone; keep scanning quietly.
        if self.tx.send(event).is_err() {
            log::trace!("Scan event dropped, receiver disconnected");
        }
    }
}

impl ProgressCallback for ChannelReporter {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if phase == PHASE_COMPARE {
            self.compare_total.store(total, Ordering::Relaxed);
            self.send(ScanEvent::Comparing { total });
        }
    }

    fn on_progress(&self, current: usize, _path: &str) {
        let total = self.compare_total.load(Ordering::Relaxed);
        if total == 0 {
            self.send(ScanEvent::Discovered { files: current });
        } else {
            self.send(ScanEvent::Progress {
                processed: current,
                total,
            });
        }
    }

    fn on_phase_end(&self, phase: &str) {
        log::trace!("Worker phase finished: {}", phase);
    }

    fn on_pair_found(&self, pair: &DuplicatePair) {
        self.send(ScanEvent::PairFound(pair.clone()));
    }
}

/// Handle to a running or completed scan.
pub struct ScanHandle {
    events: Receiver<ScanEvent>,
    cancel_flag: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl std::fmt::Debug for ScanHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanHandle")
            .field("cancelled", &self.is_cancelled())
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    /// The event receiver, for callers that poll instead of blocking.
    #[must_use]
    pub fn events(&self) -> &Receiver<ScanEvent> {
        &self.events
    }

    /// Block until the scan ends, passing every event to `on_event` in order.
    ///
    /// The result is rebuilt from the [`ScanEvent::PairFound`] events, so its
    /// order matches discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Finder`] if the root was rejected and
    /// [`WorkerError::Disconnected`] if the worker died without a final event.
    pub fn wait(
        mut self,
        mut on_event: impl FnMut(&ScanEvent),
    ) -> Result<(ScanResult, ScanSummary), WorkerError> {
        let mut result = ScanResult::new();
        let mut outcome = Err(WorkerError::Disconnected);

        for event in self.events.iter() {
            on_event(&event);
            match event {
                ScanEvent::PairFound(pair) => result.push(pair),
                ScanEvent::Finished(summary) => {
                    outcome = Ok(summary);
                    break;
                }
                ScanEvent::Failed(err) => {
                    outcome = Err(WorkerError::Finder(err));
                    break;
                }
                _ => {}
            }
        }

        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Scan worker thread panicked");
            }
        }

        outcome.map(|summary| (result, summary))
    }
}

/// A handle dropped before [`ScanHandle::wait`] stops its worker.
impl Drop for ScanHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            log::debug!("Scan handle dropped while the worker may still run, cancelling");
            self.cancel();
        }
    }
}

/// Start a duplicate scan of `root` on a background thread.
///
/// The shutdown flag in `config`, if any, is shared with the handle so that
/// both Ctrl+C and [`ScanHandle::cancel`] stop the scan. The progress callback
/// in `config` is replaced by the channel.
///
/// # Errors
///
/// Returns an error if the worker thread cannot be spawned.
pub fn start_scan(root: PathBuf, config: FinderConfig) -> io::Result<ScanHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<ScanEvent>(EVENT_CHANNEL_CAPACITY);

    let cancel_flag = config
        .pairer_config
        .shutdown_flag
        .clone()
        .unwrap_or_else(|| Arc::new(AtomicBool::new(false)));

    let reporter = Arc::new(ChannelReporter {
        tx: tx.clone(),
        compare_total: AtomicUsize::new(0),
    });
    let config = config
        .with_shutdown_flag(Arc::clone(&cancel_flag))
        .with_progress_callback(reporter);

    let thread = thread::Builder::new()
        .name(WORKER_THREAD_NAME.into())
        .spawn(move || {
            log::debug!("Worker scanning {}", root.display());
            if let Err(err) = DuplicateFinder::validate_root(&root) {
                let _ = tx.send(ScanEvent::Failed(err));
                return;
            }

            let _ = tx.send(ScanEvent::Started { root: root.clone() });
            match DuplicateFinder::new(config).find_duplicates(&root) {
                Ok((_, summary)) => {
                    let _ = tx.send(ScanEvent::Finished(summary));
                }
                Err(err) => {
                    let _ = tx.send(ScanEvent::Failed(err));
                }
            }
        })?;

    Ok(ScanHandle {
        events: rx,
        cancel_flag,
        thread: Some(thread),
    })
}
