//! Cancellation and Ctrl+C handling.
//!
//! A [`CancellationToken`] is a cloneable handle around one shared
//! `AtomicBool`. The walker, the pairer, and the trash executor all poll the
//! same flag, so one Ctrl+C stops whichever stage is running. The stage
//! returns what it has done so far instead of an error.
//!
//! ```rust,no_run
//! use dupes2trash::duplicates::FinderConfig;
//! use dupes2trash::signal::install_handler;
//!
//! let token = install_handler().expect("signal handler");
//! let config = FinderConfig::default().with_shutdown_flag(token.flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Exit status for a run stopped by SIGINT (128 + 2).
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clear a previous cancellation so the token can be reused.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// The underlying flag, for components configured with
    /// `with_shutdown_flag`.
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Error installing the Ctrl+C handler.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// `ctrlc` refused the handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static PROCESS_TOKEN: OnceLock<CancellationToken> = OnceLock::new();

/// Install the process-wide Ctrl+C handler and return its token.
///
/// `ctrlc` accepts one handler per process. Later calls, as happen when
/// several tests drive `run_app` in one binary, get the already-installed
/// token back with its flag cleared.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] when `ctrlc` rejects the handler
/// for a reason other than one already being registered.
pub fn install_handler() -> Result<CancellationToken, SignalError> {
    if let Some(token) = PROCESS_TOKEN.get() {
        token.reset();
        return Ok(token.clone());
    }

    let token = PROCESS_TOKEN.get_or_init(CancellationToken::new).clone();
    let flag = token.flag();

    let installed = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "\nInterrupted, finishing current file...");
        let _ = stderr.flush();
        log::info!("Interrupt received");
    });

    match installed {
        Ok(()) => Ok(token),
        Err(ctrlc::Error::MultipleHandlers) => {
            log::debug!("Ctrl+C handler already registered elsewhere, token is manual-only");
            Ok(token)
        }
        Err(e) => Err(SignalError::InstallFailed(e)),
    }
}
