//! Cooperative cancellation and progress checkpoints for long operations.
//!
//! Everything in facecrate runs on the caller's thread. Long loops call
//! [`OperationControl::checkpoint`] every `checkpoint_interval` units of work;
//! that is where a host can report progress, yield to its event loop, or
//! request cancellation through a [`CancellationToken`].
//!
//! # Example
//!
//! ```
//! use facecrate_core::{CancellationToken, OperationControl, Progress};
//!
//! let token = CancellationToken::new();
//! let control = OperationControl::new()
//!     .with_cancellation(token.clone())
//!     .with_progress(Progress::new(|done, total, stage| {
//!         println!("[{done}/{total}] {stage}");
//!     }));
//!
//! token.cancel();
//! assert!(control.is_cancelled());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag a host sets to stop a running operation at its next poll.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// A progress callback invoked at checkpoints.
///
/// The callback receives:
/// - `current`: units of work done so far
/// - `total`: expected units of work (an estimate for decimation)
/// - `stage`: description of the running stage
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    #[inline]
    pub fn report(&self, current: usize, total: usize, stage: &str) {
        (self.callback)(current, total, stage);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

/// Cancellation and checkpoint settings handed to long-running operations.
#[derive(Debug)]
pub struct OperationControl {
    cancellation: Option<CancellationToken>,
    progress: Option<Progress>,
    /// Units of work between two checkpoints.
    pub checkpoint_interval: usize,
}

impl Default for OperationControl {
    fn default() -> Self {
        Self {
            cancellation: None,
            progress: None,
            checkpoint_interval: 256,
        }
    }
}

impl OperationControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_checkpoint_interval(mut self, interval: usize) -> Self {
        self.checkpoint_interval = interval.max(1);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Report progress when `done` lands on a checkpoint boundary.
    ///
    /// Returns `false` when the operation should stop.
    pub fn checkpoint(&self, done: usize, total: usize, stage: &str) -> bool {
        if done % self.checkpoint_interval.max(1) == 0 {
            if let Some(progress) = &self.progress {
                progress.report(done, total, stage);
            }
        }
        !self.is_cancelled()
    }

    /// Unconditional progress report, used at the end of a stage.
    pub fn finish(&self, total: usize, stage: &str) {
        if let Some(progress) = &self.progress {
            progress.report(total, total, stage);
        }
    }
}
