//! Execution context of a run
use crate::error::{PodError, Result};
use crate::time_dirs::TimeDir;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Where and how a run is executed.
///
/// Snapshot reading runs on a rayon pool. Setting the interrupt
/// flag (see [`ExecutionContext::interrupt_handle`]) stops reading
/// further snapshots, the run returns [`PodError::Interrupted`].
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Case directory
    pub case: PathBuf,
    /// Worker threads, rayon chooses if `None`
    pub threads: Option<usize>,
    /// Read snapshots in parallel
    pub parallel: bool,
    interrupt: Arc<AtomicBool>,
}

impl ExecutionContext {
    /// Return parallel context for case directory
    pub fn new<P: AsRef<Path>>(case: P) -> Self {
        Self {
            case: case.as_ref().to_path_buf(),
            threads: None,
            parallel: true,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set number of worker threads
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Read snapshots one after another
    #[must_use]
    pub fn serial(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Flag which interrupts the run when set
    #[must_use]
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Return error if interrupt flag is set
    ///
    /// # Errors
    /// Run was interrupted
    pub fn check_interrupt(&self) -> Result<()> {
        if self.interrupt.load(Ordering::Relaxed) {
            Err(PodError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Observer of snapshot reading
pub trait Progress: Sync {
    /// Reading of `total` snapshots starts
    fn start(&self, _total: usize) {}
    /// Snapshot of `time` is read
    fn advance(&self, _time: &TimeDir) {}
    /// All snapshots are read
    fn finish(&self) {}
}

/// Silent progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt() {
        let ctx = ExecutionContext::new(".").with_threads(2);
        assert!(ctx.check_interrupt().is_ok());
        ctx.interrupt_handle().store(true, Ordering::Relaxed);
        assert!(matches!(ctx.check_interrupt(), Err(PodError::Interrupted)));
        assert_eq!(ctx.threads, Some(2));
    }
}
