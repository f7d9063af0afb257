//! Progress reporting for smoothing runs.
//!
//! # Example
//!
//! ```
//! use cotsmooth::algo::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(0, 10, "Cotangent smoothing");
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: iterations completed so far
/// - `total`: number of iterations that will run
/// - `message`: description of the current operation
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

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// A reporter that discards all updates.
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_report_forwards_arguments() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |current, total, message| {
            sink.lock().unwrap().push((current, total, message.to_string()));
        });

        progress.report(2, 5, "step");
        assert_eq!(*seen.lock().unwrap(), vec![(2, 5, "step".to_string())]);
    }

    #[test]
    fn test_none_is_silent() {
        let progress = Progress::default();
        progress.report(1, 1, "ignored");
        assert_eq!(format!("{:?}", progress), "Progress { .. }");
    }
}
