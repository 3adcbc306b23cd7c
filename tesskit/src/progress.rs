//! Download progress.
//!
//! A fetch reports `received / total` after every chunk, from the task that
//! drives the transfer, so reports for one fetch are never interleaved.
//! [`channel`] turns the callback into a queue for callers that want the
//! values on a context of their own (a UI loop, a terminal renderer).

use tokio::sync::mpsc;

/// Borrowed progress callback, invoked with a fraction in `[0, 1]`.
pub type ProgressFn<'a> = &'a (dyn Fn(f64) + Send + Sync);

/// Tracks received bytes and yields monotonically non-decreasing fractions.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: Option<u64>,
    received: u64,
    last: f64,
}

impl ProgressTracker {
    pub fn new(total: Option<u64>) -> Self {
        Self {
            total: total.filter(|t| *t > 0),
            received: 0,
            last: 0.0,
        }
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Record a chunk. Returns the fraction to report, or `None` when the
    /// total length is unknown.
    pub fn advance(&mut self, chunk_len: usize) -> Option<f64> {
        self.received += chunk_len as u64;
        let total = self.total?;

        let fraction = (self.received as f64 / total as f64).clamp(0.0, 1.0);
        self.last = self.last.max(fraction);
        Some(self.last)
    }
}

/// A progress callback that forwards into an unbounded channel.
///
/// Values for one fetch arrive in order on the receiver; the receiver can be
/// polled from whichever task owns the presentation.
pub fn channel() -> (
    impl Fn(f64) + Send + Sync + Clone + 'static,
    mpsc::UnboundedReceiver<f64>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let callback = move |fraction: f64| {
        // Receiver gone means nobody is listening any more.
        let _ = tx.send(fraction);
    };
    (callback, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_reports_fractions() {
        let mut tracker = ProgressTracker::new(Some(1000));
        assert_eq!(tracker.advance(500), Some(0.5));
        assert_eq!(tracker.advance(500), Some(1.0));
        assert_eq!(tracker.received(), 1000);
    }

    #[test]
    fn test_tracker_unknown_total() {
        let mut tracker = ProgressTracker::new(None);
        assert_eq!(tracker.advance(10), None);
        assert_eq!(tracker.received(), 10);
    }

    #[test]
    fn test_tracker_zero_total_is_unknown() {
        let mut tracker = ProgressTracker::new(Some(0));
        assert!(tracker.total().is_none());
        assert_eq!(tracker.advance(10), None);
    }

    #[test]
    fn test_tracker_clamps_overrun() {
        let mut tracker = ProgressTracker::new(Some(100));
        assert_eq!(tracker.advance(150), Some(1.0));
        assert_eq!(tracker.advance(10), Some(1.0));
    }

    #[test]
    fn test_tracker_empty_chunk_keeps_value() {
        let mut tracker = ProgressTracker::new(Some(4));
        assert_eq!(tracker.advance(1), Some(0.25));
        assert_eq!(tracker.advance(0), Some(0.25));
    }

    #[tokio::test]
    async fn test_channel_preserves_order() {
        let (callback, mut rx) = channel();
        callback(0.25);
        callback(0.5);
        callback(1.0);
        drop(callback);

        let mut received = Vec::new();
        while let Some(v) = rx.recv().await {
            received.push(v);
        }
        assert_eq!(received, vec![0.25, 0.5, 1.0]);
    }
}
