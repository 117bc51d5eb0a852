// Performance metrics module
//
// Lightweight counters for monitoring export activity across a session.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Export metrics.
///
/// Uses atomic operations for thread-safe tracking without locks. The
/// export service records into these as builds run; hosts can log the
/// summary on shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Builds that finished and delivered an archive
    pub exports_completed: AtomicUsize,

    /// Builds that failed; nothing was delivered
    pub exports_failed: AtomicUsize,

    /// Files written into delivered archives
    pub items_exported: AtomicU64,

    /// Items skipped because their payload failed to decode
    pub items_skipped: AtomicU64,

    /// Total archive bytes handed to delivery
    pub bytes_written: AtomicU64,

    /// Total build time in milliseconds across completed builds
    pub total_build_time_ms: AtomicU64,

    /// Service start time
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            exports_completed: AtomicUsize::new(0),
            exports_failed: AtomicUsize::new(0),
            items_exported: AtomicU64::new(0),
            items_skipped: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            total_build_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_export_completed(&self) {
        self.exports_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_export_failed(&self) {
        self.exports_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_items_exported(&self, count: usize) {
        self.items_exported.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_items_skipped(&self, count: usize) {
        self.items_skipped.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_bytes_written(&self, bytes: u64) {
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_build_time(&self, duration: Duration) {
        self.total_build_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Get total uptime.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average build time per completed export in milliseconds.
    pub fn avg_build_time_ms(&self) -> f64 {
        let total = self.total_build_time_ms.load(Ordering::Relaxed);
        let count = self.exports_completed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary.
    pub fn log_summary(&self) {
        tracing::info!("=== Export Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Builds: {} completed, {} failed",
            self.exports_completed.load(Ordering::Relaxed),
            self.exports_failed.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Files: {} exported, {} skipped, {} bytes delivered",
            self.items_exported.load(Ordering::Relaxed),
            self.items_skipped.load(Ordering::Relaxed),
            self.bytes_written.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Total build time: {:.2}s (avg: {:.2}ms per build)",
            self.total_build_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.avg_build_time_ms()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.exports_completed.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.exports_failed.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_build_outcomes() {
        let metrics = Metrics::new();

        metrics.record_export_completed();
        metrics.record_export_completed();
        metrics.record_export_failed();
        metrics.record_items_exported(12);
        metrics.record_items_skipped(1);
        metrics.record_bytes_written(4096);

        assert_eq!(metrics.exports_completed.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.exports_failed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.items_exported.load(Ordering::Relaxed), 12);
        assert_eq!(metrics.items_skipped.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.bytes_written.load(Ordering::Relaxed), 4096);
    }

    #[test]
    fn test_avg_build_time() {
        let metrics = Metrics::new();

        metrics.record_export_completed();
        metrics.record_build_time(Duration::from_millis(100));
        metrics.record_export_completed();
        metrics.record_build_time(Duration::from_millis(200));

        assert_eq!(metrics.total_build_time_ms.load(Ordering::Relaxed), 300);
        assert_eq!(metrics.avg_build_time_ms(), 150.0);
    }

    #[test]
    fn test_avg_build_time_no_builds() {
        let metrics = Metrics::new();
        assert_eq!(metrics.avg_build_time_ms(), 0.0);
    }

    #[test]
    fn test_uptime() {
        let metrics = Metrics::new();
        thread::sleep(Duration::from_millis(10));
        assert!(metrics.uptime().as_millis() >= 10);
    }
}
