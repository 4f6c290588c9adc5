//! Progress reporter implementation
//!
//! Uses indicatif for progress bars with:
//! - Region count progress
//! - Byte progress with throughput and ETA
//! - A status line naming the source being hashed

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Progress reporter for hash runs
pub struct ProgressReporter {
    /// Multi-progress container
    multi: MultiProgress,
    /// Main progress bar (bytes)
    bytes_bar: ProgressBar,
    /// Region count progress bar
    regions_bar: ProgressBar,
    /// Current status message
    status: ProgressBar,
    /// Start time
    start_time: Instant,
    /// Total bytes to hash
    total_bytes: AtomicU64,
    /// Total regions to hash
    total_regions: AtomicU64,
    /// Bytes hashed so far
    bytes_hashed: AtomicU64,
    /// Regions finished so far
    regions_hashed: AtomicU64,
    /// Is progress enabled
    enabled: AtomicBool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let multi = MultiProgress::new();

        let status = multi.add(ProgressBar::new_spinner());
        status.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        let regions_bar = multi.add(ProgressBar::new(0));
        regions_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} regions ({percent}%)")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        regions_bar.set_prefix("Regions");

        let bytes_bar = multi.add(ProgressBar::new(0));
        bytes_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.green/white}] {bytes}/{total_bytes} ({bytes_per_sec}, ETA {eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bytes_bar.set_prefix("Data   ");

        Self {
            multi,
            bytes_bar,
            regions_bar,
            status,
            start_time: Instant::now(),
            total_bytes: AtomicU64::new(0),
            total_regions: AtomicU64::new(0),
            bytes_hashed: AtomicU64::new(0),
            regions_hashed: AtomicU64::new(0),
            enabled: AtomicBool::new(true),
        }
    }

    /// Create a disabled progress reporter (for quiet mode)
    pub fn disabled() -> Self {
        let reporter = Self::new();
        reporter.enabled.store(false, Ordering::SeqCst);
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());
        reporter
    }

    /// Set total bytes to hash
    pub fn set_total_bytes(&self, total: u64) {
        self.total_bytes.store(total, Ordering::Relaxed);
        self.bytes_bar.set_length(total);
    }

    /// Set total regions to hash
    pub fn set_total_regions(&self, total: u64) {
        self.total_regions.store(total, Ordering::Relaxed);
        self.regions_bar.set_length(total);
    }

    /// Increment bytes hashed
    pub fn increment_bytes(&self, bytes: u64) {
        self.bytes_hashed.fetch_add(bytes, Ordering::Relaxed);
        self.bytes_bar.inc(bytes);
    }

    /// Increment finished regions
    pub fn increment_regions(&self, count: u64) {
        self.regions_hashed.fetch_add(count, Ordering::Relaxed);
        self.regions_bar.inc(count);
    }

    /// Set the name of the source being hashed
    pub fn set_current_source(&self, name: &str) {
        let display = if name.len() > 60 {
            let cut = name.len() - 57;
            let cut = (cut..name.len()).find(|i| name.is_char_boundary(*i)).unwrap_or(cut);
            format!("...{}", &name[cut..])
        } else {
            name.to_string()
        };
        self.status.set_message(display);
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get current throughput in bytes/second
    pub fn throughput(&self) -> f64 {
        let bytes = self.bytes_hashed.load(Ordering::Relaxed);
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            bytes as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Finish progress with success message
    pub fn finish_success(&self, message: &str) {
        self.status.finish_with_message(format!("✓ {}", message));
        self.regions_bar.finish();
        self.bytes_bar.finish();
    }

    /// Finish progress with error message
    pub fn finish_error(&self, message: &str) {
        self.status.finish_with_message(format!("✗ {}", message));
        self.regions_bar.abandon();
        self.bytes_bar.abandon();
    }

    /// Check if progress is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Get progress summary
    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary {
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
            bytes_hashed: self.bytes_hashed.load(Ordering::Relaxed),
            total_regions: self.total_regions.load(Ordering::Relaxed),
            regions_hashed: self.regions_hashed.load(Ordering::Relaxed),
            elapsed: self.elapsed(),
            throughput: self.throughput(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress summary
#[derive(Debug, Clone)]
pub struct ProgressSummary {
    /// Total bytes to hash
    pub total_bytes: u64,
    /// Bytes hashed so far
    pub bytes_hashed: u64,
    /// Total regions to hash
    pub total_regions: u64,
    /// Regions finished so far
    pub regions_hashed: u64,
    /// Elapsed time
    pub elapsed: Duration,
    /// Throughput in bytes/second
    pub throughput: f64,
}

impl ProgressSummary {
    /// Get completion percentage
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            (self.bytes_hashed as f64 / self.total_bytes as f64) * 100.0
        }
    }

    /// Print summary to stderr
    pub fn print(&self) {
        eprintln!("Regions: {}/{}", self.regions_hashed, self.total_regions);
        eprintln!(
            "Bytes:   {}/{}",
            humansize::format_size(self.bytes_hashed, humansize::BINARY),
            humansize::format_size(self.total_bytes, humansize::BINARY)
        );
        eprintln!("Elapsed: {:.1?}", self.elapsed);
        eprintln!(
            "Speed:   {}/s",
            humansize::format_size(self.throughput as u64, humansize::BINARY)
        );
    }
}
