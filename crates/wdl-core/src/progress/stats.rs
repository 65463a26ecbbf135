//! Progress snapshot (bytes done, rate, ETA).

/// Snapshot of one download's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressStats {
    /// Bytes written so far across all parts.
    pub bytes_done: u64,
    /// Total file size in bytes.
    pub total_bytes: u64,
    /// Elapsed time since the workers started (seconds).
    pub elapsed_secs: f64,
    /// Parts whose whole range has been written.
    pub parts_done: usize,
    pub part_count: usize,
}

impl ProgressStats {
    /// Total download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if rate is 0).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.total_bytes.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        (self.bytes_done as f64 / self.total_bytes as f64).min(1.0)
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(bytes_done: u64, total_bytes: u64, elapsed_secs: f64) -> ProgressStats {
        ProgressStats {
            bytes_done,
            total_bytes,
            elapsed_secs,
            parts_done: 0,
            part_count: 5,
        }
    }

    #[test]
    fn rate_and_eta() {
        let s = stats(400, 1000, 2.0);
        assert_eq!(s.bytes_per_sec(), 200.0);
        assert_eq!(s.eta_secs(), Some(3.0));
        assert!((s.percent() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn no_rate_yet() {
        let s = stats(0, 1000, 0.0);
        assert_eq!(s.bytes_per_sec(), 0.0);
        assert_eq!(s.eta_secs(), None);
    }

    #[test]
    fn done_and_overshoot() {
        assert_eq!(stats(1000, 1000, 1.0).eta_secs(), Some(0.0));
        assert_eq!(stats(1200, 1000, 1.0).fraction(), 1.0);
        assert_eq!(stats(0, 0, 0.0).fraction(), 1.0);
    }
}
