use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for batch progress and per-stage timing.
///
/// Use cases report through this trait so the CLI can log while tests stay
/// silent.
pub trait BatchLogger: Send {
    /// Report object-level progress.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one image.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Count one processed image.
    fn image_done(&mut self);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Runs `f`, recording its wall time under `stage`.
pub fn timed<T>(logger: &mut dyn BatchLogger, stage: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    logger.timing(stage, start.elapsed().as_secs_f64() * 1000.0);
    out
}

/// Silent logger that discards all events.
pub struct NullBatchLogger;

impl BatchLogger for NullBatchLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn image_done(&mut self) {}
    fn info(&mut self, _message: &str) {}
}

/// Buffers timings and processed images for replay on another logger.
///
/// Worker threads record into their own buffer; the coordinating thread
/// replays each buffer after the workers have joined.
#[derive(Debug, Default)]
pub struct BufferedBatchLogger {
    timings: Vec<(String, f64)>,
    images: usize,
}

impl BufferedBatchLogger {
    pub fn replay_into(self, target: &mut dyn BatchLogger) {
        for (stage, duration_ms) in self.timings {
            target.timing(&stage, duration_ms);
        }
        for _ in 0..self.images {
            target.image_done();
        }
    }
}

impl BatchLogger for BufferedBatchLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings.push((stage.to_string(), duration_ms));
    }

    fn image_done(&mut self) {
        self.images += 1;
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }
}

/// CLI logger backed by the `log` facade.
///
/// Progress lines are throttled to every `throttle` objects; the summary
/// reports per-stage averages and overall image throughput.
pub struct LogBatchLogger {
    throttle: usize,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    images: usize,
}

impl LogBatchLogger {
    pub fn new(throttle: usize) -> Self {
        Self {
            throttle: throttle.max(1),
            timings: HashMap::new(),
            start_time: Instant::now(),
            images: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if nothing ran.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.images == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Batch summary ({} images, {:.1}s total):",
            self.images,
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len().max(1) as f64;
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        if elapsed_ms > 0.0 && self.images > 0 {
            let rate = self.images as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  throughput  : {rate:.1} images/s"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }
}

impl Default for LogBatchLogger {
    fn default() -> Self {
        Self::new(1)
    }
}

impl BatchLogger for LogBatchLogger {
    fn progress(&mut self, current: usize, total: usize) {
        if total > 0 && (current % self.throttle == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Objects: {current}/{total} ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn image_done(&mut self) {
        self.images += 1;
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullBatchLogger;
        logger.progress(1, 10);
        logger.timing("detect", 5.0);
        logger.image_done();
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = LogBatchLogger::new(10);
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("decode", 5.0);

        let detect = logger.timings_for("detect").unwrap();
        assert_eq!(detect.len(), 2);
        assert_relative_eq!(detect[1], 30.0);
        assert_eq!(logger.timings_for("decode").unwrap().len(), 1);
        assert!(logger.timings_for("write").is_none());
    }

    #[test]
    fn test_timed_records_stage_and_returns_value() {
        let mut logger = LogBatchLogger::default();
        let value = timed(&mut logger, "detect", || 42);
        assert_eq!(value, 42);
        assert_eq!(logger.timings_for("detect").unwrap().len(), 1);
    }

    #[test]
    fn test_buffered_logger_replays_timings_and_images() {
        let mut buffer = BufferedBatchLogger::default();
        buffer.timing("decode", 2.0);
        buffer.timing("detect", 7.5);
        buffer.image_done();

        let mut logger = LogBatchLogger::new(10);
        buffer.replay_into(&mut logger);
        assert_eq!(logger.timings_for("decode").unwrap(), &[2.0]);
        assert_eq!(logger.timings_for("detect").unwrap(), &[7.5]);
        assert!(logger
            .summary_string()
            .unwrap()
            .contains("Batch summary (1 images"));
    }

    #[test]
    fn test_summary_includes_stages_and_throughput() {
        let mut logger = LogBatchLogger::new(10);
        logger.timing("detect", 20.0);
        logger.timing("write", 1.0);
        logger.image_done();
        logger.image_done();

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Batch summary (2 images"));
        assert!(summary.contains("detect"));
        assert!(summary.contains("write"));
        assert!(summary.contains("images/s"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = LogBatchLogger::new(10);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_zero_throttle_is_clamped() {
        let mut logger = LogBatchLogger::new(0);
        for i in 1..=3 {
            logger.progress(i, 3);
        }
        assert_eq!(logger.throttle, 1);
    }
}
