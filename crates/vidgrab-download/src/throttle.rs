//! Progress throttling.
//!
//! yt-dlp prints a progress line for every chunk it receives; forwarding all of
//! them would flood SSE clients and terminals.

use std::time::{Duration, Instant};

use vidgrab_core::{DownloadEvent, ProgressStage};

/// Rate-limiter for `Downloading` progress events.
///
/// Stage transitions, warnings and terminal events always pass.
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    last_stage: Option<ProgressStage>,
    min_interval: Duration,
}

impl ProgressThrottle {
    /// Create a throttle with the given minimum interval between downloading updates.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            last_stage: None,
            min_interval,
        }
    }

    /// Whether `event` should be forwarded now.
    pub fn admit(&mut self, event: &DownloadEvent) -> bool {
        let Some(stage) = event.stage() else {
            return true;
        };

        let stage_changed = self.last_stage != Some(stage);
        self.last_stage = Some(stage);

        if stage != ProgressStage::Downloading || stage_changed {
            self.last_emit = Some(Instant::now());
            return true;
        }

        self.should_emit()
    }

    fn should_emit(&mut self) -> bool {
        let now = Instant::now();
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downloading(percent: f64) -> DownloadEvent {
        DownloadEvent::progress(ProgressStage::Downloading, percent, "downloading")
    }

    #[test]
    fn first_update_passes() {
        let mut throttle = ProgressThrottle::new(Duration::from_secs(60));
        assert!(throttle.admit(&downloading(1.0)));
    }

    #[test]
    fn rapid_downloading_updates_are_dropped() {
        let mut throttle = ProgressThrottle::new(Duration::from_secs(60));
        assert!(throttle.admit(&downloading(1.0)));
        assert!(!throttle.admit(&downloading(2.0)));
        assert!(!throttle.admit(&downloading(3.0)));
    }

    #[test]
    fn stage_changes_always_pass() {
        let mut throttle = ProgressThrottle::new(Duration::from_secs(60));
        assert!(throttle.admit(&downloading(1.0)));
        assert!(throttle.admit(&DownloadEvent::progress(
            ProgressStage::Merging,
            75.0,
            "merging"
        )));
        assert!(throttle.admit(&DownloadEvent::progress(
            ProgressStage::Merging,
            75.0,
            "merging"
        )));
        // Back to downloading (second stream of a merged format)
        assert!(throttle.admit(&downloading(10.0)));
    }

    #[test]
    fn non_progress_events_pass() {
        let mut throttle = ProgressThrottle::new(Duration::from_secs(60));
        assert!(throttle.admit(&downloading(1.0)));
        assert!(throttle.admit(&DownloadEvent::warning("slow")));
        assert!(!throttle.admit(&downloading(2.0)));
    }

    #[test]
    fn interval_elapses() {
        let mut throttle = ProgressThrottle::new(Duration::from_millis(30));
        assert!(throttle.should_emit());
        assert!(!throttle.should_emit());

        std::thread::sleep(Duration::from_millis(40));
        assert!(throttle.should_emit());
    }
}
