//! CLI progress rendering for downloads.
//!
//! A terminal gets an indicatif bar; anything else (pipes, CI logs) gets one
//! plain line per stage change and at most one per second while downloading.

use std::io::{self, IsTerminal};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use vidgrab_core::{
    BatchItem, BatchItemStatus, BatchObserver, DownloadEvent, DownloadEventEmitter, ProgressStage,
};

const PLAIN_INTERVAL: Duration = Duration::from_secs(1);

/// Progress display usable as event emitter and batch observer.
pub struct TerminalProgress {
    fancy: bool,
    state: Mutex<RenderState>,
}

#[derive(Default)]
struct RenderState {
    bar: Option<ProgressBar>,
    /// Prefix such as `[2/5]` during batches.
    label: String,
    last_stage: Option<ProgressStage>,
    last_plain: Option<Instant>,
}

impl TerminalProgress {
    /// Create a progress display, auto-detecting terminal capability.
    pub fn new() -> Self {
        Self::with_fancy(io::stdout().is_terminal())
    }

    fn with_fancy(fancy: bool) -> Self {
        Self {
            fancy,
            state: Mutex::new(RenderState::default()),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner} {prefix:.bold} [{bar:30.cyan/blue}] {pos:>3}% {wide_msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
    }

    fn new_bar(label: &str) -> ProgressBar {
        let bar = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stdout());
        bar.set_style(Self::bar_style());
        bar.set_prefix(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    }

    fn render(&self, state: &mut RenderState, event: &DownloadEvent) {
        match event {
            DownloadEvent::Progress {
                stage,
                percent,
                message,
            } => self.render_progress(state, *stage, *percent, message),
            DownloadEvent::Warning { message } => match &state.bar {
                Some(bar) => bar.println(format!("warning: {message}")),
                None => eprintln!("warning: {message}"),
            },
            DownloadEvent::Complete { filename, .. } => {
                if let Some(bar) = state.bar.take() {
                    bar.finish_and_clear();
                }
                if !self.fancy {
                    println!("{}done: {filename}", label_prefix(&state.label));
                }
                state.last_stage = None;
            }
            DownloadEvent::Error { message } => {
                if let Some(bar) = state.bar.take() {
                    bar.abandon();
                }
                eprintln!("{}error: {message}", label_prefix(&state.label));
                state.last_stage = None;
            }
        }
    }

    fn render_progress(
        &self,
        state: &mut RenderState,
        stage: ProgressStage,
        percent: f64,
        message: &str,
    ) {
        let stage_changed = state.last_stage != Some(stage);
        state.last_stage = Some(stage);

        if self.fancy {
            let label = state.label.clone();
            let bar = state.bar.get_or_insert_with(|| Self::new_bar(&label));
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let position = percent.round() as u64;
            bar.set_position(position);
            bar.set_message(format!("{}: {message}", stage.as_str()));
            return;
        }

        let now = Instant::now();
        let due = state
            .last_plain
            .is_none_or(|last| now.duration_since(last) >= PLAIN_INTERVAL);
        if stage_changed || due {
            state.last_plain = Some(now);
            println!(
                "{}{:>3.0}% {}: {message}",
                label_prefix(&state.label),
                percent,
                stage.as_str()
            );
        }
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn label_prefix(label: &str) -> String {
    if label.is_empty() {
        String::new()
    } else {
        format!("{label} ")
    }
}

impl DownloadEventEmitter for TerminalProgress {
    fn emit(&self, event: DownloadEvent) {
        if let Ok(mut state) = self.state.lock() {
            self.render(&mut state, &event);
        }
    }
}

impl BatchObserver for TerminalProgress {
    fn item_started(&self, index: usize, total: usize, url: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.label = format!("[{}/{total}]", index + 1);
            state.last_plain = None;
            println!("{} {url}", state.label);
        }
    }

    fn item_finished(&self, _index: usize, item: &BatchItem) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if let Some(bar) = state.bar.take() {
            bar.finish_and_clear();
        }
        match (item.status, &item.filename) {
            (BatchItemStatus::Complete, Some(filename)) if self.fancy => {
                println!("{} saved {filename}", state.label);
            }
            (BatchItemStatus::Error, _) => {
                let reason = item.error.as_deref().unwrap_or("unknown error");
                println!("{} failed: {reason}", state.label);
            }
            _ => {}
        }
    }
}
