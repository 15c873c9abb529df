//! Terminal spinner for model load and generation

use crate::core::{ProgressEvent, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// 同一時間只有一個 spinner（載入或生成）
#[derive(Default)]
pub struct TerminalProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

fn start_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
    pb.set_style(style);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.tick();
    pb
}

impl ProgressReporter for TerminalProgress {
    fn notify(&self, event: ProgressEvent) {
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };

        match event {
            ProgressEvent::LoadStarted { model_id } => {
                *slot = Some(start_spinner(format!(
                    "⏳ Loading AI model {}... This may take 2-5 minutes the first time",
                    model_id
                )));
            }
            ProgressEvent::LoadFinished { elapsed, .. } => {
                if let Some(pb) = slot.take() {
                    pb.finish_with_message(format!(
                        "✅ Model loaded successfully! ({:.1}s)",
                        elapsed.as_secs_f32()
                    ));
                }
            }
            ProgressEvent::LoadFailed { message, .. } => {
                if let Some(pb) = slot.take() {
                    pb.abandon_with_message(format!("❌ Model failed to load: {}", message));
                }
            }
            ProgressEvent::GenerationStarted { .. } => {
                *slot = Some(start_spinner("Generating test cases... ⏳".to_string()));
            }
            ProgressEvent::GenerationFinished { .. } => {
                if let Some(pb) = slot.take() {
                    pb.finish_and_clear();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle() {
        let progress = TerminalProgress::new();

        progress.notify(ProgressEvent::LoadStarted {
            model_id: "google/flan-t5-large".to_string(),
        });
        assert!(progress.spinner.lock().unwrap().is_some());

        progress.notify(ProgressEvent::LoadFinished {
            model_id: "google/flan-t5-large".to_string(),
            elapsed: Duration::from_millis(10),
        });
        assert!(progress.spinner.lock().unwrap().is_none());

        progress.notify(ProgressEvent::GenerationStarted { prompt_chars: 42 });
        assert!(progress.spinner.lock().unwrap().is_some());

        progress.notify(ProgressEvent::GenerationFinished {
            elapsed: Duration::from_millis(10),
            success: false,
        });
        assert!(progress.spinner.lock().unwrap().is_none());
    }
}
