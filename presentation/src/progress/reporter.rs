//! Progress reporting while a request is routed across providers

use coach_application::{AttemptStage, OperationError, RoutingProgress};
use coach_domain::ProviderKind;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

fn stage_label(provider: ProviderKind, stage: AttemptStage) -> String {
    match stage {
        AttemptStage::Primary => format!("Asking {}", provider),
        AttemptStage::Fallback => format!("Falling back to {}", provider),
        AttemptStage::Retry { attempt, max } => {
            format!("Retrying {} ({}/{})", provider, attempt, max)
        }
    }
}

/// Spinner that follows the router through primary, fallback and retries
pub struct ProgressReporter {
    spinner: ProgressBar,
}

impl ProgressReporter {
    pub fn new(title: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix(title.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Stop the spinner and clear its line
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl RoutingProgress for ProgressReporter {
    fn on_attempt(&self, provider: ProviderKind, stage: AttemptStage) {
        self.spinner.set_message(format!("{}...", stage_label(provider, stage)));
    }

    fn on_attempt_failed(&self, provider: ProviderKind, _stage: AttemptStage, error: &OperationError) {
        self.spinner
            .println(format!("  {} {}: {}", "x".red(), provider, error.kind));
    }

    fn on_backoff(&self, delay: Duration) {
        self.spinner
            .set_message(format!("Waiting {}ms before retry", delay.as_millis()));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl RoutingProgress for SimpleProgress {
    fn on_attempt(&self, provider: ProviderKind, stage: AttemptStage) {
        eprintln!("{} {}", "->".cyan(), stage_label(provider, stage).bold());
    }

    fn on_attempt_failed(&self, provider: ProviderKind, _stage: AttemptStage, error: &OperationError) {
        eprintln!("  {} {} ({})", "x".red(), provider, error.kind);
    }

    fn on_backoff(&self, delay: Duration) {
        eprintln!("  waiting {}ms", delay.as_millis());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_describe_each_stage() {
        assert_eq!(stage_label(ProviderKind::Anthropic, AttemptStage::Primary), "Asking anthropic");
        assert_eq!(
            stage_label(ProviderKind::Gemini, AttemptStage::Fallback),
            "Falling back to gemini"
        );
        assert_eq!(
            stage_label(ProviderKind::Anthropic, AttemptStage::Retry { attempt: 2, max: 3 }),
            "Retrying anthropic (2/3)"
        );
    }
}
