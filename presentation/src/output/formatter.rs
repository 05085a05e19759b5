//! Output formatter trait

use coach_application::{
    GeneratedTopic, HistoryPage, OperationError, ProgressReport, SubmitPracticeOutput,
};
use coach_domain::PracticeSession;

/// Trait for formatting command results
pub trait OutputFormatter {
    /// Format scored feedback for a practice submission
    fn format_feedback(&self, output: &SubmitPracticeOutput) -> String;

    /// Format a generated practice topic
    fn format_topic(&self, topic: &GeneratedTopic) -> String;

    /// Format one page of practice history
    fn format_history(&self, page: &HistoryPage) -> String;

    /// Format a single stored session in full
    fn format_session(&self, session: &PracticeSession) -> String;

    /// Format the progress report
    fn format_progress(&self, report: &ProgressReport) -> String;

    /// Format a provider or routing failure
    fn format_failure(&self, error: &OperationError) -> String;
}
