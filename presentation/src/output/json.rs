//! JSON output for scripting

use crate::output::formatter::OutputFormatter;
use coach_application::{
    GeneratedTopic, HistoryPage, OperationError, ProgressReport, SubmitPracticeOutput,
};
use coach_domain::{FeedbackRequest, FeedbackResult, PracticeSession};
use serde::Serialize;
use serde_json::json;

/// Formats results as pretty-printed JSON
pub struct JsonFormatter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackView<'a> {
    session_id: &'a str,
    feedback: &'a FeedbackResult,
    original: &'a FeedbackRequest,
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

impl OutputFormatter for JsonFormatter {
    fn format_feedback(&self, output: &SubmitPracticeOutput) -> String {
        pretty(&FeedbackView {
            session_id: &output.session_id,
            feedback: &output.feedback,
            original: &output.original,
        })
    }

    fn format_topic(&self, topic: &GeneratedTopic) -> String {
        pretty(topic)
    }

    fn format_history(&self, page: &HistoryPage) -> String {
        pretty(page)
    }

    fn format_session(&self, session: &PracticeSession) -> String {
        pretty(session)
    }

    fn format_progress(&self, report: &ProgressReport) -> String {
        pretty(report)
    }

    fn format_failure(&self, error: &OperationError) -> String {
        pretty(&json!({
            "error": error.message,
            "code": error.kind,
            "retryable": error.retryable,
            "source": error.origin.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use coach_application::{ErrorKind, HistoryQuery, Pagination};
    use coach_domain::ScoreSummary;
    use serde_json::Value;

    #[test]
    fn topic_uses_camel_case() {
        let topic = GeneratedTopic {
            topic: "Explaining an outage to customers".into(),
            role: "Support lead".into(),
            generated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let value: Value = serde_json::from_str(&JsonFormatter.format_topic(&topic)).unwrap();
        assert_eq!(value["role"], "Support lead");
        assert_eq!(value["generatedAt"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn failure_carries_code_and_source() {
        let error = OperationError::router(ErrorKind::MaxRetriesExceeded, "All 3 retry attempts failed.");
        let value: Value = serde_json::from_str(&JsonFormatter.format_failure(&error)).unwrap();
        assert_eq!(value["code"], "MAX_RETRIES_EXCEEDED");
        assert_eq!(value["source"], "router");
        assert_eq!(value["retryable"], false);
    }

    #[test]
    fn history_page_keeps_pagination_and_filters() {
        let page = HistoryPage {
            sessions: Vec::new(),
            pagination: Pagination {
                current_page: 1,
                total_pages: 0,
                total_count: 0,
                limit: 10,
                has_next_page: false,
                has_previous_page: false,
            },
            filters: HistoryQuery {
                min_score: Some(6),
                ..Default::default()
            },
            summary: ScoreSummary::of([]),
        };
        let value: Value = serde_json::from_str(&JsonFormatter.format_history(&page)).unwrap();
        assert_eq!(value["pagination"]["totalPages"], 0);
        assert_eq!(value["filters"]["minScore"], 6);
        assert_eq!(value["filters"]["dateFrom"], Value::Null);
        assert_eq!(value["summary"]["averageScore"], 0.0);
    }
}
