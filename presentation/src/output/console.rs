//! Console output formatter for coaching results

use crate::output::formatter::OutputFormatter;
use coach_application::{
    GeneratedTopic, HistoryPage, OperationError, ProgressReport, SubmitPracticeOutput,
};
use coach_domain::{FeedbackResult, MAX_SCORE, PracticeSession};
use colored::{ColoredString, Colorize};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    fn score_badge(score: f64) -> ColoredString {
        let text = format!("{}/{}", score, MAX_SCORE);
        if score >= 8.0 {
            text.green().bold()
        } else if score >= 5.0 {
            text.yellow().bold()
        } else {
            text.red().bold()
        }
    }

    fn bullets(items: &[String]) -> String {
        items.iter().map(|item| format!("  * {}\n", item)).collect()
    }

    fn feedback_report(
        title: &str,
        topic: &str,
        feedback: &FeedbackResult,
        session_id: &str,
    ) -> String {
        let improved = &feedback.improved_version;
        let mut out = String::new();

        out.push_str(&Self::header(title));
        out.push('\n');

        out.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), topic));
        out.push_str(&format!(
            "{} {}\n\n",
            "Score:".cyan().bold(),
            Self::score_badge(feedback.score)
        ));

        out.push_str(&format!("{}\n", "Strengths:".green().bold()));
        out.push_str(&Self::bullets(&feedback.strengths));

        out.push_str(&format!("\n{}\n", "Improvements:".yellow().bold()));
        out.push_str(&Self::bullets(&feedback.improvements));

        out.push_str(&Self::section_header("Improved Version"));
        out.push_str(&format!("{} {}\n", "Topic:".bold(), improved.topic));
        out.push_str(&format!("{}\n", "Main points:".bold()));
        out.push_str(&Self::bullets(&improved.main_points));
        out.push_str(&format!("\n{}\n", improved.pitch));

        out.push_str(&format!("\n{} {}", "Session:".dimmed(), session_id.dimmed()));
        out.push_str(&Self::footer());
        out
    }

    fn goal_bar(fraction: f64) -> String {
        let filled = (fraction.clamp(0.0, 1.0) * 10.0).round() as usize;
        format!("[{}{}]", "#".repeat(filled), ".".repeat(10 - filled))
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_feedback(&self, output: &SubmitPracticeOutput) -> String {
        Self::feedback_report(
            "Practice Feedback",
            &output.original.topic,
            &output.feedback,
            &output.session_id,
        )
    }

    fn format_topic(&self, topic: &GeneratedTopic) -> String {
        format!(
            "{} {}\n\n{}\n",
            "Practice scenario for".cyan().bold(),
            topic.role.bold(),
            topic.topic
        )
    }

    fn format_history(&self, page: &HistoryPage) -> String {
        if page.sessions.is_empty() {
            return format!("{}\n", "No practice sessions found.".dimmed());
        }

        let mut out = Self::header("Practice History");
        out.push('\n');
        for session in &page.sessions {
            out.push_str(&format!(
                "{}  {:>5}  {}  {}\n",
                session.created_at.format("%Y-%m-%d"),
                Self::score_badge(f64::from(session.score)),
                session.request.topic,
                session.id.dimmed()
            ));
        }

        let summary = &page.summary;
        let pagination = &page.pagination;
        out.push_str(&format!(
            "\n{} {} sessions, average {}, best {}, lowest {}\n",
            "Summary:".cyan().bold(),
            summary.total_sessions,
            summary.average_score,
            summary.highest_score,
            summary.lowest_score
        ));
        out.push_str(&format!(
            "{}\n",
            format!(
                "Page {} of {}",
                pagination.current_page, pagination.total_pages
            )
            .dimmed()
        ));
        out
    }

    fn format_session(&self, session: &PracticeSession) -> String {
        let title = format!("Session of {}", session.created_at.format("%Y-%m-%d %H:%M"));
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", "Goal:".bold(), session.request.goal));
        out.push_str(&format!("{}\n", "Your main points:".bold()));
        out.push_str(&Self::bullets(&session.request.main_points));
        out.push_str(&format!("\n{}\n\n", session.request.pitch));
        out.push_str(&Self::feedback_report(
            &title,
            &session.request.topic,
            &session.feedback,
            &session.id,
        ));
        out
    }

    fn format_progress(&self, report: &ProgressReport) -> String {
        let mut out = Self::header("Practice Progress");
        out.push('\n');

        out.push_str(&format!(
            "{} {}  {} {}  {} {} days\n",
            "Sessions:".cyan().bold(),
            report.total_sessions,
            "Average:".cyan().bold(),
            Self::score_badge(report.average_score),
            "Streak:".cyan().bold(),
            report.streak
        ));
        out.push_str(&format!(
            "{} {}  {} {}  {} {:.1}/week\n",
            "Level:".bold(),
            report.user_level,
            "Trend:".bold(),
            report.improvement_trend,
            "Frequency:".bold(),
            report.practice_frequency
        ));
        if let Some(days) = report.days_since_last_practice {
            out.push_str(&format!("{}\n", format!("Last practice {} days ago", days).dimmed()));
        }

        if !report.recent_sessions.is_empty() {
            out.push_str(&Self::section_header("Recent Scores"));
            for point in &report.recent_sessions {
                out.push_str(&format!(
                    "  {}  {:>5}  {}\n",
                    point.date.format("%Y-%m-%d"),
                    Self::score_badge(f64::from(point.score)),
                    point.topic
                ));
            }
        }

        out.push_str(&Self::section_header("Goals"));
        let goals = &report.goals;
        let progress = &report.goals_progress;
        out.push_str(&format!(
            "  {} {} sessions per week\n",
            Self::goal_bar(progress.weekly_progress),
            goals.weekly_target
        ));
        out.push_str(&format!(
            "  {} {} day streak\n",
            Self::goal_bar(progress.streak_progress),
            goals.streak_target
        ));
        out.push_str(&format!(
            "  {} {} average score\n",
            Self::goal_bar(progress.score_progress),
            goals.score_target
        ));

        out.push_str(&Self::section_header("Achievements"));
        for badge in &report.achievements {
            if badge.earned {
                out.push_str(&format!("  {} {}\n", "+".green().bold(), badge.name.bold()));
            } else {
                out.push_str(&format!(
                    "  {} {}\n",
                    "-".dimmed(),
                    format!("{}: {}", badge.name, badge.description).dimmed()
                ));
            }
        }
        out.push_str(&Self::footer());
        out
    }

    fn format_failure(&self, error: &OperationError) -> String {
        let hint = if error.retryable {
            "The service is temporarily unavailable. Try again in a moment."
        } else {
            "This request cannot succeed as sent. Check your input and API keys."
        };
        format!(
            "{} {} ({})\n{}\n",
            "Error:".red().bold(),
            error.message,
            error.kind.as_str().dimmed(),
            hint.dimmed()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use coach_application::{ErrorKind, Goals, GoalsProgress, HistoryQuery, Pagination};
    use coach_domain::{
        FeedbackRequest, ImprovedVersion, ImprovementTrend, ProviderKind, ScoreSummary, SkillLevel,
        achievements,
    };

    fn output() -> SubmitPracticeOutput {
        SubmitPracticeOutput {
            session_id: "session-42".into(),
            feedback: FeedbackResult {
                score: 7.0,
                strengths: vec!["Confident opening".into()],
                improvements: vec!["Quantify the savings".into()],
                improved_version: ImprovedVersion {
                    topic: "Vendor consolidation".into(),
                    main_points: vec!["Costs".into()],
                    pitch: "Consolidating vendors saves 10%.".into(),
                },
            },
            original: FeedbackRequest::new(
                "Budget",
                "Approval",
                vec!["Costs".into()],
                "We should consolidate.",
            ),
        }
    }

    #[test]
    fn feedback_lists_every_section() {
        colored::control::set_override(false);
        let text = ConsoleFormatter.format_feedback(&output());
        assert!(text.contains("Score: 7/10"));
        assert!(text.contains("  * Confident opening"));
        assert!(text.contains("  * Quantify the savings"));
        assert!(text.contains("Consolidating vendors saves 10%."));
        assert!(text.contains("session-42"));
    }

    #[test]
    fn failure_shows_kind() {
        colored::control::set_override(false);
        let error = OperationError::provider(ProviderKind::Gemini, ErrorKind::RateLimit, "Quota exceeded");
        let text = ConsoleFormatter.format_failure(&error);
        assert!(text.contains("Quota exceeded (RATE_LIMIT)"));
        assert!(text.contains("Try again"));
    }

    #[test]
    fn history_lists_sessions_with_summary() {
        colored::control::set_override(false);
        let out = output();
        let session = PracticeSession::new(
            "local",
            out.original.clone(),
            out.feedback.clone(),
            Utc.with_ymd_and_hms(2026, 3, 4, 8, 0, 0).unwrap(),
        );
        let page = HistoryPage {
            summary: ScoreSummary::of([session.score]),
            sessions: vec![session.clone()],
            pagination: Pagination {
                current_page: 1,
                total_pages: 1,
                total_count: 1,
                limit: 10,
                has_next_page: false,
                has_previous_page: false,
            },
            filters: HistoryQuery::default(),
        };

        let text = ConsoleFormatter.format_history(&page);
        assert!(text.contains("2026-03-04"));
        assert!(text.contains("Budget"));
        assert!(text.contains(&session.id));
        assert!(text.contains("1 sessions, average 7"));
        assert!(text.contains("Page 1 of 1"));
    }

    #[test]
    fn empty_history_says_so() {
        colored::control::set_override(false);
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
            filters: HistoryQuery::default(),
            summary: ScoreSummary::of([]),
        };
        assert!(ConsoleFormatter.format_history(&page).contains("No practice sessions found."));
    }

    #[test]
    fn session_view_includes_original_submission() {
        colored::control::set_override(false);
        let out = output();
        let session = PracticeSession::new(
            "local",
            out.original,
            out.feedback,
            Utc.with_ymd_and_hms(2026, 3, 4, 8, 0, 0).unwrap(),
        );
        let text = ConsoleFormatter.format_session(&session);
        assert!(text.contains("Goal: Approval"));
        assert!(text.contains("We should consolidate."));
        assert!(text.contains("Consolidating vendors saves 10%."));
    }

    #[test]
    fn progress_shows_level_goals_and_badges() {
        colored::control::set_override(false);
        let report = ProgressReport {
            total_sessions: 5,
            average_score: 6.2,
            streak: 3,
            last_practice_date: None,
            practice_frequency: 1.2,
            improvement_trend: ImprovementTrend::Improving,
            user_level: SkillLevel::Intermediate,
            days_since_last_practice: Some(2),
            recent_sessions: Vec::new(),
            goals: Goals {
                weekly_target: 3,
                streak_target: 7,
                score_target: 8.0,
            },
            goals_progress: GoalsProgress {
                weekly_progress: 1.0,
                streak_progress: 3.0 / 7.0,
                score_progress: 6.2 / 8.0,
            },
            achievements: achievements(5, 6.2, 3),
            updated_at: Utc::now(),
        };

        let text = ConsoleFormatter.format_progress(&report);
        assert!(text.contains("Sessions: 5"));
        assert!(text.contains("Streak: 3 days"));
        assert!(text.contains("Level: Intermediate"));
        assert!(text.contains("Trend: improving"));
        assert!(text.contains("Last practice 2 days ago"));
        assert!(text.contains("[##########] 3 sessions per week"));
        assert!(text.contains("+ Getting Started"));
        assert!(text.contains("- Committed Learner: Complete 10 practice sessions"));
    }
}
