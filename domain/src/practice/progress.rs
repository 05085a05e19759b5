//! Per-user practice statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Running totals, average score and daily streak for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,
    pub total_sessions: u32,
    pub average_score: f64,
    pub streak: u32,
    pub last_practice_date: Option<DateTime<Utc>>,
}

impl UserProgress {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            total_sessions: 0,
            average_score: 0.0,
            streak: 0,
            last_practice_date: None,
        }
    }

    /// Fold one scored session into the totals.
    ///
    /// Streak rules use calendar days (UTC): practicing again on the same
    /// day keeps the streak, the next day extends it, any gap resets it to 1.
    pub fn record_session(&mut self, score: u8, now: DateTime<Utc>) {
        self.streak = match self.last_practice_date {
            None => 1,
            Some(last) => {
                let days = (now.date_naive() - last.date_naive()).num_days();
                match days {
                    d if d <= 0 => self.streak.max(1),
                    1 => self.streak + 1,
                    _ => 1,
                }
            }
        };

        let previous_total = self.average_score * f64::from(self.total_sessions);
        self.total_sessions += 1;
        self.average_score = (previous_total + f64::from(score)) / f64::from(self.total_sessions);
        self.last_practice_date = Some(now);
    }
}
