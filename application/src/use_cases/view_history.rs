//! View History use case
//!
//! Filtered, paginated listing of a user's past sessions and lookup of a
//! single session.

use crate::ports::session_store::{SessionStore, SessionStoreError};
use chrono::NaiveDate;
use coach_domain::{MAX_SCORE, MIN_SCORE, PracticeSession, ScoreSummary};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Largest page a caller may ask for
pub const MAX_PAGE_SIZE: u32 = 50;
/// Page size when none is given
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Error, Debug)]
pub enum ViewHistoryError {
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

/// Filters and paging for a history listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub page: u32,
    pub limit: u32,
    /// First day included (UTC)
    pub date_from: Option<NaiveDate>,
    /// Last day included (UTC)
    pub date_to: Option<NaiveDate>,
    pub min_score: Option<u8>,
    pub max_score: Option<u8>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            date_from: None,
            date_to: None,
            min_score: None,
            max_score: None,
        }
    }
}

impl HistoryQuery {
    /// Clamp paging and score bounds into their valid ranges.
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.limit = self.limit.clamp(1, MAX_PAGE_SIZE);
        let score_range = |s: u8| s.clamp(MIN_SCORE as u8, MAX_SCORE as u8);
        self.min_score = self.min_score.map(score_range);
        self.max_score = self.max_score.map(score_range);
        self
    }

    fn matches(&self, session: &PracticeSession) -> bool {
        let day = session.created_at.date_naive();
        self.date_from.is_none_or(|from| day >= from)
            && self.date_to.is_none_or(|to| day <= to)
            && self.min_score.is_none_or(|min| session.score >= min)
            && self.max_score.is_none_or(|max| session.score <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u32,
    pub limit: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// One page of history plus a summary over every matching session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub sessions: Vec<PracticeSession>,
    pub pagination: Pagination,
    pub filters: HistoryQuery,
    pub summary: ScoreSummary,
}

/// Use case for browsing stored practice sessions
pub struct ViewHistoryUseCase<S: SessionStore + ?Sized> {
    store: Arc<S>,
}

impl<S: SessionStore + ?Sized> ViewHistoryUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Newest-first page of the sessions of `user_id` matching `query`.
    pub async fn list(
        &self,
        user_id: &str,
        query: HistoryQuery,
    ) -> Result<HistoryPage, ViewHistoryError> {
        let query = query.normalized();
        let matching: Vec<PracticeSession> = self
            .store
            .list_sessions(user_id)
            .await?
            .into_iter()
            .filter(|s| query.matches(s))
            .collect();

        let total_count = matching.len() as u32;
        let total_pages = total_count.div_ceil(query.limit);
        let summary = ScoreSummary::of(matching.iter().map(|s| s.score));
        let skip = ((query.page - 1) * query.limit) as usize;
        let sessions: Vec<_> = matching
            .into_iter()
            .skip(skip)
            .take(query.limit as usize)
            .collect();
        debug!(user_id, total_count, returned = sessions.len(), "Listed history");

        Ok(HistoryPage {
            sessions,
            pagination: Pagination {
                current_page: query.page,
                total_pages,
                total_count,
                limit: query.limit,
                has_next_page: query.page < total_pages,
                has_previous_page: query.page > 1,
            },
            filters: query,
            summary,
        })
    }

    /// One session, only if it belongs to `user_id`.
    pub async fn get(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<PracticeSession, ViewHistoryError> {
        Ok(self.store.load_session(user_id, session_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{SeededStore, session_at};

    fn store_with_scores(scores: &[u8]) -> Arc<SeededStore> {
        let store = SeededStore::default();
        for (day, &score) in scores.iter().enumerate() {
            store.push(session_at("alice", score, day as u32 + 1));
        }
        store.push(session_at("bob", 10, 1));
        Arc::new(store)
    }

    #[tokio::test]
    async fn lists_newest_first_with_paging() {
        let store = store_with_scores(&[5, 6, 7, 8, 9]);
        let page = ViewHistoryUseCase::new(store)
            .list(
                "alice",
                HistoryQuery {
                    page: 2,
                    limit: 2,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let scores: Vec<_> = page.sessions.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![7, 6]);
        assert_eq!(page.pagination.total_count, 5);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_next_page);
        assert!(page.pagination.has_previous_page);
        assert_eq!(page.summary.average_score, 7.0);
        assert_eq!(page.summary.highest_score, 9);
    }

    #[tokio::test]
    async fn filters_by_score_and_date() {
        let store = store_with_scores(&[3, 8, 9, 4]);
        let page = ViewHistoryUseCase::new(store)
            .list(
                "alice",
                HistoryQuery {
                    min_score: Some(5),
                    date_to: NaiveDate::from_ymd_opt(2026, 3, 2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(page.sessions.len(), 1);
        assert_eq!(page.sessions[0].score, 8);
        assert_eq!(page.summary.total_sessions, 1);
    }

    #[test]
    fn query_is_clamped() {
        let query = HistoryQuery {
            page: 0,
            limit: 500,
            min_score: Some(0),
            max_score: Some(42),
            ..Default::default()
        }
        .normalized();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, MAX_PAGE_SIZE);
        assert_eq!(query.min_score, Some(1));
        assert_eq!(query.max_score, Some(10));
    }

    #[tokio::test]
    async fn empty_history_has_no_pages() {
        let page = ViewHistoryUseCase::new(Arc::new(SeededStore::default()))
            .list("carol", HistoryQuery::default())
            .await
            .unwrap();
        assert!(page.sessions.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_next_page);
    }

    #[tokio::test]
    async fn get_is_scoped_to_owner() {
        let store = store_with_scores(&[7]);
        let id = store.list_sessions("alice").await.unwrap()[0].id.clone();
        let use_case = ViewHistoryUseCase::new(store);

        assert_eq!(use_case.get("alice", &id).await.unwrap().score, 7);
        assert!(matches!(
            use_case.get("bob", &id).await,
            Err(ViewHistoryError::Store(SessionStoreError::NotFound(_)))
        ));
    }
}
