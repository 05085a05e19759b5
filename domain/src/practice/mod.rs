//! Practice domain.
//!
//! - [`input`] : field limits for submissions and topic requests
//! - [`session::PracticeSession`] : a stored, scored submission
//! - [`progress::UserProgress`] : per-user totals and streaks
//! - [`insights`] : trend, level and badges derived from history

pub mod input;
pub mod insights;
pub mod progress;
pub mod session;
