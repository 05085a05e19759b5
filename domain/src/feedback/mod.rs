//! Feedback domain.
//!
//! - [`entities::FeedbackRequest`] / [`entities::FeedbackResult`] : the request and
//!   the validated, scored answer
//! - [`validation`] : the output contract every provider response must satisfy
//! - [`parsing`] : code-fence stripping and JSON decoding of raw provider text

pub mod entities;
pub mod parsing;
pub mod validation;
