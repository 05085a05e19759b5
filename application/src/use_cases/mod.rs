//! Use cases (application services)

pub mod generate_topic;
pub mod submit_practice;
pub mod view_history;
pub mod view_progress;

#[cfg(test)]
mod test_support;
