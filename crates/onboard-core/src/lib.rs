pub mod age;
pub mod compose;
pub mod config;
pub mod error;
pub mod github;
pub mod guard;
pub mod monitor;
pub mod onboarding;
pub mod resolver;
pub mod rules;
pub mod title;
pub mod tracker;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::{OnboardError, Result};
