//! Career matching library: profile normalization, candidate retrieval and
//! ranking, skills gap analysis, automation risk and learning paths

pub mod analysis;
pub mod catalogue;
pub mod cli;
pub mod config;
pub mod error;
pub mod matching;
pub mod output;
pub mod pipeline;
pub mod processing;

pub use config::Config;
pub use error::{CareerError, Result};
pub use pipeline::{CareerEngine, RecommendOptions, RecommendationReport};
pub use processing::profile::RawProfile;
