//! Per-candidate analysis: skill gaps, automation risk and learning paths

pub mod courses;
pub mod gap;
pub mod learning_path;
pub mod risk;
