//! Occupation catalogue, course corpus and the immutable snapshot built from them

pub mod course;
pub mod fallback;
pub mod loader;
pub mod occupation;
pub mod skills;
pub mod snapshot;
