//! Candidate retrieval and ranking

pub mod features;
pub mod ranker;
pub mod retriever;
