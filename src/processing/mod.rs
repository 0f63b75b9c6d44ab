//! Profile normalization: text processing, skill synonyms, curriculum boosts and encoders

pub mod curriculum;
pub mod encoder;
pub mod encoder_manager;
pub mod profile;
pub mod synonyms;
pub mod text_processor;
