//! Text processing and analysis module

pub mod document;
pub mod text_processor;
pub mod vocabulary;
pub mod reference;
pub mod profile;
pub mod similarity;
pub mod skill_gap;
pub mod salary;
pub mod career;
pub mod location;
pub mod analyzer;
