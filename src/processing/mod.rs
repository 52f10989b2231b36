//! Text processing, analysis and scoring

pub mod analyzer;
pub mod criteria;
pub mod embedding_manager;
pub mod embeddings;
pub mod entities;
pub mod extractor;
pub mod normalizer;
pub mod scoring;
pub mod screener;
pub mod skills;
pub mod text_processor;
