//! Class prototypes: analysis and caching

pub mod analyzer;
pub mod cache;

pub use analyzer::PrototypeAnalyzer;
pub use cache::PrototypeCache;
