pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod mock;
pub mod parse;
pub mod prompt;
pub mod strategy;
pub mod types;
pub mod view;

pub use config::GeneratorConfig;
pub use error::{ProviderError, StrategyError};
pub use generator::StrategyGenerator;
pub use prompt::{GenerationOptions, StrategyType};
pub use strategy::{KeywordAnalysis, Level, SearchIntent, StrategyResult};
