pub mod app_state;
pub mod config;
pub mod glossary;
pub mod practice;
pub mod scoring;
pub mod tts;

pub use config::AppConfig;
pub use glossary::GlossaryStore;
pub use scoring::{score, ScoringResult};
