pub mod app_config;
pub mod catalog;
pub mod config;
pub mod identity;
pub mod product;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{Category, SortOption};
pub use config::{load_app_config, load_app_config_from_env};
pub use identity::identity_key;
pub use product::{NutritionFact, NutritionGrade, Nutriments, Product};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown sort option: {0}")]
    UnknownSortOption(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
