//! Domain logic: statement vocabulary, classification and normalization

pub mod chart;
pub mod classifier;
pub mod config;
pub mod decimal;
pub mod error;
pub mod log;
pub mod model;
pub mod normalizer;
pub mod statement;

pub use error::FetchError;
pub use model::Statements;
pub use statement::{Period, ProviderKind, StatementKind, Symbol};
