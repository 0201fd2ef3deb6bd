pub mod api;
pub mod collectors;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod resolver;
pub mod selector;

pub use config::GiveawayConfig;
pub use error::{GiveawayError, Result};
pub use pipeline::{Giveaway, Outcome};
