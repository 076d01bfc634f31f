pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod http_client;
pub mod model;
pub mod predict;
pub mod rates;
pub mod refresh;
pub mod scrape;
pub mod store;

pub use error::{PredictError, Result};
