pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod view;

pub use client::{Predict, PredictionClient};
pub use config::{ClientConfig, Mode};
pub use controller::{Controller, History, Submission, Tab};
pub use error::{ConfigError, PredictError, SubmitError};
pub use models::{Field, Measurements, PredictionRecord, PredictionResponse};
