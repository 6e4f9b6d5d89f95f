use futures_util::future::{FutureExt, LocalBoxFuture};
use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;

use crate::config::ClientConfig;
use crate::error::PredictError;
use crate::models::{HealthStatus, Measurements, PredictionResponse};

/// Anything that can turn measurements into a prediction.
///
/// The controller only talks to this trait. Futures are not required to be
/// `Send`: the whole client runs on one thread.
pub trait Predict {
    fn predict<'a>(
        &'a self,
        measurements: &'a Measurements,
    ) -> LocalBoxFuture<'a, Result<PredictionResponse, PredictError>>;
}

/// HTTP client for the prediction service.
///
/// One attempt per call. No timeout, retry, or caching.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictionClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_base_url(config.base_url())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        PredictionClient {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn predict(
        &self,
        measurements: &Measurements,
    ) -> Result<PredictionResponse, PredictError> {
        let url = format!("{}/predict", self.base_url);
        debug!("POST {} {:?}", url, measurements);

        let res = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(measurements)
            .send()
            .await
            .map_err(|e| {
                warn!("prediction request to {} failed: {}", url, e);
                PredictError::Transport(e)
            })?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            warn!("prediction service answered {}: {}", status, text);
            return Err(PredictError::Server {
                status: status.as_u16(),
                body: text,
            });
        }

        let prediction: PredictionResponse = serde_json::from_str(&text)?;
        debug!(
            "predicted {} over {} classes",
            prediction.species,
            prediction.proba.len()
        );
        Ok(prediction)
    }

    pub async fn health(&self) -> Result<HealthStatus, PredictError> {
        let url = format!("{}/health", self.base_url);
        debug!("GET {}", url);

        let res = self.http.get(&url).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(PredictError::Server {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl Predict for PredictionClient {
    fn predict<'a>(
        &'a self,
        measurements: &'a Measurements,
    ) -> LocalBoxFuture<'a, Result<PredictionResponse, PredictError>> {
        PredictionClient::predict(self, measurements).boxed_local()
    }
}
