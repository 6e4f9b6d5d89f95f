//! Form state and the submission workflow.
//!
//! A [`Controller`] owns every piece of mutable session state. Submissions go
//! `Idle -> Loading -> Idle`; the loading flag is the re-entry guard.

use std::collections::VecDeque;

use log::{info, warn};

use crate::client::Predict;
use crate::error::{PredictError, SubmitError};
use crate::models::{coerce_number, Field, Measurements, PredictionRecord, PredictionResponse};

pub const HISTORY_CAP: usize = 10;
pub const DEFAULT_ERROR: &str = "Prediction failed. Please try again.";

/// Most-recent-first list of records, never longer than [`HISTORY_CAP`].
#[derive(Debug, Clone, Default)]
pub struct History {
    records: VecDeque<PredictionRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PredictionRecord) {
        self.records.push_front(record);
        self.records.truncate(HISTORY_CAP);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictionRecord> {
        self.records.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Predict,
    History,
}

/// Form snapshot taken when a submission starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Submission {
    measurements: Measurements,
}

impl Submission {
    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }
}

#[derive(Debug, Default)]
pub struct Controller {
    form: Measurements,
    result: Option<PredictionRecord>,
    error: Option<String>,
    loading: bool,
    history: History,
    tab: Tab,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: Measurements) -> Self {
        Controller {
            form,
            ..Self::default()
        }
    }

    pub fn form(&self) -> &Measurements {
        &self.form
    }

    pub fn result(&self) -> Option<&PredictionRecord> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn active_tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Stores the coerced value and clears any error. Never rejects input.
    pub fn update_field(&mut self, field: Field, raw: &str) {
        let value = coerce_number(raw);
        if value.is_nan() {
            warn!("{} is not a number: {:?}", field, raw);
        }
        self.form.set(field, value);
        self.error = None;
    }

    /// Enters the loading state and snapshots the form.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitError> {
        if self.loading {
            return Err(SubmitError::Busy);
        }
        self.loading = true;
        self.error = None;
        Ok(Submission {
            measurements: self.form,
        })
    }

    /// Merges the outcome of `submission` and leaves the loading state.
    pub fn complete(
        &mut self,
        submission: Submission,
        outcome: Result<PredictionResponse, PredictError>,
    ) {
        match outcome {
            Ok(response) => {
                let record = PredictionRecord::capture(response);
                info!(
                    "predicted {} ({:.3}) for {:?}",
                    record.species(),
                    record.confidence,
                    submission.measurements
                );
                self.history.push(record.clone());
                self.result = Some(record);
            }
            Err(err) => {
                let message = err.to_string();
                self.error = Some(if message.is_empty() {
                    DEFAULT_ERROR.to_string()
                } else {
                    message
                });
            }
        }
        self.loading = false;
    }

    /// Runs one full submission against `predictor`.
    pub async fn submit<P: Predict + ?Sized>(&mut self, predictor: &P) -> Result<(), SubmitError> {
        let submission = self.begin_submit()?;
        let outcome = predictor.predict(submission.measurements()).await;
        self.complete(submission, outcome);
        Ok(())
    }
}
