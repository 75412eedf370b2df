//! Form controller: the state behind the evaluator page.
//!
//! Transitions are synchronous (`begin_*` / `finish_*`) so a front end can drop
//! its lock on the controller while a request is in flight. The async helpers
//! (`load`, `submit`, `submit_until`) chain them around a `RiskApiClient` call.

use crate::api_client::RiskApiClient;
use crate::errors::AppError;
use crate::models::{MetaResponse, PredictRequest, PredictResponse};
use crate::validation::build_request;
use std::fmt;
use std::future::Future;

/// Values applied by "Fill example" on top of `"0"` for every feature.
pub const EXAMPLE_OVERRIDES: [(&str, &str); 4] = [
    ("credits", "18"),
    ("work_hours", "10"),
    ("gpa", "3.2"),
    ("num_courses", "5"),
];

/// Page status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Loading,
    Ready,
    Predicting,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Loading => "loading",
            Status::Ready => "ready",
            Status::Predicting => "predicting",
            Status::Error => "error",
        };
        f.write_str(s)
    }
}

/// One labelled text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureField {
    pub name: String,
    pub value: String,
}

/// Ordered raw input values keyed by feature name.
///
/// The key set is fixed at construction; `set` never adds a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureForm {
    fields: Vec<FeatureField>,
}

impl FeatureForm {
    /// One empty input per name, in order. Repeated names keep their first position.
    pub fn new<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut fields: Vec<FeatureField> = Vec::new();
        for name in names {
            if fields.iter().any(|f| &f.name == name) {
                continue;
            }
            fields.push(FeatureField {
                name: name.clone(),
                value: String::new(),
            });
        }
        Self { fields }
    }

    pub fn fields(&self) -> &[FeatureField] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Updates one field. Returns `false` when `name` is not a feature.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validates and coerces every field into a prediction request.
    pub fn to_request(&self) -> Result<PredictRequest, String> {
        build_request(
            self.fields
                .iter()
                .map(|f| (f.name.as_str(), f.value.as_str())),
        )
    }
}

/// Owns page state and drives the metadata/prediction lifecycle.
#[derive(Clone)]
pub struct FormController {
    client: RiskApiClient,
    meta: Option<MetaResponse>,
    form: FeatureForm,
    result: Option<PredictResponse>,
    status: Status,
    error_msg: String,
    /// Incremented for every accepted submission so stale responses can be dropped.
    generation: u64,
}

impl FormController {
    pub fn new(client: RiskApiClient) -> Self {
        Self {
            client,
            meta: None,
            form: FeatureForm::default(),
            result: None,
            status: Status::Loading,
            error_msg: String::new(),
            generation: 0,
        }
    }

    pub fn client(&self) -> &RiskApiClient {
        &self.client
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn meta(&self) -> Option<&MetaResponse> {
        self.meta.as_ref()
    }

    pub fn form(&self) -> &FeatureForm {
        &self.form
    }

    pub fn result(&self) -> Option<&PredictResponse> {
        self.result.as_ref()
    }

    /// Current error message; empty when there is none.
    pub fn error_message(&self) -> &str {
        &self.error_msg
    }

    /// The form is shown once metadata has loaded.
    pub fn form_visible(&self) -> bool {
        self.status != Status::Loading && self.meta.is_some()
    }

    pub fn can_fill_example(&self) -> bool {
        self.status == Status::Ready
    }

    pub fn can_submit(&self) -> bool {
        self.form_visible() && self.status != Status::Predicting
    }

    // ============ Metadata ============

    /// Metadata never arrived; the page offers nothing until it is fetched again.
    pub fn needs_reload(&self) -> bool {
        self.meta.is_none() && self.status == Status::Error
    }

    /// Starts a (re)load from scratch: previous metadata, inputs, result and error
    /// are discarded, and any in-flight prediction outcome becomes stale.
    pub fn begin_load(&mut self) {
        self.meta = None;
        self.form = FeatureForm::default();
        self.result = None;
        self.error_msg.clear();
        self.generation += 1;
        self.status = Status::Loading;
    }

    pub fn finish_load(&mut self, outcome: Result<MetaResponse, AppError>) {
        match outcome {
            Ok(meta) => {
                self.form = FeatureForm::new(meta.feature_names());
                tracing::info!(
                    "Form initialized with {} features for model {}",
                    self.form.len(),
                    meta.model_tag
                );
                self.meta = Some(meta);
                self.status = Status::Ready;
            }
            Err(e) => {
                tracing::warn!("Metadata load failed: {}", e);
                self.status = Status::Error;
                self.error_msg = e.to_string();
            }
        }
    }

    /// Fetches metadata and initializes one empty input per feature.
    pub async fn load(&mut self) {
        self.begin_load();
        let outcome = self.client.get_meta().await;
        self.finish_load(outcome);
    }

    // ============ Inputs ============

    /// Updates one input. Ignored when the form is hidden or `name` is unknown.
    pub fn change(&mut self, name: &str, value: &str) -> bool {
        if !self.form_visible() {
            return false;
        }
        self.form.set(name, value)
    }

    /// Sets every input to `"0"`, then applies `EXAMPLE_OVERRIDES` for features
    /// that exist, and clears the result. Only allowed while `Ready`.
    pub fn fill_example(&mut self) -> bool {
        if !self.can_fill_example() {
            return false;
        }
        let names: Vec<String> = self.form.names().map(str::to_string).collect();
        for name in &names {
            self.form.set(name, "0");
        }
        for (name, value) in EXAMPLE_OVERRIDES {
            self.form.set(name, value);
        }
        self.result = None;
        true
    }

    // ============ Prediction ============

    /// Starts a submission.
    ///
    /// Clears the previous error and result, validates and coerces the inputs, and
    /// on success moves to `Predicting`.
    ///
    /// # Returns
    ///
    /// * `Ok((generation, request))` - The request to send and the ticket to hand
    ///   back to `finish_submit`.
    /// * `Err(AppError::Validation)` - Inputs are missing; the status is unchanged.
    /// * `Err(AppError::Unavailable)` - Submission is not possible right now (no form
    ///   shown, or a prediction is already in flight); nothing changes.
    pub fn begin_submit(&mut self) -> Result<(u64, PredictRequest), AppError> {
        if !self.can_submit() {
            return Err(AppError::Unavailable(format!(
                "Cannot submit while {}",
                self.status
            )));
        }

        self.error_msg.clear();
        self.result = None;

        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(message) => {
                tracing::debug!("Submission blocked: {}", message);
                self.error_msg = message.clone();
                return Err(AppError::Validation(message));
            }
        };

        self.generation += 1;
        self.status = Status::Predicting;
        Ok((self.generation, request))
    }

    /// Applies the outcome of the submission identified by `generation`.
    ///
    /// Outcomes of cancelled or superseded submissions are ignored.
    pub fn finish_submit(&mut self, generation: u64, outcome: Result<PredictResponse, AppError>) {
        if generation != self.generation || self.status != Status::Predicting {
            tracing::debug!("Ignoring stale prediction outcome #{}", generation);
            return;
        }
        match outcome {
            Ok(prediction) => {
                self.result = Some(prediction);
                self.status = Status::Ready;
            }
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                self.status = Status::Error;
                self.error_msg = e.to_string();
            }
        }
    }

    /// Aborts the in-flight prediction, if any.
    pub fn cancel_prediction(&mut self) -> bool {
        if self.status != Status::Predicting {
            return false;
        }
        tracing::info!("Prediction #{} cancelled", self.generation);
        // Invalidates the ticket held by the in-flight request.
        self.generation += 1;
        self.status = Status::Error;
        self.error_msg = AppError::Cancelled.to_string();
        true
    }

    /// Validates, coerces and requests a prediction.
    pub async fn submit(&mut self) -> Result<(), AppError> {
        self.submit_until(std::future::pending::<()>()).await
    }

    /// Like `submit`, but aborts the request as soon as `abort` completes.
    pub async fn submit_until<F>(&mut self, abort: F) -> Result<(), AppError>
    where
        F: Future<Output = ()>,
    {
        let (generation, request) = self.begin_submit()?;
        let client = self.client.clone();

        tokio::select! {
            outcome = client.predict(&request) => {
                let failure = outcome.as_ref().err().cloned();
                self.finish_submit(generation, outcome);
                match failure {
                    Some(e) => Err(e),
                    None => Ok(()),
                }
            }
            _ = abort => {
                self.cancel_prediction();
                Err(AppError::Cancelled)
            }
        }
    }
}
