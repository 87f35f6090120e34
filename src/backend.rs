use crate::domain::models::{
    AuditResult, CandidateProfile, DatasetRow, PredictionResponse, ScreenRequest, ScreenResult,
    ServiceInfo, ServiceState,
};
use reqwest::blocking::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("could not build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{body}")]
    Status { status: u16, body: String },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not read response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// A 2xx reply whose body is `{"error": "..."}`.
    #[error("{0}")]
    Service(String),
}

/// Everything the commands need from the verification service.
pub trait VerificationApi {
    fn predict(&self, profile: &CandidateProfile) -> Result<PredictionResponse, BackendError>;
    fn audit_dataset(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<AuditResult, BackendError>;
    fn generate_data(&self, n_samples: u32) -> Result<Vec<DatasetRow>, BackendError>;
    fn screen(&self, rows: &[DatasetRow]) -> Result<ScreenResult, BackendError>;
    fn report(&self) -> Result<Value, BackendError>;
    fn service_info(&self) -> Result<ServiceInfo, BackendError>;
    fn service_state(&self) -> Result<ServiceState, BackendError>;
}

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(BackendError::Build)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn finish<T: DeserializeOwned>(
        &self,
        url: String,
        sent: reqwest::Result<Response>,
    ) -> Result<T, BackendError> {
        let resp = sent.map_err(|source| {
            warn!(%url, error = %source, "request did not complete");
            BackendError::Connect {
                url: url.clone(),
                source,
            }
        })?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            warn!(%url, status = status.as_u16(), "backend returned an error status");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        debug!(%url, status = status.as_u16(), "response received");
        let body: Value = resp.json().map_err(|source| BackendError::Body {
            url: url.clone(),
            source,
        })?;
        if let Some(message) = service_error(&body) {
            warn!(%url, error = %message, "backend answered with an error body");
            return Err(BackendError::Service(message));
        }
        serde_json::from_value(body).map_err(|source| BackendError::Decode { url, source })
    }
}

impl VerificationApi for HttpBackend {
    fn predict(&self, profile: &CandidateProfile) -> Result<PredictionResponse, BackendError> {
        let url = self.url("/predict");
        debug!(%url, ?profile, "submitting candidate profile");
        let sent = self.client.post(&url).json(profile).send();
        self.finish(url, sent)
    }

    fn audit_dataset(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<AuditResult, BackendError> {
        let url = self.url("/api/audit");
        debug!(%url, file_name, size = bytes.len(), "uploading dataset");
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(BackendError::Build)?;
        let form = multipart::Form::new().part("file", part);
        let sent = self.client.post(&url).multipart(form).send();
        self.finish(url, sent)
    }

    fn generate_data(&self, n_samples: u32) -> Result<Vec<DatasetRow>, BackendError> {
        let url = self.url(&format!("/api/generate_data?n_samples={}", n_samples));
        let sent = self.client.get(&url).send();
        self.finish(url, sent)
    }

    fn screen(&self, rows: &[DatasetRow]) -> Result<ScreenResult, BackendError> {
        let url = self.url("/api/screen");
        debug!(%url, rows = rows.len(), "screening batch");
        let sent = self
            .client
            .post(&url)
            .json(&ScreenRequest { data: rows })
            .send();
        self.finish(url, sent)
    }

    fn report(&self) -> Result<Value, BackendError> {
        let url = self.url("/api/report");
        let sent = self.client.get(&url).send();
        self.finish(url, sent)
    }

    fn service_info(&self) -> Result<ServiceInfo, BackendError> {
        let url = self.url("/");
        let sent = self.client.get(&url).send();
        self.finish(url, sent)
    }

    fn service_state(&self) -> Result<ServiceState, BackendError> {
        let url = self.url("/api/state");
        let sent = self.client.get(&url).send();
        self.finish(url, sent)
    }
}

/// The error text of a `{"error": ...}` reply, which the service sends
/// with status 200 for batches it cannot use.
pub fn service_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Mime type for an uploaded dataset, by extension.
pub fn dataset_mime(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".json") {
        "application/json"
    } else if lower.ends_with(".csv") {
        "text/csv"
    } else {
        "application/octet-stream"
    }
}
