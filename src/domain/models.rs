use crate::cli::{Education, Gender};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonErr {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Candidate attributes as sent to `/predict`. Every field goes over the
/// wire as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub age: u8,
    pub experience: u8,
    pub education: Education,
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDecision {
    pub decision: i64,
    pub hiring_probability: f64,
}

impl ModelDecision {
    pub fn is_hired(&self) -> bool {
        self.decision == 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub model_decision: ModelDecision,
    pub verification_report: VerificationReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub bias_detected: bool,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub twin_details: Vec<TwinDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwinDetail {
    pub twin_data: TwinData,
    pub prediction: ModelDecision,
}

/// The counterfactual profile the backend probed the model with. The
/// backend echoes the whole profile back, so only `twin_type` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwinData {
    #[serde(default = "unknown_twin_type")]
    pub twin_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<i64>,
}

fn unknown_twin_type() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TwinKind {
    GenderFlip,
    AgeYounger,
    AgeOlder,
    Other(String),
}

impl TwinData {
    pub fn kind(&self) -> TwinKind {
        match self.twin_type.as_str() {
            "gender_flip" => TwinKind::GenderFlip,
            "age_younger" => TwinKind::AgeYounger,
            "age_older" => TwinKind::AgeOlder,
            other => TwinKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerturbationTest {
    pub flip_rate: f64,
    #[serde(default)]
    pub flipped_indices: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_count: Option<u64>,
}

/// Metrics are null when one of the protected groups is empty in the
/// uploaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    #[serde(default)]
    pub disparate_impact: Option<f64>,
    #[serde(default)]
    pub statistical_parity_difference: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equal_opportunity_difference: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perturbation_test: Option<PerturbationTest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftCheck {
    pub drift_detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistic: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenResult {
    /// Feature order is the service's column order.
    pub drift: IndexMap<String, DriftCheck>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub proxies: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_risk: Option<String>,
}

impl ScreenResult {
    pub fn drift_detected(&self) -> bool {
        self.drift.values().any(|d| d.drift_detected)
    }

    pub fn drifted_features(&self) -> Vec<&str> {
        self.drift
            .iter()
            .filter(|(_, d)| d.drift_detected)
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

/// One synthetic candidate row. Columns this client does not know about
/// are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub experience: f64,
    #[serde(default)]
    pub education: i64,
    #[serde(default)]
    pub gender: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hired: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize)]
pub struct ScreenRequest<'a> {
    pub data: &'a [DatasetRow],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceState {
    pub status: String,
    #[serde(default)]
    pub reference_data_size: Option<u64>,
}

#[derive(Serialize)]
pub struct PredictOutcome {
    pub profile: CandidateProfile,
    pub decision_label: String,
    pub result: PredictionResponse,
}

#[derive(Serialize)]
pub struct AuditOutcome {
    pub source: String,
    pub rows: Option<usize>,
    pub result: AuditResult,
}

#[derive(Serialize, Clone, Debug)]
pub struct ScreenLogItem {
    pub time: String,
    pub batch: u64,
    pub count: usize,
    pub drift_detected: bool,
    pub drifted_features: Vec<String>,
    pub injected_shift: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DriftStatus {
    pub label: String,
    pub details: String,
}

#[derive(Serialize)]
pub struct StreamSummary {
    pub batches: u64,
    pub drifted_batches: u64,
    pub failed_batches: u64,
    pub status: DriftStatus,
    pub log: Vec<ScreenLogItem>,
}

#[derive(Serialize)]
pub struct ProbeReport {
    pub endpoint: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HistoryEntry {
    pub ts: String,
    pub action: String,
    pub data: Value,
}
