#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use axum::body::Bytes;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
    pub base_url: String,
}

impl TestEnv {
    pub fn new() -> Self {
        let base_url = spawn_fake_backend();
        Self::with_base_url(base_url)
    }

    /// Points at a port nothing listens on.
    pub fn offline() -> Self {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
        let addr = probe.local_addr().expect("probe addr");
        drop(probe);
        Self::with_base_url(format!("http://{}", addr))
    }

    fn with_base_url(base_url: String) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create work dir");
        Self {
            _tmp: tmp,
            home,
            work,
            base_url,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("rvl");
        cmd.env("HOME", &self.home)
            .env_remove("RVL_BASE_URL")
            .env_remove("RVL_TIMEOUT_MS")
            .env_remove("RVL_LOG")
            .arg("--base-url")
            .arg(&self.base_url);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    /// Runs a command expected to fail and returns its JSON error body.
    pub fn run_json_err(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .code(1)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json error output")
    }

    pub fn write(&self, name: &str, body: &str) -> PathBuf {
        let p = self.work.join(name);
        fs::write(&p, body).expect("write work file");
        p
    }
}

pub fn rows(n: usize, experience: f64) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                let hired = u8::from(i % 3 == 0);
                json!({
                    "experience": experience,
                    "education": 1 + (i % 3),
                    "gender": i % 2,
                    "hired": hired,
                })
            })
            .collect(),
    )
}

async fn predict(Json(profile): Json<Value>) -> Json<Value> {
    let gender = profile["gender"].as_i64().unwrap_or(0);
    let age = profile["age"].as_i64().unwrap_or(30);
    let experience = profile["experience"].as_i64().unwrap_or(0);
    let hired = experience >= 5;
    let probability = if hired { 0.8125 } else { 0.21 };
    let decision = json!({
        "decision": hired as i64,
        "hiring_probability": probability,
    });
    if gender == 1 {
        return Json(json!({
            "model_decision": decision,
            "verification_report": {
                "bias_detected": true,
                "reasons": ["Gender flip changed the decision"],
                "twin_details": [
                    {
                        "twin_data": {"twin_type": "gender_flip", "gender": 0, "age": age},
                        "prediction": {"decision": 1, "hiring_probability": 0.9}
                    },
                    {
                        "twin_data": {"twin_type": "age_younger", "gender": 1, "age": age - 10},
                        "prediction": {"decision": 0, "hiring_probability": 0.5}
                    }
                ]
            }
        }));
    }
    Json(json!({
        "model_decision": decision,
        "verification_report": {
            "bias_detected": false,
            "reasons": [],
            "twin_details": [
                {
                    "twin_data": {"twin_type": "gender_flip", "gender": 1, "age": age},
                    "prediction": decision
                }
            ]
        }
    }))
}

async fn audit(body: Bytes) -> Response {
    let text = String::from_utf8_lossy(&body);
    if !text.contains(".json\"") && !text.contains(".csv\"") {
        return (
            StatusCode::BAD_REQUEST,
            "Invalid file format. Upload CSV or JSON.",
        )
            .into_response();
    }
    Json(json!({
        "disparate_impact": 0.62,
        "statistical_parity_difference": -0.184,
        "perturbation_test": {
            "flip_rate": 0.125,
            "flipped_indices": [3, 9],
            "analyzed_count": 16
        }
    }))
    .into_response()
}

async fn generate_data(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let n = q
        .get("n_samples")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(100);
    Json(rows(n, 5.0))
}

async fn screen(Json(body): Json<Value>) -> Response {
    let data = body["data"].as_array().cloned().unwrap_or_default();
    if data.is_empty() {
        return Json(json!({"error": "No data provided"})).into_response();
    }
    if data
        .iter()
        .any(|r| r["experience"].as_f64().map_or(true, |e| e < 0.0))
    {
        return Json(json!({"error": "Batch could not be screened"})).into_response();
    }
    let mean = data
        .iter()
        .filter_map(|r| r["experience"].as_f64())
        .sum::<f64>()
        / data.len() as f64;
    let drifted = mean > 6.0;
    let wide = mean > 10.0;
    let risk = if drifted { "High" } else { "Low" };
    // Written by hand so the drift keys keep the service's column order.
    let body = format!(
        concat!(
            r#"{{"drift": {{"#,
            r#""experience": {{"drift_detected": {}, "p_value": {}}}, "#,
            r#""education": {{"drift_detected": {}, "p_value": 0.9}}, "#,
            r#""gender": {{"drift_detected": false, "p_value": 0.7}}"#,
            r#"}}, "proxies": {{}}, "batch_risk": "{}"}}"#
        ),
        drifted,
        if drifted { 0.001 } else { 0.64 },
        wide,
        risk
    );
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn report() -> Json<Value> {
    Json(json!({
        "historical_audit": {"disparate_impact": 0.62},
        "live_screens": 3
    }))
}

async fn info() -> Json<Value> {
    Json(json!({"status": "online", "message": "Runtime Verification Layer active"}))
}

async fn state() -> Json<Value> {
    Json(json!({"status": "ready", "reference_data_size": 500}))
}

/// Serves a canned verification backend on a background runtime and
/// returns its base URL.
pub fn spawn_fake_backend() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind fake backend");
    listener.set_nonblocking(true).expect("nonblocking listener");
    let addr = listener.local_addr().expect("fake backend addr");

    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("runtime");
        rt.block_on(async move {
            let app = Router::new()
                .route("/", get(info))
                .route("/predict", post(predict))
                .route("/api/audit", post(audit))
                .route("/api/generate_data", get(generate_data))
                .route("/api/screen", post(screen))
                .route("/api/report", get(report))
                .route("/api/state", get(state));
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("serve fake backend");
        });
    });

    format!("http://{}", addr)
}
