use crate::backend::VerificationApi;
use crate::domain::models::{CandidateProfile, PredictOutcome};
use crate::error::CliError;
use crate::services::config::Settings;
use crate::services::history;
use crate::services::output::print_one;
use crate::services::render::{decision_label, render_prediction};
use crate::services::session::{PredictionSession, ViewState};
use std::time::Duration;
use tracing::{info, warn};

pub fn connect_failure_message(base_url: &str) -> String {
    format!(
        "Failed to connect to verification layer. Ensure backend is running at {}.",
        base_url
    )
}

pub fn handle_predict<A: VerificationApi>(
    json: bool,
    settings: &Settings,
    api: &A,
    profile: CandidateProfile,
    reveal_delay_ms: Option<u64>,
) -> anyhow::Result<()> {
    let mut session = PredictionSession::new();
    session.submit()?;
    if !json {
        eprintln!(
            "{} {}",
            session.button_label(),
            session.status_note().unwrap_or_default()
        );
    }
    info!(
        age = profile.age,
        experience = profile.experience,
        education = profile.education.label(),
        gender = profile.gender.label(),
        "submitting application"
    );

    match api.predict(&profile) {
        Ok(result) => {
            let delay = reveal_delay_ms.unwrap_or(settings.reveal_delay_ms);
            if !json && delay > 0 {
                std::thread::sleep(Duration::from_millis(delay));
            }
            session.complete(result);
        }
        Err(e) => {
            warn!(error = %e, "prediction request failed");
            session.fail(connect_failure_message(&settings.base_url));
        }
    }

    match session.state() {
        ViewState::Success(result) => {
            let result = result.as_ref().clone();
            history::record(
                "predict",
                serde_json::json!({
                    "profile": profile,
                    "decision": result.model_decision.decision,
                    "bias_detected": result.verification_report.bias_detected,
                }),
            );
            let outcome = PredictOutcome {
                profile,
                decision_label: decision_label(&result.model_decision).to_string(),
                result,
            };
            print_one(json, outcome, |o| {
                render_prediction(&o.result).trim_end().to_string()
            })
        }
        ViewState::Error(msg) => Err(CliError::RequestFailed(msg.clone()).into()),
        ViewState::Idle | ViewState::Loading => {
            anyhow::bail!("prediction finished without a result")
        }
    }
}
