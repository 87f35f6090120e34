use crate::domain::models::PredictionResponse;

pub const SUBMIT_LABEL: &str = "Process Application";
pub const BUSY_LABEL: &str = "Intercepting...";
pub const LOADING_NOTE: &str = "Generating Shadow Twins...";
pub const IDLE_NOTE: &str = "Awaiting Input Stream...";

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    Success(Box<PredictionResponse>),
    Error(String),
}

/// One prediction form. A new submission is refused while a request is
/// outstanding, otherwise it clears the previous result or error.
#[derive(Debug)]
pub struct PredictionSession {
    state: ViewState,
}

impl Default for PredictionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionSession {
    pub fn new() -> Self {
        Self {
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn submit(&mut self) -> anyhow::Result<()> {
        if self.state == ViewState::Loading {
            anyhow::bail!("a submission is already in flight");
        }
        self.state = ViewState::Loading;
        Ok(())
    }

    pub fn complete(&mut self, result: PredictionResponse) {
        self.state = ViewState::Success(Box::new(result));
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = ViewState::Error(message.into());
    }

    pub fn button_label(&self) -> &'static str {
        if self.state == ViewState::Loading {
            BUSY_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn status_note(&self) -> Option<&str> {
        match &self.state {
            ViewState::Idle => Some(IDLE_NOTE),
            ViewState::Loading => Some(LOADING_NOTE),
            ViewState::Error(msg) => Some(msg.as_str()),
            ViewState::Success(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ModelDecision, VerificationReport};

    fn result() -> PredictionResponse {
        PredictionResponse {
            model_decision: ModelDecision {
                decision: 1,
                hiring_probability: 0.7,
            },
            verification_report: VerificationReport {
                bias_detected: false,
                reasons: vec![],
                twin_details: vec![],
            },
        }
    }

    #[test]
    fn submit_then_complete() {
        let mut s = PredictionSession::new();
        assert_eq!(s.status_note(), Some(IDLE_NOTE));
        s.submit().unwrap();
        assert_eq!(s.button_label(), BUSY_LABEL);
        assert_eq!(s.status_note(), Some(LOADING_NOTE));
        s.complete(result());
        assert!(matches!(s.state(), ViewState::Success(_)));
        assert_eq!(s.button_label(), SUBMIT_LABEL);
        assert_eq!(s.status_note(), None);
    }

    #[test]
    fn double_submit_is_refused() {
        let mut s = PredictionSession::new();
        s.submit().unwrap();
        assert!(s.submit().is_err());
    }

    #[test]
    fn error_clears_on_resubmit() {
        let mut s = PredictionSession::new();
        s.submit().unwrap();
        s.fail("Failed to connect");
        assert_eq!(s.status_note(), Some("Failed to connect"));
        assert_eq!(s.button_label(), SUBMIT_LABEL);
        s.submit().unwrap();
        assert_eq!(s.state(), &ViewState::Loading);
    }
}
