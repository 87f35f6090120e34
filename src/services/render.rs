//! Text cards for backend results.
//!
//! Every function returns the card as a `String` so command handlers only
//! decide where it goes. Labels and number formats follow the web
//! dashboard the service shipped with.

use crate::domain::constants::DISPARATE_IMPACT_THRESHOLD;
use crate::domain::models::{
    AuditResult, DatasetRow, DriftStatus, ModelDecision, PredictionResponse, ScreenLogItem,
    ScreenResult, TwinData, TwinDetail, TwinKind,
};
use crate::services::format::{percent, to_fixed};
use std::fmt::Write as _;

pub const AUDIT_PASSED_NOTE: &str =
    "No significant deviations detected across sensitive attribute permutations.";

const BAR_CELLS: usize = 20;

pub fn decision_label(d: &ModelDecision) -> &'static str {
    if d.is_hired() {
        "HIRED"
    } else {
        "REJECTED"
    }
}

pub fn twin_difference(t: &TwinData) -> String {
    match t.kind() {
        TwinKind::GenderFlip => {
            let g = if t.gender == Some(1) { "Female" } else { "Male" };
            format!("Gender: {}", g)
        }
        _ => match t.age {
            Some(age) => format!("Age: {}", age),
            None => "Age: n/a".to_string(),
        },
    }
}

pub fn render_twin(t: &TwinDetail) -> String {
    format!(
        "[{}] {} {}  {}",
        t.twin_data.twin_type.to_uppercase(),
        decision_label(&t.prediction),
        percent(t.prediction.hiring_probability, 0),
        twin_difference(&t.twin_data)
    )
}

pub fn render_prediction(r: &PredictionResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "MODEL DECISION");
    let _ = writeln!(
        out,
        "  {}  (confidence {})",
        decision_label(&r.model_decision),
        percent(r.model_decision.hiring_probability, 1)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "RUNTIME AUDIT REPORT");
    let report = &r.verification_report;
    if report.bias_detected {
        let _ = writeln!(out, "  BIAS DETECTED");
        for reason in &report.reasons {
            let _ = writeln!(out, "  - {}", reason);
        }
    } else {
        let _ = writeln!(out, "  AUDIT PASSED");
        let _ = writeln!(out, "  {}", AUDIT_PASSED_NOTE);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "SHADOW TWIN ANALYSIS");
    if report.twin_details.is_empty() {
        let _ = writeln!(out, "  (no twins returned)");
    }
    for twin in &report.twin_details {
        let _ = writeln!(out, "  {}", render_twin(twin));
    }
    out
}

/// `None` and non-finite values render as `N/A`.
pub fn metric(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) if v.is_finite() => to_fixed(v, digits),
        _ => "N/A".to_string(),
    }
}

/// Fill proportional to `di`, capped at a full bar.
pub fn impact_bar(di: f64) -> String {
    let ratio = di.clamp(0.0, 1.0);
    let filled = (ratio * BAR_CELLS as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(BAR_CELLS - filled)
    )
}

pub fn impact_status(di: f64) -> &'static str {
    if di < DISPARATE_IMPACT_THRESHOLD {
        "BELOW 0.8 THRESHOLD"
    } else {
        "OK"
    }
}

pub fn render_audit(a: &AuditResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "HISTORICAL BIAS AUDIT");
    match a.disparate_impact.filter(|v| v.is_finite()) {
        Some(di) => {
            let _ = writeln!(
                out,
                "  disparate impact:               {} {} {}",
                to_fixed(di, 2),
                impact_bar(di),
                impact_status(di)
            );
        }
        None => {
            let _ = writeln!(out, "  disparate impact:               N/A");
        }
    }
    let _ = writeln!(
        out,
        "  statistical parity difference:  {}",
        metric(a.statistical_parity_difference, 3)
    );
    if let Some(eod) = a.equal_opportunity_difference {
        let _ = writeln!(
            out,
            "  equal opportunity difference:   {}",
            metric(Some(eod), 3)
        );
    }
    if let Some(p) = &a.perturbation_test {
        let analysed = p
            .analyzed_count
            .map(|n| format!(" ({} rows analysed)", n))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  perturbation flip rate:         {}{}",
            percent(p.flip_rate, 1),
            analysed
        );
    }
    out
}

pub fn drift_status(r: &ScreenResult) -> DriftStatus {
    if r.drift_detected() {
        DriftStatus {
            label: "Drift Detected".to_string(),
            details: format!(
                "{} showing significant shift.",
                r.drifted_features().join(", ")
            ),
        }
    } else {
        DriftStatus {
            label: "Stable".to_string(),
            details: "Distribution matches baseline.".to_string(),
        }
    }
}

pub fn render_screen(r: &ScreenResult, count: usize) -> String {
    let mut out = String::new();
    let status = drift_status(r);
    let _ = writeln!(out, "SCREENING ({} rows)", count);
    let _ = writeln!(out, "  {}: {}", status.label, status.details);
    for (feature, check) in &r.drift {
        let p = check
            .p_value
            .map(|p| format!(" p={}", to_fixed(p, 4)))
            .unwrap_or_default();
        let flag = if check.drift_detected { "drift" } else { "ok" };
        let _ = writeln!(out, "  - {}: {}{}", feature, flag, p);
    }
    if let Some(risk) = &r.batch_risk {
        let _ = writeln!(out, "  batch risk: {}", risk);
    }
    out
}

pub fn render_log_item(item: &ScreenLogItem) -> String {
    if let Some(err) = &item.error {
        return format!("{}  Batch ({}): Failed ({})", item.time, item.count, err);
    }
    let verdict = if item.drift_detected {
        "Drift Detected"
    } else {
        "Safe"
    };
    format!("{}  Batch ({}): {}", item.time, item.count, verdict)
}

pub fn render_row(r: &DatasetRow) -> String {
    let hired = r
        .hired
        .map(|h| h.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}\t{}\t{}\t{}",
        to_fixed(r.experience, 2),
        r.education,
        r.gender,
        hired
    )
}
