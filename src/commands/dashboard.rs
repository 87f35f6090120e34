use crate::backend::{dataset_mime, VerificationApi};
use crate::cli::AuditCommands;
use crate::domain::constants::SYNTHETIC_UPLOAD_NAME;
use crate::domain::models::{AuditOutcome, DatasetRow, ProbeReport};
use crate::error::CliError;
use crate::services::config::{check_stream, Settings};
use crate::services::history;
use crate::services::output::{print_event, print_one, print_out};
use crate::services::render::{
    drift_status, render_audit, render_log_item, render_row, render_screen,
};
use crate::services::stream::{
    run_stream, stop_on_interrupt, StreamController, StreamSettings,
};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub fn handle_audit<A: VerificationApi>(
    json: bool,
    settings: &Settings,
    api: &A,
    command: &AuditCommands,
) -> anyhow::Result<()> {
    let outcome = match command {
        AuditCommands::Upload { file } => {
            let bytes = std::fs::read(file).map_err(|e| {
                CliError::InvalidInput(format!("could not read {}: {}", file.display(), e))
            })?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "dataset".to_string());
            info!(file = %file.display(), size = bytes.len(), "uploading dataset for audit");
            let result = api
                .audit_dataset(&name, dataset_mime(&name), bytes)
                .map_err(|e| CliError::RequestFailed(format!("Upload failed: {}", e)))?;
            AuditOutcome {
                source: name,
                rows: None,
                result,
            }
        }
        AuditCommands::Generate { samples } => {
            let n = samples.unwrap_or(settings.audit_samples);
            let rows = api
                .generate_data(n)
                .map_err(|e| CliError::RequestFailed(format!("Audit failed: {}", e)))?;
            let body = serde_json::to_vec(&rows)?;
            info!(rows = rows.len(), "auditing synthetic dataset");
            let result = api
                .audit_dataset(SYNTHETIC_UPLOAD_NAME, "application/json", body)
                .map_err(|e| CliError::RequestFailed(format!("Audit failed: {}", e)))?;
            AuditOutcome {
                source: SYNTHETIC_UPLOAD_NAME.to_string(),
                rows: Some(rows.len()),
                result,
            }
        }
    };

    history::record(
        "audit",
        serde_json::json!({
            "source": outcome.source,
            "disparate_impact": outcome.result.disparate_impact,
            "statistical_parity_difference": outcome.result.statistical_parity_difference,
        }),
    );
    let uploaded = matches!(command, AuditCommands::Upload { .. });
    print_one(json, outcome, |o| {
        let card = render_audit(&o.result);
        if uploaded {
            format!("{}\nFile uploaded and audited successfully!", card.trim_end())
        } else {
            card.trim_end().to_string()
        }
    })
}

pub fn handle_generate<A: VerificationApi>(
    json: bool,
    settings: &Settings,
    api: &A,
    samples: Option<u32>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let n = samples.unwrap_or(settings.generate_samples);
    let rows = api
        .generate_data(n)
        .map_err(|e| CliError::RequestFailed(format!("Data generation failed: {}", e)))?;

    if let Some(path) = output {
        write_json_file(path, &rows)?;
        let written = serde_json::json!({
            "rows": rows.len(),
            "output": path.display().to_string(),
        });
        history::record("generate", written.clone());
        return print_one(json, written, |_| {
            format!("wrote {} rows to {}", rows.len(), path.display())
        });
    }

    history::record("generate", serde_json::json!({"rows": rows.len()}));
    if !json {
        println!("experience\teducation\tgender\thired");
    }
    print_out(json, &rows, render_row)
}

pub fn handle_screen<A: VerificationApi>(json: bool, api: &A, file: &Path) -> anyhow::Result<()> {
    let rows = read_rows(file)?;
    if rows.is_empty() {
        return Err(CliError::InvalidInput("No data provided".to_string()).into());
    }
    let result = api
        .screen(&rows)
        .map_err(|e| CliError::RequestFailed(format!("Screening failed: {}", e)))?;
    let status = drift_status(&result);
    history::record(
        "screen",
        serde_json::json!({"rows": rows.len(), "status": status.label}),
    );

    #[derive(Serialize)]
    struct ScreenOutcome {
        rows: usize,
        status: crate::domain::models::DriftStatus,
        result: crate::domain::models::ScreenResult,
    }
    let count = rows.len();
    print_one(
        json,
        ScreenOutcome {
            rows: count,
            status,
            result,
        },
        |o| render_screen(&o.result, o.rows).trim_end().to_string(),
    )
}

#[derive(Debug, Default)]
pub struct StreamFlags {
    pub interval_ms: Option<u64>,
    pub batch_size: Option<u32>,
    pub batches: Option<u64>,
    pub drift_probability: Option<f64>,
    pub drift_shift: Option<f64>,
}

pub fn stream_settings(settings: &Settings, flags: &StreamFlags) -> anyhow::Result<StreamSettings> {
    let s = StreamSettings {
        interval: flags
            .interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| settings.stream_interval()),
        batch_size: flags.batch_size.unwrap_or(settings.stream_batch_size),
        max_batches: flags.batches,
        drift_probability: flags
            .drift_probability
            .unwrap_or(settings.drift_probability),
        drift_shift: flags.drift_shift.unwrap_or(settings.drift_shift),
    };
    check_stream(s.batch_size, s.drift_probability)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    Ok(s)
}

pub fn handle_stream<A: VerificationApi>(
    json: bool,
    settings: &Settings,
    api: &A,
    flags: &StreamFlags,
) -> anyhow::Result<()> {
    let stream = stream_settings(settings, flags)?;
    let controller = StreamController::new();
    if let Err(e) = stop_on_interrupt(&controller) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }
    let mut rng = rand::thread_rng();

    if !json {
        println!(
            "streaming {} rows every {} ms (stop with Ctrl-C)",
            stream.batch_size,
            stream.interval.as_millis()
        );
    }
    let mut last_label = String::new();
    let summary = run_stream(api, &stream, &mut rng, &controller, |item, status| {
        if json {
            if let Err(e) = print_event(item) {
                warn!(error = %e, "could not print stream event");
            }
            return;
        }
        println!("{}", render_log_item(item));
        if status.label != last_label {
            println!("  status: {} - {}", status.label, status.details);
            last_label = status.label.clone();
        }
    });

    history::record(
        "stream",
        serde_json::json!({
            "batches": summary.batches,
            "drifted_batches": summary.drifted_batches,
            "failed_batches": summary.failed_batches,
        }),
    );
    if json {
        return print_event(&summary);
    }
    println!(
        "{} batches screened, {} with drift, {} failed; status: {}",
        summary.batches, summary.drifted_batches, summary.failed_batches, summary.status.label
    );
    Ok(())
}

/// Pretty JSON with the 4-space indent the scorecard has always used.
pub fn scorecard_text(report: &serde_json::Value) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    report.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

pub fn handle_report<A: VerificationApi>(
    json: bool,
    api: &A,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let report = api
        .report()
        .map_err(|e| CliError::RequestFailed(format!("Report failed: {}", e)))?;
    let text = scorecard_text(&report)?;
    if let Some(path) = output {
        write_text_file(path, &text)?;
        info!(path = %path.display(), "scorecard saved");
    }
    history::record(
        "report",
        serde_json::json!({"output": output.map(|p| p.display().to_string())}),
    );
    print_one(json, report, |_| text.clone())
}

pub fn handle_status<A: VerificationApi>(
    json: bool,
    settings: &Settings,
    api: &A,
) -> anyhow::Result<()> {
    let mut probes = Vec::new();
    probes.push(match api.service_info() {
        Ok(info) => ProbeReport {
            endpoint: "/".to_string(),
            status: "up".to_string(),
            detail: serde_json::to_value(info).ok(),
        },
        Err(e) => {
            warn!(error = %e, "verification layer probe failed");
            ProbeReport {
                endpoint: "/".to_string(),
                status: "down".to_string(),
                detail: None,
            }
        }
    });
    probes.push(match api.service_state() {
        Ok(state) => ProbeReport {
            endpoint: "/api/state".to_string(),
            status: "up".to_string(),
            detail: serde_json::to_value(state).ok(),
        },
        Err(e) => {
            warn!(error = %e, "dashboard state probe failed");
            ProbeReport {
                endpoint: "/api/state".to_string(),
                status: "down".to_string(),
                detail: None,
            }
        }
    });
    if !json {
        println!("backend: {}", settings.base_url);
    }
    print_out(json, &probes, |p| {
        let detail = p
            .detail
            .as_ref()
            .map(|d| format!("\t{}", d))
            .unwrap_or_default();
        format!("{}\t{}{}", p.endpoint, p.status, detail)
    })
}

pub fn handle_history(json: bool, limit: usize) -> anyhow::Result<()> {
    let entries = history::recent(limit)?;
    print_out(json, &entries, |e| format!("{}\t{}\t{}", e.ts, e.action, e.data))
}

fn read_rows(path: &Path) -> anyhow::Result<Vec<DatasetRow>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        CliError::InvalidInput(format!("could not read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        CliError::InvalidInput(format!(
            "{} is not a JSON array of rows: {}",
            path.display(),
            e
        ))
        .into()
    })
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn write_json_file<T: Serialize>(path: &Path, data: &T) -> anyhow::Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, serde_json::to_string_pretty(data)?)?;
    Ok(())
}

fn write_text_file(path: &Path, text: &str) -> anyhow::Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, text)?;
    Ok(())
}
