//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `predict.rs` — candidate submission, decision/audit/twin cards.
//! - `dashboard.rs` — audit, generate, screen, stream, report, status, history.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate rendering, streaming and persistence to `services/*`.
//! - Keep behavior and output schema stable.

pub mod dashboard;
pub mod predict;

use crate::backend::VerificationApi;
use crate::cli::{Cli, Commands};
use crate::domain::models::CandidateProfile;
use crate::services::config::Settings;
use dashboard::StreamFlags;

pub fn dispatch<A: VerificationApi>(cli: &Cli, settings: &Settings, api: &A) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Predict {
            age,
            experience,
            education,
            gender,
            reveal_delay_ms,
        } => {
            let profile = CandidateProfile {
                age: *age,
                experience: *experience,
                education: *education,
                gender: *gender,
            };
            predict::handle_predict(cli.json, settings, api, profile, *reveal_delay_ms)
        }
        Commands::Audit { command } => dashboard::handle_audit(cli.json, settings, api, command),
        Commands::Generate { samples, output } => {
            dashboard::handle_generate(cli.json, settings, api, *samples, output.as_deref())
        }
        Commands::Screen { file } => dashboard::handle_screen(cli.json, api, file),
        Commands::Stream {
            interval_ms,
            batch_size,
            batches,
            drift_probability,
            drift_shift,
        } => {
            let flags = StreamFlags {
                interval_ms: *interval_ms,
                batch_size: *batch_size,
                batches: *batches,
                drift_probability: *drift_probability,
                drift_shift: *drift_shift,
            };
            dashboard::handle_stream(cli.json, settings, api, &flags)
        }
        Commands::Report { output } => dashboard::handle_report(cli.json, api, output.as_deref()),
        Commands::Status => dashboard::handle_status(cli.json, settings, api),
        Commands::History { limit } => dashboard::handle_history(cli.json, *limit),
    }
}
