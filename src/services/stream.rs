//! Live screening simulation.
//!
//! Every tick pulls a fresh synthetic batch, sometimes shifts it to fake a
//! distribution change, and sends it to the screening endpoint. The loop is
//! started and stopped through a shared flag.

use crate::backend::VerificationApi;
use crate::domain::constants::SCREEN_LOG_CAPACITY;
use crate::domain::models::{DatasetRow, DriftStatus, ScreenLogItem, StreamSummary};
use crate::services::render::drift_status;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const STOP_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct StreamSettings {
    pub interval: Duration,
    pub batch_size: u32,
    pub max_batches: Option<u64>,
    pub drift_probability: f64,
    pub drift_shift: f64,
}

#[derive(Debug, Clone, Default)]
pub struct StreamController {
    running: Arc<AtomicBool>,
}

impl StreamController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Ctrl-C stops the loop so the summary still gets written. A second
/// Ctrl-C while it winds down exits right away.
pub fn stop_on_interrupt(controller: &StreamController) -> anyhow::Result<()> {
    let handle = controller.clone();
    ctrlc::set_handler(move || {
        if handle.is_running() {
            handle.stop();
        } else {
            std::process::exit(130);
        }
    })?;
    Ok(())
}

pub struct ScreenLog {
    items: VecDeque<ScreenLogItem>,
    status: DriftStatus,
}

impl Default for ScreenLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenLog {
    pub fn new() -> Self {
        Self {
            items: VecDeque::with_capacity(SCREEN_LOG_CAPACITY + 1),
            status: DriftStatus {
                label: "Stable".to_string(),
                details: "Distribution matches baseline.".to_string(),
            },
        }
    }

    /// Newest first; the oldest item falls off past capacity.
    pub fn push(&mut self, item: ScreenLogItem) {
        self.items.push_front(item);
        if self.items.len() > SCREEN_LOG_CAPACITY {
            self.items.pop_back();
        }
    }

    pub fn set_status(&mut self, status: DriftStatus) {
        self.status = status;
    }

    pub fn status(&self) -> &DriftStatus {
        &self.status
    }

    pub fn items(&self) -> impl Iterator<Item = &ScreenLogItem> {
        self.items.iter()
    }
}

pub fn inject_drift(rows: &mut [DatasetRow], shift: f64) {
    for row in rows {
        row.experience += shift;
    }
}

fn now_label() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

fn wait_for_tick(controller: &StreamController, interval: Duration) {
    let deadline = Instant::now() + interval;
    while controller.is_running() {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        std::thread::sleep(STOP_POLL.min(deadline - now));
    }
}

fn screen_one<A: VerificationApi, R: Rng>(
    api: &A,
    settings: &StreamSettings,
    rng: &mut R,
    batch: u64,
    log: &mut ScreenLog,
) -> ScreenLogItem {
    let mut rows = match api.generate_data(settings.batch_size) {
        Ok(rows) => rows,
        Err(e) => {
            warn!(batch, error = %e, "could not fetch stream batch");
            return failed_item(batch, 0, false);
        }
    };
    let injected = rng.gen_bool(settings.drift_probability);
    if injected {
        debug!(batch, shift = settings.drift_shift, "injecting experience drift");
        inject_drift(&mut rows, settings.drift_shift);
    }
    match api.screen(&rows) {
        Ok(result) => {
            let status = drift_status(&result);
            log.set_status(status);
            ScreenLogItem {
                time: now_label(),
                batch,
                count: rows.len(),
                drift_detected: result.drift_detected(),
                drifted_features: result
                    .drifted_features()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                injected_shift: injected,
                error: None,
            }
        }
        Err(e) => {
            warn!(batch, error = %e, "screening request failed");
            failed_item(batch, rows.len(), injected)
        }
    }
}

fn failed_item(batch: u64, count: usize, injected: bool) -> ScreenLogItem {
    ScreenLogItem {
        time: now_label(),
        batch,
        count,
        drift_detected: false,
        drifted_features: vec![],
        injected_shift: injected,
        error: Some("request failed".to_string()),
    }
}

/// Run ticks until the controller is stopped or `max_batches` is reached.
/// `on_tick` sees each new item together with the current drift status.
pub fn run_stream<A, R, F>(
    api: &A,
    settings: &StreamSettings,
    rng: &mut R,
    controller: &StreamController,
    mut on_tick: F,
) -> StreamSummary
where
    A: VerificationApi,
    R: Rng,
    F: FnMut(&ScreenLogItem, &DriftStatus),
{
    let mut log = ScreenLog::new();
    let mut batches = 0u64;
    let mut drifted = 0u64;
    let mut failed = 0u64;

    controller.start();
    info!(
        interval_ms = settings.interval.as_millis() as u64,
        batch_size = settings.batch_size,
        "stream started"
    );
    while controller.is_running() {
        if settings.max_batches.map(|m| batches >= m).unwrap_or(false) {
            controller.stop();
            break;
        }
        wait_for_tick(controller, settings.interval);
        if !controller.is_running() {
            break;
        }
        batches += 1;
        let item = screen_one(api, settings, rng, batches, &mut log);
        if item.error.is_some() {
            failed += 1;
        } else if item.drift_detected {
            drifted += 1;
        }
        on_tick(&item, log.status());
        log.push(item);
    }
    info!(batches, drifted, failed, "stream stopped");

    StreamSummary {
        batches,
        drifted_batches: drifted,
        failed_batches: failed,
        status: log.status().clone(),
        log: log.items().cloned().collect(),
    }
}
