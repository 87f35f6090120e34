pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 800;

pub const DEFAULT_GENERATE_SAMPLES: u32 = 200;
pub const DEFAULT_AUDIT_SAMPLES: u32 = 500;

pub const DEFAULT_STREAM_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_STREAM_BATCH_SIZE: u32 = 20;
pub const DEFAULT_DRIFT_PROBABILITY: f64 = 0.4;
pub const DEFAULT_DRIFT_SHIFT: f64 = 3.0;

/// Screen log keeps this many items, newest first.
pub const SCREEN_LOG_CAPACITY: usize = 20;

/// Four-fifths rule.
pub const DISPARATE_IMPACT_THRESHOLD: f64 = 0.8;

pub const SYNTHETIC_UPLOAD_NAME: &str = "synthetic_data.json";

pub const AGE_MIN: i64 = 18;
pub const AGE_MAX: i64 = 70;
pub const EXPERIENCE_MIN: i64 = 0;
pub const EXPERIENCE_MAX: i64 = 40;
