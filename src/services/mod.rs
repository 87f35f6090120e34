//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `config.rs` — layered settings (defaults, config.toml, env, flags).
//! - `format.rs` — fixed-decimal and percentage formatting.
//! - `render.rs` — decision/audit/twin/drift cards as text.
//! - `session.rs` — idle/loading/success/error view state.
//! - `stream.rs` — live screening loop, controller and bounded log.
//! - `history.rs` — local action log.
//! - `logging.rs` — tracing subscriber setup.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod config;
pub mod format;
pub mod history;
pub mod logging;
pub mod output;
pub mod render;
pub mod session;
pub mod stream;
