//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `models.rs` — candidate profile, backend response shapes, output structs.
//! - `constants.rs` — defaults and display thresholds.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Backend payload structs mirror the verification service's JSON. Output
//! structs feed `--json` and are pinned by `docs/contracts/*`.

pub mod constants;
pub mod models;
