//! HTTP endpoint modules.
//!
//! Shared response types live here in mod.rs.

mod ask;
pub mod doc;
mod health;

use serde::Serialize;

// ── Shared types ─────────────────────────────────────────────────

#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// ── Re-exports ───────────────────────────────────────────────────

pub use ask::{ask_agent, test_echo, test_fixed_question};
pub use health::{health, home};
