//! Arcana
//!
//! Entitlement ledger, payment tracking, and deterministic content
//! selection for an astrology chat bot.
//!
//! ## Standalone
//!
//! Run the binary:
//! ```bash
//! arcana-server
//! ```
//!
//! ## Embedded (Axum)
//!
//! When the `server` feature is enabled, this crate can be embedded into a larger Axum app:
//! ```rust,ignore
//! use axum::Router;
//! use arcana::infrastructure::AppConfig;
//! use arcana::server::{build_state, router};
//!
//! let cfg = AppConfig::from_env()?;
//! let state = build_state(cfg)?;
//! let app = Router::new().nest("/arcana", router(state));
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

// Standalone + embedded HTTP server support (Axum).
// Enabled behind the `server` feature so the core library can be used without Axum.
#[cfg(feature = "server")]
pub mod server;

pub use application::*;
pub use domain::*;
pub use infrastructure::*;

#[cfg(feature = "server")]
pub use server::*;
