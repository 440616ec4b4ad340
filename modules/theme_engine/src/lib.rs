//! Theme Engine Module
//!
//! Composes storefront pages from theme packages and per-store overrides: template
//! resolution, JSON default templates, nested blocks, global sections, presets, theme
//! switching with settings migration, backups and theme file history.

// Public exports
pub mod contract;
pub use contract::{client::ThemeEngineApi, error::ThemeEngineError};

pub mod module;
pub use module::ThemeEngineModule;

pub mod config;
pub use config::Config;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
