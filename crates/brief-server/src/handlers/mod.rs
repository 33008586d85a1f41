//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analytics;
pub mod classify;
pub mod export;
pub mod health;
pub mod insights;

// Re-export all handlers for use in router
pub use analytics::*;
pub use classify::*;
pub use export::*;
pub use health::*;
pub use insights::*;
