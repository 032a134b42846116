//! Data models for the SkiDráček site.
//!
//! Field names follow the JSON shapes the editor and the public page exchange.

mod content;

pub use content::*;
