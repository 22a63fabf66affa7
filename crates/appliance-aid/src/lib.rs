//! `appliance-aid` - AI-assisted home appliance troubleshooting
//!
//! This library provides the core functionality for diagnosing appliance
//! problems through the Gemini API and finding local repair technicians
//! through Google Maps grounding.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod history;
pub mod logging;
pub mod render;
pub mod report;
pub mod session;
pub mod technician;

pub use catalog::{Appliance, APPLIANCES};
pub use config::Config;
pub use error::{Error, Result};
pub use gemini::GeminiClient;
pub use history::{History, HistoryEntry};
pub use logging::init_logging;
pub use render::render_markdown;
pub use report::{IssueReport, Photo};
pub use session::Session;
pub use technician::{SortOrder, Technician};
