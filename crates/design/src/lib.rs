//! # Appliance Aid Design Documentation
//!
//! This crate contains design documentation, architectural decision records,
//! and implementation guides for the Appliance Aid project.
//!
//! ## Documentation Location
//!
//! All design documents are located in the `docs/` directory at the root
//! of this crate.
//!
//! Key documents:
//! - `architecture.md` - Overall system architecture
//! - `flow.md` - The diagnosis flow state machine
//! - `gemini.md` - Gemini API integration notes
//! - `adr/` - Architectural Decision Records

// This is a documentation-only crate
#![no_std]
