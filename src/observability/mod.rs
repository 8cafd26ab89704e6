//! # Observability Infrastructure
//!
//! Structured logging for the extension engine. The engine itself only emits
//! `tracing` events; installing a subscriber is the embedding binary's
//! decision, made through [`init_logging`].

pub mod logging;

pub use logging::init_logging;
