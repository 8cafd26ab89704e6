//! # Wasmplane
//!
//! Wasmplane is the extension layer of an Envoy control plane. It turns
//! declarative wasm extension intent into the live HTTP filter configuration
//! of Envoy listeners, and exposes those extensions over ECDS-style config
//! discovery.
//!
//! ## Architecture
//!
//! One generation pass is a synchronous, CPU-only transformation:
//!
//! ```text
//! intent resources → Descriptor Builder → descriptors
//!                                            ↓
//!                                     Phase Classifier → PhaseMap
//!                                            ↓                ↓
//!                              Filter Chain Injector   Discovery Resolver
//!                                            ↓                ↓
//!                              rewritten listeners     discovery entries
//! ```
//!
//! The injector splices discovery-reference filter entries into each listener
//! chain at phase-correct positions relative to well-known anchor filters
//! (JWT authn, RBAC, stats, router). The resolver serves the configuration of
//! requested extensions to the discovery-subscription layer. Fetching and
//! verifying the actual wasm binaries happens out-of-band, by the agent
//! subscribed to discovery, never here.
//!
//! ## Example
//!
//! ```rust
//! use wasmplane::config::ExtensionSettings;
//! use wasmplane::xds::extensions::{build_descriptor, inject_listeners, Phase, PhaseMap};
//!
//! # fn run(resources: Vec<wasmplane::xds::extensions::ConfigResource>,
//! #        listeners: Vec<Option<envoy_types::pb::envoy::config::listener::v3::Listener>>)
//! #        -> wasmplane::Result<()> {
//! let settings = ExtensionSettings::default();
//! let mut classified = Vec::new();
//! for resource in &resources {
//!     if let Some(descriptor) = build_descriptor(resource, &settings)? {
//!         classified.push((Phase::Unspecified, descriptor));
//!     }
//! }
//! let phase_map = PhaseMap::from_classified(classified);
//! let listeners = inject_listeners(&phase_map, listeners, "sidecar~10.0.0.1");
//! # let _ = listeners;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod observability;
pub mod xds;

// Re-export commonly used types
pub use config::{ExtensionSettings, ObservabilityConfig};
pub use errors::{Error, Result};
pub use observability::init_logging;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
