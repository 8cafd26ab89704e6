//! Envoy xDS resource manipulation.
//!
//! Everything under here operates on `envoy-types` protobuf values: the wire
//! model for the wasm HTTP filter, shared `Any`/`Struct` helpers, and the
//! extension insertion and discovery-resolution engine itself.

pub mod extensions;
pub mod filters;
