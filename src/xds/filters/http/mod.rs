//! Wire models for Envoy HTTP filters.
//!
//! Each filter module pairs a serde-friendly configuration type with the
//! conversion into the corresponding Envoy protobuf message.

pub mod wasm;
