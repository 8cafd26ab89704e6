//! Discovery resolution for subscribed extensions.
//!
//! The chains only carry discovery references; the actual extension
//! configuration is served here, to the discovery-subscription layer, for the
//! names a subscriber has requested.

use super::phase::PhaseMap;
use crate::xds::filters::http::wasm::{WasmFilterConfig, WASM_FILTER_TYPE_URL};
use crate::xds::filters::{any_from_message, struct_from_json, TypedStruct};
use envoy_types::pb::envoy::config::core::v3::TypedExtensionConfig;
use envoy_types::pb::google::protobuf::Any;
use std::collections::HashSet;

const TYPED_STRUCT_TYPE_URL: &str = "type.googleapis.com/xds.type.v3.TypedStruct";

/// Resolve the discovery-response entries for the extensions a subscriber has
/// requested by name.
///
/// Order is deterministic: phases in drain precedence, insertion order within
/// a phase. Entries are built fresh per call, so handing them out never
/// exposes retained state.
pub fn resolve_extensions(
    phase_map: &PhaseMap,
    requested: &HashSet<String>,
) -> Vec<TypedExtensionConfig> {
    let mut entries = Vec::new();
    if phase_map.is_empty() {
        return entries;
    }

    for extension in phase_map.iter() {
        if !requested.contains(&extension.name) {
            continue;
        }
        entries.push(TypedExtensionConfig {
            name: extension.name.clone(),
            typed_config: Some(structured_config(&extension.filter)),
        });
    }
    entries
}

/// Re-express the wasm filter configuration as a generically typed structured
/// value. The struct body is the protojson shape of the tagged message, so
/// subscribers can reconstruct the filter without a compiled schema.
fn structured_config(filter: &WasmFilterConfig) -> Any {
    let wrapped = TypedStruct {
        type_url: WASM_FILTER_TYPE_URL.to_string(),
        value: Some(struct_from_json(&filter.to_proto_json())),
    };
    any_from_message(TYPED_STRUCT_TYPE_URL, &wrapped)
}
