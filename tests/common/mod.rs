//! Shared builders for extension engine integration tests.

#![allow(dead_code)]

use envoy_types::pb::envoy::config::listener::v3::{
    filter::ConfigType as ListenerConfigType, Filter, FilterChain, Listener,
};
use envoy_types::pb::envoy::extensions::filters::network::http_connection_manager::v3::{
    HttpConnectionManager, HttpFilter,
};
use wasmplane::config::ExtensionSettings;
use wasmplane::xds::extensions::{
    build_descriptor, ConfigResource, ExtensionDescriptor, ResourceSpec, WasmExtensionSpec,
    HTTP_CONNECTION_MANAGER_FILTER, HTTP_CONNECTION_MANAGER_TYPE_URL,
};
use wasmplane::xds::filters::any_from_message;

pub fn http_filter(name: &str) -> HttpFilter {
    HttpFilter {
        name: name.to_string(),
        config_type: None,
        is_optional: false,
        disabled: false,
    }
}

/// A network filter entry carrying an HCM with the given HTTP filter list.
pub fn hcm_filter(http_filters: Vec<HttpFilter>) -> Filter {
    let hcm = HttpConnectionManager {
        stat_prefix: "ingress_http".to_string(),
        http_filters,
        ..Default::default()
    };
    Filter {
        name: HTTP_CONNECTION_MANAGER_FILTER.to_string(),
        config_type: Some(ListenerConfigType::TypedConfig(any_from_message(
            HTTP_CONNECTION_MANAGER_TYPE_URL,
            &hcm,
        ))),
    }
}

pub fn listener(name: &str, chains: Vec<Vec<Filter>>) -> Listener {
    Listener {
        name: name.to_string(),
        filter_chains: chains
            .into_iter()
            .map(|filters| FilterChain { filters, ..Default::default() })
            .collect(),
        ..Default::default()
    }
}

/// HTTP filter names of one chain, decoded back out of the listener.
pub fn chain_filter_names(listener: &Listener, chain_index: usize) -> Vec<String> {
    let chain = &listener.filter_chains[chain_index];
    let filter = chain
        .filters
        .iter()
        .find(|f| f.name == HTTP_CONNECTION_MANAGER_FILTER && f.config_type.is_some())
        .expect("chain has no connection manager");
    let Some(ListenerConfigType::TypedConfig(any)) = &filter.config_type else {
        panic!("connection manager has no typed config")
    };
    let hcm = <HttpConnectionManager as prost::Message>::decode(any.value.as_slice())
        .expect("connection manager should decode");
    hcm.http_filters.into_iter().map(|f| f.name).collect()
}

pub fn wasm_resource(name: &str, url: &str, sha256: Option<&str>) -> ConfigResource {
    ConfigResource {
        name: name.to_string(),
        namespace: "gateways".to_string(),
        spec: ResourceSpec::WasmExtension(WasmExtensionSpec {
            plugin_name: format!("{}_plugin", name.replace('-', "_")),
            url: url.to_string(),
            sha256: sha256.map(str::to_string),
            config: None,
        }),
    }
}

pub fn descriptor(name: &str) -> ExtensionDescriptor {
    build_descriptor(
        &wasm_resource(name, &format!("/etc/extensions/{}.wasm", name), None),
        &ExtensionSettings::default(),
    )
    .expect("descriptor build should not fail")
    .expect("resource is a wasm extension")
}
