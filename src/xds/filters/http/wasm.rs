//! WebAssembly (WASM) HTTP filter wire model.
//!
//! Converts the control plane's wasm filter configuration into the Envoy
//! `envoy.extensions.filters.http.wasm.v3.Wasm` protobuf. The configuration
//! payload travels as canonical JSON text wrapped in a
//! `google.protobuf.StringValue`, so neither the proxy nor the subscribing
//! agent needs a compiled schema for it.

use crate::config::{DEFAULT_REMOTE_FETCH_TIMEOUT_SECS, DEFAULT_VM_RUNTIME};
use crate::xds::filters::any_from_message;
use envoy_types::pb::envoy::config::core::v3::{
    async_data_source::Specifier as AsyncSpecifier, data_source::Specifier,
    http_uri::HttpUpstreamType, AsyncDataSource, DataSource, HttpUri, RemoteDataSource,
};
use envoy_types::pb::envoy::extensions::filters::http::wasm::v3::Wasm as WasmProto;
use envoy_types::pb::envoy::extensions::wasm::v3::{
    plugin_config::Vm, FailurePolicy, PluginConfig, VmConfig as VmConfigProto,
};
use envoy_types::pb::google::protobuf::{Any as EnvoyAny, Duration, StringValue};
use prost::Message;
use serde::{Deserialize, Serialize};

/// Bare protobuf type name of the wasm HTTP filter, as listed in ECDS
/// `type_urls`.
pub const WASM_FILTER_TYPE: &str = "envoy.extensions.filters.http.wasm.v3.Wasm";

/// Fully qualified type URL for wasm filter configuration.
pub const WASM_FILTER_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.http.wasm.v3.Wasm";

const STRING_VALUE_TYPE_URL: &str = "type.googleapis.com/google.protobuf.StringValue";

/// WASM filter configuration.
///
/// `name` doubles as the discovery-lookup key; `root_id` identifies the
/// logical plugin for state sharing between instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasmFilterConfig {
    pub name: String,

    #[serde(default)]
    pub root_id: String,

    pub vm_config: WasmVmConfig,

    /// Plugin configuration as canonical JSON text, delivered to the module
    /// as an opaque string value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
}

/// VM configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasmVmConfig {
    /// WASM runtime to use (e.g. "envoy.wasm.runtime.v8")
    #[serde(default = "default_runtime")]
    pub runtime: String,

    /// WASM binary source
    pub code: WasmCodeSource,
}

fn default_runtime() -> String {
    DEFAULT_VM_RUNTIME.to_string()
}

/// WASM code source, exactly one of remote or local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasmCodeSource {
    /// Fetched over HTTP by the discovery-subscribing agent
    Remote(WasmRemoteSource),
    /// Read from the proxy's filesystem
    Local(WasmLocalSource),
}

/// Remote WASM source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasmRemoteSource {
    /// Full URI of the wasm binary
    pub uri: String,

    /// SHA256 integrity digest, empty when the intent supplied none
    #[serde(default)]
    pub sha256: String,

    /// Fetch timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// Upstream cluster recorded on the fetch URI. Intentionally unresolved;
    /// the fetch happens out-of-band.
    pub cluster: String,
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_REMOTE_FETCH_TIMEOUT_SECS
}

/// Local WASM source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasmLocalSource {
    /// Path to the WASM file
    pub path: String,
}

impl WasmFilterConfig {
    /// Convert to an Envoy protobuf `Any` message
    pub fn to_any(&self) -> EnvoyAny {
        any_from_message(WASM_FILTER_TYPE_URL, &self.to_proto())
    }

    /// Convert to the Envoy wasm filter protobuf
    pub fn to_proto(&self) -> WasmProto {
        let configuration = self.configuration.as_ref().map(|json| {
            let wrapped = StringValue { value: json.clone() };
            EnvoyAny {
                type_url: STRING_VALUE_TYPE_URL.to_string(),
                value: wrapped.encode_to_vec(),
            }
        });

        #[allow(deprecated)]
        let plugin_config = PluginConfig {
            name: self.name.clone(),
            root_id: self.root_id.clone(),
            vm: Some(Vm::VmConfig(self.vm_config.to_proto())),
            configuration,
            fail_open: false, // deprecated but required for struct initialization
            failure_policy: FailurePolicy::Unspecified as i32,
            reload_config: None,
            capability_restriction_config: None,
            allow_on_headers_stop_iteration: None,
        };

        WasmProto { config: Some(plugin_config) }
    }

    /// Protojson-shaped document of [`Self::to_proto`].
    ///
    /// Field names and nesting follow the protobuf message, so a subscriber
    /// that resolves the tagged type URL can reconstruct the filter from the
    /// struct form. Durations use the protojson `"<secs>s"` encoding.
    pub fn to_proto_json(&self) -> serde_json::Value {
        let code = match &self.vm_config.code {
            WasmCodeSource::Remote(remote) => serde_json::json!({
                "remote": {
                    "http_uri": {
                        "uri": remote.uri,
                        "cluster": remote.cluster,
                        "timeout": format!("{}s", remote.timeout_secs),
                    },
                    "sha256": remote.sha256,
                }
            }),
            WasmCodeSource::Local(local) => serde_json::json!({
                "local": { "filename": local.path }
            }),
        };

        let mut config = serde_json::json!({
            "name": self.name,
            "root_id": self.root_id,
            "vm_config": {
                "runtime": self.vm_config.runtime,
                "code": code,
            },
        });
        if let Some(json) = &self.configuration {
            config["configuration"] = serde_json::json!({
                "@type": STRING_VALUE_TYPE_URL,
                "value": json,
            });
        }
        serde_json::json!({ "config": config })
    }
}

impl WasmVmConfig {
    fn to_proto(&self) -> VmConfigProto {
        VmConfigProto {
            vm_id: String::new(),
            runtime: self.runtime.clone(),
            code: Some(self.code.to_proto()),
            configuration: None,
            allow_precompiled: false,
            nack_on_code_cache_miss: false,
            environment_variables: None,
        }
    }
}

impl WasmCodeSource {
    fn to_proto(&self) -> AsyncDataSource {
        match self {
            WasmCodeSource::Remote(remote) => AsyncDataSource {
                specifier: Some(AsyncSpecifier::Remote(RemoteDataSource {
                    http_uri: Some(HttpUri {
                        uri: remote.uri.clone(),
                        http_upstream_type: Some(HttpUpstreamType::Cluster(
                            remote.cluster.clone(),
                        )),
                        timeout: Some(Duration { seconds: remote.timeout_secs as i64, nanos: 0 }),
                    }),
                    sha256: remote.sha256.clone(),
                    retry_policy: None,
                })),
            },
            WasmCodeSource::Local(local) => AsyncDataSource {
                specifier: Some(AsyncSpecifier::Local(DataSource {
                    specifier: Some(Specifier::Filename(local.path.clone())),
                    watched_directory: None,
                })),
            },
        }
    }
}
