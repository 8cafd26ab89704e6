//! Intent resource model and descriptor construction.

use crate::config::ExtensionSettings;
use crate::errors::{Error, Result};
use crate::xds::filters::http::wasm::{
    WasmCodeSource, WasmFilterConfig, WasmLocalSource, WasmRemoteSource, WasmVmConfig,
};
use envoy_types::pb::google::protobuf::Any;
use serde::Deserialize;

/// One resource from the intent stream.
///
/// Intent streams are heterogeneous: kinds this engine does not interpret
/// deserialize to [`ResourceSpec::Unsupported`] and are silently skipped by
/// [`build_descriptor`].
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigResource {
    pub name: String,
    pub namespace: String,
    pub spec: ResourceSpec,
}

/// The typed payload of a [`ConfigResource`], tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum ResourceSpec {
    /// A wasm extension intent
    #[serde(rename = "wasm-extension")]
    WasmExtension(WasmExtensionSpec),

    /// Any kind this engine does not interpret
    #[serde(other)]
    Unsupported,
}

/// Declarative wasm extension intent.
#[derive(Debug, Clone, Deserialize)]
pub struct WasmExtensionSpec {
    /// Logical plugin id, becomes the filter's root id
    pub plugin_name: String,

    /// Binary location: an HTTP(S) url for remote fetch, anything else is
    /// treated as a file path on the proxy
    pub url: String,

    /// Integrity digest, expected whenever `url` is remote. Absence is not
    /// validated here.
    #[serde(default)]
    pub sha256: Option<String>,

    /// Arbitrary configuration document handed to the module
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

/// Immutable, proxy-consumable representation of one extension's code source,
/// runtime, and configuration. Built from exactly one intent resource; holds
/// no reference back to the listener set.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionDescriptor {
    /// Resource name, the discovery-lookup key
    pub name: String,
    pub namespace: String,
    /// The proxy-consumable wasm filter configuration
    pub filter: WasmFilterConfig,
}

impl ExtensionDescriptor {
    /// Wire form of the extension's wasm filter configuration.
    pub fn to_any(&self) -> Any {
        self.filter.to_any()
    }
}

/// Build a descriptor from one intent resource.
///
/// Returns `Ok(None)` when the resource is not a wasm extension; callers
/// iterate heterogeneous streams and treat non-matching kinds as a skip.
/// A failure to encode the configuration document is a real error and is
/// surfaced, never swallowed.
pub fn build_descriptor(
    resource: &ConfigResource,
    settings: &ExtensionSettings,
) -> Result<Option<ExtensionDescriptor>> {
    let spec = match &resource.spec {
        ResourceSpec::WasmExtension(spec) => spec,
        ResourceSpec::Unsupported => return Ok(None),
    };

    let configuration = match &spec.config {
        Some(doc) if !is_empty_document(doc) => Some(encode_config(doc, &resource.name)?),
        _ => None,
    };

    let code = if spec.url.starts_with("http") {
        WasmCodeSource::Remote(WasmRemoteSource {
            uri: spec.url.clone(),
            sha256: spec.sha256.clone().unwrap_or_default(),
            timeout_secs: settings.remote_fetch_timeout_secs,
            cluster: settings.remote_fetch_cluster.clone(),
        })
    } else {
        WasmCodeSource::Local(WasmLocalSource { path: spec.url.clone() })
    };

    Ok(Some(ExtensionDescriptor {
        name: resource.name.clone(),
        namespace: resource.namespace.clone(),
        filter: WasmFilterConfig {
            name: resource.name.clone(),
            root_id: spec.plugin_name.clone(),
            vm_config: WasmVmConfig { runtime: settings.vm_runtime.clone(), code },
            configuration,
        },
    }))
}

fn is_empty_document(doc: &serde_json::Value) -> bool {
    match doc {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Canonical JSON text of the configuration document. serde_json keeps object
/// keys sorted, so equal documents encode to equal text.
fn encode_config(doc: &serde_json::Value, resource: &str) -> Result<String> {
    serde_json::to_string(doc)
        .map_err(|e| Error::serialization(e, format!("extension '{}' configuration", resource)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(url: &str, sha256: Option<&str>, config: Option<serde_json::Value>) -> ConfigResource {
        ConfigResource {
            name: "edge-auth".to_string(),
            namespace: "gateways".to_string(),
            spec: ResourceSpec::WasmExtension(WasmExtensionSpec {
                plugin_name: "edge_auth".to_string(),
                url: url.to_string(),
                sha256: sha256.map(str::to_string),
                config,
            }),
        }
    }

    #[test]
    fn remote_url_builds_remote_source() {
        let settings = ExtensionSettings::default();
        let descriptor = build_descriptor(
            &resource("http://example/x.wasm", Some("abc123"), None),
            &settings,
        )
        .unwrap()
        .unwrap();

        assert_eq!(descriptor.name, "edge-auth");
        assert_eq!(descriptor.filter.root_id, "edge_auth");
        match &descriptor.filter.vm_config.code {
            WasmCodeSource::Remote(remote) => {
                assert_eq!(remote.uri, "http://example/x.wasm");
                assert_eq!(remote.sha256, "abc123");
                assert_eq!(remote.timeout_secs, 10);
                assert_eq!(remote.cluster, settings.remote_fetch_cluster);
            }
            other => panic!("expected remote source, got {:?}", other),
        }
    }

    #[test]
    fn plain_path_builds_local_source() {
        let descriptor = build_descriptor(
            &resource("/etc/extensions/x.wasm", None, None),
            &ExtensionSettings::default(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            descriptor.filter.vm_config.code,
            WasmCodeSource::Local(WasmLocalSource { path: "/etc/extensions/x.wasm".to_string() })
        );
    }

    #[test]
    fn missing_config_yields_no_payload() {
        let descriptor = build_descriptor(
            &resource("/x.wasm", None, None),
            &ExtensionSettings::default(),
        )
        .unwrap()
        .unwrap();
        assert!(descriptor.filter.configuration.is_none());
    }

    #[test]
    fn empty_config_document_yields_no_payload() {
        let descriptor = build_descriptor(
            &resource("/x.wasm", None, Some(serde_json::json!({}))),
            &ExtensionSettings::default(),
        )
        .unwrap()
        .unwrap();
        assert!(descriptor.filter.configuration.is_none());
    }

    #[test]
    fn config_document_encodes_canonically() {
        let descriptor = build_descriptor(
            &resource("/x.wasm", None, Some(serde_json::json!({"b": 2, "a": 1}))),
            &ExtensionSettings::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(descriptor.filter.configuration.as_deref(), Some(r#"{"a":1,"b":2}"#));
    }

    #[test]
    fn unsupported_kind_is_skipped_not_failed() {
        let parsed: ConfigResource = serde_json::from_value(serde_json::json!({
            "name": "inventory",
            "namespace": "mesh",
            "spec": { "kind": "service-entry", "hosts": ["example.com"] }
        }))
        .unwrap();

        let built = build_descriptor(&parsed, &ExtensionSettings::default()).unwrap();
        assert!(built.is_none());
    }

    #[test]
    fn wasm_extension_intent_parses_from_json() {
        let parsed: ConfigResource = serde_json::from_value(serde_json::json!({
            "name": "edge-auth",
            "namespace": "gateways",
            "spec": {
                "kind": "wasm-extension",
                "plugin_name": "edge_auth",
                "url": "https://plugins.example.com/auth.wasm",
                "sha256": "abc123",
                "config": { "issuer": "https://idp.example.com" }
            }
        }))
        .unwrap();

        let descriptor =
            build_descriptor(&parsed, &ExtensionSettings::default()).unwrap().unwrap();
        assert_eq!(
            descriptor.filter.configuration.as_deref(),
            Some(r#"{"issuer":"https://idp.example.com"}"#)
        );
    }
}
