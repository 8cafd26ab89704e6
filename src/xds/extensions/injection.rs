//! Filter chain injection.
//!
//! Rewrites each listener chain's HTTP filter list so every classified
//! extension is spliced in immediately before the first anchor filter that
//! closes its phase. Extensions enter the chain as discovery references, a
//! filter entry naming the extension and pointing at the aggregated config
//! discovery source instead of inlining its definition.

use super::descriptor::ExtensionDescriptor;
use super::phase::{Phase, PhaseMap};
use super::{
    HTTP_CONNECTION_MANAGER_FILTER, HTTP_CONNECTION_MANAGER_TYPE_URL, JWT_AUTHN_FILTER,
    RBAC_FILTER, ROUTER_FILTER, STATS_FILTER,
};
use crate::xds::filters::any_from_message;
use crate::xds::filters::http::wasm::WASM_FILTER_TYPE;
use envoy_types::pb::envoy::config::core::v3::{
    config_source::ConfigSourceSpecifier, AggregatedConfigSource, ApiVersion, ConfigSource,
    ExtensionConfigSource,
};
use envoy_types::pb::envoy::config::listener::v3::{
    filter::ConfigType as ListenerConfigType, Filter, FilterChain, Listener,
};
use envoy_types::pb::envoy::extensions::filters::network::http_connection_manager::v3::{
    http_filter::ConfigType as HttpConfigType, HttpConnectionManager, HttpFilter,
};
use prost::Message;
use tracing::{debug, warn};

/// The anchors the injector recognizes in an HTTP filter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    JwtAuthn,
    Rbac,
    Stats,
    Router,
    Other,
}

impl Anchor {
    fn classify(filter_name: &str) -> Self {
        match filter_name {
            JWT_AUTHN_FILTER => Anchor::JwtAuthn,
            RBAC_FILTER => Anchor::Rbac,
            STATS_FILTER => Anchor::Stats,
            ROUTER_FILTER => Anchor::Router,
            _ => Anchor::Other,
        }
    }

    /// The phase buckets this anchor closes: a fixed prefix of the drain
    /// order, up to and including the anchor's own rank.
    fn drains(self) -> &'static [Phase] {
        match self {
            Anchor::JwtAuthn => &Phase::DRAIN_ORDER[..1],
            Anchor::Rbac => &Phase::DRAIN_ORDER[..2],
            Anchor::Stats => &Phase::DRAIN_ORDER[..3],
            Anchor::Router => &Phase::DRAIN_ORDER[..4],
            Anchor::Other => &[],
        }
    }
}

/// Splice every classified extension into the listener set.
///
/// Listener slots may be empty when an upstream generator declined to produce
/// one; empty slots pass through at their position. The call owns the
/// collection for its duration and returns the rewritten set; callers must
/// not alias the input after passing it in.
pub fn inject_listeners(
    phase_map: &PhaseMap,
    mut listeners: Vec<Option<Listener>>,
    proxy_id: &str,
) -> Vec<Option<Listener>> {
    if phase_map.is_empty() {
        return listeners;
    }

    for listener in listeners.iter_mut().flatten() {
        inject_listener(phase_map, listener, proxy_id);
    }
    listeners
}

/// Rewrite each filter chain of one listener, in chain order. A chain that
/// cannot be rewritten is left untouched and never aborts the others.
pub fn inject_listener(phase_map: &PhaseMap, listener: &mut Listener, proxy_id: &str) {
    if phase_map.is_empty() {
        return;
    }

    let name = listener.name.clone();
    for chain in listener.filter_chains.iter_mut() {
        rewrite_filter_chain(phase_map, chain, &name, proxy_id);
    }
}

fn rewrite_filter_chain(
    phase_map: &PhaseMap,
    chain: &mut FilterChain,
    listener_name: &str,
    proxy_id: &str,
) {
    // Only the first connection-manager filter carrying a typed config is
    // considered; name matches without one are skipped, not terminal.
    let Some(hcm_index) = chain.filters.iter().position(|f| {
        f.name == HTTP_CONNECTION_MANAGER_FILTER
            && matches!(f.config_type, Some(ListenerConfigType::TypedConfig(_)))
    }) else {
        return;
    };

    let Some(ListenerConfigType::TypedConfig(typed_config)) =
        &chain.filters[hcm_index].config_type
    else {
        return;
    };

    let mut hcm = match HttpConnectionManager::decode(typed_config.value.as_slice()) {
        Ok(hcm) => hcm,
        Err(e) => {
            warn!(
                listener = %listener_name,
                proxy = %proxy_id,
                error = %e,
                "Undecodable HTTP connection manager, leaving chain unmodified"
            );
            return;
        }
    };

    // One walk over the existing filter list with a chain-local clone of the
    // phase buckets. Draining empties a bucket, so a later anchor in the same
    // chain cannot re-insert it.
    let mut buckets = phase_map.clone();
    let mut rewritten = Vec::with_capacity(hcm.http_filters.len() + phase_map.len());
    for http_filter in hcm.http_filters.drain(..) {
        for phase in Anchor::classify(&http_filter.name).drains() {
            for extension in buckets.drain(*phase) {
                rewritten.push(discovery_reference(&extension));
            }
        }
        rewritten.push(http_filter);
    }

    if !buckets.is_empty() {
        debug!(
            listener = %listener_name,
            proxy = %proxy_id,
            remaining = buckets.len(),
            "Chain has no router filter, undrained extensions were not inserted"
        );
    }

    hcm.http_filters = rewritten;
    chain.filters[hcm_index] = Filter {
        name: HTTP_CONNECTION_MANAGER_FILTER.to_string(),
        config_type: Some(ListenerConfigType::TypedConfig(any_from_message(
            HTTP_CONNECTION_MANAGER_TYPE_URL,
            &hcm,
        ))),
    };
}

/// A filter entry naming the extension without embedding its definition;
/// resolution is deferred to the aggregated discovery subscription.
fn discovery_reference(extension: &ExtensionDescriptor) -> HttpFilter {
    HttpFilter {
        name: extension.name.clone(),
        config_type: Some(HttpConfigType::ConfigDiscovery(ExtensionConfigSource {
            config_source: Some(ads_config_source()),
            default_config: None,
            apply_default_config_without_warming: false,
            type_urls: vec![WASM_FILTER_TYPE.to_string()],
        })),
        is_optional: false,
        disabled: false,
    }
}

fn ads_config_source() -> ConfigSource {
    ConfigSource {
        config_source_specifier: Some(ConfigSourceSpecifier::Ads(
            AggregatedConfigSource::default(),
        )),
        resource_api_version: ApiVersion::V3 as i32,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_matches_anchor_names() {
        assert_eq!(Anchor::classify(JWT_AUTHN_FILTER), Anchor::JwtAuthn);
        assert_eq!(Anchor::classify(RBAC_FILTER), Anchor::Rbac);
        assert_eq!(Anchor::classify(STATS_FILTER), Anchor::Stats);
        assert_eq!(Anchor::classify(ROUTER_FILTER), Anchor::Router);
        assert_eq!(Anchor::classify("envoy.filters.http.cors"), Anchor::Other);
    }

    #[test]
    fn drain_prefixes_grow_with_rank() {
        assert_eq!(Anchor::JwtAuthn.drains(), [Phase::Authn]);
        assert_eq!(Anchor::Rbac.drains(), [Phase::Authn, Phase::Authz]);
        assert_eq!(Anchor::Stats.drains(), [Phase::Authn, Phase::Authz, Phase::Stats]);
        assert_eq!(Anchor::Router.drains(), Phase::DRAIN_ORDER);
        assert!(Anchor::Other.drains().is_empty());
    }

    #[test]
    fn discovery_reference_points_at_ads() {
        let extension = ExtensionDescriptor {
            name: "edge-auth".to_string(),
            namespace: "gateways".to_string(),
            filter: crate::xds::filters::http::wasm::WasmFilterConfig {
                name: "edge-auth".to_string(),
                root_id: "edge_auth".to_string(),
                vm_config: crate::xds::filters::http::wasm::WasmVmConfig {
                    runtime: crate::config::DEFAULT_VM_RUNTIME.to_string(),
                    code: crate::xds::filters::http::wasm::WasmCodeSource::Local(
                        crate::xds::filters::http::wasm::WasmLocalSource {
                            path: "/etc/extensions/auth.wasm".to_string(),
                        },
                    ),
                },
                configuration: None,
            },
        };

        let filter = discovery_reference(&extension);
        assert_eq!(filter.name, "edge-auth");
        let Some(HttpConfigType::ConfigDiscovery(source)) = filter.config_type else {
            panic!("expected config discovery")
        };
        assert_eq!(source.type_urls, [WASM_FILTER_TYPE.to_string()]);
        assert!(matches!(
            source.config_source.unwrap().config_source_specifier,
            Some(ConfigSourceSpecifier::Ads(_))
        ));
    }
}
