//! Extension insertion and discovery resolution.
//!
//! One generation pass flows through this module: intent resources become
//! descriptors ([`build_descriptor`]), descriptors are grouped by insertion
//! phase ([`PhaseMap`]), the phase map is spliced into listener filter chains
//! ([`inject_listeners`]) and served to discovery subscribers
//! ([`resolve_extensions`]).

pub mod descriptor;
pub mod discovery;
pub mod injection;
pub mod phase;

pub use descriptor::{
    build_descriptor, ConfigResource, ExtensionDescriptor, ResourceSpec, WasmExtensionSpec,
};
pub use discovery::resolve_extensions;
pub use injection::{inject_listener, inject_listeners};
pub use phase::{Phase, PhaseMap};

/// Network filter name of the HTTP connection manager.
pub const HTTP_CONNECTION_MANAGER_FILTER: &str = "envoy.filters.network.http_connection_manager";

/// Type URL used when re-encoding a rewritten connection manager.
pub const HTTP_CONNECTION_MANAGER_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.network.http_connection_manager.v3.HttpConnectionManager";

/// Anchor filter names. Extensions are spliced in immediately before the
/// first anchor that closes their phase.
pub const JWT_AUTHN_FILTER: &str = "envoy.filters.http.jwt_authn";
pub const RBAC_FILTER: &str = "envoy.filters.http.rbac";
pub const STATS_FILTER: &str = "wasmplane.stats";
pub const ROUTER_FILTER: &str = "envoy.filters.http.router";
