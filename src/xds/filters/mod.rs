//! Shared helpers for building Envoy filter configuration protobufs.

pub mod http;

use envoy_types::pb::google::protobuf::{value::Kind, Any, ListValue, Struct, Value};
use prost::Message;

/// Generic typed-struct wrapper, wire-identical to `xds.type.v3.TypedStruct`.
/// envoy-types only generates the CEL messages under `xds.type.v3`, so the
/// wrapper is defined here.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TypedStruct {
    /// Fully qualified type URL of the message `value` describes
    #[prost(string, tag = "1")]
    pub type_url: String,

    /// Protojson-shaped body of that message
    #[prost(message, optional, tag = "2")]
    pub value: Option<Struct>,
}

/// Build an Envoy `Any` from a prost message and its type URL.
pub fn any_from_message<M: Message>(type_url: impl Into<String>, msg: &M) -> Any {
    Any { type_url: type_url.into(), value: msg.encode_to_vec() }
}

/// Convert a JSON document into a `google.protobuf.Struct`.
///
/// Non-object documents map to the empty struct; a struct has no other
/// top-level representation.
pub fn struct_from_json(value: &serde_json::Value) -> Struct {
    match value {
        serde_json::Value::Object(obj) => Struct {
            fields: obj.iter().map(|(k, v)| (k.clone(), value_from_json(v))).collect(),
        },
        _ => Struct::default(),
    }
}

fn value_from_json(value: &serde_json::Value) -> Value {
    let kind = match value {
        serde_json::Value::Null => Kind::NullValue(0),
        serde_json::Value::Bool(b) => Kind::BoolValue(*b),
        serde_json::Value::Number(n) => Kind::NumberValue(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => Kind::StringValue(s.clone()),
        serde_json::Value::Array(items) => {
            Kind::ListValue(ListValue { values: items.iter().map(value_from_json).collect() })
        }
        serde_json::Value::Object(obj) => Kind::StructValue(Struct {
            fields: obj.iter().map(|(k, v)| (k.clone(), value_from_json(v))).collect(),
        }),
    };
    Value { kind: Some(kind) }
}
