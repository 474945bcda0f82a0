//! Small property-extraction helpers shared by the standard rule catalogue.
//! Kept separate from `dside_graph` because they encode this system's
//! vocabulary (property key names, expected scalar shapes), not the graph
//! data model itself.

use dside_graph::{Edge, PropertyValue, ScalarValue, Vertex};

#[must_use]
pub fn str_prop<'a>(v: &'a Vertex, key: &str) -> Option<&'a str> {
    match v.property(key) {
        Some(PropertyValue::Scalar(ScalarValue::Str(s))) => Some(s.as_str()),
        _ => None,
    }
}

#[must_use]
pub fn i64_prop(v: &Vertex, key: &str) -> Option<i64> {
    match v.property(key) {
        Some(PropertyValue::Scalar(ScalarValue::Int(n))) => Some(*n),
        _ => None,
    }
}

#[must_use]
pub fn f64_prop(v: &Vertex, key: &str) -> Option<f64> {
    match v.property(key) {
        Some(PropertyValue::Scalar(ScalarValue::Float(n))) => Some(*n),
        Some(PropertyValue::Scalar(ScalarValue::Int(n))) => Some(*n as f64),
        _ => None,
    }
}

#[must_use]
pub fn str_list_prop(v: &Vertex, key: &str) -> Vec<String> {
    match v.property(key) {
        Some(PropertyValue::List(items)) => items
            .iter()
            .filter_map(|s| match s {
                ScalarValue::Str(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[must_use]
pub fn edge_i64_prop(e: &Edge, key: &str) -> i64 {
    match e.property(key) {
        Some(PropertyValue::Scalar(ScalarValue::Int(n))) => *n,
        _ => 0,
    }
}
