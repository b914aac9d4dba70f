//! Structured term collection from JSON documents.

use std::collections::BTreeSet;

use serde_json::Value;

use super::tokenizer::{collect_terms, TermFilter};

/// Collect terms from the string leaves of a parsed JSON value.
///
/// Only values inside arrays and objects count: a bare top-level scalar,
/// string included, yields nothing. Object keys are never tokenized, and
/// number, boolean and null leaves are skipped. Parsed JSON is a tree, so
/// the walk always terminates.
pub(crate) fn collect_json_terms(value: &Value, filter: &TermFilter, terms: &mut BTreeSet<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_member(item, filter, terms);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                collect_member(item, filter, terms);
            }
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

fn collect_member(value: &Value, filter: &TermFilter, terms: &mut BTreeSet<String>) {
    match value {
        Value::String(s) => collect_terms(s, filter, terms),
        Value::Array(_) | Value::Object(_) => collect_json_terms(value, filter, terms),
        Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}
