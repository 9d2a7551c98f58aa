// Request parameter assembly.
//
// Every operation builds a fresh `Params` list, so no state leaks between
// calls. Absent values are recorded as `None` and stripped before dispatch;
// the provider distinguishes an omitted field from an explicit null.

use serde::Serialize;

/// Parameter name carrying the API key on every request.
pub(crate) const TOKEN_PARAM: &str = "token";

/// A single wire-level parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Provider-defined token for an enumerated field.
///
/// Implementations are explicit lookup tables. The symbolic Rust name of a
/// variant must never reach the wire.
pub trait WireToken {
    fn wire_token(&self) -> ParamValue;
}

/// Ordered parameter list for one request.
#[derive(Debug, Clone, Default)]
pub struct Params {
    entries: Vec<(&'static str, Option<ParamValue>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value that is always present.
    pub fn set(mut self, key: &'static str, value: impl Into<ParamValue>) -> Self {
        self.entries.push((key, Some(value.into())));
        self
    }

    /// Add a value that may be absent.
    pub fn set_opt<V: Into<ParamValue>>(mut self, key: &'static str, value: Option<V>) -> Self {
        self.entries.push((key, value.map(Into::into)));
        self
    }

    /// Add an enumerated value by its wire token.
    pub fn set_token<T: WireToken>(self, key: &'static str, value: &T) -> Self {
        self.set(key, value.wire_token())
    }

    /// Add an optional enumerated value by its wire token.
    pub fn set_token_opt<T: WireToken>(mut self, key: &'static str, value: Option<&T>) -> Self {
        self.entries.push((key, value.map(WireToken::wire_token)));
        self
    }

    /// Append every entry of `other`.
    pub fn extend(mut self, other: Params) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Look up the first present value for `key`.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Whether no present (non-absent) value remains.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_none())
    }

    /// Strip absent values and the reserved token key.
    pub fn into_pairs(self) -> Vec<(&'static str, ParamValue)> {
        self.entries
            .into_iter()
            .filter(|(k, _)| *k != TOKEN_PARAM)
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect()
    }
}
