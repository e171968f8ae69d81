//! Request payloads accepted at the HTTP / CLI boundary

use serde::Deserialize;
use serde_json::{Map, Value};

/// `POST /api/v1/optimize` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlendRequest {
    #[serde(default)]
    pub blends: Vec<BlendEntry>,
}

/// One coal row as submitted by the client.
///
/// Numeric fields stay as raw JSON so that strings like `"12.5"` and `null`
/// can be coerced leniently by the normalizer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlendEntry {
    #[serde(default)]
    pub coal: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub min: Option<Value>,
    #[serde(default)]
    pub max: Option<Value>,
    #[serde(default)]
    pub current: Option<Value>,
    #[serde(default)]
    pub cost: Option<Value>,
}

/// `POST /api/v1/aft` and `POST /api/v1/normalize` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertiesRequest {
    #[serde(default)]
    pub properties: Map<String, Value>,
}
