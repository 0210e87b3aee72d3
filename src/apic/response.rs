//! The `imdata` envelope returned by every APIC REST call.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decoded `{"totalCount": "N", "imdata": [...]}` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImData {
    #[serde(rename = "totalCount", default, deserialize_with = "count_from_text")]
    pub total_count: usize,
    #[serde(default)]
    pub imdata: Vec<Value>,
}

/// APIC sends `totalCount` as a string; accept either form.
fn count_from_text<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(usize),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl ImData {
    pub fn len(&self) -> usize {
        self.imdata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imdata.is_empty()
    }

    fn error_attributes(&self) -> Option<&Value> {
        self.imdata.first()?.get("error")?.get("attributes")
    }

    /// Text of an APIC `error` object, if the response carries one.
    pub fn error_text(&self) -> Option<&str> {
        self.error_attributes()?.get("text")?.as_str()
    }

    /// Numeric code of an APIC `error` object, if the response carries one.
    pub fn error_code(&self) -> Option<&str> {
        self.error_attributes()?.get("code")?.as_str()
    }

    /// `dn` attribute of every returned object, index-aligned with `imdata`.
    /// Objects without a DN yield an empty string.
    pub fn dns(&self) -> Vec<String> {
        self.imdata
            .iter()
            .map(|obj| dn_of(obj).unwrap_or_default().to_string())
            .collect()
    }
}

fn dn_of(obj: &Value) -> Option<&str> {
    let (_, body) = obj.as_object()?.iter().next()?;
    body.get("attributes")?.get("dn")?.as_str()
}
