//! APIC managed-object tree.
//!
//! Every APIC object serializes as `{"<class>": {"attributes": {...}, "children": [...]}}`.
//! [`ManagedObject`] holds that shape generically; [`policy`] builds the
//! specific tenant, bridge domain, EPG, contract, and VLAN pool objects.

pub mod dn;
pub mod policy;

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while building or decoding managed objects.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("managed object must be a JSON object")]
    NotAnObject,
    #[error("managed object must have exactly one class key, found {0}")]
    SingleClassExpected(usize),
    #[error("routing is enabled but VLAN '{0}' has no gateway")]
    MissingGateway(String),
}

/// A node in the APIC object tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedObject {
    class: String,
    attributes: BTreeMap<String, String>,
    children: Vec<ManagedObject>,
}

impl ManagedObject {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Shorthand for an object whose only identifying attribute is `name`.
    pub fn named(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(class).with_attr("name", name)
    }

    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: ManagedObject) -> Self {
        self.children.push(child);
        self
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn push_child(&mut self, child: ManagedObject) {
        self.children.push(child);
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn children(&self) -> &[ManagedObject] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<ManagedObject> {
        &mut self.children
    }

    /// First direct child of `class` with the given `name`.
    #[cfg(test)]
    pub(crate) fn find_child(&self, class: &str, name: &str) -> Option<&ManagedObject> {
        self.children
            .iter()
            .find(|c| c.class == class && c.attr("name") == Some(name))
    }

    /// Serialize into APIC REST JSON.
    pub fn to_json(&self) -> Value {
        let attributes: Map<String, Value> = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        let mut body = Map::new();
        body.insert("attributes".to_string(), Value::Object(attributes));
        if !self.children.is_empty() {
            body.insert(
                "children".to_string(),
                Value::Array(self.children.iter().map(Self::to_json).collect()),
            );
        }

        let mut root = Map::new();
        root.insert(self.class.clone(), Value::Object(body));
        Value::Object(root)
    }

    /// Decode a single object as returned in an APIC `imdata` array.
    ///
    /// Non-string attribute values are kept in their JSON text form.
    pub fn from_json(value: &Value) -> Result<Self, ModelError> {
        let root = value.as_object().ok_or(ModelError::NotAnObject)?;
        if root.len() != 1 {
            return Err(ModelError::SingleClassExpected(root.len()));
        }
        let Some((class, body)) = root.iter().next() else {
            return Err(ModelError::SingleClassExpected(0));
        };

        let mut mo = Self::new(class.clone());

        if let Some(attrs) = body.get("attributes").and_then(Value::as_object) {
            for (key, val) in attrs {
                let text = match val {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                mo.attributes.insert(key.clone(), text);
            }
        }

        if let Some(children) = body.get("children").and_then(Value::as_array) {
            for child in children {
                mo.children.push(Self::from_json(child)?);
            }
        }

        Ok(mo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_json_shape() {
        let mo = ManagedObject::named("fvTenant", "common")
            .with_child(ManagedObject::named("fvCtx", "Prod"));

        assert_eq!(
            mo.to_json(),
            json!({
                "fvTenant": {
                    "attributes": {"name": "common"},
                    "children": [
                        {"fvCtx": {"attributes": {"name": "Prod"}}}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_from_json_keeps_children_and_stringifies() {
        let value = json!({
            "infraAccBndlGrp": {
                "attributes": {"name": "vpc-1", "dn": "uni/infra/funcprof/accbundle-vpc-1", "lagT": "node"},
                "children": [
                    {"infraRsLacpPol": {"attributes": {"tnLacpLagPolName": "lacp-active"}}},
                    {"infraRsCdpIfPol": {"attributes": {"tnCdpIfPolName": "cdp-on", "weight": 3}}}
                ]
            }
        });

        let mo = ManagedObject::from_json(&value).unwrap();
        assert_eq!(mo.class(), "infraAccBndlGrp");
        assert_eq!(mo.attr("lagT"), Some("node"));
        assert_eq!(mo.children().len(), 2);
        assert_eq!(mo.children()[1].attr("weight"), Some("3"));
    }

    #[test]
    fn test_from_json_rejects_multiple_keys() {
        let value = json!({"a": {}, "b": {}});
        assert!(matches!(
            ManagedObject::from_json(&value),
            Err(ModelError::SingleClassExpected(2))
        ));
        assert!(matches!(
            ManagedObject::from_json(&json!([1])),
            Err(ModelError::NotAnObject)
        ));
    }

    #[test]
    fn test_find_child() {
        let mo = ManagedObject::named("fvTenant", "t")
            .with_child(ManagedObject::named("fvBD", "a"))
            .with_child(ManagedObject::named("fvBD", "b"));
        assert!(mo.find_child("fvBD", "b").is_some());
        assert!(mo.find_child("fvAEPg", "b").is_none());
    }
}
